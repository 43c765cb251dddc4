//! Records served by the API. The identifier is serialized as `ID` to match the table column.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Row of the `data` table. `ID` is generated by the database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Item {
    #[serde(rename = "ID")]
    #[sqlx(rename = "ID")]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// Body of `POST /items/` and `PUT /items/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemCreate {
    pub first_name: String,
    pub last_name: String,
}

impl Item {
    pub fn from_create(id: i64, item: ItemCreate) -> Self {
        Item {
            id,
            first_name: item.first_name,
            last_name: item.last_name,
        }
    }
}

/// Row of the `soldiers` table. `ID` is supplied by the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Soldier {
    #[serde(rename = "ID")]
    #[sqlx(rename = "ID")]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: i64,
    pub rank: String,
}

/// Body of `POST /soldiersdb/`; same shape as the stored record.
pub type SoldierCreate = Soldier;

/// Body of `PUT /soldiersdb/{id}`. Absent fields keep their stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SoldierUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<i64>,
    #[serde(default)]
    pub rank: Option<String>,
}

impl SoldierUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone_number.is_none() && self.rank.is_none()
    }

    /// Apply the present fields to `soldier`.
    pub fn apply_to(&self, soldier: &mut Soldier) {
        if let Some(v) = &self.first_name {
            soldier.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            soldier.last_name = v.clone();
        }
        if let Some(v) = self.phone_number {
            soldier.phone_number = v;
        }
        if let Some(v) = &self.rank {
            soldier.rank = v.clone();
        }
    }
}
