//! Repository implementation over MySQL. Every value is bound as a parameter; table
//! and column names are fixed in the statements below.

use crate::error::StoreError;
use crate::models::{Item, ItemCreate, Soldier, SoldierCreate, SoldierUpdate};
use crate::store::database::finish;
use crate::store::{Database, ItemRepository, Result, SoldierRepository, StoreHealth, ITEM, SOLDIER};
use async_trait::async_trait;
use sqlx::{Connection, MySqlConnection};

const LIST_ITEMS: &str = "SELECT ID, first_name, last_name FROM data ORDER BY ID";
const GET_ITEM: &str = "SELECT ID, first_name, last_name FROM data WHERE ID = ?";
const INSERT_ITEM: &str = "INSERT INTO data (first_name, last_name) VALUES (?, ?)";
const UPDATE_ITEM: &str = "UPDATE data SET first_name = ?, last_name = ? WHERE ID = ?";
const DELETE_ITEM: &str = "DELETE FROM data WHERE ID = ?";
const ITEM_EXISTS: &str = "SELECT 1 FROM data WHERE ID = ?";

// `rank` is a reserved word since MySQL 8.0.
const LIST_SOLDIERS: &str = "SELECT ID, first_name, last_name, phone_number, `rank` FROM soldiers ORDER BY ID";
const GET_SOLDIER: &str = "SELECT ID, first_name, last_name, phone_number, `rank` FROM soldiers WHERE ID = ?";
const INSERT_SOLDIER: &str =
    "INSERT INTO soldiers (ID, first_name, last_name, phone_number, `rank`) VALUES (?, ?, ?, ?, ?)";
const UPDATE_SOLDIER: &str = r#"
    UPDATE soldiers SET
        first_name = COALESCE(?, first_name),
        last_name = COALESCE(?, last_name),
        phone_number = COALESCE(?, phone_number),
        `rank` = COALESCE(?, `rank`)
    WHERE ID = ?
"#;
const DELETE_SOLDIER: &str = "DELETE FROM soldiers WHERE ID = ?";

/// Items and soldiers stored in MySQL.
#[derive(Clone, Debug)]
pub struct MySqlStore {
    db: Database,
}

impl MySqlStore {
    pub fn new(db: Database) -> Self {
        MySqlStore { db }
    }
}

#[async_trait]
impl ItemRepository for MySqlStore {
    async fn list_items(&self) -> Result<Vec<Item>> {
        tracing::debug!(sql = %LIST_ITEMS, "query");
        let mut conn = self.db.acquire().await?;
        let rows = sqlx::query_as::<_, Item>(LIST_ITEMS).fetch_all(&mut *conn).await?;
        Ok(rows)
    }

    async fn get_item(&self, id: i64) -> Result<Item> {
        tracing::debug!(sql = %GET_ITEM, id, "query");
        let mut conn = self.db.acquire().await?;
        sqlx::query_as::<_, Item>(GET_ITEM)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| StoreError::not_found(ITEM, id))
    }

    async fn create_item(&self, item: ItemCreate) -> Result<Item> {
        let mut conn = self.db.acquire().await?;
        let mut tx = conn.begin().await?;
        let result = insert_item(&mut tx, &item).await;
        let id = finish(tx, result).await?;
        Ok(Item::from_create(id, item))
    }

    async fn update_item(&self, id: i64, item: ItemCreate) -> Result<Item> {
        let mut conn = self.db.acquire().await?;
        let mut tx = conn.begin().await?;
        let result = update_item(&mut tx, id, &item).await;
        finish(tx, result).await?;
        Ok(Item::from_create(id, item))
    }

    async fn delete_item(&self, id: i64) -> Result<()> {
        let mut conn = self.db.acquire().await?;
        let mut tx = conn.begin().await?;
        let result = delete_by_id(&mut tx, DELETE_ITEM, ITEM, id).await;
        finish(tx, result).await
    }
}

#[async_trait]
impl SoldierRepository for MySqlStore {
    async fn list_soldiers(&self) -> Result<Vec<Soldier>> {
        tracing::debug!(sql = %LIST_SOLDIERS, "query");
        let mut conn = self.db.acquire().await?;
        let rows = sqlx::query_as::<_, Soldier>(LIST_SOLDIERS).fetch_all(&mut *conn).await?;
        Ok(rows)
    }

    async fn get_soldier(&self, id: i64) -> Result<Soldier> {
        let mut conn = self.db.acquire().await?;
        fetch_soldier(&mut conn, id).await
    }

    async fn create_soldier(&self, soldier: SoldierCreate) -> Result<Soldier> {
        let mut conn = self.db.acquire().await?;
        let mut tx = conn.begin().await?;
        let result = insert_soldier(&mut tx, &soldier).await;
        finish(tx, result).await?;
        Ok(soldier)
    }

    async fn update_soldier(&self, id: i64, update: SoldierUpdate) -> Result<Soldier> {
        let mut conn = self.db.acquire().await?;
        let mut tx = conn.begin().await?;
        let result = update_soldier(&mut tx, id, &update).await;
        finish(tx, result).await
    }

    async fn delete_soldier(&self, id: i64) -> Result<()> {
        let mut conn = self.db.acquire().await?;
        let mut tx = conn.begin().await?;
        let result = delete_by_id(&mut tx, DELETE_SOLDIER, SOLDIER, id).await;
        finish(tx, result).await
    }
}

#[async_trait]
impl StoreHealth for MySqlStore {
    async fn ping(&self) -> Result<()> {
        self.db.ping().await
    }
}

async fn insert_item(conn: &mut MySqlConnection, item: &ItemCreate) -> Result<i64> {
    tracing::debug!(sql = %INSERT_ITEM, "query (tx)");
    let done = sqlx::query(INSERT_ITEM)
        .bind(&item.first_name)
        .bind(&item.last_name)
        .execute(&mut *conn)
        .await?;
    Ok(done.last_insert_id() as i64)
}

async fn update_item(conn: &mut MySqlConnection, id: i64, item: &ItemCreate) -> Result<()> {
    tracing::debug!(sql = %UPDATE_ITEM, id, "query (tx)");
    let done = sqlx::query(UPDATE_ITEM)
        .bind(&item.first_name)
        .bind(&item.last_name)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    // MySQL counts changed rows, so an update to identical values also reports zero.
    if done.rows_affected() == 0 {
        let exists = sqlx::query(ITEM_EXISTS).bind(id).fetch_optional(&mut *conn).await?;
        if exists.is_none() {
            return Err(StoreError::not_found(ITEM, id));
        }
    }
    Ok(())
}

async fn insert_soldier(conn: &mut MySqlConnection, soldier: &Soldier) -> Result<()> {
    tracing::debug!(sql = %INSERT_SOLDIER, id = soldier.id, "query (tx)");
    sqlx::query(INSERT_SOLDIER)
        .bind(soldier.id)
        .bind(&soldier.first_name)
        .bind(&soldier.last_name)
        .bind(soldier.phone_number)
        .bind(&soldier.rank)
        .execute(&mut *conn)
        .await
        .map_err(|e| insert_error(e, SOLDIER, soldier.id))?;
    Ok(())
}

async fn update_soldier(conn: &mut MySqlConnection, id: i64, update: &SoldierUpdate) -> Result<Soldier> {
    tracing::debug!(sql = %UPDATE_SOLDIER, id, "query (tx)");
    sqlx::query(UPDATE_SOLDIER)
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .bind(update.phone_number)
        .bind(update.rank.as_deref())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    fetch_soldier(conn, id).await
}

async fn fetch_soldier(conn: &mut MySqlConnection, id: i64) -> Result<Soldier> {
    tracing::debug!(sql = %GET_SOLDIER, id, "query");
    sqlx::query_as::<_, Soldier>(GET_SOLDIER)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| StoreError::not_found(SOLDIER, id))
}

async fn delete_by_id(conn: &mut MySqlConnection, sql: &str, entity: &'static str, id: i64) -> Result<()> {
    tracing::debug!(sql = %sql, id, "query (tx)");
    let done = sqlx::query(sql).bind(id).execute(&mut *conn).await?;
    if done.rows_affected() == 0 {
        return Err(StoreError::not_found(entity, id));
    }
    Ok(())
}

/// Duplicate primary keys become `Conflict`; anything else keeps the driver message.
fn insert_error(e: sqlx::Error, entity: &'static str, id: i64) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return StoreError::conflict(entity, id);
        }
    }
    e.into()
}
