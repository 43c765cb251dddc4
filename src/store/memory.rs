//! In-process store with the same outcome semantics as the MySQL one.

use crate::error::StoreError;
use crate::models::{Item, ItemCreate, Soldier, SoldierCreate, SoldierUpdate};
use crate::store::{ItemRepository, Result, SoldierRepository, StoreHealth, ITEM, SOLDIER};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Default)]
struct Items {
    rows: BTreeMap<i64, Item>,
    /// Last generated ID; like AUTO_INCREMENT, never reused after a delete.
    last_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<Items>,
    soldiers: RwLock<BTreeMap<i64, Soldier>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Storage("memory store lock poisoned".into())
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn list_items(&self) -> Result<Vec<Item>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.rows.values().cloned().collect())
    }

    async fn get_item(&self, id: i64) -> Result<Item> {
        let items = self.items.read().map_err(|_| poisoned())?;
        items.rows.get(&id).cloned().ok_or_else(|| StoreError::not_found(ITEM, id))
    }

    async fn create_item(&self, item: ItemCreate) -> Result<Item> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.last_id += 1;
        let created = Item::from_create(items.last_id, item);
        items.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_item(&self, id: i64, item: ItemCreate) -> Result<Item> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        let row = items.rows.get_mut(&id).ok_or_else(|| StoreError::not_found(ITEM, id))?;
        *row = Item::from_create(id, item);
        Ok(row.clone())
    }

    async fn delete_item(&self, id: i64) -> Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.rows.remove(&id).map(|_| ()).ok_or_else(|| StoreError::not_found(ITEM, id))
    }
}

#[async_trait]
impl SoldierRepository for MemoryStore {
    async fn list_soldiers(&self) -> Result<Vec<Soldier>> {
        let soldiers = self.soldiers.read().map_err(|_| poisoned())?;
        Ok(soldiers.values().cloned().collect())
    }

    async fn get_soldier(&self, id: i64) -> Result<Soldier> {
        let soldiers = self.soldiers.read().map_err(|_| poisoned())?;
        soldiers.get(&id).cloned().ok_or_else(|| StoreError::not_found(SOLDIER, id))
    }

    async fn create_soldier(&self, soldier: SoldierCreate) -> Result<Soldier> {
        let mut soldiers = self.soldiers.write().map_err(|_| poisoned())?;
        if soldiers.contains_key(&soldier.id) {
            return Err(StoreError::conflict(SOLDIER, soldier.id));
        }
        soldiers.insert(soldier.id, soldier.clone());
        Ok(soldier)
    }

    async fn update_soldier(&self, id: i64, update: SoldierUpdate) -> Result<Soldier> {
        let mut soldiers = self.soldiers.write().map_err(|_| poisoned())?;
        let row = soldiers.get_mut(&id).ok_or_else(|| StoreError::not_found(SOLDIER, id))?;
        update.apply_to(row);
        Ok(row.clone())
    }

    async fn delete_soldier(&self, id: i64) -> Result<()> {
        let mut soldiers = self.soldiers.write().map_err(|_| poisoned())?;
        soldiers.remove(&id).map(|_| ()).ok_or_else(|| StoreError::not_found(SOLDIER, id))
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
