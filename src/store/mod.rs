//! Data access: repository traits, the MySQL-backed implementation, and an in-memory one.

mod database;
mod memory;
mod mysql;
mod retry;

pub use database::Database;
pub use memory::MemoryStore;
pub use mysql::MySqlStore;
pub use retry::{Backoff, RetryPolicy};

use crate::error::StoreError;
use crate::models::{Item, ItemCreate, Soldier, SoldierCreate, SoldierUpdate};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StoreError>;

pub const ITEM: &str = "Item";
pub const SOLDIER: &str = "Soldier";

/// CRUD over the `data` table.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn list_items(&self) -> Result<Vec<Item>>;

    async fn get_item(&self, id: i64) -> Result<Item>;

    /// Insert and return the record with its generated ID.
    async fn create_item(&self, item: ItemCreate) -> Result<Item>;

    /// Replace both name fields.
    async fn update_item(&self, id: i64, item: ItemCreate) -> Result<Item>;

    async fn delete_item(&self, id: i64) -> Result<()>;
}

/// CRUD over the `soldiers` table.
#[async_trait]
pub trait SoldierRepository: Send + Sync {
    async fn list_soldiers(&self) -> Result<Vec<Soldier>>;

    async fn get_soldier(&self, id: i64) -> Result<Soldier>;

    /// Insert with the client-supplied ID. A taken ID is `StoreError::Conflict`.
    async fn create_soldier(&self, soldier: SoldierCreate) -> Result<Soldier>;

    /// Partial update; returns the stored record after the change.
    async fn update_soldier(&self, id: i64, update: SoldierUpdate) -> Result<Soldier>;

    async fn delete_soldier(&self, id: i64) -> Result<()>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Succeeds when the backing storage can serve a request.
    async fn ping(&self) -> Result<()>;
}

/// Everything the HTTP layer needs from storage.
pub trait Store: ItemRepository + SoldierRepository + StoreHealth {}

impl<T> Store for T where T: ItemRepository + SoldierRepository + StoreHealth {}
