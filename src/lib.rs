//! Data loader: REST CRUD service for the `data` (items) and `soldiers` tables in MySQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod migration;
pub mod models;
pub mod response;
pub mod state;
pub mod store;
pub mod service;
pub mod handlers;
pub mod routes;

pub use config::{AppConfig, BootstrapConfig, DbConfig, PoolConfig, ServerConfig};
pub use error::{AppError, ConfigError, MigrationError, StoreError};
pub use migration::{bootstrap, run_script};
pub use models::{Item, ItemCreate, Soldier, SoldierCreate, SoldierUpdate};
pub use routes::app;
pub use state::AppState;
pub use store::{Backoff, Database, MemoryStore, MySqlStore, RetryPolicy, Store};
