//! Configuration records for the database, the connection pool, the HTTP server, and startup scripts.

use crate::store::RetryPolicy;
use std::path::PathBuf;
use std::time::Duration;

/// Database coordinates. A field left `None` could not be resolved from the
/// environment; the driver default applies and any failure shows up at connect time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DbConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// How long one acquisition attempt may wait for a free slot or a new connection.
    pub acquire_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(2),
            retry: RetryPolicy::default(),
        }
    }
}

impl PoolConfig {
    /// Longest a single `acquire` can take before giving up: every attempt runs
    /// into the acquire timeout and every backoff delay is slept.
    pub fn worst_case_acquire(&self) -> Duration {
        self.acquire_timeout
            .saturating_mul(self.retry.max_attempts)
            .saturating_add(self.retry.total_backoff())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: "0.0.0.0:8000".into(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Schema and seed scripts run once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub enabled: bool,
    pub schema_script: PathBuf,
    pub seed_script: PathBuf,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        BootstrapConfig {
            enabled: true,
            schema_script: PathBuf::from("scripts/create_data.sql"),
            seed_script: PathBuf::from("scripts/insert_data.sql"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppConfig {
    pub db: DbConfig,
    pub pool: PoolConfig,
    pub server: ServerConfig,
    pub bootstrap: BootstrapConfig,
}
