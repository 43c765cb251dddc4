//! Load configuration from environment variables. Each database field is looked up
//! through a chain of names (service name first, then legacy aliases); empty values count as unset.

use crate::config::types::*;
use crate::error::ConfigError;
use crate::store::{Backoff, RetryPolicy};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const HOST_VARS: &[&str] = &["DB_HOST", "DATABASE_HOST"];
pub const PORT_VARS: &[&str] = &["DB_PORT"];
pub const USER_VARS: &[&str] = &["DB_USER", "MYSQL_DATABASE_USER", "database-user"];
pub const PASSWORD_VARS: &[&str] = &[
    "DB_PASS",
    "DB_PASSWORD",
    "MYSQL_DATABASE_PASSWORD",
    "database-password",
];
pub const NAME_VARS: &[&str] = &["DB_NAME", "MYSQL_DATABASE_NAME", "database-name"];

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let db = DbConfig::from_lookup(&lookup)?;

        let defaults = PoolConfig::default();
        let attempts = parse_var(&lookup, "DB_CONNECT_ATTEMPTS")?.unwrap_or(defaults.retry.max_attempts);
        let backoff_ms: Option<u64> = parse_var(&lookup, "DB_CONNECT_BACKOFF_MS")?;
        let pool = PoolConfig {
            max_connections: parse_var(&lookup, "DB_POOL_SIZE")?.unwrap_or(defaults.max_connections),
            acquire_timeout: parse_var(&lookup, "DB_ACQUIRE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
            retry: RetryPolicy {
                max_attempts: attempts.max(1),
                backoff: backoff_ms
                    .map(|ms| Backoff::Linear(Duration::from_millis(ms)))
                    .unwrap_or(defaults.retry.backoff),
            },
        };

        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            bind_addr: lookup("BIND_ADDR").unwrap_or(server_defaults.bind_addr),
            request_timeout: parse_var(&lookup, "REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(server_defaults.request_timeout),
        };

        let budget = pool.worst_case_acquire();
        if budget >= server.request_timeout {
            return Err(ConfigError::Invalid {
                var: "REQUEST_TIMEOUT_SECS",
                message: format!(
                    "{}s does not cover the connection retries ({}s worst case); raise it or lower DB_CONNECT_ATTEMPTS / DB_ACQUIRE_TIMEOUT_SECS",
                    server.request_timeout.as_secs(),
                    budget.as_secs()
                ),
            });
        }

        let bootstrap_defaults = BootstrapConfig::default();
        let bootstrap = BootstrapConfig {
            enabled: parse_bool(&lookup, "DB_BOOTSTRAP")?.unwrap_or(bootstrap_defaults.enabled),
            schema_script: lookup("DB_SCHEMA_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(bootstrap_defaults.schema_script),
            seed_script: lookup("DB_SEED_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(bootstrap_defaults.seed_script),
        };

        Ok(AppConfig {
            db,
            pool,
            server,
            bootstrap,
        })
    }
}

impl DbConfig {
    /// Resolve database coordinates. Only a malformed port is an error; anything
    /// unresolved stays `None`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match first_set(&lookup, PORT_VARS) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: PORT_VARS[0],
                message: format!("expected a port number, got '{}'", raw),
            })?,
            None => DEFAULT_PORT,
        };
        Ok(DbConfig {
            host: Some(first_set(&lookup, HOST_VARS).unwrap_or_else(|| DEFAULT_HOST.into())),
            port: Some(port),
            user: first_set(&lookup, USER_VARS),
            password: first_set(&lookup, PASSWORD_VARS),
            database: first_set(&lookup, NAME_VARS),
        })
    }
}

/// First variable in `names` that has a value.
pub fn first_set<F>(lookup: F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().find_map(|name| lookup(name))
}

fn parse_var<F, T>(lookup: F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(raw) => raw.parse().map(Some).map_err(|_| ConfigError::Invalid {
            var,
            message: format!("expected a number, got '{}'", raw),
        }),
        None => Ok(None),
    }
}

fn parse_bool<F>(lookup: F, var: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::Invalid {
                var,
                message: format!("expected a boolean, got '{}'", raw),
            }),
        },
        None => Ok(None),
    }
}
