//! MySQL pool handle with retrying, verified connection acquisition.

use crate::config::{DbConfig, PoolConfig};
use crate::error::StoreError;
use crate::store::RetryPolicy;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{Connection, MySql, Transaction};

/// Shared handle to the connection pool. Cloning is cheap; all clones use the same pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: MySqlPool,
    retry: RetryPolicy,
}

impl Database {
    /// Build the pool without opening a connection. Connection errors surface on first acquire.
    pub fn new(db: &DbConfig, pool: &PoolConfig) -> Self {
        let options = connect_options(db);
        let pool_handle = MySqlPoolOptions::new()
            .max_connections(pool.max_connections)
            .acquire_timeout(pool.acquire_timeout)
            .test_before_acquire(false)
            .connect_lazy_with(options);
        Database {
            pool: pool_handle,
            retry: pool.retry,
        }
    }

    /// Wrap an existing pool, e.g. one handed out by a test harness.
    pub fn from_pool(pool: MySqlPool, retry: RetryPolicy) -> Self {
        Database { pool, retry }
    }

    /// Acquire a pooled connection and verify it with a ping, retrying per the policy.
    /// The returned guard goes back to the pool when dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<MySql>, StoreError> {
        self.retry
            .run("acquire connection", |attempt| {
                let pool = self.pool.clone();
                async move {
                    let mut conn = pool.acquire().await?;
                    conn.ping().await?;
                    tracing::debug!(attempt, "connection acquired");
                    Ok::<_, sqlx::Error>(conn)
                }
            })
            .await
            .map_err(|(e, attempts)| StoreError::Connection(format!("{} (after {} attempts)", e, attempts)))
    }

    /// Single verified acquire, no retry. For readiness checks.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("connection pool closed");
    }
}

fn connect_options(db: &DbConfig) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new();
    if let Some(host) = &db.host {
        options = options.host(host);
    }
    if let Some(port) = db.port {
        options = options.port(port);
    }
    if let Some(user) = &db.user {
        options = options.username(user);
    }
    if let Some(password) = &db.password {
        options = options.password(password);
    }
    if let Some(database) = &db.database {
        options = options.database(database);
    }
    options
}

/// Commit on `Ok`, roll back on `Err`. A failed rollback is logged; the original error is returned.
pub(crate) async fn finish<T>(
    tx: Transaction<'_, MySql>,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Backoff;
    use std::time::{Duration, Instant};

    fn unreachable() -> DbConfig {
        DbConfig {
            host: Some("127.0.0.1".into()),
            port: Some(1),
            user: Some("root".into()),
            password: None,
            database: Some("nowhere".into()),
        }
    }

    #[tokio::test]
    async fn acquire_reports_connection_error_after_all_attempts() {
        let pool = PoolConfig {
            max_connections: 1,
            acquire_timeout: Duration::from_millis(100),
            retry: RetryPolicy::new(3, Backoff::Linear(Duration::from_millis(20))),
        };
        let db = Database::new(&unreachable(), &pool);
        let started = Instant::now();
        let err = db.acquire().await.unwrap_err();
        match err {
            StoreError::Connection(msg) => assert!(msg.contains("after 3 attempts"), "{msg}"),
            other => panic!("expected connection error, got {other:?}"),
        }
        // 20ms + 40ms of backoff at minimum.
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn ping_does_not_retry() {
        let pool = PoolConfig {
            max_connections: 1,
            acquire_timeout: Duration::from_millis(100),
            retry: RetryPolicy::new(5, Backoff::Fixed(Duration::from_secs(30))),
        };
        let db = Database::new(&unreachable(), &pool);
        let err = tokio::time::timeout(Duration::from_secs(10), db.ping())
            .await
            .expect("ping should fail fast")
            .unwrap_err();
        assert!(matches!(err, StoreError::Connection(_) | StoreError::Storage(_)));
    }
}
