//! Run SQL script files against the database: table creation and seed data at startup.

use crate::config::BootstrapConfig;
use crate::error::{MigrationError, StoreError};
use crate::store::Database;
use sqlx::Connection;
use std::path::Path;

/// Execute every statement in `path` inside one transaction. Commits on success;
/// on the first failing statement rolls back and returns the error.
pub async fn run_script(db: &Database, path: &Path) -> Result<(), MigrationError> {
    let script = path.display().to_string();
    let sql = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| MigrationError::Read {
            path: script.clone(),
            source,
        })?;
    let execute_err = |source: StoreError| MigrationError::Execute {
        path: script.clone(),
        source,
    };

    let mut conn = db.acquire().await.map_err(execute_err)?;
    let mut tx = conn.begin().await.map_err(|e| execute_err(e.into()))?;
    tracing::debug!(script = %script, bytes = sql.len(), "executing script");
    match sqlx::raw_sql(&sql).execute(&mut *tx).await {
        Ok(done) => {
            tx.commit().await.map_err(|e| execute_err(e.into()))?;
            tracing::info!(script = %script, rows_affected = done.rows_affected(), "script applied");
            Ok(())
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(script = %script, error = %rollback_err, "rollback failed");
            }
            Err(execute_err(e.into()))
        }
    }
}

/// Create tables, then insert seed rows. Skipped when bootstrap is disabled.
pub async fn bootstrap(db: &Database, config: &BootstrapConfig) -> Result<(), MigrationError> {
    if !config.enabled {
        tracing::info!("database bootstrap disabled");
        return Ok(());
    }
    run_script(db, &config.schema_script).await?;
    run_script(db, &config.seed_script).await?;
    Ok(())
}
