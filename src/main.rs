//! Service entry point: read config, build the pool, run bootstrap scripts, serve until shutdown.

use data_loader::{app, bootstrap, AppConfig, AppState, Database, MySqlStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("data_loader=info,tower_http=info")),
        )
        .init();

    tracing::info!(
        host = config.db.host.as_deref().unwrap_or("-"),
        port = config.db.port,
        database = config.db.database.as_deref().unwrap_or("-"),
        pool_size = config.pool.max_connections,
        "initializing database connection pool"
    );
    let db = Database::new(&config.db, &config.pool);
    bootstrap(&db, &config.bootstrap).await?;

    let state = AppState::new(MySqlStore::new(db.clone()));
    let router = app(state, &config.server);

    let listener = TcpListener::bind(&config.server.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down, releasing database connections");
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
