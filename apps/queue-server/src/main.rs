//! Queue server binary
//!
//! Wires the queue service module to a database and an HTTP listener,
//! runs the auto-call scheduler in the background and shuts both down
//! gracefully on ctrl-c.

use std::sync::Arc;

use anyhow::{Context, Result};
use queue_service::config::Config;
use queue_service::QueueServiceModule;
use sea_orm::Database;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = Database::connect(&database_url)
        .await
        .context("failed to connect to database")?;

    QueueServiceModule::migrate(&db).await?;
    let module = Arc::new(QueueServiceModule::init(Arc::new(db), config));

    let cancel = CancellationToken::new();
    let scheduler = tokio::spawn({
        let module = module.clone();
        let cancel = cancel.clone();
        async move { module.serve(cancel).await }
    });

    let bind = std::env::var("QUEUE_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(%bind, "queue server listening");

    axum::serve(listener, module.router())
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await
        .context("http server error")?;

    cancel.cancel();
    scheduler.await??;
    tracing::info!("queue server stopped");
    Ok(())
}

/// Load YAML config from `QUEUE_CONFIG` if set, defaults otherwise.
fn load_config() -> Result<Config> {
    match std::env::var("QUEUE_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {path}"))?;
            serde_yaml::from_str(&raw).with_context(|| format!("invalid config file {path}"))
        }
        Err(_) => Ok(Config::default()),
    }
}

async fn shutdown_signal(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available: fall back to cancellation only.
        cancel.cancelled().await;
        return;
    }
    tracing::info!("shutdown signal received");
    cancel.cancel();
}
