use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use classplan::config::{AppConfig, DEFAULT_CONFIG_PATH};
use classplan::engine::ScheduleEngine;
use classplan::server::create_router;
use classplan::store::SqliteSnapshotStore;
use classplan::types::{AppState, CacheControl};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = AppConfig::load(&config_path)
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        config = %config_path.display(),
        database = %config.database_path,
        top_k = config.engine.top_k,
        "Loaded configuration"
    );

    let store = SqliteSnapshotStore::open(&config.database_path)
        .with_context(|| format!("failed to open database {}", config.database_path))?;

    let state = Arc::new(AppState::cached(
        store,
        config.cache_ttl(),
        ScheduleEngine::new(config.engine.clone()),
    ));

    if let Some(cache) = state.cache.clone() {
        spawn_cache_sweeper(cache, config.cache_ttl());
    }

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    info!("Listening on http://{address}");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Evicts expired snapshots once per TTL so idle schools don't linger.
fn spawn_cache_sweeper(cache: Arc<dyn CacheControl>, ttl: Duration) {
    if ttl.is_zero() {
        return;
    }

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ttl);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            cache.cleanup_expired();
            let stats = cache.stats();
            debug!(active = stats.active_entries, "Swept snapshot cache");
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
