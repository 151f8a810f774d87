//! Resilient Cache - health/stats sidecar
//!
//! Boots the shared cache, its background sweep, and the HTTP surface that
//! deployment tooling polls for liveness/readiness.
//!
//! # Startup Sequence
//! 1. Initialize tracing subscriber for logging
//! 2. Load configuration from environment variables
//! 3. Create the shared cache and start the TTL cleanup task
//! 4. Wire the query executor metrics into the health reporter
//! 5. Start the Axum server on the configured port
//! 6. Handle graceful shutdown on SIGINT/SIGTERM

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resilient_cache::{
    api::{create_router, AppState},
    cache::MemoryCache,
    config::Config,
    executor::QueryExecutor,
    health::HealthReporter,
    tasks::{spawn_cleanup_task, Sweeper},
    RetryPolicy,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resilient_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resilient-cache sidecar");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, cleanup_interval={}s, retries={}, port={}",
        config.cache.max_entries,
        config.cache.cleanup_interval,
        config.executor.retries,
        config.server_port
    );

    let cache = Arc::new(RwLock::new(MemoryCache::<String>::new(
        config.cache.max_entries,
    )));
    info!("Cache initialized");

    let sweeper = spawn_cleanup_task(Arc::clone(&cache), config.cache.cleanup_interval);
    info!("Background cleanup task started");

    let executor = QueryExecutor::new(
        Arc::clone(&cache),
        RetryPolicy::new(
            config.executor.retries,
            config.executor.base_delay_ms,
            config.executor.max_delay_ms,
        ),
    );
    let reporter = Arc::new(HealthReporter::new(
        Arc::clone(&cache),
        executor.metrics(),
        config.health.clone(),
    ));

    let app = create_router(AppState::new(cache, reporter));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeper so
/// no timer outlives the server.
async fn shutdown_signal(mut sweeper: Sweeper) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    sweeper.shutdown();
    warn!("Cleanup task stopped");
}
