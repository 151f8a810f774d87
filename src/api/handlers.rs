//! API Handlers
//!
//! HTTP request handlers for the health/stats surface polled by deployment
//! tooling. The CRUD application consumes this crate as a library; only
//! observability goes over the wire.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::cache::{CacheStats, MemoryCache};
use crate::health::{HealthReport, HealthReporter, HealthStatus};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe shared cache
    pub cache: Arc<RwLock<MemoryCache<String>>>,
    /// Health reporter over the cache and executor metrics
    pub reporter: Arc<HealthReporter<String>>,
}

impl AppState {
    pub fn new(
        cache: Arc<RwLock<MemoryCache<String>>>,
        reporter: Arc<HealthReporter<String>>,
    ) -> Self {
        Self { cache, reporter }
    }
}

/// Handler for GET /health
///
/// Liveness: answers as long as the process is serving requests, without
/// touching the cache.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Handler for GET /ready
///
/// Readiness: full health report with the status mapped onto the HTTP
/// status code (`unhealthy` becomes 503 so orchestration stops routing).
pub async fn ready_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.reporter.check_health().await;

    let code = match report.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (code, Json(report))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}
