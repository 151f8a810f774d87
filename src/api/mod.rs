//! API Module
//!
//! HTTP handlers and routing for the observability surface.
//!
//! # Endpoints
//! - `GET /health` - Liveness check
//! - `GET /ready` - Readiness check (health report body)
//! - `GET /stats` - Cache statistics

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
