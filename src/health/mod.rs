//! Health Module
//!
//! Tri-state health/readiness evaluation of the cache and query executor,
//! with a serializable report shape for orchestration probes.

mod report;
mod reporter;

// Re-export public types
pub use report::{CheckResult, HealthReport, HealthStatus};
pub use reporter::HealthReporter;
