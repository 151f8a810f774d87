//! Health Report Module
//!
//! The serializable shape returned by the health reporter, intended to be
//! the body of an HTTP readiness/liveness endpoint. The HTTP layer maps
//! `unhealthy` to a 503; the report itself is transport-agnostic.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Health Status ==
/// Tri-state health classification.
///
/// Ordered so that `max` picks the worst status across checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

// == Check Result ==
/// Outcome of a single named check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// How long this check took in milliseconds
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl CheckResult {
    pub fn healthy(duration_ms: u64) -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: None,
            duration_ms,
            metadata: None,
        }
    }

    pub fn degraded(message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            status: HealthStatus::Degraded,
            message: Some(message.into()),
            duration_ms,
            metadata: None,
        }
    }

    pub fn unhealthy(message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
            duration_ms,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

// == Health Report ==
/// Aggregate report across all checks.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Worst status among the individual checks
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    /// Total time spent producing this report in milliseconds
    pub duration_ms: u64,
    pub checks: BTreeMap<String, CheckResult>,
}

impl HealthReport {
    pub fn new(duration_ms: u64, checks: BTreeMap<String, CheckResult>) -> Self {
        let status = checks
            .values()
            .map(|check| check.status)
            .max()
            .unwrap_or(HealthStatus::Healthy);

        Self {
            status,
            timestamp: Utc::now(),
            duration_ms,
            checks,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering_picks_worst() {
        assert_eq!(
            HealthStatus::Healthy.max(HealthStatus::Degraded),
            HealthStatus::Degraded
        );
        assert_eq!(
            HealthStatus::Degraded.max(HealthStatus::Unhealthy),
            HealthStatus::Unhealthy
        );
    }

    #[test]
    fn test_report_aggregates_worst_status() {
        let mut checks = BTreeMap::new();
        checks.insert("cache".to_string(), CheckResult::healthy(1));
        checks.insert("executor".to_string(), CheckResult::degraded("slow", 2));

        let report = HealthReport::new(3, checks);
        assert_eq!(report.status, HealthStatus::Degraded);
    }

    #[test]
    fn test_empty_report_is_healthy() {
        let report = HealthReport::new(0, BTreeMap::new());
        assert_eq!(report.status, HealthStatus::Healthy);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_report_serialization_shape() {
        let mut checks = BTreeMap::new();
        checks.insert("cache".to_string(), CheckResult::healthy(1));

        let report = HealthReport::new(1, checks);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "healthy");
        assert!(json["timestamp"].is_string());
        assert!(json["checks"]["cache"]["duration_ms"].is_number());
        // Empty message/metadata are omitted entirely
        assert!(json["checks"]["cache"].get("message").is_none());
    }
}
