//! Executor Metrics Module
//!
//! Lock-free counters the query executor feeds and the health reporter
//! reads. Latency is recorded per completed `execute` call (cache hits are
//! not counted, so the error rate reflects real data-source traffic).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Executor Metrics ==
/// Aggregated latency/error counters for one executor.
#[derive(Debug, Default)]
pub struct ExecutorMetrics {
    queries: AtomicU64,
    failures: AtomicU64,
    timeouts: AtomicU64,
    latency_total_ms: AtomicU64,
}

impl ExecutorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a query that ultimately succeeded.
    pub fn record_success(&self, latency_ms: u64) {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.latency_total_ms.fetch_add(latency_ms, Ordering::Relaxed);
    }

    /// Records a query that failed after exhausting its attempts.
    pub fn record_failure(&self, latency_ms: u64) {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.latency_total_ms.fetch_add(latency_ms, Ordering::Relaxed);
    }

    /// Records a single timed-out attempt (a query may time out on several
    /// attempts and still succeed).
    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent-enough snapshot for observability.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let queries = self.queries.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let timeouts = self.timeouts.load(Ordering::Relaxed);
        let latency_total_ms = self.latency_total_ms.load(Ordering::Relaxed);

        MetricsSnapshot {
            queries,
            failures,
            timeouts,
            avg_latency_ms: if queries == 0 {
                0.0
            } else {
                latency_total_ms as f64 / queries as f64
            },
            error_rate: if queries == 0 {
                0.0
            } else {
                failures as f64 / queries as f64
            },
        }
    }
}

// == Metrics Snapshot ==
/// Point-in-time view of executor counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Completed queries (successes and terminal failures)
    pub queries: u64,
    /// Queries that failed after exhausting retries
    pub failures: u64,
    /// Individual attempts that hit their deadline
    pub timeouts: u64,
    /// Mean end-to-end latency per completed query
    pub avg_latency_ms: f64,
    /// failures / queries
    pub error_rate: f64,
}
