//! Health Reporter Module
//!
//! On-demand evaluation of the cache and the query executor for liveness and
//! readiness probes. The reporter never returns an error: every probe
//! failure is converted into an `unhealthy` check with the failure message
//! recorded. The probe itself runs under a deadline so a hung cache lock
//! cannot hang health reporting.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::warn;

use crate::cache::MemoryCache;
use crate::config::HealthConfig;
use crate::executor::ExecutorMetrics;
use crate::health::{CheckResult, HealthReport, HealthStatus};

/// Key used for the cache round-trip probe. Short TTL so an interrupted
/// probe cannot leave a permanent entry behind.
const PROBE_KEY: &str = "__health_probe__";
const PROBE_TTL_MS: u64 = 5000;

// == Health Reporter ==
/// Evaluates cache and executor health against explicit thresholds.
pub struct HealthReporter<V> {
    cache: Arc<RwLock<MemoryCache<V>>>,
    metrics: Arc<ExecutorMetrics>,
    thresholds: HealthConfig,
}

impl<V: Clone + Default> HealthReporter<V> {
    pub fn new(
        cache: Arc<RwLock<MemoryCache<V>>>,
        metrics: Arc<ExecutorMetrics>,
        thresholds: HealthConfig,
    ) -> Self {
        Self {
            cache,
            metrics,
            thresholds,
        }
    }

    // == Check Health ==
    /// Produces a full health report. Never fails; the worst individual
    /// check determines the overall status.
    pub async fn check_health(&self) -> HealthReport {
        let started = Instant::now();

        let mut checks = BTreeMap::new();
        checks.insert("cache".to_string(), self.check_cache().await);
        checks.insert("executor".to_string(), self.check_executor());

        HealthReport::new(started.elapsed().as_millis() as u64, checks)
    }

    // == Cache Check ==
    /// Minimal set/get/delete round-trip under the probe deadline, graded by
    /// latency.
    async fn check_cache(&self) -> CheckResult {
        let started = Instant::now();

        let probe = async {
            let mut cache = self.cache.write().await;
            cache.set(PROBE_KEY.to_string(), V::default(), Some(PROBE_TTL_MS));
            let hit = cache.get(PROBE_KEY).is_some();
            cache.delete(PROBE_KEY);
            (hit, cache.stats())
        };

        let deadline = Duration::from_millis(self.thresholds.probe_timeout_ms);
        match timeout(deadline, probe).await {
            Ok((true, stats)) => {
                let elapsed = started.elapsed().as_millis() as u64;
                let metadata = serde_json::to_value(&stats).ok();
                let mut check = if elapsed >= self.thresholds.unhealthy_latency_ms {
                    CheckResult::unhealthy(
                        format!("cache probe took {} ms", elapsed),
                        elapsed,
                    )
                } else if elapsed >= self.thresholds.degraded_latency_ms {
                    CheckResult::degraded(format!("cache probe took {} ms", elapsed), elapsed)
                } else {
                    CheckResult::healthy(elapsed)
                };
                if let Some(metadata) = metadata {
                    check = check.with_metadata(metadata);
                }
                check
            }
            Ok((false, _)) => {
                let elapsed = started.elapsed().as_millis() as u64;
                warn!("cache probe wrote a value it could not read back");
                CheckResult::unhealthy("cache probe read missed", elapsed)
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.thresholds.probe_timeout_ms,
                    "cache probe timed out"
                );
                CheckResult::unhealthy(
                    format!(
                        "cache probe timed out after {} ms",
                        self.thresholds.probe_timeout_ms
                    ),
                    started.elapsed().as_millis() as u64,
                )
            }
        }
    }

    // == Executor Check ==
    /// Grades the executor's aggregate error rate and latency; no probe
    /// query is issued.
    fn check_executor(&self) -> CheckResult {
        let started = Instant::now();
        let snapshot = self.metrics.snapshot();

        let status = if snapshot.error_rate > self.thresholds.unhealthy_error_rate
            || snapshot.avg_latency_ms >= self.thresholds.unhealthy_latency_ms as f64
        {
            HealthStatus::Unhealthy
        } else if snapshot.error_rate > self.thresholds.degraded_error_rate
            || snapshot.avg_latency_ms >= self.thresholds.degraded_latency_ms as f64
        {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        let elapsed = started.elapsed().as_millis() as u64;
        let mut check = match status {
            HealthStatus::Healthy => CheckResult::healthy(elapsed),
            HealthStatus::Degraded => CheckResult::degraded(
                format!(
                    "error rate {:.3}, avg latency {:.1} ms",
                    snapshot.error_rate, snapshot.avg_latency_ms
                ),
                elapsed,
            ),
            HealthStatus::Unhealthy => CheckResult::unhealthy(
                format!(
                    "error rate {:.3}, avg latency {:.1} ms",
                    snapshot.error_rate, snapshot.avg_latency_ms
                ),
                elapsed,
            ),
        };

        if let Ok(metadata) = serde_json::to_value(&snapshot) {
            check = check.with_metadata(metadata);
        }
        check
    }
}
