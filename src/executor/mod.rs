//! Executor Module
//!
//! Resilient query execution: per-attempt timeouts, bounded retry with
//! exponential backoff, read-through caching, batching, and transactional
//! callbacks, with latency/error counters for the health reporter.

mod metrics;
mod query;
mod retry;

// Re-export public types
pub use metrics::{ExecutorMetrics, MetricsSnapshot};
pub use query::{QueryExecutor, QueryOptions};
pub use retry::RetryPolicy;
