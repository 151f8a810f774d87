//! Resilient Cache - a resilient data-access layer
//!
//! An in-process cache (bounded, TTL-aware, LRU-evicting) combined with a
//! memoization facility that de-duplicates concurrent identical
//! computations, layered under a query executor that adds timeout,
//! retry-with-backoff, and batching semantics for outbound data-store
//! calls. A health reporter grades the whole stack for readiness probes.
//!
//! The cache is volatile and process-local by design: no persistence, no
//! cross-process coherence.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod executor;
pub mod health;
pub mod memo;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStats, LruCache, MemoryCache};
pub use config::Config;
pub use error::{QueryError, Result};
pub use executor::{ExecutorMetrics, QueryExecutor, QueryOptions, RetryPolicy};
pub use health::{HealthReport, HealthReporter, HealthStatus};
pub use memo::{cache_key, AsyncMemo, SyncMemo};
pub use tasks::{spawn_cleanup_task, Sweeper};
