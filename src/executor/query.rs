//! Resilient Query Executor
//!
//! Wraps arbitrary data-fetch operations with per-attempt timeout, bounded
//! retry with exponential backoff, optional read-through caching, chunked
//! batch execution, and single-connection transactions.
//!
//! Timeout handling actively cancels an attempt by dropping its future, so a
//! slow result can never arrive late and be written to the cache against a
//! request the caller already saw fail.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, RwLock};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::cache::MemoryCache;
use crate::config::ExecutorConfig;
use crate::error::{QueryError, Result};
use crate::executor::{ExecutorMetrics, RetryPolicy};

// == Query Options ==
/// Per-call options for [`QueryExecutor::execute`].
///
/// A closed struct with typed fields; unrecognized knobs do not exist.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Consult and populate the cache around the operation
    pub cache: bool,
    /// TTL in milliseconds for a cached result (`None`/`Some(0)` = no expiry)
    pub cache_ttl_ms: Option<u64>,
    /// Cache key; with `cache: true` and no key the call degrades to
    /// uncached execution with a warning
    pub cache_key: Option<String>,
    /// Per-attempt deadline in milliseconds
    pub timeout_ms: u64,
    /// Total attempts (first attempt included); 0 falls back to the
    /// executor's retry policy
    pub retries: u32,
    /// Operations executed concurrently per batch chunk
    pub batch_size: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            cache: false,
            cache_ttl_ms: None,
            cache_key: None,
            timeout_ms: 5000,
            retries: 3,
            batch_size: 10,
        }
    }
}

impl QueryOptions {
    /// Options for a cache-through query under `key` with the given TTL in
    /// milliseconds.
    pub fn cached(key: impl Into<String>, ttl_ms: u64) -> Self {
        Self {
            cache: true,
            cache_ttl_ms: Some(ttl_ms),
            cache_key: Some(key.into()),
            ..Self::default()
        }
    }
}

impl From<&ExecutorConfig> for QueryOptions {
    /// Default per-call options carrying the environment-configured timeout,
    /// attempt budget, and batch size; caching stays opt-in per call.
    fn from(config: &ExecutorConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            retries: config.retries,
            batch_size: config.batch_size,
            ..Self::default()
        }
    }
}

// == Query Executor ==
/// Resilient execution of data-store operations.
///
/// `T` is the cached result type; `C` is the underlying client handed to
/// transactions (defaults to `()` for executors without one).
#[derive(Debug)]
pub struct QueryExecutor<T, C = ()> {
    cache: Arc<RwLock<MemoryCache<T>>>,
    client: Arc<AsyncMutex<C>>,
    policy: RetryPolicy,
    metrics: Arc<ExecutorMetrics>,
}

impl<T: Clone> QueryExecutor<T, ()> {
    /// Creates an executor without an underlying client.
    pub fn new(cache: Arc<RwLock<MemoryCache<T>>>, policy: RetryPolicy) -> Self {
        Self::with_client(cache, (), policy)
    }
}

impl<T: Clone, C> QueryExecutor<T, C> {
    /// Creates an executor that owns a client for transactional callbacks.
    pub fn with_client(cache: Arc<RwLock<MemoryCache<T>>>, client: C, policy: RetryPolicy) -> Self {
        Self {
            cache,
            client: Arc::new(AsyncMutex::new(client)),
            policy,
            metrics: Arc::new(ExecutorMetrics::new()),
        }
    }

    /// Counters observed by the health reporter.
    pub fn metrics(&self) -> Arc<ExecutorMetrics> {
        Arc::clone(&self.metrics)
    }

    /// The shared read-through cache.
    pub fn cache(&self) -> Arc<RwLock<MemoryCache<T>>> {
        Arc::clone(&self.cache)
    }

    // == Execute ==
    /// Runs `operation` under the resilience envelope described by
    /// `options`.
    ///
    /// A cache hit returns immediately without invoking the operation or
    /// consuming any retry budget. On a miss, each attempt runs under the
    /// per-attempt timeout; retryable failures (including timeouts) are
    /// retried with exponential backoff until the attempt budget is
    /// exhausted, at which point [`QueryError::RetriesExhausted`] carries the
    /// final attempt's error. An error that is not
    /// [retryable](QueryError::is_retryable) surfaces unwrapped without
    /// consuming further attempts. A successful result is written to the
    /// cache before being returned when caching is enabled.
    pub async fn execute<F, Fut>(&self, operation: F, options: &QueryOptions) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let cache_key = match (&options.cache, &options.cache_key) {
            (true, Some(key)) => Some(key.clone()),
            (true, None) => {
                warn!("cache-through requested without a cache key; executing uncached");
                None
            }
            (false, _) => None,
        };

        if let Some(key) = &cache_key {
            if let Some(value) = self.cache.write().await.get(key) {
                debug!(key = %key, "query served from cache");
                return Ok(value);
            }
        }

        let attempts = if options.retries == 0 {
            self.policy.max_retries
        } else {
            options.retries
        }
        .max(1);

        let started = Instant::now();
        let mut last_error: Option<QueryError> = None;

        for attempt in 1..=attempts {
            if let Some(delay) = self.policy.delay_before(attempt) {
                tokio::time::sleep(delay).await;
            }

            match timeout(Duration::from_millis(options.timeout_ms), operation()).await {
                Ok(Ok(value)) => {
                    self.metrics
                        .record_success(started.elapsed().as_millis() as u64);
                    if let Some(key) = cache_key {
                        self.cache
                            .write()
                            .await
                            .set(key, value.clone(), options.cache_ttl_ms);
                    }
                    return Ok(value);
                }
                Ok(Err(err)) => {
                    if !err.is_retryable() {
                        warn!(attempt, error = %err, "query failed with terminal error");
                        self.metrics
                            .record_failure(started.elapsed().as_millis() as u64);
                        return Err(err);
                    }
                    warn!(attempt, error = %err, "query attempt failed");
                    last_error = Some(err);
                }
                Err(_) => {
                    self.metrics.record_timeout();
                    warn!(attempt, timeout_ms = options.timeout_ms, "query attempt timed out");
                    last_error = Some(QueryError::Timeout(options.timeout_ms));
                }
            }
        }

        self.metrics
            .record_failure(started.elapsed().as_millis() as u64);

        let last = last_error.unwrap_or(QueryError::Timeout(options.timeout_ms));
        Err(QueryError::RetriesExhausted {
            attempts,
            last: Box::new(last),
        })
    }

    // == Batch Query ==
    /// Executes `operations` in chunks of `options.batch_size`, running each
    /// chunk's operations concurrently and concatenating results in input
    /// order.
    ///
    /// Partial-results policy: every slot carries its own `Result`; one
    /// failing operation neither cancels nor fails its chunk siblings.
    /// Caching is disabled per operation since a shared key would collide
    /// across slots.
    pub async fn batch_query<F, Fut>(
        &self,
        operations: Vec<F>,
        options: &QueryOptions,
    ) -> Vec<Result<T>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let chunk_size = options.batch_size.max(1);
        let per_op = QueryOptions {
            cache: false,
            cache_key: None,
            ..options.clone()
        };

        let mut results = Vec::with_capacity(operations.len());
        let mut remaining = operations.into_iter();

        loop {
            let chunk: Vec<F> = remaining.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            debug!(size = chunk.len(), "executing batch chunk");
            let chunk_futures: Vec<_> = chunk
                .iter()
                .map(|op| self.execute(op, &per_op))
                .collect();
            results.extend(futures::future::join_all(chunk_futures).await);
        }

        results
    }

    // == Transaction ==
    /// Runs `callback` with exclusive ownership of the underlying client for
    /// its whole duration, so every statement inside the callback uses the
    /// same connection/context. ACID properties remain the data store's
    /// responsibility.
    pub async fn transaction<R, F, Fut>(&self, callback: F) -> Result<R>
    where
        F: FnOnce(OwnedMutexGuard<C>) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let guard = Arc::clone(&self.client).lock_owned().await;
        let started = Instant::now();
        let result = callback(guard).await;

        let latency = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => self.metrics.record_success(latency),
            Err(err) => {
                warn!(error = %err, "transaction failed");
                self.metrics.record_failure(latency);
            }
        }

        result
    }
}
