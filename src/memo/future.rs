//! Asynchronous Memoizer
//!
//! Memoization for async functions with in-flight de-duplication: concurrent
//! calls with the same key share one execution and all observe its outcome.
//! Successful results are cached subject to TTL; errors are never cached, so
//! a transient failure cannot poison the cache and the very next call
//! re-invokes the underlying function.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, MemoryCache};
use crate::error::Result;
use crate::memo::{cache_key, FlightGroup};

// == Async Memo ==
/// Async memoization over a shared [`MemoryCache`].
///
/// Clone-cheap: instances share the cache and the in-flight map, so a single
/// memoizer can be handed to many tasks.
#[derive(Debug, Clone)]
pub struct AsyncMemo<V> {
    cache: Arc<RwLock<MemoryCache<V>>>,
    flights: Arc<FlightGroup<V>>,
    ttl_ms: Option<u64>,
}

impl<V: Clone> AsyncMemo<V> {
    /// Creates a memoizer with its own bounded cache and no TTL.
    pub fn new(max_entries: usize) -> Self {
        Self::with_cache(Arc::new(RwLock::new(MemoryCache::new(max_entries))), None)
    }

    /// Creates a memoizer whose results expire `ttl_ms` milliseconds after
    /// being computed.
    pub fn with_ttl(max_entries: usize, ttl_ms: u64) -> Self {
        Self::with_cache(
            Arc::new(RwLock::new(MemoryCache::new(max_entries))),
            Some(ttl_ms),
        )
    }

    /// Wraps an existing shared cache, e.g. one owned by the application and
    /// swept by its cleanup task.
    pub fn with_cache(cache: Arc<RwLock<MemoryCache<V>>>, ttl_ms: Option<u64>) -> Self {
        Self {
            cache,
            flights: Arc::new(FlightGroup::new()),
            ttl_ms,
        }
    }

    /// Returns the cached value for `key`, or runs `compute` (coalesced with
    /// any identical call already in flight) and caches a successful result.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        // get() mutates recency, so even the read path takes the write lock
        if let Some(value) = self.cache.write().await.get(key) {
            return Ok(value);
        }

        let (outcome, led) = self.flights.run(key, compute).await;

        if led {
            if let Ok(value) = &outcome {
                self.cache
                    .write()
                    .await
                    .set(key.to_string(), value.clone(), self.ttl_ms);
            }
        }

        outcome
    }

    /// Like [`get_or_compute`](Self::get_or_compute) with the key derived
    /// from `args` via [`cache_key`].
    pub async fn get_or_compute_args<A, F, Fut>(&self, args: &A, compute: F) -> Result<V>
    where
        A: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        self.get_or_compute(&cache_key(args), compute).await
    }

    /// Drops a cached result; true if one was present.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.cache.write().await.delete(key)
    }

    /// Statistics of the backing cache.
    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// The shared backing cache.
    pub fn cache(&self) -> Arc<RwLock<MemoryCache<V>>> {
        Arc::clone(&self.cache)
    }
}
