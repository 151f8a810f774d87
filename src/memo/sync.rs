//! Synchronous Memoizer
//!
//! Caches the results of pure functions keyed by their arguments. A hit
//! returns without invoking the wrapped function; a miss computes, stores,
//! and returns. TTL, when set, bounds how long a result may be replayed.

use serde::Serialize;

use crate::cache::{CacheStats, MemoryCache};
use crate::memo::cache_key;

// == Sync Memo ==
/// Memoization over a bounded [`MemoryCache`].
///
/// The memoizer never retries and never caches panics; composing retry
/// behavior underneath is the query executor's job.
#[derive(Debug)]
pub struct SyncMemo<V> {
    cache: MemoryCache<V>,
    ttl_ms: Option<u64>,
}

impl<V: Clone> SyncMemo<V> {
    /// Creates a memoizer whose results never expire (until evicted by size
    /// pressure).
    pub fn new(max_entries: usize) -> Self {
        Self {
            cache: MemoryCache::new(max_entries),
            ttl_ms: None,
        }
    }

    /// Creates a memoizer whose results expire `ttl_ms` milliseconds after
    /// being computed, independent of size pressure.
    pub fn with_ttl(max_entries: usize, ttl_ms: u64) -> Self {
        Self {
            cache: MemoryCache::new(max_entries),
            ttl_ms: Some(ttl_ms),
        }
    }

    /// Returns the cached value for `key`, or invokes `compute`, stores its
    /// result, and returns it.
    pub fn get_or_compute<F>(&mut self, key: &str, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.cache.get(key) {
            return value;
        }

        let value = compute();
        self.cache.set(key.to_string(), value.clone(), self.ttl_ms);
        value
    }

    /// Like [`get_or_compute`](Self::get_or_compute) with the key derived
    /// from `args` via [`cache_key`].
    pub fn get_or_compute_args<A, F>(&mut self, args: &A, compute: F) -> V
    where
        A: Serialize,
        F: FnOnce() -> V,
    {
        self.get_or_compute(&cache_key(args), compute)
    }

    /// Drops a cached result; true if one was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.cache.delete(key)
    }

    /// Statistics of the backing cache.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
