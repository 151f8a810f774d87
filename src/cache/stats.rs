//! Cache Statistics Module
//!
//! Tracks cache performance metrics: hits, misses, evictions, expirations,
//! and an approximate memory footprint for observability.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance counters and storage pressure.
///
/// `memory_usage` is an approximation intended for dashboards only; eviction
/// decisions are driven purely by entry count.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of entries currently resident (not filtered by expiry)
    pub size: usize,
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key absent or expired)
    pub misses: u64,
    /// Number of entries evicted by the LRU policy
    pub evictions: u64,
    /// Number of entries removed because their TTL elapsed
    pub expirations: u64,
    /// Approximate memory usage of resident entries in bytes
    pub memory_usage: usize,
}

impl CacheStats {
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Increments the expiration counter.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}
