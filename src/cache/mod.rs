//! Cache Module
//!
//! In-memory caching with TTL expiration and LRU eviction, plus a standalone
//! recency-only [`LruCache`] for callers that need bounded memoization
//! without TTL semantics.

mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use lru::{LruCache, LruTracker};
pub use stats::CacheStats;
pub use store::MemoryCache;
