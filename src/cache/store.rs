//! Memory Cache Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL
//! expiration. A miss is an `Option::None`, never an error: callers that need
//! the value fall through to their data source and populate the cache on the
//! way back.

use std::collections::HashMap;
use std::mem;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Memory Cache ==
/// Bounded key/value cache with TTL expiry and LRU eviction.
///
/// The cache is single-threaded by itself; share it as
/// `Arc<RwLock<MemoryCache<V>>>` (see [`crate::tasks::spawn_cleanup_task`]
/// for the background sweep that pairs with it).
#[derive(Debug)]
pub struct MemoryCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl<V: Clone> MemoryCache<V> {
    // == Constructor ==
    /// Creates a new MemoryCache bounded to `max_entries`.
    ///
    /// # Panics
    /// Panics if `max_entries` is zero.
    pub fn new(max_entries: usize) -> Self {
        assert!(max_entries > 0, "cache capacity must be at least 1");
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL in milliseconds.
    ///
    /// `ttl_ms` of `None` or `Some(0)` means the entry never expires.
    /// Overwriting an existing key resets its creation time and recency and
    /// never evicts. Inserting a new key at capacity evicts exactly one
    /// entry, the least recently used, before the insert.
    pub fn set(&mut self, key: String, value: V, ttl_ms: Option<u64>) {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(value, ttl_ms));
        self.lru.touch(&key);

        debug_assert!(
            self.entries.len() <= self.max_entries,
            "cache grew beyond its capacity"
        );
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` if the key is absent or expired. Expiry is checked
    /// against the current time, independent of the background sweep; an
    /// expired entry found here is removed immediately and counted as a miss
    /// and an expiration. A hit updates recency.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let live = match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired() => {
                entry.touch();
                Some(entry.value.clone())
            }
            Some(_) => None, // resident but expired
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        match live {
            Some(value) => {
                self.lru.touch(key);
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.entries.remove(key);
                self.lru.remove(key);
                self.stats.record_expiration();
                self.stats.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Checks for a live entry with the same expiry rule as `get`, without
    /// touching recency or counters.
    pub fn has(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(entry) if !entry.is_expired())
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns true if a resident entry was removed, even one that had
    /// already expired but was not yet swept.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.size = self.entries.len();
        stats.max_size = self.max_entries;
        stats.memory_usage = self.approx_memory_usage();
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, leaving the recency order of survivors
    /// untouched. Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.lru.remove(&key);
            self.stats.record_expiration();
        }

        count
    }

    // == Length ==
    /// Number of resident entries. Intentionally not filtered by expiry:
    /// `len` reflects storage pressure while `get`/`has` reflect logical
    /// visibility.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries the cache can hold.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Rough byte estimate of resident entries: key bytes plus the in-memory
    /// size of each entry struct. Heap data owned by `V` is not chased.
    fn approx_memory_usage(&self) -> usize {
        let key_bytes: usize = self.entries.keys().map(|k| k.len()).sum();
        key_bytes + self.entries.len() * mem::size_of::<CacheEntry<V>>()
    }
}
