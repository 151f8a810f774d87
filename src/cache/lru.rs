//! LRU Module
//!
//! Recency tracking for the memory cache ([`LruTracker`]) and a standalone
//! bounded map with pure LRU semantics and no TTL ([`LruCache`]).

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

// == LRU Tracker ==
/// Tracks access order for LRU eviction inside the memory cache.
///
/// Keys are stored in a VecDeque where front = most recently used and
/// back = least recently used. Insertion order is stable, so among entries
/// that were never touched again the oldest-inserted is evicted first.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as recently used (moves to front).
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    /// Returns and removes the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.back()
    }

    /// Drops all tracked keys.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// == LRU Cache ==
/// A bounded key/value map with pure recency semantics.
///
/// `get` and `set` on an existing key mark it most recently used; inserting a
/// new key at capacity evicts the least recently used key first. There are no
/// TTL semantics here; entries live until evicted or deleted.
#[derive(Debug)]
pub struct LruCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Creates a cache bounded to `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "LruCache capacity must be at least 1");
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Retrieves a value and marks the key most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.entries.contains_key(key) {
            self.promote(key);
            self.entries.get(key)
        } else {
            None
        }
    }

    /// Inserts or overwrites a value, marking the key most recently used.
    ///
    /// Overwriting never evicts; inserting a new key at capacity evicts the
    /// current least recently used key before the insert.
    pub fn set(&mut self, key: K, value: V) {
        if self.entries.contains_key(&key) {
            self.entries.insert(key.clone(), value);
            self.promote(&key);
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_back() {
                self.entries.remove(&evicted);
            }
        }

        self.entries.insert(key.clone(), value);
        self.order.push_front(key);
    }

    /// Checks membership without affecting recency.
    pub fn has(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes a key; true if it was present.
    pub fn delete(&mut self, key: &K) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
            true
        } else {
            false
        }
    }

    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fixed capacity supplied at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn promote(&mut self, key: &K) {
        self.order.retain(|k| k != key);
        self.order.push_front(key.clone());
    }
}
