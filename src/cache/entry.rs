//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cache entry: the stored value plus timing metadata.
///
/// A TTL of zero (or none at all) means the entry never expires. Expiry is
/// always computed against the current clock, so a read can never observe an
/// entry whose TTL has already elapsed, regardless of when the background
/// sweep last ran.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
    /// Last read timestamp (Unix milliseconds)
    pub last_accessed: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL in milliseconds.
    ///
    /// `ttl_ms` of `None` or `Some(0)` produces an entry that never expires.
    pub fn new(value: V, ttl_ms: Option<u64>) -> Self {
        let now = current_timestamp_ms();
        let expires_at = match ttl_ms {
            None | Some(0) => None,
            Some(ttl) => Some(now.saturating_add(ttl)),
        };

        Self {
            value,
            created_at: now,
            expires_at,
            last_accessed: now,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Touch ==
    /// Records a read for recency tracking.
    pub fn touch(&mut self) {
        self.last_accessed = current_timestamp_ms();
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    ///
    /// Returns `Some(0)` once the TTL has elapsed.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at.map(|expires| {
            let now = current_timestamp_ms();
            expires.saturating_sub(now)
        })
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
