//! Retry Policy Module
//!
//! Exponential backoff with a cap. `max_retries` counts *total* attempts:
//! a policy with `max_retries = 3` makes the first attempt plus at most two
//! retries.

use std::time::Duration;

// == Retry Policy ==
/// Backoff schedule for the query executor.
///
/// The delay before attempt *n* (for n >= 2) is
/// `min(base_delay_ms * 2^(n-2), max_delay_ms)`; the first attempt runs
/// immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per operation (first attempt included)
    pub max_retries: u32,
    /// Base backoff delay in milliseconds
    pub base_delay_ms: u64,
    /// Backoff delay cap in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 5000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms,
        }
    }

    // == Delay Before Attempt ==
    /// Returns the backoff delay to sleep before attempt `attempt`
    /// (1-indexed), or `None` for the first attempt.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt <= 1 {
            return None;
        }
        // 2^(attempt-2); a shift past 63 bits saturates to the cap
        let factor = 1u64.checked_shl(attempt - 2).unwrap_or(u64::MAX);
        let delay_ms = self
            .base_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms);
        Some(Duration::from_millis(delay_ms))
    }
}
