//! In-Flight Computation Map
//!
//! Coalesces concurrent identical computations: the first caller for a key
//! becomes the leader and executes the work, later callers for the same key
//! become followers and wait for the leader's outcome. Every waiter observes
//! the same settlement, value or error.
//!
//! The shared state per key is a slot behind an async mutex. The leader
//! claims the slot lock synchronously at registration (so no follower can
//! slip in ahead of it), executes while holding it, and stores the outcome
//! before releasing. Followers block on the lock; when they acquire it the
//! outcome is there. A follower that acquires the lock and finds the slot
//! empty has outlived a cancelled leader and promotes itself.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::error::Result;

type Slot<V> = Arc<AsyncMutex<Option<Result<V>>>>;

// == Flight Group ==
/// One in-flight map per memoized function.
///
/// The outer mutex guards only the key registry and is never held across an
/// await point.
#[derive(Debug, Default)]
pub struct FlightGroup<V> {
    flights: Mutex<HashMap<String, Slot<V>>>,
}

impl<V: Clone> FlightGroup<V> {
    pub fn new() -> Self {
        Self {
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `compute` for `key`, coalescing with any execution already in
    /// flight for the same key.
    ///
    /// Returns the settled outcome plus a flag that is true only for the
    /// caller that actually executed the computation; only that caller
    /// should publish the result to a cache. The key is removed from the
    /// in-flight map before this method returns to the leader.
    pub async fn run<F, Fut>(&self, key: &str, compute: F) -> (Result<V>, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let (slot, leader_guard) = {
            let mut flights = self
                .flights
                .lock()
                .expect("in-flight map lock poisoned");
            match flights.get(key) {
                Some(slot) => (Arc::clone(slot), None),
                None => {
                    let slot: Slot<V> = Arc::new(AsyncMutex::new(None));
                    // A fresh mutex is uncontended, so the leader claims it
                    // before the registry lock is released.
                    let guard = Arc::clone(&slot).try_lock_owned().ok();
                    flights.insert(key.to_string(), Arc::clone(&slot));
                    (slot, guard)
                }
            }
        };

        let mut guard = match leader_guard {
            Some(guard) => guard,
            None => {
                debug!(key = %key, "joining in-flight computation");
                let guard = Arc::clone(&slot).lock_owned().await;
                if let Some(outcome) = guard.as_ref() {
                    return (outcome.clone(), false);
                }
                // Leader was dropped before settling; take over its slot.
                debug!(key = %key, "promoting follower to leader");
                guard
            }
        };

        let outcome = compute().await;
        *guard = Some(outcome.clone());

        // Deregister before the result can reach any cache, so a new caller
        // after settlement starts a fresh computation instead of attaching
        // to a finished one.
        self.flights
            .lock()
            .expect("in-flight map lock poisoned")
            .remove(key);

        (outcome, true)
    }

    /// Number of computations currently in flight.
    pub fn len(&self) -> usize {
        self.flights
            .lock()
            .expect("in-flight map lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
