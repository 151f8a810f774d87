//! TTL Cleanup Task
//!
//! Background sweep that periodically removes expired cache entries. The
//! returned [`Sweeper`] owns the task: shutting it down (or dropping it)
//! cancels the loop so no timer outlives its cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;

// == Sweeper ==
/// Handle that owns the background sweep task.
///
/// `shutdown` is idempotent; after it returns no further sweep runs occur.
/// Dropping an un-shut-down sweeper aborts the task as well, tying the
/// timer's lifetime to its owner.
#[derive(Debug)]
pub struct Sweeper {
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Stops the sweep task. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("cache sweeper stopped");
        }
    }

    /// True once the task has stopped running.
    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(true)
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Spawns a background task that removes expired cache entries every
/// `interval_secs` seconds.
///
/// The sweep takes the write lock only for the duration of one
/// `cleanup_expired` pass and never perturbs the recency order of surviving
/// entries.
pub fn spawn_cleanup_task<V>(
    cache: Arc<RwLock<MemoryCache<V>>>,
    interval_secs: u64,
) -> Sweeper
where
    V: Clone + Send + Sync + 'static,
{
    let interval = Duration::from_secs(interval_secs);

    let handle = tokio::spawn(async move {
        info!(interval_secs, "starting TTL cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache = cache.write().await;
                cache.cleanup_expired()
            };

            if removed > 0 {
                info!(removed, "TTL cleanup removed expired entries");
            } else {
                debug!("TTL cleanup found no expired entries");
            }
        }
    });

    Sweeper {
        handle: Some(handle),
    }
}
