//! Background Tasks Module
//!
//! Periodic maintenance tasks tied to the lifetime of their owning handle.
//!
//! # Tasks
//! - TTL Cleanup: removes expired cache entries at configured intervals

mod cleanup;

pub use cleanup::{spawn_cleanup_task, Sweeper};
