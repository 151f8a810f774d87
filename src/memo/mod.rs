//! Memoization Module
//!
//! Wraps pure and asynchronous functions with an argument-keyed cache. The
//! async path additionally guarantees at most one in-flight computation per
//! key: concurrent identical calls coalesce onto a single execution and all
//! observe the same outcome. Errors are never cached.

mod flight;
mod future;
mod key;
mod sync;

// Re-export public types
pub use flight::FlightGroup;
pub use future::AsyncMemo;
pub use key::cache_key;
pub use sync::SyncMemo;
