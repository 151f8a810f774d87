//! Memo Key Derivation
//!
//! Default cache-key derivation for memoized functions: a deterministic JSON
//! serialization of the argument value. Callers that want to memoize by a
//! subset of fields supply their own key string instead and take
//! responsibility for the collapsing that implies.

use serde::Serialize;
use tracing::warn;

/// Derives a deterministic cache key from an argument value.
///
/// Tuples work well for multi-argument functions: `cache_key(&(a, b))`.
/// If the value cannot be serialized the failure is folded into the key so
/// callers still get a stable string rather than an error.
pub fn cache_key<A: Serialize>(args: &A) -> String {
    match serde_json::to_string(args) {
        Ok(key) => key,
        Err(err) => {
            warn!(error = %err, "memo key serialization failed");
            format!("unserializable:{}", err)
        }
    }
}
