//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the cache invariants: bounded size, LRU eviction
//! order, statistics accuracy, and round-trip consistency.

use proptest::prelude::*;

use crate::cache::{LruCache, MemoryCache};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;

// == Strategies ==
/// Generates valid cache keys (non-empty, bounded length)
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}"
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of cache operations, the hit/miss counters accurately
    // reflect the Option results the caller observed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = MemoryCache::new(TEST_MAX_ENTRIES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key, value, None);
                }
                CacheOp::Get { key } => {
                    match store.get(&key) {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.size, store.len(), "Size mismatch");
    }

    // Storing a pair and retrieving it (before expiration) returns the exact
    // value that was stored.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut store = MemoryCache::new(TEST_MAX_ENTRIES);

        store.set(key.clone(), value.clone(), None);

        prop_assert_eq!(store.get(&key), Some(value));
    }

    // After a delete, a subsequent get returns None.
    #[test]
    fn prop_delete_removes_entry(key in key_strategy(), value in value_strategy()) {
        let mut store = MemoryCache::new(TEST_MAX_ENTRIES);

        store.set(key.clone(), value, None);
        prop_assert!(store.get(&key).is_some(), "Key should exist before delete");

        prop_assert!(store.delete(&key));
        prop_assert!(store.get(&key).is_none(), "Key should not exist after delete");
    }

    // Storing V1 then V2 under the same key yields V2, with a single entry.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut store = MemoryCache::new(TEST_MAX_ENTRIES);

        store.set(key.clone(), value1, None);
        store.set(key.clone(), value2.clone(), None);

        prop_assert_eq!(store.get(&key), Some(value2));
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    // For any sequence of sets, the resident entry count never exceeds the
    // configured maximum.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let max_entries = 50;
        let mut store = MemoryCache::new(max_entries);

        for (key, value) in entries {
            store.set(key, value, None);
            prop_assert!(
                store.len() <= max_entries,
                "Cache size {} exceeds max {}",
                store.len(),
                max_entries
            );
        }
    }

    // The standalone LruCache holds the same capacity invariant.
    #[test]
    fn prop_lru_cache_capacity(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..150)
    ) {
        let capacity = 20;
        let mut cache: LruCache<String, String> = LruCache::new(capacity);

        for (key, value) in entries {
            cache.set(key, value);
            prop_assert!(cache.len() <= capacity);
        }
    }
}

// Property tests for LRU eviction behavior
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Filling the cache to capacity and inserting one more entry evicts the
    // least recently used key and only that key.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(key_strategy(), 3..10),
        new_key in key_strategy(),
        new_value in value_strategy()
    ) {
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut store = MemoryCache::new(capacity);

        // First key inserted is the eviction candidate
        let oldest_key = unique_keys[0].clone();
        for key in &unique_keys {
            store.set(key.clone(), format!("value_{}", key), None);
        }

        prop_assert_eq!(store.len(), capacity, "Cache should be at capacity");

        store.set(new_key.clone(), new_value, None);

        prop_assert_eq!(store.len(), capacity, "Cache should remain at capacity after eviction");
        prop_assert!(
            store.get(&oldest_key).is_none(),
            "Oldest key '{}' should have been evicted",
            oldest_key
        );
        prop_assert!(store.get(&new_key).is_some(), "New key should exist after insertion");

        for key in unique_keys.iter().skip(1) {
            prop_assert!(
                store.get(key).is_some(),
                "Key '{}' should still exist (not the oldest)",
                key
            );
        }
    }

    // A get on the eviction candidate promotes it, so the next-oldest key is
    // evicted instead.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(key_strategy(), 3..8),
        new_key in key_strategy(),
        new_value in value_strategy()
    ) {
        let unique_keys: Vec<String> = keys
            .into_iter()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut store = MemoryCache::new(capacity);

        for key in &unique_keys {
            store.set(key.clone(), format!("value_{}", key), None);
        }

        let accessed_key = unique_keys[0].clone();
        store.get(&accessed_key);

        let expected_evicted = unique_keys[1].clone();

        store.set(new_key.clone(), new_value, None);

        prop_assert!(
            store.get(&accessed_key).is_some(),
            "Accessed key '{}' should not be evicted after being touched",
            accessed_key
        );
        prop_assert!(
            store.get(&expected_evicted).is_none(),
            "Key '{}' should have been evicted as the oldest after access",
            expected_evicted
        );
        prop_assert!(store.get(&new_key).is_some(), "New key should exist");
    }
}

// == Concurrent Operation Correctness ==
// Thread-safe access through Arc<RwLock<MemoryCache>> stays consistent under
// interleaved readers and writers.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_concurrent_operation_correctness(
        initial_entries in prop::collection::vec((key_strategy(), value_strategy()), 1..20),
        operations in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        use std::sync::Arc;
        use tokio::sync::RwLock;

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let store = Arc::new(RwLock::new(MemoryCache::new(TEST_MAX_ENTRIES)));

            {
                let mut cache = store.write().await;
                for (key, value) in &initial_entries {
                    cache.set(key.clone(), value.clone(), None);
                }
            }

            let mut handles = vec![];

            for op in operations {
                let store_clone = Arc::clone(&store);

                let handle = tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value } => {
                            store_clone.write().await.set(key, value, None);
                        }
                        CacheOp::Get { key } => {
                            let _ = store_clone.write().await.get(&key);
                        }
                        CacheOp::Delete { key } => {
                            store_clone.write().await.delete(&key);
                        }
                    }
                });

                handles.push(handle);
            }

            for handle in handles {
                handle.await.expect("Task should not panic");
            }

            let cache = store.read().await;
            let stats = cache.stats();

            prop_assert!(
                stats.size <= TEST_MAX_ENTRIES,
                "Cache should not exceed max entries"
            );

            let hit_rate = stats.hit_rate();
            prop_assert!(
                (0.0..=1.0).contains(&hit_rate),
                "Hit rate should be between 0 and 1, got {}",
                hit_rate
            );

            Ok(())
        })?;
    }
}
