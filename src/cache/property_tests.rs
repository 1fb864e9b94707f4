//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the engine's invariants over arbitrary operation
//! sequences.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::cache::{current_timestamp, CacheStore, InsertOutcome};
use crate::config::CacheConfig;

// == Strategies ==
/// Keys drawn from a small alphabet so sequences revisit keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}".prop_map(|s| s)
}

fn duration_strategy() -> impl Strategy<Value = u64> {
    0u64..3600
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: u32 },
    PutWithExpiry { key: String, value: u32, duration: u64 },
    Get { key: String },
    Del { key: String },
    PopRandom,
    Sweep,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        (key_strategy(), any::<u32>(), duration_strategy())
            .prop_map(|(key, value, duration)| CacheOp::PutWithExpiry { key, value, duration }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Del { key }),
        Just(CacheOp::PopRandom),
        Just(CacheOp::Sweep),
    ]
}

fn apply(store: &mut CacheStore<u32>, op: CacheOp) {
    match op {
        CacheOp::Put { key, value } => {
            store.put(key, value);
        }
        CacheOp::PutWithExpiry { key, value, duration } => {
            store.put_with_expiry(key, value, duration);
        }
        CacheOp::Get { key } => {
            store.get(&key);
        }
        CacheOp::Del { key } => {
            store.del(&key);
        }
        CacheOp::PopRandom => {
            store.pop_random();
        }
        CacheOp::Sweep => {
            store.sweep_expired(current_timestamp());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Capacity bound: with at least one eviction round per insert, no put
    // leaves more than `max` entries behind.
    #[test]
    fn prop_capacity_bound(
        max in 1usize..10,
        n_evictions in 1usize..4,
        n_samples in 0usize..4,
        seed in any::<u64>(),
        ops in prop::collection::vec(cache_op_strategy(), 1..100)
    ) {
        let config = CacheConfig { max, n_evictions, n_samples, ..Default::default() };
        let mut store = CacheStore::with_seed(config, seed);

        for op in ops {
            apply(&mut store, op);
            prop_assert!(
                store.count() <= max,
                "Cache size {} exceeds max {}",
                store.count(),
                max
            );
        }
    }

    // Uniqueness: iteration never yields a key twice and agrees with count.
    #[test]
    fn prop_key_uniqueness(
        seed in any::<u64>(),
        ops in prop::collection::vec(cache_op_strategy(), 1..100)
    ) {
        let config = CacheConfig { max: 8, n_evictions: 2, n_samples: 2, ..Default::default() };
        let mut store = CacheStore::with_seed(config, seed);

        for op in ops {
            apply(&mut store, op);
        }

        let keys: Vec<&str> = store.iter().map(|e| e.key.as_str()).collect();
        let unique: HashSet<&str> = keys.iter().copied().collect();
        prop_assert_eq!(keys.len(), unique.len(), "Duplicate key in store");
        prop_assert_eq!(keys.len(), store.count());

        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted, "Iteration is not key-ordered");
    }

    // Update-not-refresh: a second put of the same key changes the value but
    // not the expiry, whatever the second duration is.
    #[test]
    fn prop_update_keeps_expiry(
        key in key_strategy(),
        first in any::<u32>(),
        second in any::<u32>(),
        d1 in duration_strategy(),
        d2 in duration_strategy()
    ) {
        let mut store = CacheStore::new(CacheConfig::default());

        prop_assert_eq!(store.put_with_expiry(key.clone(), first, d1), InsertOutcome::Inserted);
        let original = store.expire_at(&key);

        prop_assert_eq!(store.put_with_expiry(key.clone(), second, d2), InsertOutcome::Updated);
        prop_assert_eq!(store.get(&key), Some(&second));
        prop_assert_eq!(store.expire_at(&key), original);
    }

    // Round-trip: without a capacity limit nothing evicts, so the last value
    // put under each key is what get returns.
    #[test]
    fn prop_roundtrip_storage(
        entries in prop::collection::vec((key_strategy(), any::<u32>()), 1..50)
    ) {
        let mut store = CacheStore::new(CacheConfig::default());
        let mut expected = HashMap::new();

        for (key, value) in entries {
            store.put(key.clone(), value);
            expected.insert(key, value);
        }

        prop_assert_eq!(store.count(), expected.len());
        for (key, value) in &expected {
            prop_assert_eq!(store.get(key), Some(value));
        }
    }

    // Sweep: everything left is live at the sweep instant, everything removed
    // was due.
    #[test]
    fn prop_sweep_removes_only_expired(
        entries in prop::collection::vec((key_strategy(), 0u64..4), 1..30),
        offset in 0i64..5
    ) {
        let mut store = CacheStore::new(CacheConfig::default());
        for (key, duration) in entries {
            store.put_with_expiry(key, 0, duration);
        }

        let before: HashMap<String, i64> =
            store.iter().map(|e| (e.key.clone(), e.expire_at)).collect();
        let now = current_timestamp() + offset;
        let removed = store.sweep_expired(now);

        for entry in store.iter() {
            prop_assert!(entry.expire_at > now);
        }
        let due = before.values().filter(|&&expire_at| expire_at <= now).count();
        prop_assert_eq!(removed, due);
        prop_assert_eq!(store.count(), before.len() - due);
    }
}

// == Concurrency ==
// Operations through the shared handle are serialized by its lock.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_concurrent_operations_respect_capacity(
        ops in prop::collection::vec(cache_op_strategy(), 10..60)
    ) {
        use crate::cache::ExpiringCache;

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let config = CacheConfig { max: 5, n_evictions: 1, n_samples: 3, ..Default::default() };
            let cache: ExpiringCache<u32> = ExpiringCache::init(config).unwrap();

            let mut handles = vec![];
            for op in ops {
                let cache = cache.clone();
                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Put { key, value } => {
                            cache.put(key, value).await;
                        }
                        CacheOp::PutWithExpiry { key, value, duration } => {
                            cache.put_with_expiry(key, value, duration).await;
                        }
                        CacheOp::Get { key } => {
                            cache.get(&key).await;
                        }
                        CacheOp::Del { key } => {
                            cache.del(&key).await;
                        }
                        CacheOp::PopRandom => {
                            cache.pop_random().await;
                        }
                        CacheOp::Sweep => {
                            cache.iter().await.count();
                        }
                    }
                    cache.count().await
                }));
            }

            for handle in handles {
                let count = handle.await.expect("Task should not panic");
                prop_assert!(count <= 5, "Observed {} entries with max 5", count);
            }

            let keys: Vec<String> = cache.iter().await.map(|e| e.key).collect();
            let unique: HashSet<&String> = keys.iter().collect();
            prop_assert_eq!(keys.len(), unique.len());
            Ok(())
        })?;
    }
}
