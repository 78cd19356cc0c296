//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store behavior over arbitrary operation sequences.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::cache::{generate_key, matches_pattern, CacheStore};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}"
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,64}".prop_map(|s| json!(s)),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(|v| json!(v)),
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hits and misses match what an unbounded model map predicts.
    #[test]
    fn prop_store_agrees_with_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);
        let mut model: HashMap<String, Value> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone(), TEST_TTL).unwrap();
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = store.get(&key);
                    prop_assert_eq!(&got, &model.get(&key).cloned());
                    if got.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key), model.remove(&key).is_some());
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, model.len());
    }

    // Writing V1 then V2 under one key reads back V2 with one entry.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);

        store.set(key.clone(), value1, TEST_TTL).unwrap();
        store.set(key.clone(), value2.clone(), TEST_TTL).unwrap();

        prop_assert_eq!(store.get(&key), Some(value2));
        prop_assert_eq!(store.len(), 1);
    }

    // The store never holds more than its capacity.
    #[test]
    fn prop_capacity_enforcement(
        max_entries in 1usize..20,
        keys in prop::collection::vec(valid_key_strategy(), 1..80)
    ) {
        let mut store = CacheStore::new(max_entries);

        for key in keys {
            store.set(key, json!(true), TEST_TTL).unwrap();
            prop_assert!(store.len() <= max_entries);
        }
    }

    // Filling past capacity evicts exactly the earliest-written keys.
    #[test]
    fn prop_lru_eviction_order(
        max_entries in 2usize..10,
        extra in 1usize..10
    ) {
        let mut store = CacheStore::new(max_entries);
        let total = max_entries + extra;

        for i in 0..total {
            store.set(format!("key_{}", i), json!(i), TEST_TTL).unwrap();
        }

        for i in 0..extra {
            let key = format!("key_{}", i);
            prop_assert!(store.get(&key).is_none(), "{} should be evicted", key);
        }
        for i in extra..total {
            let key = format!("key_{}", i);
            prop_assert!(store.get(&key).is_some(), "{} should remain", key);
        }
        prop_assert_eq!(store.stats().evictions, extra as u64);
    }

    // A prefix pattern removes exactly the keys with that prefix.
    #[test]
    fn prop_prefix_invalidation(
        keys in prop::collection::hash_set("[a-z]{1,8}", 1..30),
        prefix in "[a-z]{1,2}"
    ) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);
        for key in &keys {
            store.set(key.clone(), json!(1), TEST_TTL).unwrap();
        }

        let expected = keys.iter().filter(|k| k.starts_with(prefix.as_str())).count();
        let removed = store.invalidate_pattern(&format!("{}*", prefix));

        prop_assert_eq!(removed, expected);
        prop_assert_eq!(store.len(), keys.len() - expected);
    }

    // A literal pattern only matches itself.
    #[test]
    fn prop_literal_pattern_matches_itself(key in "[a-zA-Z0-9_:]{0,32}") {
        prop_assert!(matches_pattern(&key, &key));
        let longer = format!("{}x", key);
        prop_assert!(!matches_pattern(&key, &longer));
    }

    // Cache keys do not depend on parameter insertion order.
    #[test]
    fn prop_generated_key_is_deterministic(
        params in prop::collection::vec(("[a-z]{1,6}", "[a-z0-9]{0,6}"), 0..8)
    ) {
        let forward: BTreeMap<String, String> = params.iter().cloned().collect();
        let reverse: BTreeMap<String, String> = params.iter().rev().cloned().collect();

        // Later duplicates win in `collect`, so only compare when keys are unique
        prop_assume!(forward == reverse);
        prop_assert_eq!(generate_key("base", &forward), generate_key("base", &reverse));
    }
}
