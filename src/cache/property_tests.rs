//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::config::CacheConfig;
use crate::error::CacheError;

// == Test Configuration ==
const LONG_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = u32> {
    any::<u32>()
}

/// Either an already-expired TTL or one that outlives the test
fn ttl_strategy() -> impl Strategy<Value = Duration> {
    prop_oneof![Just(Duration::ZERO), Just(LONG_TTL)]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32, ttl: Duration },
    Get { key: String },
    Delete { key: String },
    Sweep,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), value_strategy(), ttl_strategy())
            .prop_map(|(key, value, ttl)| CacheOp::Set { key, value, ttl }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::Sweep),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, every lookup agrees with a model map
    // holding (value, fresh) pairs, and the stored entry count matches.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let cache = TtlCache::new();
        let mut model: HashMap<String, (u32, bool)> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl } => {
                    cache.set(key.clone(), value, ttl).unwrap();
                    model.insert(key, (value, ttl == LONG_TTL));
                }
                CacheOp::Get { key } => {
                    let expected = match model.get(&key) {
                        Some(&(value, true)) => Some(value),
                        Some(&(_, false)) => {
                            model.remove(&key);
                            None
                        }
                        None => None,
                    };
                    prop_assert_eq!(cache.get(&key), expected);
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                    model.remove(&key);
                }
                CacheOp::Sweep => {
                    let expected = model.values().filter(|(_, fresh)| !fresh).count();
                    prop_assert_eq!(cache.sweep(), expected);
                    model.retain(|_, (_, fresh)| *fresh);
                }
            }
            prop_assert_eq!(cache.len(), model.len(), "Entry count mismatch");
        }
    }

    // For any sequence of operations, hits + misses equals the number of lookups.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let cache = TtlCache::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl } => {
                    cache.set(key, value, ttl).unwrap();
                }
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => cache.delete(&key),
                CacheOp::Sweep => {
                    cache.sweep();
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, cache.len(), "Total entries mismatch");
    }

    // A zero TTL entry is never served, and the lookup reclaims it.
    #[test]
    fn prop_zero_ttl_never_served(key in key_strategy(), value in value_strategy()) {
        let cache = TtlCache::new();

        cache.set(key.clone(), value, Duration::ZERO).unwrap();

        prop_assert_eq!(cache.get(&key), None);
        prop_assert!(cache.is_empty());
    }

    // Storing V1 and then V2 under one key yields V2 and a single entry.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy(),
        ttl1 in ttl_strategy()
    ) {
        let cache = TtlCache::new();

        cache.set(key.clone(), value1, ttl1).unwrap();
        cache.set(key.clone(), value2, LONG_TTL).unwrap();

        prop_assert_eq!(cache.get(&key), Some(value2), "Overwrite should return new value");
        prop_assert_eq!(cache.len(), 1, "Should have exactly one entry after overwrite");
    }

    // Deleting twice is the same as deleting once.
    #[test]
    fn prop_delete_idempotent(
        keys in prop::collection::hash_set(key_strategy(), 1..10),
        victim in key_strategy()
    ) {
        let cache = TtlCache::new();
        for key in &keys {
            cache.set(key.clone(), 1u8, LONG_TTL).unwrap();
        }

        cache.delete(&victim);
        let after_once = cache.len();
        cache.delete(&victim);

        prop_assert_eq!(cache.len(), after_once);
        prop_assert_eq!(cache.get(&victim), None);
        let expected = keys.len() - usize::from(keys.contains(&victim));
        prop_assert_eq!(after_once, expected);
    }

    // A bounded cache never holds more than max_entries entries.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy(), ttl_strategy()), 1..100),
        max_entries in 1usize..8
    ) {
        let config = CacheConfig {
            active_sweep: false,
            max_entries: Some(max_entries),
            ..CacheConfig::default()
        };
        let cache = TtlCache::from_config(&config).unwrap();

        for (key, value, ttl) in entries {
            match cache.set(key, value, ttl) {
                Ok(()) => {}
                Err(err) => prop_assert_eq!(err, CacheError::CacheFull { capacity: max_entries }),
            }
            prop_assert!(
                cache.len() <= max_entries,
                "Cache size {} exceeds max {}",
                cache.len(),
                max_entries
            );
        }
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // After its TTL elapses an entry is reported absent and removed.
    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in value_strategy()) {
        let cache = TtlCache::new();

        cache.set(key.clone(), value, Duration::from_millis(30)).unwrap();
        prop_assert_eq!(cache.get(&key), Some(value), "Entry should exist before TTL expires");

        sleep(Duration::from_millis(50));

        prop_assert_eq!(cache.get(&key), None, "Entry should not be found after TTL expires");
        prop_assert_eq!(cache.len(), 0, "Expired entry should be reclaimed by the lookup");
    }
}
