//! Property-based invariant tests for the uniqueness-enforcing registry.
//!
//! 1. First registration of a key wins; later ones report `false`.
//! 2. `len` equals the number of distinct keys registered.
//! 3. `unregister` of a registered value succeeds exactly once.
//! 4. Allocated identities never collide with each other.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use transit_core::{IdentityAllocator, Registry};

// ── Strategies ────────────────────────────────────────────────────────────

fn ops_strategy() -> impl Strategy<Value = Vec<(String, u32)>> {
    proptest::collection::vec(("[a-d]{1,2}", 0u32..1000), 0..64)
}

proptest! {
    #[test]
    fn first_registration_wins(ops in ops_strategy()) {
        let mut reg = Registry::new();
        let mut model: BTreeMap<String, u32> = BTreeMap::new();
        for (key, value) in &ops {
            let fresh = !model.contains_key(key);
            prop_assert_eq!(reg.register(key.as_str(), *value), fresh);
            model.entry(key.clone()).or_insert(*value);
        }
        prop_assert_eq!(reg.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(reg.get(key), Some(value));
        }
    }

    #[test]
    fn unregister_succeeds_once(keys in proptest::collection::btree_set("[a-z]{1,4}", 1..16)) {
        let mut reg = Registry::new();
        let values: Vec<usize> = (0..keys.len()).collect();
        for (key, value) in keys.iter().zip(&values) {
            prop_assert!(reg.register(key.as_str(), *value));
        }
        for value in &values {
            prop_assert!(reg.unregister(value));
            prop_assert!(!reg.unregister(value));
        }
        prop_assert!(reg.is_empty());
    }

    #[test]
    fn allocated_identities_are_distinct(count in 1usize..200) {
        let mut ids = IdentityAllocator::new("item");
        let seen: BTreeSet<_> = (0..count).map(|_| ids.next_identity()).collect();
        prop_assert_eq!(seen.len(), count);
    }
}
