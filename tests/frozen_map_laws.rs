//! Property-based tests for FrozenMap.
//!
//! These tests verify that FrozenMap satisfies the expected laws and keeps
//! its red-black tree invariants using proptest.

use frozenmap::{FrozenMap, FrozenMapError, PartialOrder};
use proptest::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

/// Strategy for generating key-value pairs with frequent key collisions.
fn arbitrary_entries(max_size: usize) -> impl Strategy<Value = Vec<(i16, i32)>> {
    prop::collection::vec((-64_i16..64, any::<i32>()), 0..max_size)
}

/// Strategy for generating a FrozenMap together with the entries it was
/// built from.
fn arbitrary_map(max_size: usize) -> impl Strategy<Value = (Vec<(i16, i32)>, FrozenMap<i16, i32>)> {
    arbitrary_entries(max_size).prop_map(|entries| {
        let map = FrozenMap::from_entries(entries.clone(), []);
        (entries, map)
    })
}

// =============================================================================
// Structural Invariant Laws
// =============================================================================

proptest! {
    /// Law: every map produced by insertion is a valid left-leaning
    /// red-black tree.
    #[test]
    fn prop_invariants_hold_after_every_insert(entries in arbitrary_entries(200)) {
        let mut map = FrozenMap::new();
        for (key, value) in entries {
            map = map.insert(key, value);
            prop_assert!(map.check_invariants().is_ok(), "{:?}", map.check_invariants());
        }
    }

    /// Law: every map produced by removal is a valid left-leaning
    /// red-black tree.
    #[test]
    fn prop_invariants_hold_after_every_remove(
        (_, map) in arbitrary_map(200),
        removals in prop::collection::vec(-64_i16..64, 0..100)
    ) {
        let mut map = map;
        for key in removals {
            map = map.remove(&key);
            prop_assert!(map.check_invariants().is_ok(), "{:?}", map.check_invariants());
        }
    }

    /// Law: the black height of a tree of n entries is at most log2(n + 1) + 1.
    #[test]
    fn prop_black_height_is_logarithmic((_, map) in arbitrary_map(300)) {
        let height = map.check_invariants().unwrap_or(usize::MAX);
        let bound = usize::try_from((map.len() + 1).ilog2()).unwrap_or(usize::MAX) + 1;
        prop_assert!(height <= bound);
    }
}

// =============================================================================
// Model Laws
// =============================================================================

proptest! {
    /// Law: a map built from entries agrees with a BTreeMap built from the
    /// same entries, entry by entry and in order.
    #[test]
    fn prop_agrees_with_btreemap((entries, map) in arbitrary_map(200)) {
        let model: BTreeMap<i16, i32> = entries.into_iter().collect();
        prop_assert_eq!(map.len(), model.len());
        let actual: Vec<(&i16, &i32)> = map.iter().collect();
        let expected: Vec<(&i16, &i32)> = model.iter().collect();
        prop_assert_eq!(actual, expected);
    }

    /// Law: iteration yields strictly ascending keys.
    #[test]
    fn prop_iteration_is_strictly_ascending((_, map) in arbitrary_map(200)) {
        let keys: Vec<&i16> = map.keys().collect();
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Law: reverse iteration is iteration reversed.
    #[test]
    fn prop_reverse_iteration((_, map) in arbitrary_map(100)) {
        let mut forward: Vec<(&i16, &i32)> = map.iter().collect();
        forward.reverse();
        let backward: Vec<(&i16, &i32)> = map.iter().rev().collect();
        prop_assert_eq!(forward, backward);
    }

    /// Law: range agrees with BTreeMap::range.
    #[test]
    fn prop_range_agrees_with_btreemap(
        (entries, map) in arbitrary_map(200),
        low in -70_i16..70,
        high in -70_i16..70
    ) {
        prop_assume!(low <= high);
        let model: BTreeMap<i16, i32> = entries.into_iter().collect();
        let actual: Vec<(&i16, &i32)> = map.range(low..high).collect();
        let expected: Vec<(&i16, &i32)> = model.range(low..high).collect();
        prop_assert_eq!(map.range(low..high).len(), expected.len());
        prop_assert_eq!(actual, expected);
    }

    /// Law: nth and rank are inverse on present keys.
    #[test]
    fn prop_nth_rank_inverse((_, map) in arbitrary_map(200)) {
        for index in 0..map.len() {
            let (key, _) = map.nth(index).unwrap();
            prop_assert_eq!(map.rank(key), index);
        }
        prop_assert_eq!(map.nth(map.len()), None);
    }
}

// =============================================================================
// Get-Insert Laws
// =============================================================================

proptest! {
    /// Law: get after insert returns the inserted value.
    /// map.insert(key, value).get(&key) == Some(&value)
    #[test]
    fn prop_get_insert_law((_, map) in arbitrary_map(100), key: i16, value: i32) {
        let updated = map.insert(key, value);
        prop_assert_eq!(updated.get(&key), Some(&value));
    }

    /// Law: insert does not affect other keys.
    /// key1 != key2 => map.insert(key1, value).get(&key2) == map.get(&key2)
    #[test]
    fn prop_get_insert_other_law(
        (_, map) in arbitrary_map(100),
        key1 in -64_i16..64,
        key2 in -64_i16..64,
        value: i32
    ) {
        prop_assume!(key1 != key2);
        let updated = map.insert(key1, value);
        prop_assert_eq!(updated.get(&key2), map.get(&key2));
    }

    /// Law: insert grows the length by one exactly when the key was absent.
    #[test]
    fn prop_insert_length_law((_, map) in arbitrary_map(100), key in -64_i16..64, value: i32) {
        let expected = map.len() + usize::from(!map.contains_key(&key));
        prop_assert_eq!(map.insert(key, value).len(), expected);
    }

    /// Law: reinserting an existing pair yields an equal map.
    #[test]
    fn prop_insert_idempotent((_, map) in arbitrary_map(100), index in any::<prop::sample::Index>()) {
        prop_assume!(!map.is_empty());
        let (key, value) = map.nth(index.index(map.len())).unwrap();
        prop_assert_eq!(&map.insert(*key, *value), &map);
    }
}

// =============================================================================
// Remove Laws
// =============================================================================

proptest! {
    /// Law: get after remove returns None.
    /// map.remove(&key).get(&key) == None
    #[test]
    fn prop_get_remove_law((_, map) in arbitrary_map(100), key in -64_i16..64) {
        let removed = map.remove(&key);
        prop_assert_eq!(removed.get(&key), None);
        prop_assert_eq!(removed.len(), map.len() - usize::from(map.contains_key(&key)));
    }

    /// Law: remove after insert of a fresh key restores the original map.
    #[test]
    fn prop_remove_insert_law((_, map) in arbitrary_map(100), key in -64_i16..64, value: i32) {
        prop_assume!(!map.contains_key(&key));
        prop_assert_eq!(map.insert(key, value).remove(&key), map);
    }
}

// =============================================================================
// Persistence Laws
// =============================================================================

proptest! {
    /// Law: deriving new maps never changes the map they came from.
    #[test]
    fn prop_derivation_preserves_source(
        (entries, map) in arbitrary_map(100),
        updates in arbitrary_entries(50),
        removals in prop::collection::vec(-64_i16..64, 0..20)
    ) {
        let snapshot: Vec<(i16, i32)> = map.iter().map(|(key, value)| (*key, *value)).collect();

        let _updated = map.with_updates(updates);
        let _removed = removals.iter().fold(map.clone(), |acc, key| acc.remove(key));

        let after: Vec<(i16, i32)> = map.iter().map(|(key, value)| (*key, *value)).collect();
        prop_assert_eq!(snapshot, after);
        prop_assert_eq!(map, FrozenMap::from_entries(entries, []));
    }

    /// Law: overrides win over entries for every key they name.
    #[test]
    fn prop_override_precedence(
        entries in arbitrary_entries(100),
        overrides in arbitrary_entries(30)
    ) {
        let map = FrozenMap::from_entries(entries, overrides.clone());
        let expected: BTreeMap<i16, i32> = overrides.into_iter().collect();
        for (key, value) in &expected {
            prop_assert_eq!(map.get(key), Some(value));
        }
    }

    /// Law: maps holding the same entries are equal and hash equally
    /// regardless of construction order.
    #[test]
    fn prop_equality_independent_of_build_order(entries in arbitrary_entries(100)) {
        use std::hash::{BuildHasher, RandomState};

        let model: BTreeMap<i16, i32> = entries.into_iter().collect();
        let forward: FrozenMap<i16, i32> = model.clone().into_iter().collect();
        let backward: FrozenMap<i16, i32> = model.into_iter().rev().collect();
        let state = RandomState::new();
        prop_assert_eq!(state.hash_one(&forward), state.hash_one(&backward));
        prop_assert_eq!(forward, backward);
    }

    /// Law: merge equals applying the other map's entries as updates.
    #[test]
    fn prop_merge_is_update((_, left) in arbitrary_map(60), (_, right) in arbitrary_map(60)) {
        let merged = left.merge(&right);
        let expected = FrozenMap::from_entries(left.clone(), right.clone());
        prop_assert_eq!(merged, expected);
    }
}

// =============================================================================
// Fallible Ordering Laws
// =============================================================================

proptest! {
    /// Law: a NaN key is rejected by any non-empty PartialOrder map and the
    /// map is left as it was.
    #[test]
    fn prop_nan_rejected(keys in prop::collection::vec(-1.0e6_f64..1.0e6, 1..50)) {
        let map = FrozenMap::try_from_entries_with(
            PartialOrder,
            keys.iter().map(|key| (*key, ())),
            [],
        ).unwrap();
        let length = map.len();
        prop_assert_eq!(map.try_insert(f64::NAN, ()).err(), Some(FrozenMapError::Uncomparable));
        prop_assert_eq!(map.len(), length);
        prop_assert!(map.check_invariants().is_ok());
    }
}
