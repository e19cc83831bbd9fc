//! Immutable ordered map.
//!
//! This module provides [`FrozenMap`], an ordered map that never changes
//! after construction. Every "update" returns a new map whose tree shares all
//! untouched subtrees with the map it was derived from.
//!
//! # Overview
//!
//! - O(log N) get, insert, remove, rank, nth
//! - O(log N) min/max
//! - O(log N + k) range queries where k is the number of results
//! - O(1) len, `is_empty` and clone
//!
//! # Examples
//!
//! ```rust
//! use frozenmap::FrozenMap;
//!
//! let defaults = FrozenMap::from_entries([("host", "localhost"), ("port", "80")], []);
//! let config = FrozenMap::from_entries(defaults.clone(), [("port", "8080")]);
//!
//! assert_eq!(config.get("port"), Some(&"8080"));
//! assert_eq!(defaults.get("port"), Some(&"80")); // Original unchanged
//!
//! let keys: Vec<&&str> = config.keys().collect();
//! assert_eq!(keys, vec![&"host", &"port"]);
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, RangeBounds};

use crate::error::{FrozenMapError, InvariantViolation};
use crate::order::{KeyOrder, Natural, infallible};
use crate::tree::{self, IntoIter, Iter, Keys, Link, TreeDiagram, Values};

// =============================================================================
// FrozenMap Definition
// =============================================================================

/// An immutable ordered map backed by a persistent left-leaning red-black
/// tree.
///
/// A `FrozenMap` references exactly one tree root for its whole life.
/// Operations that look like updates (`insert`, `remove`, `with_updates`,
/// `merge`) build a new root and return a new map; the receiver is left
/// exactly as it was and keeps sharing structure with the result.
///
/// Keys are ordered by the map's [`KeyOrder`] `O`, which defaults to
/// [`Natural`] (`Ord`). Maps with an ordering that cannot fail expose
/// infallible operations; maps with a fallible ordering such as
/// [`PartialOrder`](crate::PartialOrder) use the `try_*` variants.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `clone`        | O(1)              |
/// | `get`          | O(log N)          |
/// | `insert`       | O(log N)          |
/// | `remove`       | O(log N)          |
/// | `contains_key` | O(log N)          |
/// | `rank`/`nth`   | O(log N)          |
/// | `min`/`max`    | O(log N)          |
/// | `range`        | O(log N + k)      |
/// | `len`          | O(1)              |
/// | `==`           | O(N)              |
///
/// # Examples
///
/// ```rust
/// use frozenmap::FrozenMap;
///
/// let map = FrozenMap::new()
///     .insert(3, "three")
///     .insert(1, "one")
///     .insert(2, "two");
///
/// let keys: Vec<&i32> = map.keys().collect();
/// assert_eq!(keys, vec![&1, &2, &3]);
///
/// let updated = map.insert(1, "ONE");
/// assert_eq!(map.get(&1), Some(&"one"));
/// assert_eq!(updated.get(&1), Some(&"ONE"));
/// ```
pub struct FrozenMap<K, V, O = Natural> {
    root: Link<K, V>,
    order: O,
}

impl<K, V> FrozenMap<K, V> {
    /// Creates an empty map ordered by `Ord`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map: FrozenMap<i32, String> = FrozenMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_order(Natural)
    }
}

impl<K, V, O> FrozenMap<K, V, O> {
    /// Creates an empty map ordered by `order`.
    #[inline]
    #[must_use]
    pub const fn with_order(order: O) -> Self {
        Self { root: None, order }
    }

    /// Returns the key ordering of this map.
    #[inline]
    pub const fn order(&self) -> &O {
        &self.order
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        tree::size_of(&self.root)
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns an iterator over entries in ascending key order.
    ///
    /// The iterator is lazy and borrows the map; any number of iterators over
    /// the same map may be alive at once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map = FrozenMap::from_entries([(2, 'b'), (1, 'a')], []);
    /// let entries: Vec<(&i32, &char)> = map.iter().collect();
    /// assert_eq!(entries, vec![(&1, &'a'), (&2, &'b')]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root)
    }

    /// Returns an iterator over keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Returns an iterator over values in ascending key order.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Returns the entry with the minimum key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map = FrozenMap::from_entries([(3, "three"), (1, "one")], []);
    /// assert_eq!(map.min(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        tree::minimum(&self.root).map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the maximum key.
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        tree::maximum(&self.root).map(|node| (&node.key, &node.value))
    }

    /// Returns the entry at ascending position `index`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map = FrozenMap::from_entries([(30, 'c'), (10, 'a'), (20, 'b')], []);
    /// assert_eq!(map.nth(1), Some((&20, &'b')));
    /// assert_eq!(map.nth(3), None);
    /// ```
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<(&K, &V)> {
        tree::select(&self.root, index).map(|node| (&node.key, &node.value))
    }

    /// Returns a printable dump of the underlying tree: each node with its
    /// color and subtree size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map = FrozenMap::from_entries([(1, 'a'), (2, 'b')], []);
    /// let diagram = map.tree_diagram().to_string();
    /// assert!(diagram.starts_with("2 => 'b' [black, 2]"));
    /// ```
    #[must_use]
    pub const fn tree_diagram(&self) -> TreeDiagram<'_, K, V> {
        TreeDiagram::new(&self.root)
    }

    /// Verifies the left-leaning red-black invariants, cached sizes and key
    /// order, returning the black height of the tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found in an in-order walk.
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation>
    where
        O: KeyOrder<K>,
    {
        tree::check(&self.root, &self.order)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns the value for `key`, or the ordering's error if `key` cannot
    /// be compared with a key on its search path.
    ///
    /// # Errors
    ///
    /// Propagates the error of the map's [`KeyOrder`].
    pub fn try_get<Q>(&self, key: &Q) -> Result<Option<&V>, O::Error>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q>,
    {
        Ok(tree::find(&self.root, &self.order, key)?.map(|node| &node.value))
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map = FrozenMap::singleton("hello".to_string(), 42);
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q, Error = Infallible>,
    {
        infallible(self.try_get(key))
    }

    /// Returns the value for `key`, failing with
    /// [`FrozenMapError::KeyNotFound`] when it is absent.
    ///
    /// # Errors
    ///
    /// [`FrozenMapError::KeyNotFound`] for a missing key; the ordering's
    /// error converted into [`FrozenMapError`] for an uncomparable key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::{FrozenMap, FrozenMapError};
    ///
    /// let map = FrozenMap::singleton("foo", "bar");
    /// assert_eq!(map.lookup("foo"), Ok(&"bar"));
    /// assert_eq!(map.lookup("baz"), Err(FrozenMapError::KeyNotFound));
    /// ```
    pub fn lookup<Q>(&self, key: &Q) -> Result<&V, FrozenMapError>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q>,
    {
        match self.try_get(key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(FrozenMapError::KeyNotFound),
            Err(error) => Err(error.into()),
        }
    }

    /// Returns whether `key` is present, or the ordering's error.
    ///
    /// # Errors
    ///
    /// Propagates the error of the map's [`KeyOrder`].
    pub fn try_contains_key<Q>(&self, key: &Q) -> Result<bool, O::Error>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q>,
    {
        Ok(tree::find(&self.root, &self.order, key)?.is_some())
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q, Error = Infallible>,
    {
        infallible(self.try_contains_key(key))
    }

    /// Returns the number of keys strictly less than `key`, whether or not
    /// `key` itself is present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map = FrozenMap::from_entries([(10, ()), (20, ()), (30, ())], []);
    /// assert_eq!(map.rank(&20), 1);
    /// assert_eq!(map.rank(&25), 2);
    /// ```
    #[must_use]
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q, Error = Infallible>,
    {
        infallible(self.try_rank(key))
    }

    /// Returns the number of keys strictly less than `key`, or the
    /// ordering's error.
    ///
    /// # Errors
    ///
    /// Propagates the error of the map's [`KeyOrder`].
    pub fn try_rank<Q>(&self, key: &Q) -> Result<usize, O::Error>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q>,
    {
        tree::rank(&self.root, &self.order, key)
    }
}

impl<K: Clone, V: Clone, O: Clone> FrozenMap<K, V, O> {
    // =========================================================================
    // Functional Updates
    // =========================================================================

    /// Returns a map with `key` mapped to `value`, or the ordering's error if
    /// `key` cannot be ordered against the keys already present.
    ///
    /// A failed insertion builds nothing; `self` is unaffected either way.
    ///
    /// # Errors
    ///
    /// Propagates the error of the map's [`KeyOrder`].
    pub fn try_insert(&self, key: K, value: V) -> Result<Self, O::Error>
    where
        O: KeyOrder<K>,
    {
        let (root, _) = tree::insert(&self.root, &self.order, key, value).inspect_err(|_| {
            tracing::debug!(len = self.len(), "insert rejected by key ordering");
        })?;
        Ok(self.with_root(root))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contains the key, the value is replaced.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map1 = FrozenMap::new().insert(1, "one");
    /// let map2 = map1.insert(1, "ONE");
    ///
    /// assert_eq!(map1.get(&1), Some(&"one")); // Original unchanged
    /// assert_eq!(map2.get(&1), Some(&"ONE")); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self
    where
        O: KeyOrder<K, Error = Infallible>,
    {
        infallible(self.try_insert(key, value))
    }

    /// Returns a map without `key`, or the ordering's error.
    ///
    /// # Errors
    ///
    /// Propagates the error of the map's [`KeyOrder`].
    pub fn try_remove<Q>(&self, key: &Q) -> Result<Self, O::Error>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q>,
    {
        let removed = tree::remove(&self.root, &self.order, key).inspect_err(|_| {
            tracing::debug!(len = self.len(), "remove rejected by key ordering");
        })?;
        Ok(removed.map_or_else(|| self.clone(), |root| self.with_root(root)))
    }

    /// Removes a key from the map.
    ///
    /// Returns a new map without the key. If the key doesn't exist, the
    /// result shares the original's root.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map = FrozenMap::from_entries([(1, "one"), (2, "two")], []);
    /// let removed = map.remove(&1);
    ///
    /// assert_eq!(map.len(), 2);     // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get(&1), None);
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: ?Sized,
        O: KeyOrder<Q, Error = Infallible>,
    {
        infallible(self.try_remove(key))
    }

    /// Applies `pairs` in order on top of this map, threading the root
    /// through successive insertions.
    ///
    /// # Errors
    ///
    /// Stops at the first pair whose key cannot be ordered and returns the
    /// ordering's error; no partially updated map escapes.
    pub fn try_with_updates<I>(&self, pairs: I) -> Result<Self, O::Error>
    where
        I: IntoIterator<Item = (K, V)>,
        O: KeyOrder<K>,
    {
        let mut root = self.root.clone();
        let mut applied = 0_usize;
        for (key, value) in pairs {
            root = tree::insert(&root, &self.order, key, value)
                .inspect_err(|_| {
                    tracing::debug!(applied, "update rejected by key ordering");
                })?
                .0;
            applied += 1;
        }
        let updated = self.with_root(root);
        tracing::trace!(applied, len = updated.len(), "applied updates");
        Ok(updated)
    }

    /// Returns a new map with every pair of `pairs` applied on top of this
    /// one. Later pairs win over earlier ones and over existing entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let base = FrozenMap::from_entries([("a", 1), ("b", 2)], []);
    /// let updated = base.with_updates([("b", 20), ("c", 30)]);
    ///
    /// assert_eq!(base.len(), 2);
    /// assert_eq!(updated.get("b"), Some(&20));
    /// assert_eq!(updated.len(), 3);
    /// ```
    #[must_use]
    pub fn with_updates<I>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        O: KeyOrder<K, Error = Infallible>,
    {
        infallible(self.try_with_updates(pairs))
    }

    /// Builds a map from `entries` followed by `overrides`, using `order`.
    ///
    /// # Errors
    ///
    /// Returns the ordering's error for the first key that cannot be ordered.
    pub fn try_from_entries_with<E, R>(order: O, entries: E, overrides: R) -> Result<Self, O::Error>
    where
        E: IntoIterator<Item = (K, V)>,
        R: IntoIterator<Item = (K, V)>,
        O: KeyOrder<K>,
    {
        Self::with_order(order)
            .try_with_updates(entries)?
            .try_with_updates(overrides)
    }

    /// Merges two maps, with values from `other` taking precedence on key
    /// conflicts.
    ///
    /// # Complexity
    ///
    /// O(m log(n + m)) where n is the size of self and m is the size of other
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map1 = FrozenMap::from_entries([(1, "one"), (2, "two")], []);
    /// let map2 = FrozenMap::from_entries([(2, "TWO"), (3, "three")], []);
    /// let merged = map1.merge(&map2);
    /// assert_eq!(merged.get(&1), Some(&"one"));
    /// assert_eq!(merged.get(&2), Some(&"TWO")); // From map2
    /// assert_eq!(merged.get(&3), Some(&"three"));
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self
    where
        O: KeyOrder<K, Error = Infallible>,
    {
        self.with_updates(
            other
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        )
    }

    /// Merges two maps with a custom conflict resolver.
    ///
    /// When a key exists in both maps, `resolver` receives the key, the
    /// value from `self` and the value from `other`, and returns the value
    /// to keep.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map1 = FrozenMap::from_entries([(1, 100), (2, 200)], []);
    /// let map2 = FrozenMap::from_entries([(2, 50), (3, 300)], []);
    /// let merged = map1.merge_with(&map2, |_, v1, v2| v1 + v2);
    /// assert_eq!(merged.get(&2), Some(&250));
    /// assert_eq!(merged.get(&3), Some(&300));
    /// ```
    #[must_use]
    pub fn merge_with<F>(&self, other: &Self, mut resolver: F) -> Self
    where
        F: FnMut(&K, &V, &V) -> V,
        O: KeyOrder<K, Error = Infallible>,
    {
        let mut result = self.clone();
        for (key, other_value) in other {
            let value = self.get(key).map_or_else(
                || other_value.clone(),
                |self_value| resolver(key, self_value, other_value),
            );
            result = result.insert(key.clone(), value);
        }
        result
    }

    fn with_root(&self, root: Link<K, V>) -> Self {
        Self {
            root,
            order: self.order.clone(),
        }
    }
}

impl<K: Clone + Ord, V: Clone> FrozenMap<K, V> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map = FrozenMap::singleton(42, "answer");
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get(&42), Some(&"answer"));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Builds a map by inserting `entries` in order and then `overrides`.
    ///
    /// Overrides always win on key collisions, wherever the colliding key
    /// appears in `entries`. `entries` can be any iterable of pairs,
    /// including another map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map = FrozenMap::from_entries([("a", 1), ("b", 2)], [("a", 99)]);
    /// assert_eq!(map, FrozenMap::from_entries([("a", 99), ("b", 2)], []));
    /// ```
    #[must_use]
    pub fn from_entries<E, R>(entries: E, overrides: R) -> Self
    where
        E: IntoIterator<Item = (K, V)>,
        R: IntoIterator<Item = (K, V)>,
    {
        infallible(Self::try_from_entries_with(Natural, entries, overrides))
    }

    /// Returns an iterator over entries whose keys fall within `range`.
    ///
    /// # Complexity
    ///
    /// O(log N + k) where k is the number of entries in the range
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::FrozenMap;
    ///
    /// let map: FrozenMap<i32, i32> = (1..=5).map(|key| (key, key * 10)).collect();
    /// let range: Vec<&i32> = map.range(2..=4).map(|(key, _)| key).collect();
    /// assert_eq!(range, vec![&2, &3, &4]);
    /// ```
    pub fn range<Q, R>(&self, range: R) -> Iter<'_, K, V>
    where
        R: RangeBounds<Q>,
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Iter::range(&self.root, &range)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, O: Clone> Clone for FrozenMap<K, V, O> {
    /// Shares the root: O(1), no nodes are copied.
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            order: self.order.clone(),
        }
    }
}

impl<K, V, O: Default> Default for FrozenMap<K, V, O> {
    #[inline]
    fn default() -> Self {
        Self::with_order(O::default())
    }
}

impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for FrozenMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new().with_updates(iter)
    }
}

impl<K: Clone, V: Clone, O> IntoIterator for FrozenMap<K, V, O> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.root)
    }
}

impl<'a, K, V, O> IntoIterator for &'a FrozenMap<K, V, O> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, Q, O> Index<&Q> for FrozenMap<K, V, O>
where
    K: Borrow<Q>,
    Q: ?Sized,
    O: KeyOrder<Q, Error = Infallible>,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no entry found for key"),
        }
    }
}

/// Content equality: same length and pairwise equal entries in key order.
/// Tree shape and colors are irrelevant, so maps built in different
/// insertion orders compare equal.
impl<K, V: PartialEq, O: KeyOrder<K>> PartialEq for FrozenMap<K, V, O> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((self_key, self_value), (other_key, other_value))| {
                    matches!(self.order.compare(self_key, other_key), Ok(Ordering::Equal))
                        && self_value == other_value
                })
    }
}

impl<K, V: Eq, O: KeyOrder<K, Error = Infallible>> Eq for FrozenMap<K, V, O> {}

/// Hashes the length, then each entry in key order, so equal maps hash
/// equally regardless of how they were built.
///
/// Only `Natural` maps are hashable: there `Ord` equality agrees with
/// `K: Hash`. A custom [`KeyOrder`] may treat keys that hash differently as
/// the same key.
///
/// # Examples
///
/// ```rust
/// use frozenmap::FrozenMap;
/// use std::collections::HashMap;
///
/// let mut outer: HashMap<FrozenMap<i32, String>, &str> = HashMap::new();
/// let key = FrozenMap::from_entries([(1, "one".to_string()), (2, "two".to_string())], []);
/// outer.insert(key.clone(), "value");
/// assert_eq!(outer.get(&key), Some(&"value"));
/// ```
impl<K: Hash, V: Hash> Hash for FrozenMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, O> fmt::Debug for FrozenMap<K, V, O> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, O> fmt::Display for FrozenMap<K, V, O> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, O> serde::Serialize for FrozenMap<K, V, O>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct FrozenMapVisitor<K, V, O> {
    marker: std::marker::PhantomData<fn() -> FrozenMap<K, V, O>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V, O> serde::de::Visitor<'de> for FrozenMapVisitor<K, V, O>
where
    K: serde::Deserialize<'de> + Clone,
    V: serde::Deserialize<'de> + Clone,
    O: KeyOrder<K> + Default + Clone,
{
    type Value = FrozenMap<K, V, O>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        use serde::de::Error;

        let mut map: FrozenMap<K, V, O> = FrozenMap::default();
        while let Some((key, value)) = access.next_entry()? {
            map = map.try_insert(key, value).map_err(|error| {
                let error: FrozenMapError = error.into();
                A::Error::custom(error)
            })?;
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, O> serde::Deserialize<'de> for FrozenMap<K, V, O>
where
    K: serde::Deserialize<'de> + Clone,
    V: serde::Deserialize<'de> + Clone,
    O: KeyOrder<K> + Default + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(FrozenMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Send + Sync Tests (arc feature only)
// =============================================================================

#[cfg(all(test, feature = "arc"))]
mod send_sync_tests {
    use super::*;
    use rstest::rstest;

    const fn assert_send_sync<T: Send + Sync>() {}

    #[rstest]
    fn test_frozen_map_is_send_sync() {
        assert_send_sync::<FrozenMap<i32, String>>();
        assert_send_sync::<FrozenMap<String, i32>>();
        assert_send_sync::<Iter<'static, i32, String>>();
    }
}
