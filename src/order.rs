//! Key orderings.
//!
//! A [`FrozenMap`](crate::FrozenMap) never compares keys directly: it asks
//! its [`KeyOrder`]. The default [`Natural`] ordering uses [`Ord`] and cannot
//! fail, so maps built with it expose infallible `insert`/`get`/`remove`.
//! [`PartialOrder`] accepts [`PartialOrd`] keys such as `f64` and reports
//! [`FrozenMapError::Uncomparable`] when two keys have no ordering.
//!
//! # Examples
//!
//! ```rust
//! use frozenmap::{FrozenMap, FrozenMapError, PartialOrder};
//!
//! let map = FrozenMap::with_order(PartialOrder)
//!     .try_insert(1.5, "a")
//!     .and_then(|map| map.try_insert(0.5, "b"))
//!     .unwrap();
//! assert_eq!(map.len(), 2);
//!
//! assert_eq!(map.try_insert(f64::NAN, "c"), Err(FrozenMapError::Uncomparable));
//! ```

use std::cmp::Ordering;
use std::convert::Infallible;

use crate::error::FrozenMapError;

/// A strategy for ordering the keys of a map.
///
/// `compare(probe, key)` returns how `probe` orders relative to `key`. An
/// implementation must be a strict total order over every key it accepts;
/// the tree trusts it and never re-checks consistency.
pub trait KeyOrder<K: ?Sized> {
    /// Failure raised when two keys cannot be ordered.
    type Error: Into<FrozenMapError>;

    /// Compares `probe` against `key`.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when the two keys have no defined ordering.
    fn compare(&self, probe: &K, key: &K) -> Result<Ordering, Self::Error>;
}

/// Orders keys by their [`Ord`] implementation. Never fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> KeyOrder<K> for Natural {
    type Error = Infallible;

    #[inline]
    fn compare(&self, probe: &K, key: &K) -> Result<Ordering, Infallible> {
        Ok(probe.cmp(key))
    }
}

/// Orders keys by their [`PartialOrd`] implementation.
///
/// Incomparable pairs (for example anything against `f64::NAN`) fail with
/// [`FrozenMapError::Uncomparable`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PartialOrder;

impl<K: PartialOrd + ?Sized> KeyOrder<K> for PartialOrder {
    type Error = FrozenMapError;

    #[inline]
    fn compare(&self, probe: &K, key: &K) -> Result<Ordering, FrozenMapError> {
        probe
            .partial_cmp(key)
            .ok_or(FrozenMapError::Uncomparable)
    }
}

/// Discharges a result whose error type is uninhabited.
#[inline]
pub(crate) fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
