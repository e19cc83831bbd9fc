//! Error types for frozen maps.
//!
//! [`FrozenMapError`] is what callers see from fallible lookups and from
//! insertions rejected by the map's key ordering. [`InvariantViolation`] is
//! reported by [`FrozenMap::check_invariants`](crate::FrozenMap::check_invariants)
//! when a tree fails a left-leaning red-black structural check.

use std::convert::Infallible;

use thiserror::Error;

/// Errors produced by [`FrozenMap`](crate::FrozenMap) operations.
///
/// # Examples
///
/// ```rust
/// use frozenmap::{FrozenMap, FrozenMapError};
///
/// let map = FrozenMap::singleton("foo", "bar");
/// assert_eq!(map.lookup("baz"), Err(FrozenMapError::KeyNotFound));
/// assert_eq!(FrozenMapError::KeyNotFound.to_string(), "key not found");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum FrozenMapError {
    /// The requested key is not present in the map.
    #[error("key not found")]
    KeyNotFound,
    /// The key cannot be ordered against a key already in the map.
    #[error("key cannot be ordered against the keys of the map")]
    Uncomparable,
}

impl FrozenMapError {
    /// Returns `true` if this is [`FrozenMapError::KeyNotFound`].
    #[must_use]
    pub const fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound)
    }

    /// Returns `true` if this is [`FrozenMapError::Uncomparable`].
    #[must_use]
    pub const fn is_uncomparable(&self) -> bool {
        matches!(self, Self::Uncomparable)
    }
}

impl From<Infallible> for FrozenMapError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// A broken left-leaning red-black tree invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The root node is red.
    #[error("root node is red")]
    RedRoot,
    /// A node has a red right child.
    #[error("red link leans right at in-order position {position}")]
    RightLeaningRed {
        /// In-order position of the parent node.
        position: usize,
    },
    /// A red node has a red left child.
    #[error("two consecutive red links at in-order position {position}")]
    ConsecutiveRed {
        /// In-order position of the upper red node.
        position: usize,
    },
    /// Two paths from the same node reach an empty subtree through a
    /// different number of black nodes.
    #[error("black height mismatch: left subtree {left}, right subtree {right}")]
    BlackImbalance {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// In-order traversal is not strictly ascending.
    #[error("key at in-order position {position} is not greater than its predecessor")]
    OutOfOrder {
        /// In-order position of the offending key.
        position: usize,
    },
    /// A cached subtree size disagrees with the subtree contents.
    #[error("cached size {cached} does not match actual subtree size {actual}")]
    StaleSize {
        /// The size stored in the node.
        cached: usize,
        /// The number of nodes actually in the subtree.
        actual: usize,
    },
    /// The key ordering failed while checking key order.
    #[error("key ordering failed during validation: {0}")]
    Ordering(FrozenMapError),
}
