//! # frozenmap
//!
//! An immutable ordered map for Rust, backed by a persistent left-leaning
//! red-black tree.
//!
//! ## Overview
//!
//! A [`FrozenMap`] is fixed once built. Deriving a map with extra or changed
//! entries copies only the O(log N) nodes on the affected search path and
//! shares everything else with the map it came from, so old and new versions
//! stay valid side by side.
//!
//! - **Lookup**: `get`, `lookup`, `contains_key`, `rank`, `nth`, `min`, `max`
//! - **Derivation**: `insert`, `remove`, `with_updates`, `merge`, `from_entries`
//! - **Traversal**: lazy ascending and descending iterators, key ranges
//! - **Orderings**: [`Natural`] (`Ord`) or [`PartialOrder`] (`PartialOrd`,
//!   fallible), or any [`KeyOrder`] implementation
//!
//! ## Feature Flags
//!
//! - `arc` (default): nodes are shared through `Arc`, maps are `Send + Sync`
//! - `serde`: `Serialize`/`Deserialize` for [`FrozenMap`]
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use frozenmap::prelude::*;
//!
//! let base = FrozenMap::from_entries([("foo", "bar")], []);
//! let extended = FrozenMap::from_entries(base.clone(), [("baz", "42")]);
//!
//! assert_eq!(base.len(), 1);
//! assert_eq!(extended.len(), 2);
//! assert_eq!(base.lookup("baz"), Err(FrozenMapError::KeyNotFound));
//! assert_eq!(format!("{extended}"), "{baz: 42, foo: bar}");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use frozenmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::FrozenMapError;
    pub use crate::map::FrozenMap;
    pub use crate::order::{KeyOrder, Natural, PartialOrder};
}

pub mod error;
pub mod order;

mod map;
mod tree;

pub use error::{FrozenMapError, InvariantViolation};
pub use map::FrozenMap;
pub use order::{KeyOrder, Natural, PartialOrder};
pub use tree::{IntoIter, Iter, Keys, TreeDiagram, Values};
