//! Persistent left-leaning red-black tree.
//!
//! Every operation here is a pure function from a root [`Link`] to a new
//! root. Nodes reachable from an existing root are never modified: updates
//! copy the nodes on the path from the root to the affected position and
//! point the copies at the untouched sibling subtrees, so old and new roots
//! share everything off that path.
//!
//! The tree maintains the left-leaning red-black invariants:
//!
//! 1. No node has a red right child.
//! 2. No red node has a red left child.
//! 3. Every path from the root to an empty subtree crosses the same number
//!    of black nodes.
//! 4. In-order traversal yields strictly ascending keys.
//!
//! Each node also caches the size of its subtree, which makes `len`, `rank`
//! and positional access logarithmic or constant.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use crate::error::InvariantViolation;
use crate::order::KeyOrder;

mod iter;

pub use iter::{IntoIter, Iter, Keys, Values};

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Shared-ownership pointer for tree nodes.
///
/// With the `arc` feature (enabled by default) this is `std::sync::Arc`, so
/// maps can be read from many threads at once. Without it this is
/// `std::rc::Rc`.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

// =============================================================================
// Node Definition
// =============================================================================

/// The color of the link from a node's parent to the node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    const fn flipped(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Black => "black",
        }
    }
}

/// A possibly empty subtree. `None` is the empty sentinel and counts as black.
pub(crate) type Link<K, V> = Option<ReferenceCounter<Node<K, V>>>;

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    color: Color,
    size: usize,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Creates a red leaf.
    const fn new_red(key: K, value: V) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            size: 1,
            left: None,
            right: None,
        }
    }

    /// Recomputes the cached subtree size from the children.
    fn resized(mut self) -> Self {
        self.size = 1 + size_of(&self.left) + size_of(&self.right);
        self
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    /// Copies this node with new children.
    fn with_children(&self, left: Link<K, V>, right: Link<K, V>) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            color: self.color,
            size: self.size,
            left,
            right,
        }
    }

    /// Copies this node with a replacement value, keeping its structure.
    fn with_value(&self, value: V) -> Self {
        Self {
            key: self.key.clone(),
            value,
            color: self.color,
            size: self.size,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

fn is_red<K, V>(link: &Link<K, V>) -> bool {
    link.as_ref().is_some_and(|node| node.color == Color::Red)
}

fn left_left_is_red<K, V>(node: &Node<K, V>) -> bool {
    node.left.as_ref().is_some_and(|left| is_red(&left.left))
}

fn right_left_is_red<K, V>(node: &Node<K, V>) -> bool {
    node.right.as_ref().is_some_and(|right| is_red(&right.left))
}

/// Number of entries in a subtree.
pub(crate) fn size_of<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

/// Takes a node out of its pointer for rebuilding.
///
/// Nodes created during the current operation are uniquely owned and are
/// moved out; nodes still shared with another root are copied.
fn unshare<K: Clone, V: Clone>(node: ReferenceCounter<Node<K, V>>) -> Node<K, V> {
    ReferenceCounter::unwrap_or_clone(node)
}

fn share<K, V>(node: Node<K, V>) -> Link<K, V> {
    Some(ReferenceCounter::new(node))
}

// =============================================================================
// Local Fixups
// =============================================================================

/// Turns a right-leaning red link into a left-leaning one.
fn rotate_left<K: Clone, V: Clone>(mut node: Node<K, V>) -> Node<K, V> {
    let Some(right) = node.right.take() else {
        return node;
    };
    let mut pivot = unshare(right);
    node.right = pivot.left.take();
    pivot.color = node.color;
    node.color = Color::Red;
    pivot.left = share(node.resized());
    pivot.resized()
}

/// Turns a left-leaning red link into a right-leaning one.
fn rotate_right<K: Clone, V: Clone>(mut node: Node<K, V>) -> Node<K, V> {
    let Some(left) = node.left.take() else {
        return node;
    };
    let mut pivot = unshare(left);
    node.left = pivot.right.take();
    pivot.color = node.color;
    node.color = Color::Red;
    pivot.right = share(node.resized());
    pivot.resized()
}

fn recolored<K: Clone, V: Clone>(
    child: ReferenceCounter<Node<K, V>>,
) -> ReferenceCounter<Node<K, V>> {
    let mut child = unshare(child);
    child.color = child.color.flipped();
    ReferenceCounter::new(child)
}

/// Inverts the colors of a node and both of its children.
fn flip_colors<K: Clone, V: Clone>(mut node: Node<K, V>) -> Node<K, V> {
    node.color = node.color.flipped();
    node.left = node.left.take().map(recolored);
    node.right = node.right.take().map(recolored);
    node
}

/// Restores the invariants at `node` on the way back up from a change in
/// one of its subtrees.
fn balance<K: Clone, V: Clone>(mut node: Node<K, V>) -> Node<K, V> {
    if is_red(&node.right) && !is_red(&node.left) {
        node = rotate_left(node);
    }
    if is_red(&node.left) && left_left_is_red(&node) {
        node = rotate_right(node);
    }
    if is_red(&node.left) && is_red(&node.right) {
        node = flip_colors(node);
    }
    node.resized()
}

/// Borrows a red link from the right sibling so the left descent never ends
/// on a 2-node.
fn move_red_left<K: Clone, V: Clone>(node: Node<K, V>) -> Node<K, V> {
    let mut node = flip_colors(node);
    if right_left_is_red(&node) {
        node.right = node
            .right
            .take()
            .map(|right| ReferenceCounter::new(rotate_right(unshare(right))));
        node = flip_colors(rotate_left(node));
    }
    node
}

/// Mirror of [`move_red_left`] for the right descent.
fn move_red_right<K: Clone, V: Clone>(node: Node<K, V>) -> Node<K, V> {
    let node = flip_colors(node);
    if left_left_is_red(&node) {
        flip_colors(rotate_right(node))
    } else {
        node
    }
}

// =============================================================================
// Insertion
// =============================================================================

/// Inserts `key -> value`, returning the new root and whether the key was new.
///
/// Fails before building anything when `order` cannot compare `key` with a
/// key on its search path; `root` is untouched either way.
pub(crate) fn insert<K, V, O>(
    root: &Link<K, V>,
    order: &O,
    key: K,
    value: V,
) -> Result<(Link<K, V>, bool), O::Error>
where
    K: Clone,
    V: Clone,
    O: KeyOrder<K>,
{
    let (mut new_root, added) = insert_into(root, order, key, value)?;
    new_root.color = Color::Black;
    Ok((share(new_root), added))
}

fn insert_into<K, V, O>(
    link: &Link<K, V>,
    order: &O,
    key: K,
    value: V,
) -> Result<(Node<K, V>, bool), O::Error>
where
    K: Clone,
    V: Clone,
    O: KeyOrder<K>,
{
    let Some(current) = link else {
        return Ok((Node::new_red(key, value), true));
    };
    match order.compare(&key, &current.key)? {
        Ordering::Equal => Ok((current.with_value(value), false)),
        Ordering::Less => {
            let (left, added) = insert_into(&current.left, order, key, value)?;
            let node = current.with_children(share(left), current.right.clone());
            Ok((balance(node), added))
        }
        Ordering::Greater => {
            let (right, added) = insert_into(&current.right, order, key, value)?;
            let node = current.with_children(current.left.clone(), share(right));
            Ok((balance(node), added))
        }
    }
}

// =============================================================================
// Deletion
// =============================================================================

/// Removes `key`, returning `None` when the key is absent.
pub(crate) fn remove<K, V, Q, O>(
    root: &Link<K, V>,
    order: &O,
    key: &Q,
) -> Result<Option<Link<K, V>>, O::Error>
where
    K: Clone + Borrow<Q>,
    V: Clone,
    Q: ?Sized,
    O: KeyOrder<Q>,
{
    let Some(current) = root else {
        return Ok(None);
    };
    if find(root, order, key)?.is_none() {
        return Ok(None);
    }

    let mut node = unshare(ReferenceCounter::clone(current));
    if !is_red(&node.left) && !is_red(&node.right) {
        node.color = Color::Red;
    }
    let remaining = delete(node, order, key)?;
    Ok(Some(remaining.map(|mut node| {
        node.color = Color::Black;
        ReferenceCounter::new(node)
    })))
}

fn delete<K, V, Q, O>(
    mut node: Node<K, V>,
    order: &O,
    key: &Q,
) -> Result<Option<Node<K, V>>, O::Error>
where
    K: Clone + Borrow<Q>,
    V: Clone,
    Q: ?Sized,
    O: KeyOrder<Q>,
{
    if order.compare(key, node.key.borrow())? == Ordering::Less {
        if !is_red(&node.left) && !left_left_is_red(&node) {
            node = move_red_left(node);
        }
        node.left = match node.left.take() {
            Some(left) => delete(unshare(left), order, key)?.map(ReferenceCounter::new),
            None => None,
        };
    } else {
        if is_red(&node.left) {
            node = rotate_right(node);
        }
        if node.right.is_none() && order.compare(key, node.key.borrow())? == Ordering::Equal {
            return Ok(None);
        }
        if !is_red(&node.right) && !right_left_is_red(&node) {
            node = move_red_right(node);
        }
        if order.compare(key, node.key.borrow())? == Ordering::Equal {
            if let Some(right) = node.right.take() {
                let right = unshare(right);
                let successor = leftmost(&right);
                let (successor_key, successor_value) =
                    (successor.key.clone(), successor.value.clone());
                node.right = delete_min(right).map(ReferenceCounter::new);
                node.key = successor_key;
                node.value = successor_value;
            }
        } else {
            node.right = match node.right.take() {
                Some(right) => delete(unshare(right), order, key)?.map(ReferenceCounter::new),
                None => None,
            };
        }
    }
    Ok(Some(balance(node)))
}

fn delete_min<K: Clone, V: Clone>(mut node: Node<K, V>) -> Option<Node<K, V>> {
    if node.left.is_none() {
        return None;
    }
    if !is_red(&node.left) && !left_left_is_red(&node) {
        node = move_red_left(node);
    }
    node.left = node
        .left
        .take()
        .and_then(|left| delete_min(unshare(left)))
        .map(ReferenceCounter::new);
    Some(balance(node))
}

// =============================================================================
// Queries
// =============================================================================

/// Finds the node holding `key`.
pub(crate) fn find<'a, K, V, Q, O>(
    root: &'a Link<K, V>,
    order: &O,
    key: &Q,
) -> Result<Option<&'a Node<K, V>>, O::Error>
where
    K: Borrow<Q>,
    Q: ?Sized,
    O: KeyOrder<Q>,
{
    let mut current = root.as_deref();
    while let Some(node) = current {
        current = match order.compare(key, node.key.borrow())? {
            Ordering::Less => node.left.as_deref(),
            Ordering::Greater => node.right.as_deref(),
            Ordering::Equal => return Ok(Some(node)),
        };
    }
    Ok(None)
}

/// Counts the keys strictly less than `key`.
pub(crate) fn rank<K, V, Q, O>(root: &Link<K, V>, order: &O, key: &Q) -> Result<usize, O::Error>
where
    K: Borrow<Q>,
    Q: ?Sized,
    O: KeyOrder<Q>,
{
    let mut current = root.as_deref();
    let mut below = 0;
    while let Some(node) = current {
        match order.compare(key, node.key.borrow())? {
            Ordering::Less => current = node.left.as_deref(),
            Ordering::Greater => {
                below += size_of(&node.left) + 1;
                current = node.right.as_deref();
            }
            Ordering::Equal => return Ok(below + size_of(&node.left)),
        }
    }
    Ok(below)
}

/// Returns the node at ascending position `index`.
pub(crate) fn select<K, V>(root: &Link<K, V>, mut index: usize) -> Option<&Node<K, V>> {
    let mut current = root.as_deref();
    while let Some(node) = current {
        let left_size = size_of(&node.left);
        match index.cmp(&left_size) {
            Ordering::Less => current = node.left.as_deref(),
            Ordering::Equal => return Some(node),
            Ordering::Greater => {
                index -= left_size + 1;
                current = node.right.as_deref();
            }
        }
    }
    None
}

fn leftmost<K, V>(node: &Node<K, V>) -> &Node<K, V> {
    let mut node = node;
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    node
}

fn rightmost<K, V>(node: &Node<K, V>) -> &Node<K, V> {
    let mut node = node;
    while let Some(right) = node.right.as_deref() {
        node = right;
    }
    node
}

pub(crate) fn minimum<K, V>(root: &Link<K, V>) -> Option<&Node<K, V>> {
    root.as_deref().map(leftmost)
}

pub(crate) fn maximum<K, V>(root: &Link<K, V>) -> Option<&Node<K, V>> {
    root.as_deref().map(rightmost)
}

// =============================================================================
// Validation
// =============================================================================

/// Checks every structural invariant, returning the black height.
pub(crate) fn check<K, V, O>(root: &Link<K, V>, order: &O) -> Result<usize, InvariantViolation>
where
    O: KeyOrder<K>,
{
    if is_red(root) {
        return Err(InvariantViolation::RedRoot);
    }
    let mut walk = Walk {
        order,
        position: 0,
        previous: None,
    };
    walk.check_node(root.as_deref())
}

struct Walk<'a, 'o, K, O> {
    order: &'o O,
    position: usize,
    previous: Option<&'a K>,
}

impl<'a, K, O: KeyOrder<K>> Walk<'a, '_, K, O> {
    fn check_node<V>(&mut self, node: Option<&'a Node<K, V>>) -> Result<usize, InvariantViolation> {
        let Some(node) = node else {
            return Ok(0);
        };
        let left_height = self.check_node(node.left.as_deref())?;

        let position = self.position;
        if let Some(previous) = self.previous {
            let ordering = self
                .order
                .compare(previous, &node.key)
                .map_err(|error| InvariantViolation::Ordering(error.into()))?;
            if ordering != Ordering::Less {
                return Err(InvariantViolation::OutOfOrder { position });
            }
        }
        self.previous = Some(&node.key);
        self.position += 1;

        if is_red(&node.right) {
            return Err(InvariantViolation::RightLeaningRed { position });
        }
        if node.color == Color::Red && is_red(&node.left) {
            return Err(InvariantViolation::ConsecutiveRed { position });
        }

        let right_height = self.check_node(node.right.as_deref())?;
        if left_height != right_height {
            return Err(InvariantViolation::BlackImbalance {
                left: left_height,
                right: right_height,
            });
        }

        let actual = 1 + size_of(&node.left) + size_of(&node.right);
        if node.size != actual {
            return Err(InvariantViolation::StaleSize {
                cached: node.size,
                actual,
            });
        }
        Ok(left_height + usize::from(node.color == Color::Black))
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// An indented dump of a tree's shape, colors and cached sizes.
///
/// Returned by [`FrozenMap::tree_diagram`](crate::FrozenMap::tree_diagram).
/// Each node prints as `key => value [color, size]`, children are indented
/// two spaces (left first) and empty subtrees print as `-`.
pub struct TreeDiagram<'a, K, V> {
    root: &'a Link<K, V>,
}

impl<'a, K, V> TreeDiagram<'a, K, V> {
    pub(crate) const fn new(root: &'a Link<K, V>) -> Self {
        Self { root }
    }
}

fn render_node<K: fmt::Debug, V: fmt::Debug>(
    node: Option<&Node<K, V>>,
    depth: usize,
    formatter: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let indent = depth * 2;
    match node {
        None => writeln!(formatter, "{:indent$}-", ""),
        Some(node) => {
            writeln!(
                formatter,
                "{:indent$}{:?} => {:?} [{}, {}]",
                "",
                node.key,
                node.value,
                node.color.name(),
                node.size
            )?;
            render_node(node.left.as_deref(), depth + 1, formatter)?;
            render_node(node.right.as_deref(), depth + 1, formatter)
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for TreeDiagram<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_node(self.root.as_deref(), 0, formatter)
    }
}

// =============================================================================
// Tests
// =============================================================================
