//! Lazy in-order iterators.
//!
//! Trees are never mutated, so an iterator only needs a stack of the nodes
//! whose left subtrees have been visited. Each iterator walks from both ends
//! and carries the number of entries left, which keeps the two ends from
//! crossing and makes every iterator exact-size.

use std::borrow::Borrow;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use super::{Link, Node, ReferenceCounter, size_of};

fn push_left_spine<'a, K, V>(stack: &mut Vec<&'a Node<K, V>>, mut node: Option<&'a Node<K, V>>) {
    while let Some(current) = node {
        stack.push(current);
        node = current.left.as_deref();
    }
}

fn push_right_spine<'a, K, V>(stack: &mut Vec<&'a Node<K, V>>, mut node: Option<&'a Node<K, V>>) {
    while let Some(current) = node {
        stack.push(current);
        node = current.right.as_deref();
    }
}

// =============================================================================
// Borrowing Iterator
// =============================================================================

/// An iterator over the entries of a [`FrozenMap`](crate::FrozenMap) in
/// ascending key order.
pub struct Iter<'a, K, V> {
    front: Vec<&'a Node<K, V>>,
    back: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: &'a Link<K, V>) -> Self {
        let mut front = Vec::new();
        let mut back = Vec::new();
        push_left_spine(&mut front, root.as_deref());
        push_right_spine(&mut back, root.as_deref());
        Self {
            front,
            back,
            remaining: size_of(root),
        }
    }

    /// Iterates over the entries whose keys fall inside `bounds`.
    ///
    /// Both ends are seeded by a single descent each, and the number of
    /// entries in range comes from two rank computations, so no entry outside
    /// the range is ever visited.
    pub(crate) fn range<Q, R>(root: &'a Link<K, V>, bounds: &R) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        R: RangeBounds<Q>,
    {
        let start = bounds.start_bound();
        let end = bounds.end_bound();

        let mut front = Vec::new();
        let mut node = root.as_deref();
        while let Some(current) = node {
            if above_start(current.key.borrow(), start) {
                front.push(current);
                node = current.left.as_deref();
            } else {
                node = current.right.as_deref();
            }
        }

        let mut back = Vec::new();
        let mut node = root.as_deref();
        while let Some(current) = node {
            if below_end(current.key.borrow(), end) {
                back.push(current);
                node = current.right.as_deref();
            } else {
                node = current.left.as_deref();
            }
        }

        let skipped = match start {
            Bound::Included(key) => count_before(root, key, false),
            Bound::Excluded(key) => count_before(root, key, true),
            Bound::Unbounded => 0,
        };
        let reached = match end {
            Bound::Included(key) => count_before(root, key, true),
            Bound::Excluded(key) => count_before(root, key, false),
            Bound::Unbounded => size_of(root),
        };

        Self {
            front,
            back,
            remaining: reached.saturating_sub(skipped),
        }
    }
}

fn above_start<Q: Ord + ?Sized>(key: &Q, start: Bound<&Q>) -> bool {
    match start {
        Bound::Included(bound) => key >= bound,
        Bound::Excluded(bound) => key > bound,
        Bound::Unbounded => true,
    }
}

fn below_end<Q: Ord + ?Sized>(key: &Q, end: Bound<&Q>) -> bool {
    match end {
        Bound::Included(bound) => key <= bound,
        Bound::Excluded(bound) => key < bound,
        Bound::Unbounded => true,
    }
}

/// Counts keys below `key`, including an equal key when `inclusive`.
fn count_before<K, V, Q>(root: &Link<K, V>, key: &Q, inclusive: bool) -> usize
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = root.as_deref();
    let mut count = 0;
    while let Some(node) = current {
        let node_key: &Q = node.key.borrow();
        if node_key < key || (inclusive && node_key == key) {
            count += size_of(&node.left) + 1;
            current = node.right.as_deref();
        } else {
            current = node.left.as_deref();
        }
    }
    count
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.pop()?;
        push_left_spine(&mut self.front, node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back.pop()?;
        push_right_spine(&mut self.back, node.left.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Keys and Values
// =============================================================================

/// An iterator over the keys of a [`FrozenMap`](crate::FrozenMap) in
/// ascending order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) const fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`FrozenMap`](crate::FrozenMap) in
/// ascending key order.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) const fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over the entries of a [`FrozenMap`](crate::FrozenMap).
///
/// Nodes may still be shared with other maps, so entries are cloned out of
/// them rather than moved.
pub struct IntoIter<K, V> {
    front: Vec<ReferenceCounter<Node<K, V>>>,
    back: Vec<ReferenceCounter<Node<K, V>>>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(root: Link<K, V>) -> Self {
        let remaining = size_of(&root);
        let mut front = Vec::new();
        let mut back = Vec::new();
        Self::descend_left(&mut front, root.clone());
        Self::descend_right(&mut back, root);
        Self {
            front,
            back,
            remaining,
        }
    }

    fn descend_left(stack: &mut Vec<ReferenceCounter<Node<K, V>>>, mut link: Link<K, V>) {
        while let Some(node) = link {
            link = node.left.clone();
            stack.push(node);
        }
    }

    fn descend_right(stack: &mut Vec<ReferenceCounter<Node<K, V>>>, mut link: Link<K, V>) {
        while let Some(node) = link {
            link = node.right.clone();
            stack.push(node);
        }
    }
}

impl<K: Clone, V: Clone> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.pop()?;
        Self::descend_left(&mut self.front, node.right.clone());
        self.remaining -= 1;
        Some((node.key.clone(), node.value.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back.pop()?;
        Self::descend_right(&mut self.back, node.left.clone());
        self.remaining -= 1;
        Some((node.key.clone(), node.value.clone()))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for IntoIter<K, V> {}

impl<K: Clone, V: Clone> FusedIterator for IntoIter<K, V> {}
