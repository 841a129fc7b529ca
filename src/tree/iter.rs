//! In-order iterators over the tree-backed containers

use super::node::Node;
use super::{LessThan, RbTree};
use crate::memory::NodeId;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::Bound;

/// Double-ended cursor over `[front, back]`, exhausted when `remaining == 0`
struct Cursor {
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl Cursor {
    fn full<K, V, C>(tree: &RbTree<K, V, C>) -> Self {
        Self {
            front: tree.first,
            back: tree.last(),
            remaining: tree.len(),
        }
    }

    fn empty() -> Self {
        Self {
            front: None,
            back: None,
            remaining: 0,
        }
    }

    fn advance<K, V, C>(&mut self, tree: &RbTree<K, V, C>) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.remaining -= 1;
        self.front = tree.successor(id);
        Some(id)
    }

    fn advance_back<K, V, C>(&mut self, tree: &RbTree<K, V, C>) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.remaining -= 1;
        self.back = tree.predecessor(id);
        Some(id)
    }
}

/// Borrowing in-order iterator over `(&K, &V)` pairs
pub struct Iter<'a, K, V, C> {
    tree: &'a RbTree<K, V, C>,
    cursor: Cursor,
}

impl<'a, K, V, C> Iter<'a, K, V, C> {
    pub(crate) fn new(tree: &'a RbTree<K, V, C>) -> Self {
        Self {
            tree,
            cursor: Cursor::full(tree),
        }
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor.advance(self.tree)?;
        let node = &self.tree.arena[id];
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining, Some(self.cursor.remaining))
    }
}

impl<K, V, C> DoubleEndedIterator for Iter<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.cursor.advance_back(self.tree)?;
        let node = &self.tree.arena[id];
        Some((&node.key, &node.value))
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> {}
impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}

impl<K, V, C> Clone for Iter<'_, K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            cursor: Cursor {
                front: self.cursor.front,
                back: self.cursor.back,
                remaining: self.cursor.remaining,
            },
        }
    }
}

/// Borrowing in-order iterator over `(&K, &mut V)` pairs
///
/// Holds a raw pointer to the tree so each yielded `&mut V` can carry the
/// full iterator lifetime; the exclusive borrow taken at construction keeps
/// the tree structurally frozen for as long as the iterator lives.
pub struct IterMut<'a, K, V, C> {
    tree: *mut RbTree<K, V, C>,
    cursor: Cursor,
    _marker: PhantomData<&'a mut RbTree<K, V, C>>,
}

impl<'a, K, V, C> IterMut<'a, K, V, C> {
    pub(crate) fn new(tree: &'a mut RbTree<K, V, C>) -> Self {
        let cursor = Cursor::full(tree);
        Self {
            tree,
            cursor,
            _marker: PhantomData,
        }
    }

    fn entry(&mut self, id: NodeId) -> (&'a K, &'a mut V) {
        // SAFETY: the pointer came from the exclusive borrow in `new` and
        // outlives `self` via `_marker`; in-order traversal visits each
        // node once, so no two yielded references alias.
        let node: &'a mut Node<K, V> = unsafe { &mut (&mut (*self.tree).arena)[id] };
        (&node.key, &mut node.value)
    }
}

impl<'a, K, V, C> Iterator for IterMut<'a, K, V, C> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: as in `entry`; a shared view decoupled from `self` so the
        // cursor can advance through it.
        let tree = unsafe { &*self.tree };
        let id = self.cursor.advance(tree)?;
        Some(self.entry(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining, Some(self.cursor.remaining))
    }
}

impl<K, V, C> DoubleEndedIterator for IterMut<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        // SAFETY: as in `next`.
        let tree = unsafe { &*self.tree };
        let id = self.cursor.advance_back(tree)?;
        Some(self.entry(id))
    }
}

impl<K, V, C> ExactSizeIterator for IterMut<'_, K, V, C> {}
impl<K, V, C> FusedIterator for IterMut<'_, K, V, C> {}

unsafe impl<K: Send, V: Send, C: Send> Send for IterMut<'_, K, V, C> {}
unsafe impl<K: Sync, V: Sync, C: Sync> Sync for IterMut<'_, K, V, C> {}

/// Iterator over keys in ascending order
pub struct Keys<'a, K, V, C> {
    inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Keys<'a, K, V, C> {
    pub(crate) fn new(tree: &'a RbTree<K, V, C>) -> Self {
        Self {
            inner: Iter::new(tree),
        }
    }
}

impl<'a, K, V, C> Iterator for Keys<'a, K, V, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Keys<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V, C> ExactSizeIterator for Keys<'_, K, V, C> {}
impl<K, V, C> FusedIterator for Keys<'_, K, V, C> {}

/// Iterator over values in ascending key order
pub struct Values<'a, K, V, C> {
    inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Values<'a, K, V, C> {
    pub(crate) fn new(tree: &'a RbTree<K, V, C>) -> Self {
        Self {
            inner: Iter::new(tree),
        }
    }
}

impl<'a, K, V, C> Iterator for Values<'a, K, V, C> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Values<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V, C> ExactSizeIterator for Values<'_, K, V, C> {}
impl<K, V, C> FusedIterator for Values<'_, K, V, C> {}

/// In-order iterator over a key sub-range
pub struct Range<'a, K, V, C> {
    tree: &'a RbTree<K, V, C>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    done: bool,
}

impl<'a, K, V, C> Range<'a, K, V, C> {
    pub(crate) fn new<R, Q>(tree: &'a RbTree<K, V, C>, range: R) -> Self
    where
        R: std::ops::RangeBounds<Q>,
        Q: ?Sized,
        K: std::borrow::Borrow<Q>,
        C: LessThan<Q>,
    {
        let front = match range.start_bound() {
            Bound::Unbounded => tree.first,
            Bound::Included(k) => tree.lower_bound(k),
            Bound::Excluded(k) => tree.upper_bound(k),
        };
        let back = match range.end_bound() {
            Bound::Unbounded => tree.last(),
            Bound::Included(k) => match tree.upper_bound(k) {
                Some(id) => tree.predecessor(id),
                None => tree.last(),
            },
            Bound::Excluded(k) => match tree.lower_bound(k) {
                Some(id) => tree.predecessor(id),
                None => tree.last(),
            },
        };
        // Inverted or disjoint bounds produce an empty iterator.
        let done = match (front, back) {
            (Some(f), Some(b)) => {
                let fk = tree.key(f).borrow();
                let bk = tree.key(b).borrow();
                tree.cmp.less(bk, fk)
            }
            _ => true,
        };
        Self {
            tree,
            front,
            back,
            done,
        }
    }
}

impl<'a, K, V, C> Iterator for Range<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let id = self.front?;
        if Some(id) == self.back {
            self.done = true;
        } else {
            self.front = self.tree.successor(id);
        }
        let node = &self.tree.arena[id];
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V, C> DoubleEndedIterator for Range<'a, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let id = self.back?;
        if Some(id) == self.front {
            self.done = true;
        } else {
            self.back = self.tree.predecessor(id);
        }
        let node = &self.tree.arena[id];
        Some((&node.key, &node.value))
    }
}

impl<K, V, C> FusedIterator for Range<'_, K, V, C> {}

impl<K, V, C> Clone for Range<'_, K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            done: self.done,
        }
    }
}

/// Consuming in-order iterator over `(K, V)` pairs
///
/// The visit order is captured up front so draining the arena cannot
/// disturb the traversal.
pub struct IntoIter<K, V> {
    arena: crate::memory::SlotArena<Node<K, V>>,
    order: std::vec::IntoIter<NodeId>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new<C>(tree: RbTree<K, V, C>) -> Self {
        let mut order = Vec::with_capacity(tree.len());
        let mut cur = tree.first;
        while let Some(id) = cur {
            order.push(id);
            cur = tree.successor(id);
        }
        Self {
            arena: tree.arena,
            order: order.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        let node = self.arena.remove(id);
        Some((node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.order.next_back()?;
        let node = self.arena.remove(id);
        Some((node.key, node.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}
