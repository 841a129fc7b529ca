//! Arena-backed red-black tree and the ordered map built on it
//!
//! The tree keeps the classic invariants: black root, no red node with a red
//! child, and the same black count on every root-to-leaf path, which bounds
//! every single-element operation at O(log n). Nodes are slots in a
//! [`SlotArena`](crate::memory) addressed by stable [`NodeId`] handles;
//! structural rewiring moves indices, never payloads, so surviving handles
//! stay valid across unrelated mutations.

mod iter;
mod map;
mod node;

pub use iter::{IntoIter, Iter, IterMut, Keys, Range, Values};
pub use map::OrdMap;

use crate::error::Result;
use crate::memory::{NodeId, SlotArena};
use node::{Color, Node};
use std::borrow::Borrow;

/// Strict-weak-order comparison predicate over keys
///
/// Equivalence is derived, not supplied: two keys are equivalent when
/// neither orders before the other. The predicate must stay consistent for
/// the lifetime of any container using it.
pub trait LessThan<K: ?Sized> {
    /// Does `a` order strictly before `b`?
    fn less(&self, a: &K, b: &K) -> bool;

    /// Derived equivalence: `!less(a, b) && !less(b, a)`
    #[inline]
    fn equiv(&self, a: &K, b: &K) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

/// The `Ord`-derived comparator used by default
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> LessThan<K> for Natural {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

/// Outcome of a descent looking for a key's position
enum Search {
    /// An equivalent key already exists at this node
    Found(NodeId),
    /// No equivalent key; a new node would hang off this parent
    /// (`None` when the tree is empty)
    Leaf(Option<NodeId>),
}

/// Red-black tree core shared by the ordered containers
pub(crate) struct RbTree<K, V, C> {
    pub(crate) arena: SlotArena<Node<K, V>>,
    pub(crate) root: Option<NodeId>,
    /// Cached minimum for O(1) access to the first entry
    pub(crate) first: Option<NodeId>,
    pub(crate) cmp: C,
}

impl<K, V, C> RbTree<K, V, C> {
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            arena: SlotArena::new(),
            root: None,
            first: None,
            cmp,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        SlotArena::<Node<K, V>>::max_slots()
    }

    #[inline]
    fn key(&self, id: NodeId) -> &K {
        &self.arena[id].key
    }

    #[inline]
    fn color(&self, id: NodeId) -> Color {
        self.arena[id].color
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        self.arena[id].color = color;
    }

    #[inline]
    fn is_red(&self, id: Option<NodeId>) -> bool {
        matches!(id, Some(id) if self.color(id) == Color::Red)
    }

    #[inline]
    fn is_black(&self, id: Option<NodeId>) -> bool {
        !self.is_red(id)
    }

    #[inline]
    pub(crate) fn left(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].left
    }

    #[inline]
    pub(crate) fn right(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].right
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent
    }

    /// Leftmost node of the subtree rooted at `id`
    pub(crate) fn min_node(&self, mut id: NodeId) -> NodeId {
        while let Some(l) = self.left(id) {
            id = l;
        }
        id
    }

    /// Rightmost node of the subtree rooted at `id`
    pub(crate) fn max_node(&self, mut id: NodeId) -> NodeId {
        while let Some(r) = self.right(id) {
            id = r;
        }
        id
    }

    /// Largest node, if any
    pub(crate) fn last(&self) -> Option<NodeId> {
        self.root.map(|r| self.max_node(r))
    }

    /// In-order successor; `None` past the maximum
    ///
    /// Leftmost node of the right subtree when one exists, otherwise the
    /// nearest ancestor of which `id` is a left descendant.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(r) = self.right(id) {
            return Some(self.min_node(r));
        }
        let mut cur = id;
        while let Some(p) = self.parent(cur) {
            if Some(cur) == self.left(p) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    /// In-order predecessor; `None` before the minimum
    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(l) = self.left(id) {
            return Some(self.max_node(l));
        }
        let mut cur = id;
        while let Some(p) = self.parent(cur) {
            if Some(cur) == self.right(p) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.first = None;
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }
}

impl<K, V, C> RbTree<K, V, C> {
    /// Insert a key/value pair, rejecting duplicates
    ///
    /// Returns the node holding the key and whether a new node was created.
    /// When an equivalent key exists the tree is untouched and the offered
    /// pair is dropped.
    pub fn insert(&mut self, key: K, value: V) -> Result<(NodeId, bool)>
    where
        C: LessThan<K>,
    {
        match self.search_parent(&key) {
            Search::Found(id) => Ok((id, false)),
            Search::Leaf(parent) => Ok((self.attach(parent, key, value)?, true)),
        }
    }

    /// Insert next to `hint` when possible, or fall back to a full search
    ///
    /// A correct hint (the key's immediate neighbor position) makes the
    /// insertion O(1) amortized. A wrong or stale hint silently degrades to
    /// the ordinary O(log n) descent; it never corrupts the tree and never
    /// reports an error.
    pub fn insert_hint(&mut self, hint: NodeId, key: K, value: V) -> Result<NodeId>
    where
        C: LessThan<K>,
    {
        if self.arena.get(hint).is_some() {
            if let Some(parent) = self.hint_parent(hint, &key) {
                if self.cmp.equiv(&key, self.key(parent)) {
                    return Ok(parent);
                }
                return self.attach(Some(parent), key, value);
            }
        }
        match self.search_parent(&key) {
            Search::Found(id) => Ok(id),
            Search::Leaf(parent) => self.attach(parent, key, value),
        }
    }

    /// O(1) check whether `hint` can act as the attachment parent for `key`
    fn hint_parent(&self, hint: NodeId, key: &K) -> Option<NodeId>
    where
        C: LessThan<K>,
    {
        if self.cmp.less(key, self.key(hint)) {
            if self.left(hint).is_some() {
                return None;
            }
            match self.predecessor(hint) {
                None => Some(hint),
                Some(prev) if self.cmp.less(self.key(prev), key) => Some(hint),
                _ => None,
            }
        } else if self.right(hint).is_none() {
            match self.successor(hint) {
                None => Some(hint),
                Some(next) if self.cmp.less(key, self.key(next)) => Some(hint),
                _ => None,
            }
        } else {
            None
        }
    }

    fn search_parent(&self, key: &K) -> Search
    where
        C: LessThan<K>,
    {
        let mut cur = self.root;
        let mut last = None;
        while let Some(id) = cur {
            last = Some(id);
            if self.cmp.less(key, self.key(id)) {
                cur = self.left(id);
            } else if self.cmp.less(self.key(id), key) {
                cur = self.right(id);
            } else {
                return Search::Found(id);
            }
        }
        Search::Leaf(last)
    }

    /// Splice a new red leaf under `parent` and rebalance
    fn attach(&mut self, parent: Option<NodeId>, key: K, value: V) -> Result<NodeId>
    where
        C: LessThan<K>,
    {
        let id = self.arena.insert(Node::new(key, value))?;
        self.arena[id].parent = parent;
        match parent {
            None => self.root = Some(id),
            Some(p) => {
                if self.cmp.less(self.key(id), self.key(p)) {
                    self.arena[p].left = Some(id);
                } else {
                    self.arena[p].right = Some(id);
                }
            }
        }
        self.insert_fixup(id);
        match self.first {
            Some(f) if !self.cmp.less(self.key(id), self.key(f)) => {}
            _ => self.first = Some(id),
        }
        Ok(id)
    }

    /// Restore the color invariants after splicing in a red leaf
    ///
    /// Per side: a red uncle recolors and moves the violation up; an inner
    /// (triangle) child is first rotated into the outer position; an outer
    /// (line) child recolors and rotates the grandparent, which terminates.
    fn insert_fixup(&mut self, mut x: NodeId) {
        loop {
            let Some(p) = self.parent(x) else { break };
            if self.color(p) == Color::Black {
                break;
            }
            let Some(g) = self.parent(p) else { break };
            if Some(p) == self.left(g) {
                match self.right(g) {
                    Some(u) if self.color(u) == Color::Red => {
                        self.set_color(p, Color::Black);
                        self.set_color(u, Color::Black);
                        self.set_color(g, Color::Red);
                        x = g;
                    }
                    _ => {
                        if Some(x) == self.right(p) {
                            self.rotate_left(p);
                            self.set_color(x, Color::Black);
                        } else {
                            self.set_color(p, Color::Black);
                        }
                        self.set_color(g, Color::Red);
                        self.rotate_right(g);
                        break;
                    }
                }
            } else {
                match self.left(g) {
                    Some(u) if self.color(u) == Color::Red => {
                        self.set_color(p, Color::Black);
                        self.set_color(u, Color::Black);
                        self.set_color(g, Color::Red);
                        x = g;
                    }
                    _ => {
                        if Some(x) == self.left(p) {
                            self.rotate_right(p);
                            self.set_color(x, Color::Black);
                        } else {
                            self.set_color(p, Color::Black);
                        }
                        self.set_color(g, Color::Red);
                        self.rotate_left(g);
                        break;
                    }
                }
            }
        }
        if let Some(r) = self.root {
            self.set_color(r, Color::Black);
        }
    }

    /// Remove the node at `id`, returning its payload and in-order successor
    ///
    /// The handle `id` becomes stale; every other handle stays valid because
    /// the successor splice rewires links instead of moving payloads.
    pub fn remove_at(&mut self, id: NodeId) -> (K, V, Option<NodeId>) {
        let succ = self.successor(id);
        if self.first == Some(id) {
            self.first = succ;
        }
        self.unlink(id);
        let node = self.arena.remove(id);
        (node.key, node.value, succ)
    }

    /// Remove by key; at most one entry can match
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        let id = self.find(key)?;
        let (k, v, _) = self.remove_at(id);
        Some((k, v))
    }

    /// Detach `id` from the tree structure without touching the arena
    fn unlink(&mut self, z: NodeId) {
        let removed_color;
        let fix_child;
        let fix_parent;
        match (self.left(z), self.right(z)) {
            (None, r) => {
                removed_color = self.color(z);
                fix_child = r;
                fix_parent = self.parent(z);
                self.transplant(z, r);
            }
            (l, None) => {
                removed_color = self.color(z);
                fix_child = l;
                fix_parent = self.parent(z);
                self.transplant(z, l);
            }
            (Some(zl), Some(zr)) => {
                // Two children: splice the in-order successor into z's
                // place. Its color drives the fixup; it then takes z's
                // color so black heights through this position survive.
                let y = self.min_node(zr);
                removed_color = self.color(y);
                fix_child = self.right(y);
                if self.parent(y) == Some(z) {
                    fix_parent = Some(y);
                } else {
                    fix_parent = self.parent(y);
                    self.transplant(y, self.right(y));
                    self.arena[y].right = Some(zr);
                    self.arena[zr].parent = Some(y);
                }
                self.transplant(z, Some(y));
                self.arena[y].left = Some(zl);
                self.arena[zl].parent = Some(y);
                let z_color = self.color(z);
                self.set_color(y, z_color);
            }
        }
        if removed_color == Color::Black {
            self.remove_fixup(fix_child, fix_parent);
        }
    }

    /// Replace the subtree rooted at `u` with the one rooted at `v`
    fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
        let up = self.parent(u);
        match up {
            None => self.root = v,
            Some(p) => {
                if Some(u) == self.left(p) {
                    self.arena[p].left = v;
                } else {
                    self.arena[p].right = v;
                }
            }
        }
        if let Some(v) = v {
            self.arena[v].parent = up;
        }
    }

    /// Restore the color invariants after removing a black node
    ///
    /// `x` is the child that took the removed node's place (possibly
    /// absent) and `parent` its current parent; the pair stands in for the
    /// doubly-black position. Four cases per side: red sibling, all-black
    /// sibling, near-red/far-black sibling, far-red sibling.
    fn remove_fixup(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
        while x != self.root && self.is_black(x) {
            let Some(p) = parent else { break };
            let step = if x == self.left(p) {
                self.remove_fixup_left(x, p)
            } else {
                self.remove_fixup_right(x, p)
            };
            x = step.0;
            parent = step.1;
        }
        if let Some(id) = x {
            self.set_color(id, Color::Black);
        }
    }

    fn remove_fixup_left(
        &mut self,
        x: Option<NodeId>,
        parent: NodeId,
    ) -> (Option<NodeId>, Option<NodeId>) {
        debug_assert!(x == self.left(parent));
        let Some(mut w) = self.right(parent) else {
            return (self.root, None);
        };
        if self.is_red(Some(w)) {
            self.set_color(w, Color::Black);
            self.set_color(parent, Color::Red);
            self.rotate_left(parent);
            match self.right(parent) {
                Some(nw) => w = nw,
                None => return (self.root, None),
            }
        }
        if self.is_black(self.left(w)) && self.is_black(self.right(w)) {
            self.set_color(w, Color::Red);
            return (Some(parent), self.parent(parent));
        }
        if self.is_black(self.right(w)) {
            if let Some(wl) = self.left(w) {
                self.set_color(wl, Color::Black);
            }
            self.set_color(w, Color::Red);
            self.rotate_right(w);
            match self.right(parent) {
                Some(nw) => w = nw,
                None => return (self.root, None),
            }
        }
        let parent_color = self.color(parent);
        self.set_color(w, parent_color);
        self.set_color(parent, Color::Black);
        if let Some(wr) = self.right(w) {
            self.set_color(wr, Color::Black);
        }
        self.rotate_left(parent);
        (self.root, None)
    }

    fn remove_fixup_right(
        &mut self,
        x: Option<NodeId>,
        parent: NodeId,
    ) -> (Option<NodeId>, Option<NodeId>) {
        debug_assert!(x == self.right(parent));
        let Some(mut w) = self.left(parent) else {
            return (self.root, None);
        };
        if self.is_red(Some(w)) {
            self.set_color(w, Color::Black);
            self.set_color(parent, Color::Red);
            self.rotate_right(parent);
            match self.left(parent) {
                Some(nw) => w = nw,
                None => return (self.root, None),
            }
        }
        if self.is_black(self.right(w)) && self.is_black(self.left(w)) {
            self.set_color(w, Color::Red);
            return (Some(parent), self.parent(parent));
        }
        if self.is_black(self.left(w)) {
            if let Some(wr) = self.right(w) {
                self.set_color(wr, Color::Black);
            }
            self.set_color(w, Color::Red);
            self.rotate_left(w);
            match self.left(parent) {
                Some(nw) => w = nw,
                None => return (self.root, None),
            }
        }
        let parent_color = self.color(parent);
        self.set_color(w, parent_color);
        self.set_color(parent, Color::Black);
        if let Some(wl) = self.left(w) {
            self.set_color(wl, Color::Black);
        }
        self.rotate_right(parent);
        (self.root, None)
    }

    fn rotate_left(&mut self, x: NodeId) {
        let child = self.right(x).expect("rotate_left without right child");
        let child_left = self.left(child);
        self.arena[x].right = child_left;
        if let Some(cl) = child_left {
            self.arena[cl].parent = Some(x);
        }
        let parent = self.parent(x);
        self.arena[child].parent = parent;
        match parent {
            None => self.root = Some(child),
            Some(p) => {
                if Some(x) == self.left(p) {
                    self.arena[p].left = Some(child);
                } else {
                    self.arena[p].right = Some(child);
                }
            }
        }
        self.arena[child].left = Some(x);
        self.arena[x].parent = Some(child);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let child = self.left(x).expect("rotate_right without left child");
        let child_right = self.right(child);
        self.arena[x].left = child_right;
        if let Some(cr) = child_right {
            self.arena[cr].parent = Some(x);
        }
        let parent = self.parent(x);
        self.arena[child].parent = parent;
        match parent {
            None => self.root = Some(child),
            Some(p) => {
                if Some(x) == self.left(p) {
                    self.arena[p].left = Some(child);
                } else {
                    self.arena[p].right = Some(child);
                }
            }
        }
        self.arena[child].right = Some(x);
        self.arena[x].parent = Some(child);
    }

    /// Locate a key's node
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        let mut cur = self.root;
        while let Some(id) = cur {
            if self.cmp.less(key, self.key(id).borrow()) {
                cur = self.left(id);
            } else if self.cmp.less(self.key(id).borrow(), key) {
                cur = self.right(id);
            } else {
                return Some(id);
            }
        }
        None
    }

    /// First node whose key does not order before `key`; `None` means end
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        let mut cur = self.root;
        let mut bound = None;
        while let Some(id) = cur {
            if !self.cmp.less(self.key(id).borrow(), key) {
                bound = Some(id);
                cur = self.left(id);
            } else {
                cur = self.right(id);
            }
        }
        bound
    }

    /// First node whose key orders strictly after `key`; `None` means end
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        let mut cur = self.root;
        let mut bound = None;
        while let Some(id) = cur {
            if self.cmp.less(key, self.key(id).borrow()) {
                bound = Some(id);
                cur = self.left(id);
            } else {
                cur = self.right(id);
            }
        }
        bound
    }

    /// `[lower_bound, upper_bound)` as a pair of positions, single descent
    pub fn equal_range_bounds<Q: ?Sized>(&self, key: &Q) -> (Option<NodeId>, Option<NodeId>)
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        let mut cur = self.root;
        let mut upper = None;
        while let Some(id) = cur {
            if self.cmp.less(key, self.key(id).borrow()) {
                upper = Some(id);
                cur = self.left(id);
            } else if self.cmp.less(self.key(id).borrow(), key) {
                cur = self.right(id);
            } else {
                let ub = match self.right(id) {
                    Some(r) => Some(self.min_node(r)),
                    None => upper,
                };
                return (Some(id), ub);
            }
        }
        (upper, upper)
    }

    /// Verify the balancing and ordering invariants; for tests and debugging
    pub fn validate(&self) -> std::result::Result<(), String>
    where
        C: LessThan<K>,
    {
        if let Some(r) = self.root {
            if self.color(r) == Color::Red {
                return Err("red root".into());
            }
            if self.parent(r).is_some() {
                return Err("root has a parent".into());
            }
            self.validate_node(r)?;
        }
        let expected_first = self.root.map(|r| self.min_node(r));
        if self.first != expected_first {
            return Err("stale minimum cache".into());
        }
        let mut walked = 0;
        let mut prev: Option<NodeId> = None;
        let mut cur = self.first;
        while let Some(id) = cur {
            if let Some(p) = prev {
                if !self.cmp.less(self.key(p), self.key(id)) {
                    return Err("keys not strictly ascending".into());
                }
            }
            prev = Some(id);
            walked += 1;
            cur = self.successor(id);
        }
        if walked != self.len() {
            return Err(format!(
                "size mismatch: walked {}, recorded {}",
                walked,
                self.len()
            ));
        }
        Ok(())
    }

    /// Returns the black height of the subtree, counting absent children as 1
    fn validate_node(&self, id: NodeId) -> std::result::Result<usize, String> {
        if self.color(id) == Color::Red
            && (self.is_red(self.left(id)) || self.is_red(self.right(id)))
        {
            return Err("red node with red child".into());
        }
        let lh = match self.left(id) {
            Some(l) => {
                if self.parent(l) != Some(id) {
                    return Err("broken parent link".into());
                }
                self.validate_node(l)?
            }
            None => 1,
        };
        let rh = match self.right(id) {
            Some(r) => {
                if self.parent(r) != Some(id) {
                    return Err("broken parent link".into());
                }
                self.validate_node(r)?
            }
            None => 1,
        };
        if lh != rh {
            return Err("black height mismatch".into());
        }
        Ok(lh + usize::from(self.color(id) == Color::Black))
    }
}

impl<K: Clone, V: Clone, C: LessThan<K> + Clone> Clone for RbTree<K, V, C> {
    /// Deep copy via an in-order hinted rebuild, O(n)
    fn clone(&self) -> Self {
        let mut tree = Self::with_comparator(self.cmp.clone());
        let mut hint: Option<NodeId> = None;
        let mut cur = self.first;
        while let Some(id) = cur {
            let node = &self.arena[id];
            let new_id = match hint {
                None => {
                    tree.insert(node.key.clone(), node.value.clone())
                        .expect("clone: allocation failed")
                        .0
                }
                Some(h) => tree
                    .insert_hint(h, node.key.clone(), node.value.clone())
                    .expect("clone: allocation failed"),
            };
            hint = Some(new_id);
            cur = self.successor(id);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_from(keys: &[i32]) -> RbTree<i32, i32, Natural> {
        let mut tree = RbTree::with_comparator(Natural);
        for &k in keys {
            tree.insert(k, k * 10).unwrap();
        }
        tree.validate().unwrap();
        tree
    }

    fn in_order_keys(tree: &RbTree<i32, i32, Natural>) -> Vec<i32> {
        let mut keys = Vec::new();
        let mut cur = tree.first;
        while let Some(id) = cur {
            keys.push(tree.arena[id].key);
            cur = tree.successor(id);
        }
        keys
    }

    #[test]
    fn test_insert_in_order_iteration() {
        let tree = tree_from(&[5, 3, 8, 1, 4]);
        assert_eq!(in_order_keys(&tree), vec![1, 3, 4, 5, 8]);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut tree = tree_from(&[1, 2, 3]);
        let (id, inserted) = tree.insert(2, 999).unwrap();
        assert!(!inserted);
        assert_eq!(tree.arena[id].value, 20);
        assert_eq!(tree.len(), 3);
        tree.validate().unwrap();
    }

    #[test]
    fn test_invariants_ascending_and_descending() {
        let mut tree = RbTree::with_comparator(Natural);
        for k in 0..200 {
            tree.insert(k, k).unwrap();
            tree.validate().unwrap();
        }
        for k in (200..400).rev() {
            tree.insert(k, k).unwrap();
            tree.validate().unwrap();
        }
        assert_eq!(tree.len(), 400);
    }

    #[test]
    fn test_remove_by_key() {
        let mut tree = tree_from(&[1, 3, 4, 5, 8]);
        assert_eq!(tree.remove(&3), Some((3, 30)));
        tree.validate().unwrap();
        assert_eq!(in_order_keys(&tree), vec![1, 4, 5, 8]);
        assert_eq!(tree.remove(&3), None);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_remove_all_permutation() {
        let keys = [7, 2, 9, 1, 5, 8, 11, 4, 3, 10, 6, 0];
        let mut tree = tree_from(&keys);
        for &k in &keys {
            assert!(tree.remove(&k).is_some());
            tree.validate().unwrap();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.first, None);
        assert_eq!(tree.root, None);
    }

    #[test]
    fn test_remove_minimum_updates_first() {
        let mut tree = tree_from(&[5, 3, 8]);
        tree.remove(&3).unwrap();
        assert_eq!(tree.first.map(|id| tree.arena[id].key), Some(5));
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_at_returns_successor() {
        let mut tree = tree_from(&[1, 3, 5]);
        let id = tree.find(&3).unwrap();
        let (k, v, succ) = tree.remove_at(id);
        assert_eq!((k, v), (3, 30));
        assert_eq!(succ.map(|id| tree.arena[id].key), Some(5));

        let id = tree.find(&5).unwrap();
        let (.., succ) = tree.remove_at(id);
        assert_eq!(succ, None);
        tree.validate().unwrap();
    }

    #[test]
    fn test_surviving_handles_stay_valid() {
        let mut tree = tree_from(&[1, 3, 4, 5, 8]);
        let keep: Vec<NodeId> = [1, 4, 5, 8].iter().map(|k| tree.find(k).unwrap()).collect();
        tree.remove(&3).unwrap();
        for (id, expected) in keep.iter().zip([1, 4, 5, 8]) {
            assert_eq!(tree.arena[*id].key, expected);
        }
    }

    #[test]
    fn test_insert_hint_fast_path_and_fallback() {
        let mut tree = RbTree::with_comparator(Natural);
        let (mut hint, _) = tree.insert(0, 0).unwrap();
        for k in 1..100 {
            hint = tree.insert_hint(hint, k, k).unwrap();
        }
        tree.validate().unwrap();
        assert_eq!(tree.len(), 100);

        // Wrong hint: silently degrades to a full search.
        let wrong = tree.find(&1).unwrap();
        let id = tree.insert_hint(wrong, 1000, 1000).unwrap();
        assert_eq!(tree.arena[id].key, 1000);
        tree.validate().unwrap();

        // Hint at an existing key returns the existing node.
        let existing = tree.insert_hint(wrong, 1, 999).unwrap();
        assert_eq!(tree.arena[existing].value, 1);
        assert_eq!(tree.len(), 101);
    }

    #[test]
    fn test_bounds() {
        let tree = tree_from(&[10, 20, 30]);
        let key = |id: Option<NodeId>| id.map(|id| tree.arena[id].key);

        assert_eq!(key(tree.lower_bound(&10)), Some(10));
        assert_eq!(key(tree.lower_bound(&15)), Some(20));
        assert_eq!(key(tree.upper_bound(&10)), Some(20));
        assert_eq!(key(tree.upper_bound(&30)), None);
        assert_eq!(key(tree.lower_bound(&31)), None);
        assert_eq!(key(tree.lower_bound(&0)), Some(10));

        let (lo, hi) = tree.equal_range_bounds(&20);
        assert_eq!((key(lo), key(hi)), (Some(20), Some(30)));
        let (lo, hi) = tree.equal_range_bounds(&15);
        assert_eq!(lo, hi);
        assert_eq!(key(lo), Some(20));
    }

    #[test]
    fn test_equal_range_matches_bounds() {
        let tree = tree_from(&[2, 4, 6, 8]);
        for probe in 0..10 {
            let (lo, hi) = tree.equal_range_bounds(&probe);
            assert_eq!(lo, tree.lower_bound(&probe));
            assert_eq!(hi, tree.upper_bound(&probe));
        }
    }

    #[test]
    fn test_clone_deep_copy() {
        let tree = tree_from(&[5, 1, 9, 3, 7]);
        let mut copy = tree.clone();
        copy.validate().unwrap();
        assert_eq!(in_order_keys(&copy), in_order_keys(&tree));

        copy.remove(&5).unwrap();
        assert_eq!(in_order_keys(&tree), vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn test_swap_and_clear() {
        let mut a = tree_from(&[1, 2]);
        let mut b = tree_from(&[9]);
        a.swap(&mut b);
        assert_eq!(in_order_keys(&a), vec![9]);
        assert_eq!(in_order_keys(&b), vec![1, 2]);

        b.clear();
        assert!(b.is_empty());
        b.validate().unwrap();
    }
}
