//! Ordered associative container over the red-black tree core

use super::iter::{IntoIter, Iter, IterMut, Keys, Range, Values};
use super::{LessThan, Natural, RbTree};
use crate::error::{CoralError, Result};
use crate::memory::NodeId;
use std::borrow::Borrow;
use std::fmt;
use std::ops::RangeBounds;

/// Sorted key/value map with stable node handles
///
/// Keys are unique under the comparator `C` and iteration yields entries in
/// ascending key order. Lookup, insertion, and removal are O(log n);
/// entries are addressable by [`NodeId`] handles that survive every
/// mutation except the removal of their own node.
///
/// # Examples
///
/// ```
/// use coral::OrdMap;
///
/// let mut map = OrdMap::new();
/// map.insert(3, "three")?;
/// map.insert(1, "one")?;
/// map.insert(2, "two")?;
///
/// let keys: Vec<i32> = map.keys().copied().collect();
/// assert_eq!(keys, vec![1, 2, 3]);
/// # Ok::<(), coral::CoralError>(())
/// ```
pub struct OrdMap<K, V, C = Natural> {
    tree: RbTree<K, V, C>,
}

impl<K, V> OrdMap<K, V, Natural> {
    /// Create an empty map ordered by `K`'s natural ordering
    pub fn new() -> Self {
        Self {
            tree: RbTree::with_comparator(Natural),
        }
    }
}

impl<K, V, C> OrdMap<K, V, C> {
    /// Create an empty map ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            tree: RbTree::with_comparator(cmp),
        }
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Is the map empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Largest number of entries the map can hold
    #[inline]
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Remove every entry, keeping existing handles invalid afterwards
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchange the contents of two maps without moving entries
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// Entry with the smallest key
    pub fn first(&self) -> Option<(&K, &V)> {
        let id = self.tree.first?;
        let node = &self.tree.arena[id];
        Some((&node.key, &node.value))
    }

    /// Entry with the largest key
    pub fn last(&self) -> Option<(&K, &V)> {
        let id = self.tree.last()?;
        let node = &self.tree.arena[id];
        Some((&node.key, &node.value))
    }

    /// Entry behind `id`, or `None` when the handle is stale
    pub fn node(&self, id: NodeId) -> Option<(&K, &V)> {
        let node = self.tree.arena.get(id)?;
        Some((&node.key, &node.value))
    }

    /// Entry behind `id` with the value mutable
    pub fn node_mut(&mut self, id: NodeId) -> Option<(&K, &mut V)> {
        let node = self.tree.arena.get_mut(id)?;
        Some((&node.key, &mut node.value))
    }

    /// Borrowing iterator over `(&K, &V)` in ascending key order
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter::new(&self.tree)
    }

    /// Borrowing iterator with mutable values
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, C> {
        IterMut::new(&mut self.tree)
    }

    /// Iterator over keys in ascending order
    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys::new(&self.tree)
    }

    /// Iterator over values in ascending key order
    pub fn values(&self) -> Values<'_, K, V, C> {
        Values::new(&self.tree)
    }
}

impl<K, V, C> OrdMap<K, V, C> {
    /// Insert a pair, keeping the existing entry on a duplicate key
    ///
    /// Returns the handle of the entry holding the key and `true` when a
    /// new entry was created. A duplicate leaves the map untouched and
    /// drops the offered pair.
    ///
    /// # Errors
    ///
    /// [`CoralError::LengthExceeded`] when the map is at [`max_size`], or
    /// [`CoralError::AllocationFailed`] when node storage cannot grow.
    ///
    /// [`max_size`]: OrdMap::max_size
    pub fn insert(&mut self, key: K, value: V) -> Result<(NodeId, bool)>
    where
        C: LessThan<K>,
    {
        self.tree.insert(key, value)
    }

    /// Insert next to `hint`, the handle of the key's expected neighbor
    ///
    /// A correct hint makes the insertion O(1) amortized; a wrong or stale
    /// one silently falls back to the ordinary search. Returns the handle
    /// of the entry holding the key, existing or new.
    pub fn insert_hint(&mut self, hint: NodeId, key: K, value: V) -> Result<NodeId>
    where
        C: LessThan<K>,
    {
        self.tree.insert_hint(hint, key, value)
    }

    /// Value for `key`, or insert `V::default()` and return that
    pub fn get_or_default(&mut self, key: K) -> Result<&mut V>
    where
        V: Default,
        C: LessThan<K>,
    {
        let (id, _) = self.tree.insert(key, V::default())?;
        Ok(&mut self.tree.arena[id].value)
    }

    /// Remove by key, returning the detached value
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        self.tree.remove(key).map(|(_, v)| v)
    }

    /// Remove by key, returning both halves of the entry
    pub fn remove_entry<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        self.tree.remove(key)
    }

    /// Remove the entry behind `id`, returning it and the next handle
    ///
    /// The returned handle addresses the in-order successor, `None` when
    /// the removed entry was the largest. `id` must be a live handle of
    /// this map.
    ///
    /// # Panics
    ///
    /// Panics when `id` is stale.
    pub fn remove_at(&mut self, id: NodeId) -> (K, V, Option<NodeId>) {
        self.tree.remove_at(id)
    }
}

impl<K, V, C> OrdMap<K, V, C> {
    /// Value for `key`
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        let id = self.tree.find(key)?;
        Some(&self.tree.arena[id].value)
    }

    /// Mutable value for `key`
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        let id = self.tree.find(key)?;
        Some(&mut self.tree.arena[id].value)
    }

    /// Value for `key`, reporting a missing key as an error
    pub fn at<Q: ?Sized>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        self.get(key).ok_or(CoralError::MissingKey)
    }

    /// Mutable value for `key`, reporting a missing key as an error
    pub fn at_mut<Q: ?Sized>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        self.get_mut(key).ok_or(CoralError::MissingKey)
    }

    /// Does an entry with this key exist?
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        self.tree.find(key).is_some()
    }

    /// Number of entries matching `key`: 0 or 1, keys being unique
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        usize::from(self.contains_key(key))
    }

    /// Handle of the entry with this key
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        self.tree.find(key)
    }

    /// Handle of the first entry whose key does not order before `key`
    pub fn lower_bound<Q: ?Sized>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        self.tree.lower_bound(key)
    }

    /// Handle of the first entry whose key orders strictly after `key`
    pub fn upper_bound<Q: ?Sized>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        self.tree.upper_bound(key)
    }

    /// `(lower_bound, upper_bound)` computed in a single descent
    pub fn equal_range<Q: ?Sized>(&self, key: &Q) -> (Option<NodeId>, Option<NodeId>)
    where
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        self.tree.equal_range_bounds(key)
    }

    /// In-order iterator over the entries whose keys fall in `range`
    ///
    /// Inverted bounds yield an empty iterator.
    pub fn range<R, Q>(&self, range: R) -> Range<'_, K, V, C>
    where
        R: RangeBounds<Q>,
        Q: ?Sized,
        K: Borrow<Q>,
        C: LessThan<Q>,
    {
        Range::new(&self.tree, range)
    }

    /// Check the internal ordering and balancing invariants
    ///
    /// Intended for tests and debugging; O(n).
    pub fn validate(&self) -> std::result::Result<(), String>
    where
        C: LessThan<K>,
    {
        self.tree.validate()
    }
}

impl<K, V, C: Default> Default for OrdMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: Clone, V: Clone, C: LessThan<K> + Clone> Clone for OrdMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OrdMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for OrdMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for OrdMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for OrdMap<K, V, C> {
    /// Lexicographic over the entry sequences
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord, C> Ord for OrdMap<K, V, C> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K, V, C> IntoIterator for OrdMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.tree)
    }
}

impl<'a, K, V, C> IntoIterator for &'a OrdMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut OrdMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, C: Default + LessThan<K>> FromIterator<(K, V)> for OrdMap<K, V, C> {
    /// Collects pairs, keeping the first occurrence of each key
    ///
    /// # Panics
    ///
    /// Panics when node storage cannot grow.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: LessThan<K>> Extend<(K, V)> for OrdMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.tree
                .insert(k, v)
                .expect("extend: node allocation failed");
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::marker::PhantomData;

    impl<K: Serialize, V: Serialize, C> Serialize for OrdMap<K, V, C> {
        fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (k, v) in self.iter() {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
    }

    impl<'de, K, V, C> Deserialize<'de> for OrdMap<K, V, C>
    where
        K: Deserialize<'de>,
        V: Deserialize<'de>,
        C: Default + LessThan<K>,
    {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> std::result::Result<Self, D::Error> {
            struct MapVisitor<K, V, C>(PhantomData<(K, V, C)>);

            impl<'de, K, V, C> Visitor<'de> for MapVisitor<K, V, C>
            where
                K: Deserialize<'de>,
                V: Deserialize<'de>,
                C: Default + LessThan<K>,
            {
                type Value = OrdMap<K, V, C>;

                fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str("a map")
                }

                fn visit_map<A: MapAccess<'de>>(
                    self,
                    mut access: A,
                ) -> std::result::Result<Self::Value, A::Error> {
                    let mut map = OrdMap::default();
                    while let Some((k, v)) = access.next_entry()? {
                        map.insert(k, v).map_err(serde::de::Error::custom)?;
                    }
                    Ok(map)
                }
            }

            deserializer.deserialize_map(MapVisitor(PhantomData))
        }
    }
}
