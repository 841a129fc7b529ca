//! Slot arena: node allocation for the tree containers
//!
//! A free-list slab parameterized directly over the node type. Slots are
//! addressed by stable [`NodeId`] indices, so structural links between nodes
//! survive growth of the backing storage. A freed slot may be reused by a
//! later insertion, but only after its node has been moved out.

use crate::error::{CoralError, Result};
use crate::memory::RawBuffer;
use crate::FlexVec;
use std::ops::{Index, IndexMut};

/// Stable handle to an arena slot
///
/// Handles stay valid across unrelated insertions and removals; a handle is
/// invalidated only when its own slot is removed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        NodeId(index as u32)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

enum Slot<N> {
    Occupied(N),
    Vacant(Option<NodeId>),
}

/// Free-list slab arena over a contiguous slot vector
pub(crate) struct SlotArena<N> {
    slots: FlexVec<Slot<N>>,
    free: Option<NodeId>,
    live: usize,
}

impl<N> SlotArena<N> {
    /// Create an empty arena with no allocation
    pub fn new() -> Self {
        Self {
            slots: FlexVec::new(),
            free: None,
            live: 0,
        }
    }

    /// Number of live nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check whether the arena holds no live nodes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Maximum number of slots the arena can address
    pub fn max_slots() -> usize {
        (u32::MAX as usize).min(RawBuffer::<Slot<N>>::max_capacity())
    }

    /// Store a node, reusing a freed slot when one is available
    pub fn insert(&mut self, node: N) -> Result<NodeId> {
        let id = match self.free {
            Some(id) => {
                let slot = &mut self.slots[id.index()];
                match std::mem::replace(slot, Slot::Occupied(node)) {
                    Slot::Vacant(next) => self.free = next,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                }
                id
            }
            None => {
                if self.slots.len() >= Self::max_slots() {
                    return Err(CoralError::length_exceeded(
                        self.slots.len() + 1,
                        Self::max_slots(),
                    ));
                }
                let before = self.slots.capacity();
                self.slots.push(Slot::Occupied(node))?;
                if self.slots.capacity() != before {
                    log::trace!("slot arena grew to {} slots", self.slots.capacity());
                }
                NodeId::from_index(self.slots.len() - 1)
            }
        };
        self.live += 1;
        Ok(id)
    }

    /// Move the node out of `id` and put the slot on the free list
    pub fn remove(&mut self, id: NodeId) -> N {
        let slot = &mut self.slots[id.index()];
        match std::mem::replace(slot, Slot::Vacant(self.free)) {
            Slot::Occupied(node) => {
                self.free = Some(id);
                self.live -= 1;
                node
            }
            Slot::Vacant(next) => {
                *slot = Slot::Vacant(next);
                panic!("remove of vacant arena slot")
            }
        }
    }

    /// Borrow the node at `id`, if the slot is live
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&N> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Mutably borrow the node at `id`, if the slot is live
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Drop every node and reset the free list; keeps no allocation alive
    pub fn clear(&mut self) {
        let mut empty = FlexVec::new();
        self.slots.swap(&mut empty);
        self.free = None;
        self.live = 0;
    }
}

impl<N> Index<NodeId> for SlotArena<N> {
    type Output = N;

    #[inline]
    fn index(&self, id: NodeId) -> &N {
        self.get(id).expect("stale node id")
    }
}

impl<N> IndexMut<NodeId> for SlotArena<N> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut N {
        self.get_mut(id).expect("stale node id")
    }
}
