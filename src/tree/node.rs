//! Tree node representation
//!
//! Nodes live in a [`SlotArena`](crate::memory) and link to each other by
//! [`NodeId`](crate::NodeId). `None` stands for a missing child, and the
//! root's missing parent is the past-the-end position.

use crate::memory::NodeId;

/// Node color for the balancing invariant
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Key/value payload plus structural links
pub(crate) struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub color: Color,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    /// Fresh unlinked node; new nodes always start red
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        }
    }
}
