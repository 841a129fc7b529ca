//! Stack: LIFO adapter over [`FlexVec`]
//!
//! A thin wrapper that exposes push/pop/top over an owned sequence. It adds
//! no invariants of its own; comparisons delegate element-wise to the
//! underlying sequence.

use crate::containers::FlexVec;
use crate::error::Result;
use std::cmp::Ordering;
use std::fmt;

/// LIFO stack backed by a [`FlexVec`]
///
/// All operations are O(1) except when the underlying sequence must grow.
///
/// # Examples
///
/// ```rust
/// use coral::Stack;
///
/// let mut stack = Stack::new();
/// stack.push(1)?;
/// stack.push(2)?;
/// assert_eq!(stack.top(), Some(&2));
/// assert_eq!(stack.pop(), Some(2));
/// assert_eq!(stack.len(), 1);
/// # Ok::<(), coral::CoralError>(())
/// ```
#[derive(Clone, Default)]
pub struct Stack<T> {
    items: FlexVec<T>,
}

impl<T> Stack<T> {
    /// Create a new empty stack
    #[inline]
    pub fn new() -> Self {
        Self {
            items: FlexVec::new(),
        }
    }

    /// Push a value on top of the stack
    #[inline]
    pub fn push(&mut self, value: T) -> Result<()> {
        self.items.push(value)
    }

    /// Remove and return the top value, if any
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Borrow the top value, if any
    #[inline]
    pub fn top(&self) -> Option<&T> {
        self.items.back()
    }

    /// Mutably borrow the top value, if any
    #[inline]
    pub fn top_mut(&mut self) -> Option<&mut T> {
        let len = self.items.len();
        if len == 0 {
            None
        } else {
            self.items.get_mut(len - 1)
        }
    }

    /// Number of values on the stack
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the stack is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every value
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Consume the stack and return the underlying sequence
    ///
    /// Elements are ordered bottom to top.
    #[inline]
    pub fn into_inner(self) -> FlexVec<T> {
        self.items
    }
}

impl<T> From<FlexVec<T>> for Stack<T> {
    /// Adopt an existing sequence; its last element becomes the top
    fn from(items: FlexVec<T>) -> Self {
        Self { items }
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for Stack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for Stack<T> {}

impl<T: PartialOrd> PartialOrd for Stack<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.items.partial_cmp(&other.items)
    }
}

impl<T: Ord> Ord for Stack<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.items.cmp(&other.items)
    }
}
