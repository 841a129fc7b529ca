//! Raw growable storage for the contiguous containers
//!
//! `RawBuffer` owns allocated-but-unconstructed storage for `cap` elements.
//! It tracks capacity only; logical length and element construction are the
//! caller's responsibility. Dropping a `RawBuffer` frees the allocation
//! without running element destructors.

use crate::error::{CoralError, Result};
use std::alloc::{self, Layout};
use std::mem;
use std::ptr::NonNull;

/// Allocation unit backing `FlexVec` and `SlotArena`
///
/// Invariant: `ptr` is valid for `cap` elements of `T` whenever `cap > 0`
/// and `T` is not zero-sized; otherwise `ptr` is dangling.
pub(crate) struct RawBuffer<T> {
    ptr: NonNull<T>,
    cap: usize,
}

impl<T> RawBuffer<T> {
    /// Create an empty buffer with no allocation
    #[inline]
    pub fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: if mem::size_of::<T>() == 0 { usize::MAX } else { 0 },
        }
    }

    /// Allocate storage for exactly `cap` elements
    pub fn allocate(cap: usize) -> Result<Self> {
        if cap == 0 || mem::size_of::<T>() == 0 {
            return Ok(Self::new());
        }
        if cap > Self::max_capacity() {
            return Err(CoralError::length_exceeded(cap, Self::max_capacity()));
        }

        let layout = Layout::array::<T>(cap)
            .map_err(|_| CoralError::allocation_failed(cap.saturating_mul(mem::size_of::<T>())))?;
        let raw = unsafe { alloc::alloc(layout) as *mut T };
        let ptr = NonNull::new(raw).ok_or_else(|| CoralError::allocation_failed(layout.size()))?;

        Ok(Self { ptr, cap })
    }

    /// Maximum number of elements a buffer of `T` can hold
    ///
    /// Bounded by the `isize::MAX` byte rule that all Rust allocations obey.
    #[inline]
    pub fn max_capacity() -> usize {
        if mem::size_of::<T>() == 0 {
            usize::MAX
        } else {
            isize::MAX as usize / mem::size_of::<T>()
        }
    }

    /// Number of elements this buffer can hold
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Pointer to the first element slot
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable pointer to the first element slot
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.cap > 0 && mem::size_of::<T>() > 0 {
            // Layout was validated when the buffer was allocated.
            let layout = Layout::array::<T>(self.cap).unwrap();
            unsafe {
                alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout);
            }
        }
    }
}

// Safety: RawBuffer owns its allocation exclusively; T placement is managed
// by the owning container.
unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        let buf: RawBuffer<u64> = RawBuffer::new();
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn test_allocate_and_free() {
        let buf: RawBuffer<u64> = RawBuffer::allocate(32).unwrap();
        assert_eq!(buf.capacity(), 32);
        assert!(!buf.as_ptr().is_null());
    }

    #[test]
    fn test_zero_capacity_allocate() {
        let buf: RawBuffer<u64> = RawBuffer::allocate(0).unwrap();
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn test_zero_sized_elements() {
        let buf: RawBuffer<()> = RawBuffer::allocate(1000).unwrap();
        assert_eq!(buf.capacity(), usize::MAX);
        assert_eq!(RawBuffer::<()>::max_capacity(), usize::MAX);
    }

    #[test]
    fn test_capacity_limit() {
        let max = RawBuffer::<u64>::max_capacity();
        assert!(RawBuffer::<u64>::allocate(max + 1).is_err());
    }
}
