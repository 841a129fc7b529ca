//! FlexVec: growable contiguous sequence
//!
//! The capacity/growth engine of the crate. Storage lives in a
//! [`RawBuffer`](crate::memory::RawBuffer) that tracks allocated capacity
//! only; `FlexVec` tracks the logical length and is the sole place where
//! elements are constructed and destroyed in place.
//!
//! Growth is on-demand doubling: capacity starts at zero and a reallocation
//! moves to `max(needed, 2 * capacity)`, so repeated `push` calls are
//! amortized O(1). Capacity never shrinks except through `swap` or
//! destruction.

use crate::error::{CoralError, Result};
use crate::memory::RawBuffer;
use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr;
use std::slice;

/// Growable contiguous sequence with explicit allocation errors
///
/// Mutating operations that may allocate return [`Result`]; element access
/// comes in a checked flavor (`at`) and the usual indexing flavor.
///
/// # Examples
///
/// ```rust
/// use coral::FlexVec;
///
/// let mut vec = FlexVec::new();
/// vec.push(42)?;
/// vec.push(84)?;
/// assert_eq!(vec.len(), 2);
/// assert_eq!(vec[0], 42);
/// # Ok::<(), coral::CoralError>(())
/// ```
pub struct FlexVec<T> {
    buf: RawBuffer<T>,
    len: usize,
}

impl<T> FlexVec<T> {
    /// Create a new empty vector with no allocation
    #[inline]
    pub fn new() -> Self {
        Self {
            buf: RawBuffer::new(),
            len: 0,
        }
    }

    /// Create a vector with the specified capacity
    pub fn with_capacity(cap: usize) -> Result<Self> {
        Ok(Self {
            buf: RawBuffer::allocate(cap)?,
            len: 0,
        })
    }

    /// Create a vector with `size` clones of `value`
    pub fn with_size(size: usize, value: T) -> Result<Self>
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity(size)?;
        vec.resize(size, value)?;
        Ok(vec)
    }

    /// Create a vector holding clones of the elements of `items`
    pub fn from_slice(items: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity(items.len())?;
        vec.extend_from_slice(items)?;
        Ok(vec)
    }

    /// Number of elements in the vector
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the vector is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the vector can hold without reallocating
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Maximum number of elements this vector can ever hold
    ///
    /// The smaller of the index range and what the allocator can represent
    /// for `T`. Requests beyond it fail with
    /// [`CoralError::LengthExceeded`].
    #[inline]
    pub fn max_size(&self) -> usize {
        RawBuffer::<T>::max_capacity()
    }

    /// Pointer to the underlying data
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Mutable pointer to the underlying data
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    /// View the vector as a slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // Safety: the first `len` slots are always initialized.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// View the vector as a mutable slice
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // Safety: the first `len` slots are always initialized.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    /// Get a reference to the element at `index`, if any
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Get a mutable reference to the element at `index`, if any
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Checked element access
    ///
    /// Fails with [`CoralError::OutOfRange`] when `index >= len()`.
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        self.get(index)
            .ok_or(CoralError::OutOfRange {
                index,
                size: self.len,
            })
    }

    /// Checked mutable element access
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let size = self.len;
        self.get_mut(index)
            .ok_or(CoralError::OutOfRange { index, size })
    }

    /// First element, if any
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Last element, if any
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Ensure capacity for at least `min_cap` elements
    ///
    /// No-op when `min_cap <= capacity()`. Otherwise moves the elements into
    /// a fresh buffer of at least `max(min_cap, 2 * capacity())` and frees
    /// the old one. Capacity never decreases.
    pub fn reserve(&mut self, min_cap: usize) -> Result<()> {
        if min_cap <= self.capacity() {
            return Ok(());
        }
        self.grow_to(min_cap)
    }

    /// Reallocate so that capacity is at least `min_cap`, with doubling
    fn grow_to(&mut self, min_cap: usize) -> Result<()> {
        let max = self.max_size();
        if min_cap > max {
            return Err(CoralError::length_exceeded(min_cap, max));
        }
        let target = min_cap.max(self.capacity().saturating_mul(2)).min(max);
        let mut fresh = RawBuffer::allocate(target)?;
        unsafe {
            // Safety: both buffers are distinct allocations and `len` slots
            // of the old buffer are initialized; the move transfers
            // ownership bitwise, so no destructor runs on the old slots.
            ptr::copy_nonoverlapping(self.buf.as_ptr(), fresh.as_mut_ptr(), self.len);
        }
        self.buf = fresh;
        Ok(())
    }

    /// Append an element to the end of the vector
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.len == self.capacity() {
            let needed = self
                .len
                .checked_add(1)
                .ok_or(CoralError::LengthExceeded {
                    requested: usize::MAX,
                    max: self.max_size(),
                })?;
            self.grow_to(needed)?;
        }
        unsafe {
            ptr::write(self.buf.as_mut_ptr().add(self.len), value);
        }
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last element
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            Some(unsafe { ptr::read(self.buf.as_ptr().add(self.len)) })
        }
    }

    /// Insert `value` at `index`, shifting the tail right
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.len {
            return Err(CoralError::out_of_range(index, self.len));
        }
        if self.len == self.capacity() {
            self.grow_to(self.len + 1)?;
        }
        unsafe {
            let p = self.buf.as_mut_ptr().add(index);
            ptr::copy(p, p.add(1), self.len - index);
            ptr::write(p, value);
        }
        self.len += 1;
        Ok(())
    }

    /// Remove and return the element at `index`, shifting the tail left
    pub fn remove(&mut self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(CoralError::out_of_range(index, self.len));
        }
        unsafe {
            let p = self.buf.as_mut_ptr().add(index);
            let value = ptr::read(p);
            ptr::copy(p.add(1), p, self.len - index - 1);
            self.len -= 1;
            Ok(value)
        }
    }

    /// Insert `count` clones of `value` at `index`
    pub fn insert_fill(&mut self, index: usize, count: usize, value: T) -> Result<()>
    where
        T: Clone,
    {
        if index > self.len {
            return Err(CoralError::out_of_range(index, self.len));
        }
        let new_len = self.checked_new_len(count)?;
        if count == 0 {
            return Ok(());
        }
        self.reserve(new_len)?;
        unsafe {
            let p = self.buf.as_mut_ptr().add(index);
            ptr::copy(p, p.add(count), self.len - index);
            // A clone panic must not let the destructor walk the gap: keep
            // `len` at the initialized prefix while filling, so the shifted
            // tail is leaked rather than dropped through stale slots.
            self.len = index;
            for k in 0..count {
                ptr::write(p.add(k), value.clone());
                self.len += 1;
            }
        }
        self.len = new_len;
        Ok(())
    }

    /// Insert clones of `items` at `index` with the strong guarantee
    ///
    /// The spliced sequence is built in a fresh buffer on the side. If any
    /// clone panics, everything constructed so far is destroyed and the
    /// fresh buffer is freed before the panic resumes; the vector's length,
    /// contents, and capacity are exactly as before the call.
    pub fn insert_slice(&mut self, index: usize, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        if index > self.len {
            return Err(CoralError::out_of_range(index, self.len));
        }
        let new_len = self.checked_new_len(items.len())?;
        if items.is_empty() {
            return Ok(());
        }
        let target = new_len
            .max(self.capacity().saturating_mul(2))
            .min(self.max_size());
        let mut fresh: RawBuffer<T> = RawBuffer::allocate(target)?;

        struct BuildGuard<T> {
            ptr: *mut T,
            built: usize,
        }
        impl<T> Drop for BuildGuard<T> {
            fn drop(&mut self) {
                // Safety: exactly `built` leading slots were initialized.
                unsafe {
                    ptr::drop_in_place(slice::from_raw_parts_mut(self.ptr, self.built));
                }
            }
        }

        unsafe {
            let dst = fresh.as_mut_ptr();
            let src = self.buf.as_ptr();
            let mut guard = BuildGuard { ptr: dst, built: 0 };
            for i in 0..index {
                ptr::write(dst.add(guard.built), (*src.add(i)).clone());
                guard.built += 1;
            }
            for item in items {
                ptr::write(dst.add(guard.built), item.clone());
                guard.built += 1;
            }
            for i in index..self.len {
                ptr::write(dst.add(guard.built), (*src.add(i)).clone());
                guard.built += 1;
            }
            mem::forget(guard);
            // The new sequence is fully built; retire the old elements.
            ptr::drop_in_place(self.as_mut_slice());
        }
        self.buf = fresh;
        self.len = new_len;
        Ok(())
    }

    /// Remove the elements in `[start, end)`, shifting the tail left
    pub fn remove_range(&mut self, start: usize, end: usize) -> Result<()> {
        if start > end {
            return Err(CoralError::out_of_range(start, end));
        }
        if end > self.len {
            return Err(CoralError::out_of_range(end, self.len));
        }
        let count = end - start;
        if count == 0 {
            return Ok(());
        }
        unsafe {
            let p = self.buf.as_mut_ptr();
            ptr::drop_in_place(slice::from_raw_parts_mut(p.add(start), count));
            ptr::copy(p.add(end), p.add(start), self.len - end);
        }
        self.len -= count;
        Ok(())
    }

    /// Resize to `new_len` elements, filling new slots with clones of `value`
    ///
    /// Shrinking destroys the tail; capacity is never reduced.
    pub fn resize(&mut self, new_len: usize, value: T) -> Result<()>
    where
        T: Clone,
    {
        if new_len > self.len {
            self.reserve(new_len)?;
            unsafe {
                for i in self.len..new_len {
                    ptr::write(self.buf.as_mut_ptr().add(i), value.clone());
                    self.len += 1;
                }
            }
        } else {
            self.truncate(new_len);
        }
        Ok(())
    }

    /// Shorten the vector to `new_len` elements, destroying the tail
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let count = self.len - new_len;
        // Update len first so a panicking destructor cannot expose the
        // half-destroyed tail.
        self.len = new_len;
        unsafe {
            ptr::drop_in_place(slice::from_raw_parts_mut(
                self.buf.as_mut_ptr().add(new_len),
                count,
            ));
        }
    }

    /// Destroy all elements, keeping the buffer
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Replace the contents with `count` clones of `value`
    pub fn assign_fill(&mut self, count: usize, value: T) -> Result<()>
    where
        T: Clone,
    {
        self.clear();
        self.resize(count, value)
    }

    /// Replace the contents with clones of the elements of `items`
    pub fn assign_from_slice(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        self.clear();
        self.extend_from_slice(items)
    }

    /// Append clones of the elements of `items`
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        let new_len = self.checked_new_len(items.len())?;
        self.reserve(new_len)?;
        unsafe {
            for item in items {
                ptr::write(self.buf.as_mut_ptr().add(self.len), item.clone());
                self.len += 1;
            }
        }
        Ok(())
    }

    /// Append every element of an iterator with a known length
    pub fn extend<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = iter.into_iter();
        let new_len = self.checked_new_len(iter.len())?;
        self.reserve(new_len)?;
        for item in iter {
            // Capacity is already reserved, so this cannot reallocate.
            unsafe {
                ptr::write(self.buf.as_mut_ptr().add(self.len), item);
            }
            self.len += 1;
        }
        Ok(())
    }

    /// Exchange contents with another vector in O(1)
    ///
    /// Pointer-only exchange; no element is moved or cloned.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    fn checked_new_len(&self, added: usize) -> Result<usize> {
        let new_len = self
            .len
            .checked_add(added)
            .ok_or(CoralError::LengthExceeded {
                requested: usize::MAX,
                max: self.max_size(),
            })?;
        if new_len > self.max_size() {
            return Err(CoralError::length_exceeded(new_len, self.max_size()));
        }
        Ok(new_len)
    }
}

impl<T> Default for FlexVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for FlexVec<T> {
    fn drop(&mut self) {
        self.clear();
        // RawBuffer frees the storage.
    }
}

impl<T> Deref for FlexVec<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for FlexVec<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T> Index<usize> for FlexVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for FlexVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.as_mut_slice()[index]
    }
}

impl<T: fmt::Debug> fmt::Debug for FlexVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Clone> Clone for FlexVec<T> {
    fn clone(&self) -> Self {
        // Deep copy into a fresh buffer sized to the source's capacity.
        let mut vec = Self::with_capacity(self.capacity()).expect("clone: allocation failed");
        vec.extend_from_slice(self.as_slice())
            .expect("clone: length within reserved capacity");
        vec
    }
}

impl<T: PartialEq> PartialEq for FlexVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for FlexVec<T> {}

impl<T: PartialOrd> PartialOrd for FlexVec<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for FlexVec<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<'a, T> IntoIterator for &'a FlexVec<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut FlexVec<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

// Safety: FlexVec owns its elements exactly like a boxed slice would.
unsafe impl<T: Send> Send for FlexVec<T> {}
unsafe impl<T: Sync> Sync for FlexVec<T> {}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::FlexVec;
    use serde::de::{Deserialize, Deserializer, Error, SeqAccess, Visitor};
    use serde::ser::{Serialize, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    impl<T: Serialize> Serialize for FlexVec<T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.as_slice())
        }
    }

    struct FlexVecVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for FlexVecVisitor<T> {
        type Value = FlexVec<T>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a sequence")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = match seq.size_hint() {
                Some(n) => FlexVec::with_capacity(n).map_err(A::Error::custom)?,
                None => FlexVec::new(),
            };
            while let Some(item) = seq.next_element()? {
                vec.push(item).map_err(A::Error::custom)?;
            }
            Ok(vec)
        }
    }

    impl<'de, T: Deserialize<'de>> Deserialize<'de> for FlexVec<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_seq(FlexVecVisitor(PhantomData))
        }
    }
}
