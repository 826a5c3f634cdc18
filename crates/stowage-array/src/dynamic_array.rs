// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem;
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};

use stowage_core::{AllocatorContext, RawAlloc, StowageError};

/// A growable, contiguous array whose buffer comes from an injected allocator.
///
/// Invariants:
///
/// - `len <= capacity`;
/// - `capacity >= 1` after construction (only [`DynamicArray::shrink_to_fit`]
///   on an empty array brings it to zero);
/// - slots `0..len` are initialized, slots `len..capacity` are not.
///
/// Dropping the array drops its live elements and releases the buffer.
/// Anything those elements merely point to remains owned by the caller.
///
/// Zero-sized element types are rejected with [`StowageError::InvalidParam`].
///
/// # Example
///
/// ```rust
/// use stowage_array::DynamicArray;
/// use stowage_core::{AllocatorContext, StowageError};
///
/// fn example() -> Result<(), StowageError> {
///     let ctx = AllocatorContext::PLATFORM.without_reallocate();
///     let mut array = DynamicArray::new_in(0, ctx)?;
///     assert_eq!(array.capacity(), 1);
///
///     array.insert_at(0, 'b')?;
///     array.insert_at(0, 'a')?;
///     array.insert_at(2, 'c')?;
///     assert_eq!(array.as_slice(), &['a', 'b', 'c']);
///
///     assert_eq!(array.remove_at(1)?, 'b');
///     assert_eq!(array.as_slice(), &['a', 'c']);
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub struct DynamicArray<T, A: RawAlloc = AllocatorContext> {
    ptr: NonNull<T>,
    len: usize,
    cap: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

// SAFETY: the array uniquely owns its buffer; sending it sends the elements
// and the allocator along with it.
unsafe impl<T: Send, A: RawAlloc + Send> Send for DynamicArray<T, A> {}

// SAFETY: shared access only hands out `&T` and `&A`.
unsafe impl<T: Sync, A: RawAlloc + Sync> Sync for DynamicArray<T, A> {}

impl<T> DynamicArray<T> {
    /// Creates an array on the platform allocator.
    ///
    /// An `initial_capacity` of zero allocates room for one element.
    ///
    /// # Errors
    ///
    /// - [`StowageError::InvalidParam`] if `T` is zero-sized.
    /// - [`StowageError::AllocFailed`] if the buffer cannot be obtained.
    pub fn new(initial_capacity: usize) -> Result<Self, StowageError> {
        Self::new_in(initial_capacity, AllocatorContext::default())
    }
}

impl<T, A: RawAlloc> DynamicArray<T, A> {
    /// Creates an array whose memory comes from `alloc`.
    ///
    /// The buffer is obtained zero-filled. An `initial_capacity` of zero
    /// allocates room for one element.
    ///
    /// # Errors
    ///
    /// - [`StowageError::InvalidParam`] if `T` is zero-sized.
    /// - [`StowageError::AllocFailed`] if the buffer cannot be obtained.
    pub fn new_in(initial_capacity: usize, alloc: A) -> Result<Self, StowageError> {
        if mem::size_of::<T>() == 0 {
            return Err(StowageError::InvalidParam);
        }

        let cap = initial_capacity.max(1);
        let layout = Self::layout_for(cap)?;
        let ptr = alloc
            .allocate_zeroed(layout)
            .ok_or(StowageError::AllocFailed)?;

        Ok(Self {
            ptr: ptr.cast(),
            len: 0,
            cap,
            alloc,
            _marker: PhantomData,
        })
    }

    fn layout_for(capacity: usize) -> Result<Layout, StowageError> {
        Layout::array::<T>(capacity).map_err(|_| StowageError::AllocFailed)
    }

    /// Layout of the current buffer. Only meaningful while `cap > 0`.
    fn current_layout(&self) -> Layout {
        debug_assert!(self.cap > 0);
        // SAFETY (PRECONDITIONS ARE MET): the same layout was validated by
        // `layout_for` when the buffer of `cap` elements was obtained.
        unsafe {
            Layout::from_size_align_unchecked(mem::size_of::<T>() * self.cap, mem::align_of::<T>())
        }
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of element slots in the buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Returns `true` if the array holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the allocator this array was built with.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY (PRECONDITIONS ARE MET): slots 0..len are initialized; ptr is
        // dangling-but-aligned when len == 0.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Returns the live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY (PRECONDITIONS ARE MET): slots 0..len are initialized and
        // uniquely borrowed through &mut self.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Appends `value`, doubling the capacity first if the array is full.
    ///
    /// # Errors
    ///
    /// [`StowageError::AllocFailed`] if growth fails. The array is unchanged
    /// and `value` is dropped.
    pub fn push_back(&mut self, value: T) -> Result<(), StowageError> {
        if self.len == self.cap {
            self.grow()?;
        }

        // SAFETY (PRECONDITIONS ARE MET): len < cap, so slot `len` is in bounds
        // and uninitialized.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;

        Ok(())
    }

    /// Removes and returns the last element.
    ///
    /// The vacated slot is not cleared.
    ///
    /// # Errors
    ///
    /// [`StowageError::Empty`] if the array holds no elements.
    pub fn pop_back(&mut self) -> Result<T, StowageError> {
        if self.len == 0 {
            return Err(StowageError::Empty);
        }

        self.len -= 1;
        // SAFETY (PRECONDITIONS ARE MET): slot `len` was initialized and is now
        // outside the live range, so it is read exactly once.
        Ok(unsafe { self.ptr.as_ptr().add(self.len).read() })
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// [`StowageError::InvalidParam`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&T, StowageError> {
        self.as_slice()
            .get(index)
            .ok_or(StowageError::InvalidParam)
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// [`StowageError::InvalidParam`] if `index >= len()`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, StowageError> {
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(StowageError::InvalidParam)
    }

    /// Overwrites the element at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// [`StowageError::InvalidParam`] if `index >= len()`.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, StowageError> {
        let slot = self.get_mut(index)?;
        Ok(mem::replace(slot, value))
    }

    /// Returns the element at `index`, or `None` when out of range.
    pub fn peek(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Inserts `value` at `index`, shifting later elements one slot right.
    ///
    /// `index == len()` appends.
    ///
    /// # Errors
    ///
    /// - [`StowageError::InvalidParam`] if `index > len()`.
    /// - [`StowageError::AllocFailed`] if growth fails; the array is unchanged.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<(), StowageError> {
        if index > self.len {
            return Err(StowageError::InvalidParam);
        }

        if self.len == self.cap {
            self.grow()?;
        }

        // SAFETY (PRECONDITIONS ARE MET): index <= len < cap. The block move
        // shifts len - index initialized slots into index + 1..=len, which is
        // within capacity; slot `index` is then overwritten without drop.
        unsafe {
            let slot = self.ptr.as_ptr().add(index);
            if index < self.len {
                ptr::copy(slot, slot.add(1), self.len - index);
            }
            slot.write(value);
        }
        self.len += 1;

        Ok(())
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// one slot left.
    ///
    /// # Errors
    ///
    /// - [`StowageError::Empty`] if the array holds no elements.
    /// - [`StowageError::InvalidParam`] if `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> Result<T, StowageError> {
        if self.len == 0 {
            return Err(StowageError::Empty);
        }

        if index >= self.len {
            return Err(StowageError::InvalidParam);
        }

        // SAFETY (PRECONDITIONS ARE MET): index < len. The element is read out
        // once, then the len - index - 1 trailing slots are moved over it.
        let value = unsafe {
            let slot = self.ptr.as_ptr().add(index);
            let value = slot.read();
            ptr::copy(slot.add(1), slot, self.len - index - 1);
            value
        };
        self.len -= 1;

        Ok(value)
    }

    /// Resizes to `new_len`, filling new slots with clones of `value`.
    ///
    /// Grows the buffer to exactly `new_len` if needed. Shrinking drops the
    /// truncated elements and keeps the capacity.
    ///
    /// # Errors
    ///
    /// [`StowageError::AllocFailed`] if growth fails; the array is unchanged.
    pub fn resize(&mut self, new_len: usize, value: T) -> Result<(), StowageError>
    where
        T: Clone,
    {
        self.resize_with(new_len, || value.clone())
    }

    /// Resizes to `new_len`, filling new slots with values produced by `f`.
    ///
    /// # Errors
    ///
    /// [`StowageError::AllocFailed`] if growth fails; the array is unchanged.
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F) -> Result<(), StowageError>
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }

        self.reserve(new_len)?;

        while self.len < new_len {
            // SAFETY (PRECONDITIONS ARE MET): len < new_len <= cap.
            unsafe { self.ptr.as_ptr().add(self.len).write(f()) };
            self.len += 1;
        }

        Ok(())
    }

    /// Appends clones of every element in `items`.
    ///
    /// Reserves exactly the room needed (no doubling).
    ///
    /// # Errors
    ///
    /// [`StowageError::AllocFailed`] if growth fails; the array is unchanged.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<(), StowageError>
    where
        T: Clone,
    {
        let needed = self
            .len
            .checked_add(items.len())
            .ok_or(StowageError::AllocFailed)?;
        self.reserve(needed)?;

        for item in items {
            // SAFETY (PRECONDITIONS ARE MET): len < needed <= cap.
            unsafe { self.ptr.as_ptr().add(self.len).write(item.clone()) };
            self.len += 1;
        }

        Ok(())
    }

    /// Drops every element past `new_len`. No-op if `new_len >= len()`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }

        let tail_len = self.len - new_len;
        // Shorten first so a panicking destructor cannot cause a double drop.
        self.len = new_len;

        // SAFETY (PRECONDITIONS ARE MET): slots new_len..new_len + tail_len were
        // initialized and are no longer reachable.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.ptr.as_ptr().add(new_len), tail_len);
            ptr::drop_in_place(tail);
        }
    }

    /// Drops every element, keeping the buffer.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Ensures the buffer holds at least `new_capacity` elements.
    ///
    /// No-op if `new_capacity <= capacity()`. Otherwise the buffer grows to
    /// exactly `new_capacity`, through the allocator's reallocate when it has
    /// one and allocate + copy + deallocate when it does not.
    ///
    /// # Errors
    ///
    /// [`StowageError::AllocFailed`] if the allocator refuses; the array is unchanged.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<(), StowageError> {
        if new_capacity <= self.cap {
            return Ok(());
        }

        let new_layout = Self::layout_for(new_capacity)?;

        let new_ptr = if self.cap == 0 {
            self.alloc.allocate(new_layout)
        } else if self.alloc.has_reallocate() {
            // SAFETY (PRECONDITIONS ARE MET): ptr was obtained from alloc with
            // the current layout; new_layout.size() is non-zero and was
            // validated by Layout::array.
            unsafe {
                self.alloc
                    .reallocate(self.ptr.cast(), self.current_layout(), new_layout.size())
            }
        } else {
            self.relocate(new_layout)
        };

        let Some(new_ptr) = new_ptr else {
            tracing::debug!(
                capacity = self.cap,
                requested = new_capacity,
                "dynamic array growth failed"
            );
            return Err(StowageError::AllocFailed);
        };

        tracing::trace!(from = self.cap, to = new_capacity, "dynamic array grown");
        self.ptr = new_ptr.cast();
        self.cap = new_capacity;

        Ok(())
    }

    /// Shrinks the buffer to exactly `len()` elements.
    ///
    /// An empty array releases its buffer entirely and reports capacity zero.
    ///
    /// # Errors
    ///
    /// [`StowageError::AllocFailed`] if the smaller buffer cannot be obtained;
    /// the array is unchanged.
    pub fn shrink_to_fit(&mut self) -> Result<(), StowageError> {
        if self.len == self.cap {
            return Ok(());
        }

        if self.len == 0 {
            // SAFETY (PRECONDITIONS ARE MET): cap > len == 0, so ptr is a live
            // block of the current layout holding no initialized elements.
            unsafe { self.alloc.deallocate(self.ptr.cast(), self.current_layout()) };
            self.ptr = NonNull::dangling();
            self.cap = 0;
            tracing::trace!("dynamic array buffer released");
            return Ok(());
        }

        let new_layout = Self::layout_for(self.len)?;
        let new_ptr = self
            .relocate(new_layout)
            .ok_or(StowageError::AllocFailed)?;

        tracing::trace!(from = self.cap, to = self.len, "dynamic array shrunk");
        self.ptr = new_ptr.cast();
        self.cap = self.len;

        Ok(())
    }

    /// Moves the live elements into a fresh block of `new_layout` and frees
    /// the current one. On `None` nothing has changed.
    ///
    /// The caller must install the returned pointer as the new buffer.
    fn relocate(&self, new_layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(self.cap > 0);
        debug_assert!(new_layout.size() >= mem::size_of::<T>() * self.len);

        let new_ptr = self.alloc.allocate(new_layout)?;

        // SAFETY (PRECONDITIONS ARE MET): both callers only get here with
        // cap > 0, so the old block is live with the current layout. The new
        // block holds at least len elements and does not overlap it.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.cast::<T>().as_ptr(), self.len);
            self.alloc.deallocate(self.ptr.cast(), self.current_layout());
        }

        Some(new_ptr)
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self) -> Result<(), StowageError> {
        let doubled = self
            .cap
            .checked_mul(2)
            .ok_or(StowageError::AllocFailed)?;
        self.reserve(doubled.max(1))
    }
}

impl<T, A: RawAlloc> Drop for DynamicArray<T, A> {
    fn drop(&mut self) {
        // SAFETY (PRECONDITIONS ARE MET): slots 0..len are initialized and
        // dropped exactly once here.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len));
        }

        if self.cap > 0 {
            // SAFETY (PRECONDITIONS ARE MET): ptr is a live block of the current layout.
            unsafe { self.alloc.deallocate(self.ptr.cast(), self.current_layout()) };
        }
    }
}

impl<T, A: RawAlloc> Deref for DynamicArray<T, A> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, A: RawAlloc> DerefMut for DynamicArray<T, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: core::fmt::Debug, A: RawAlloc> core::fmt::Debug for DynamicArray<T, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DynamicArray")
            .field("len", &self.len)
            .field("capacity", &self.cap)
            .field("elements", &self.as_slice())
            .finish()
    }
}
