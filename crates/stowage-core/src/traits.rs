// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::alloc::Layout;
use core::ptr::NonNull;

/// Allocation capability injected into every stowage container.
///
/// Containers hold one implementor by value and route every allocation,
/// reallocation and release through it. Failure is reported as `None`;
/// containers translate it into [`StowageError::AllocFailed`](crate::StowageError::AllocFailed).
///
/// # Safety
///
/// Implementors must uphold the same contract as
/// [`GlobalAlloc`](core::alloc::GlobalAlloc):
///
/// - a returned pointer is valid for reads and writes of `layout.size()` bytes
///   and aligned to `layout.align()`;
/// - `allocate_zeroed` returns zero-filled memory;
/// - memory stays valid until passed to `deallocate` or `reallocate` on the
///   same allocator (or a clone of it).
///
/// Clones must be interchangeable: memory obtained from one clone may be
/// released through another.
pub unsafe trait RawAlloc: Clone {
    /// Allocates uninitialized memory for `layout`.
    ///
    /// Returns `None` on failure or when `layout` has zero size.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Allocates zero-filled memory for `layout`.
    ///
    /// Returns `None` on failure or when `layout` has zero size.
    fn allocate_zeroed(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Releases memory previously obtained from this allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this allocator for exactly `layout`
    /// and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Resizes a block to `new_size` bytes, preserving its prefix.
    ///
    /// On `None` the existing block is untouched and still owned by the caller.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this allocator for exactly `layout`,
    /// and `new_size` must be non-zero and not overflow `isize` when rounded
    /// up to `layout.align()`.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>>;

    /// Whether this allocator provides a true reallocate.
    ///
    /// When `false`, containers grow by allocate + copy + deallocate instead of
    /// calling [`RawAlloc::reallocate`].
    fn has_reallocate(&self) -> bool {
        true
    }
}
