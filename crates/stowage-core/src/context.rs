// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use alloc::alloc as platform;
use core::alloc::Layout;
use core::ptr::NonNull;

use crate::traits::RawAlloc;

/// Allocates uninitialized memory. Same signature as [`alloc::alloc::alloc`].
pub type AllocateFn = unsafe fn(Layout) -> *mut u8;

/// Allocates zero-filled memory. Same signature as [`alloc::alloc::alloc_zeroed`].
pub type AllocateZeroedFn = unsafe fn(Layout) -> *mut u8;

/// Releases memory. Same signature as [`alloc::alloc::dealloc`].
pub type DeallocateFn = unsafe fn(*mut u8, Layout);

/// Resizes a block. Same signature as [`alloc::alloc::realloc`].
pub type ReallocateFn = unsafe fn(*mut u8, Layout, usize) -> *mut u8;

/// A bundle of four optional allocation functions.
///
/// Each [`RawAlloc`] method calls the matching slot when it is set and the
/// platform allocator otherwise. Containers copy the context at construction;
/// the functions themselves are plain `fn` pointers and must stay valid for
/// as long as any container holding the context is alive.
///
/// [`RawAlloc::has_reallocate`] reports whether the reallocate slot is set.
/// Containers built on a context without one emulate growth with
/// allocate + copy + deallocate.
///
/// # Example
///
/// ```rust
/// use stowage_core::{AllocatorContext, RawAlloc};
///
/// assert!(AllocatorContext::PLATFORM.has_reallocate());
/// assert!(!AllocatorContext::empty().has_reallocate());
/// ```
#[derive(Clone, Copy)]
pub struct AllocatorContext {
    allocate: Option<AllocateFn>,
    allocate_zeroed: Option<AllocateZeroedFn>,
    deallocate: Option<DeallocateFn>,
    reallocate: Option<ReallocateFn>,
}

impl AllocatorContext {
    /// Every slot bound to the platform allocator.
    pub const PLATFORM: Self = Self {
        allocate: Some(platform::alloc),
        allocate_zeroed: Some(platform::alloc_zeroed),
        deallocate: Some(platform::dealloc),
        reallocate: Some(platform::realloc),
    };

    /// A context with no slot set.
    ///
    /// Every operation falls back to the platform allocator, except that
    /// containers emulate reallocation because no reallocate is declared.
    pub const fn empty() -> Self {
        Self {
            allocate: None,
            allocate_zeroed: None,
            deallocate: None,
            reallocate: None,
        }
    }

    /// Overrides the allocate slot.
    ///
    /// # Safety
    ///
    /// `f` must behave like [`GlobalAlloc::alloc`](core::alloc::GlobalAlloc::alloc),
    /// and memory it returns must be releasable through this context's
    /// deallocate slot.
    pub const unsafe fn with_allocate(mut self, f: AllocateFn) -> Self {
        self.allocate = Some(f);
        self
    }

    /// Overrides the zero-allocate slot.
    ///
    /// # Safety
    ///
    /// `f` must behave like
    /// [`GlobalAlloc::alloc_zeroed`](core::alloc::GlobalAlloc::alloc_zeroed),
    /// and memory it returns must be releasable through this context's
    /// deallocate slot.
    pub const unsafe fn with_allocate_zeroed(mut self, f: AllocateZeroedFn) -> Self {
        self.allocate_zeroed = Some(f);
        self
    }

    /// Overrides the deallocate slot.
    ///
    /// # Safety
    ///
    /// `f` must accept every block produced by this context's allocate,
    /// zero-allocate and reallocate slots.
    pub const unsafe fn with_deallocate(mut self, f: DeallocateFn) -> Self {
        self.deallocate = Some(f);
        self
    }

    /// Overrides the reallocate slot.
    ///
    /// # Safety
    ///
    /// `f` must behave like [`GlobalAlloc::realloc`](core::alloc::GlobalAlloc::realloc)
    /// for blocks produced by this context.
    pub const unsafe fn with_reallocate(mut self, f: ReallocateFn) -> Self {
        self.reallocate = Some(f);
        self
    }

    /// Clears the reallocate slot so containers fall back to allocate + copy + deallocate.
    pub const fn without_reallocate(mut self) -> Self {
        self.reallocate = None;
        self
    }
}

impl Default for AllocatorContext {
    fn default() -> Self {
        Self::PLATFORM
    }
}

impl core::fmt::Debug for AllocatorContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AllocatorContext")
            .field("allocate", &self.allocate.is_some())
            .field("allocate_zeroed", &self.allocate_zeroed.is_some())
            .field("deallocate", &self.deallocate.is_some())
            .field("reallocate", &self.reallocate.is_some())
            .finish()
    }
}

#[cold]
fn report_failure(op: &'static str, layout: Layout) {
    tracing::debug!(op, size = layout.size(), align = layout.align(), "allocator returned null");
}

// SAFETY: every slot is either a platform function or one installed through an
// `unsafe` builder whose caller vouched for the GlobalAlloc contract.
unsafe impl RawAlloc for AllocatorContext {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }

        let f = self.allocate.unwrap_or(platform::alloc);
        // SAFETY (PRECONDITIONS ARE MET): layout has non-zero size.
        let ptr = NonNull::new(unsafe { f(layout) });
        if ptr.is_none() {
            report_failure("allocate", layout);
        }

        ptr
    }

    fn allocate_zeroed(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }

        let f = self.allocate_zeroed.unwrap_or(platform::alloc_zeroed);
        // SAFETY (PRECONDITIONS ARE MET): layout has non-zero size.
        let ptr = NonNull::new(unsafe { f(layout) });
        if ptr.is_none() {
            report_failure("allocate_zeroed", layout);
        }

        ptr
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let f = self.deallocate.unwrap_or(platform::dealloc);
        // SAFETY: caller guarantees ptr came from this context for layout.
        unsafe { f(ptr.as_ptr(), layout) }
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        let f = self.reallocate.unwrap_or(platform::realloc);
        // SAFETY: caller guarantees ptr came from this context for layout and
        // that new_size is valid for layout.align().
        let new_ptr = NonNull::new(unsafe { f(ptr.as_ptr(), layout, new_size) });
        if new_ptr.is_none() {
            report_failure("reallocate", layout);
        }

        new_ptr
    }

    fn has_reallocate(&self) -> bool {
        self.reallocate.is_some()
    }
}
