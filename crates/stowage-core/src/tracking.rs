// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use alloc::rc::Rc;
use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

use crate::context::AllocatorContext;
use crate::traits::RawAlloc;

/// Failure injection for [`TrackingAllocator`].
///
/// This is only available with the `test-utils` feature and allows users
/// to exercise allocation-failure paths in code built on stowage containers.
///
/// The behaviour is sticky: once set, it remains active until changed.
///
/// # Example
///
/// ```rust
/// // test-utils feature required in dev-dependencies
/// use core::alloc::Layout;
/// use stowage_core::{AllocBehaviour, RawAlloc, TrackingAllocator};
///
/// let alloc = TrackingAllocator::new();
/// alloc.change_behaviour(AllocBehaviour::FailAtAllocate);
///
/// assert!(alloc.allocate(Layout::new::<u64>()).is_none());
///
/// alloc.change_behaviour(AllocBehaviour::None);
/// let ptr = alloc.allocate(Layout::new::<u64>()).expect("allocation failed");
/// unsafe { alloc.deallocate(ptr, Layout::new::<u64>()) };
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AllocBehaviour {
    /// Normal behaviour - no injected failures.
    #[default]
    None,
    /// Every `allocate()` and `allocate_zeroed()` call fails.
    FailAtAllocate,
    /// Every `reallocate()` call fails.
    FailAtReallocate,
    /// The first `n` successful requests (allocate, zero-allocate or
    /// reallocate) go through, every later one fails.
    FailAfter(usize),
}

#[derive(Debug, Default)]
struct TrackingState {
    behaviour: Cell<AllocBehaviour>,
    allocations: Cell<usize>,
    deallocations: Cell<usize>,
    reallocations: Cell<usize>,
    live_blocks: Cell<usize>,
    hide_reallocate: Cell<bool>,
}

impl TrackingState {
    fn bump(cell: &Cell<usize>) {
        cell.set(cell.get() + 1);
    }

    fn requests(&self) -> usize {
        self.allocations.get() + self.reallocations.get()
    }

    fn budget_exhausted(&self) -> bool {
        matches!(self.behaviour.get(), AllocBehaviour::FailAfter(n) if self.requests() >= n)
    }
}

/// Allocator that delegates to the platform and records its traffic.
///
/// Clones share their counters, so a test can hand one clone to a container
/// and inspect the other.
///
/// # Example
///
/// ```rust
/// use core::alloc::Layout;
/// use stowage_core::{RawAlloc, TrackingAllocator};
///
/// let alloc = TrackingAllocator::new();
/// let observer = alloc.clone();
///
/// let layout = Layout::new::<[u8; 16]>();
/// let ptr = alloc.allocate(layout).expect("allocation failed");
/// assert_eq!(observer.live_blocks(), 1);
///
/// unsafe { alloc.deallocate(ptr, layout) };
/// assert_eq!(observer.live_blocks(), 0);
/// assert_eq!(observer.allocations(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TrackingAllocator {
    state: Rc<TrackingState>,
}

impl TrackingAllocator {
    /// Creates a tracking allocator with no injected failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the failure injection for this allocator and all its clones.
    pub fn change_behaviour(&self, behaviour: AllocBehaviour) {
        self.state.behaviour.set(behaviour);
    }

    /// Hides (or restores) the reallocate capability, forcing containers onto
    /// the allocate + copy + deallocate path.
    pub fn hide_reallocate(&self, hide: bool) {
        self.state.hide_reallocate.set(hide);
    }

    /// Successful `allocate()` and `allocate_zeroed()` calls.
    pub fn allocations(&self) -> usize {
        self.state.allocations.get()
    }

    /// `deallocate()` calls.
    pub fn deallocations(&self) -> usize {
        self.state.deallocations.get()
    }

    /// Successful `reallocate()` calls.
    pub fn reallocations(&self) -> usize {
        self.state.reallocations.get()
    }

    /// Blocks handed out and not yet released.
    pub fn live_blocks(&self) -> usize {
        self.state.live_blocks.get()
    }

    fn refuse_allocate(&self) -> bool {
        matches!(self.state.behaviour.get(), AllocBehaviour::FailAtAllocate)
            || self.state.budget_exhausted()
    }

    fn refuse_reallocate(&self) -> bool {
        matches!(self.state.behaviour.get(), AllocBehaviour::FailAtReallocate)
            || self.state.budget_exhausted()
    }

    fn record_allocation(&self, ptr: Option<NonNull<u8>>) -> Option<NonNull<u8>> {
        if ptr.is_some() {
            TrackingState::bump(&self.state.allocations);
            TrackingState::bump(&self.state.live_blocks);
        }

        ptr
    }
}

// SAFETY: every request is forwarded to the platform context, which upholds
// the contract; failures are injected only by returning `None`.
unsafe impl RawAlloc for TrackingAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if self.refuse_allocate() {
            return None;
        }

        self.record_allocation(AllocatorContext::PLATFORM.allocate(layout))
    }

    fn allocate_zeroed(&self, layout: Layout) -> Option<NonNull<u8>> {
        if self.refuse_allocate() {
            return None;
        }

        self.record_allocation(AllocatorContext::PLATFORM.allocate_zeroed(layout))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        TrackingState::bump(&self.state.deallocations);
        self.state
            .live_blocks
            .set(self.state.live_blocks.get().saturating_sub(1));

        // SAFETY: caller guarantees ptr came from this allocator for layout.
        unsafe { AllocatorContext::PLATFORM.deallocate(ptr, layout) }
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        if self.refuse_reallocate() {
            return None;
        }

        // SAFETY: caller upholds the reallocate contract.
        let new_ptr = unsafe { AllocatorContext::PLATFORM.reallocate(ptr, layout, new_size) };
        if new_ptr.is_some() {
            TrackingState::bump(&self.state.reallocations);
        }

        new_ptr
    }

    fn has_reallocate(&self) -> bool {
        !self.state.hide_reallocate.get()
    }
}
