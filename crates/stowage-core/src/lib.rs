// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Allocator injection and shared error taxonomy for stowage containers.
//!
//! Every stowage container takes an allocator by value at construction and
//! obtains all of its memory through it. The allocator is a capability, not a
//! base class: containers only see the [`RawAlloc`] trait and never learn the
//! concrete allocation strategy.
//!
//! # AllocatorContext
//!
//! [`AllocatorContext`] bundles four optional function slots (allocate,
//! zero-allocate, deallocate, reallocate). An unset slot falls back to the
//! platform allocator for that operation. [`AllocatorContext::PLATFORM`] (also
//! its `Default`) fills all four with the platform allocator.
//!
//! ```rust
//! use core::alloc::Layout;
//! use stowage_core::{AllocatorContext, RawAlloc};
//!
//! let ctx = AllocatorContext::default();
//! let layout = Layout::array::<u32>(4).unwrap();
//!
//! let ptr = ctx.allocate_zeroed(layout).expect("allocation failed");
//! // SAFETY: `ptr` was returned by `ctx` for `layout`.
//! unsafe { ctx.deallocate(ptr, layout) };
//! ```
//!
//! # Overriding a slot
//!
//! ```rust
//! use core::alloc::Layout;
//! use stowage_core::{AllocatorContext, RawAlloc};
//!
//! unsafe fn refuse(_layout: Layout) -> *mut u8 {
//!     core::ptr::null_mut()
//! }
//!
//! // SAFETY: `refuse` never hands out memory, so it cannot violate the contract.
//! let ctx = unsafe { AllocatorContext::PLATFORM.with_allocate(refuse) };
//!
//! assert!(ctx.allocate(Layout::new::<u64>()).is_none());
//! ```
//!
//! # Test Utilities
//!
//! Enable the `test-utils` feature to get [`TrackingAllocator`], which counts
//! allocator traffic and injects failures through [`AllocBehaviour`]:
//!
//! ```toml
//! [dev-dependencies]
//! stowage-core = { version = "*", features = ["test-utils"] }
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

extern crate alloc;

mod context;
mod error;
mod traits;

#[cfg(any(test, feature = "test-utils"))]
mod tracking;

#[cfg(test)]
mod tests;

pub use context::{
    AllocateFn, AllocateZeroedFn, AllocatorContext, DeallocateFn, ReallocateFn,
};
pub use error::StowageError;
pub use traits::RawAlloc;

#[cfg(any(test, feature = "test-utils"))]
pub use tracking::{AllocBehaviour, TrackingAllocator};
