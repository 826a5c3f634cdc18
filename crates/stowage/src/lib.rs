// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! <p align="center"><em>Small containers that take their memory from where you tell them.</em></p>
//!
//! ---
//!
//! Stowage bundles three containers built on one injectable allocator
//! interface:
//!
//! - [`DynamicArray<T, A>`]: growable contiguous array with doubling growth.
//! - [`IdAllocator<A>`]: reusable `u32` ids backed by a bitset.
//! - [`StaticHashTable<V, A, BUCKETS>`]: string-keyed table with a fixed
//!   number of chained buckets.
//!
//! Each container takes its memory from an [`AllocatorContext`] (four
//! optional function slots falling back to the platform allocator) or from
//! any other [`RawAlloc`] implementation.
//!
//! # Installation
//!
//! ```toml
//! [dependencies]
//! stowage = "0.1.0"
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use stowage::{DynamicArray, IdAllocator, StaticHashTable, StowageError};
//!
//! fn main() -> Result<(), StowageError> {
//!     let mut ids = IdAllocator::new(1)?;
//!     let mut names = StaticHashTable::new();
//!     let mut order = DynamicArray::new(4)?;
//!
//!     for name in ["ada", "grace", "edsger"] {
//!         let id = ids.next().ok_or(StowageError::Full)?;
//!         names.insert(name, id)?;
//!         order.push_back(id)?;
//!     }
//!
//!     assert_eq!(names.lookup("grace"), Some(&2));
//!     assert_eq!(order.as_slice(), &[1, 2, 3]);
//!
//!     let id = names.delete("grace")?;
//!     assert!(ids.unregister(id));
//!     assert_eq!(ids.next(), Some(2));
//!     Ok(())
//! }
//! ```
//!
//! # Allocator injection
//!
//! ```rust
//! use stowage::{AllocatorContext, DynamicArray, StowageError};
//!
//! fn main() -> Result<(), StowageError> {
//!     // Growth falls back to allocate + copy + deallocate.
//!     let ctx = AllocatorContext::PLATFORM.without_reallocate();
//!     let mut array = DynamicArray::new_in(1, ctx)?;
//!
//!     for i in 0..64u32 {
//!         array.push_back(i)?;
//!     }
//!     assert_eq!(array.capacity(), 64);
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Every fallible operation returns [`StowageError`]. A failed allocation
//! leaves the container exactly as it was before the call.
//!
//! # Logging
//!
//! Cold paths (growth, allocation failure, id exhaustion, full tables) emit
//! [`tracing`](https://docs.rs/tracing) events. Nothing is logged unless the
//! application installs a subscriber.
//!
//! # Testing
//!
//! With the `test-utils` feature, `context::TrackingAllocator` counts
//! allocator traffic and injects failures through `context::AllocBehaviour`:
//!
//! ```rust,ignore
//! use stowage::context::{AllocBehaviour, TrackingAllocator};
//!
//! let alloc = TrackingAllocator::new();
//! let mut array = stowage::DynamicArray::new_in(1, alloc.clone())?;
//! alloc.change_behaviour(AllocBehaviour::FailAtReallocate);
//!
//! array.push_back(1)?;
//! assert!(array.push_back(2).is_err());
//! assert_eq!(array.len(), 1);
//! ```
//!
//! # License
//!
//! GPL-3.0-only

#![cfg_attr(not(test), no_std)]

pub use stowage_array as array;
pub use stowage_core as context;
pub use stowage_idgen as idgen;
pub use stowage_table as table;

pub use stowage_array::DynamicArray;
pub use stowage_core::{AllocatorContext, RawAlloc, StowageError};
pub use stowage_idgen::{IdAllocator, MAX_SAFE_IDS};
pub use stowage_table::{DEFAULT_BUCKET_COUNT, LOAD_FACTOR_CEILING, StaticHashTable};
