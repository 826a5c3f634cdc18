// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Growable array over an injectable allocator.
//!
//! [`DynamicArray<T, A>`] is a contiguous buffer of `T` whose memory comes
//! from a [`RawAlloc`](stowage_core::RawAlloc) supplied at construction
//! ([`AllocatorContext::PLATFORM`](stowage_core::AllocatorContext::PLATFORM)
//! by default).
//!
//! # Core Guarantees
//!
//! - **Doubling growth**: appending to a full array doubles its capacity
//!   (an array shrunk to zero capacity grows back to one).
//! - **Fallible operations**: every operation that may allocate returns
//!   `Result`; on [`StowageError::AllocFailed`](stowage_core::StowageError::AllocFailed)
//!   the array is left exactly as it was.
//! - **Reallocate when available**: growth uses the allocator's reallocate if it
//!   declares one, otherwise allocate + copy + deallocate.
//!
//! # Example
//!
//! ```rust
//! use stowage_array::DynamicArray;
//! use stowage_core::StowageError;
//!
//! fn example() -> Result<(), StowageError> {
//!     let mut array = DynamicArray::<u32>::new(2)?;
//!
//!     array.push_back(1)?;
//!     array.push_back(2)?;
//!     array.push_back(3)?;
//!
//!     assert_eq!(array.len(), 3);
//!     assert_eq!(array.capacity(), 4);
//!
//!     assert_eq!(array.pop_back()?, 3);
//!     assert_eq!(*array.get(0)?, 1);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

mod dynamic_array;

#[cfg(test)]
mod tests;

pub use dynamic_array::DynamicArray;
