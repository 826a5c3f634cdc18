// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Reusable `u32` identifiers backed by a bitset.
//!
//! [`IdAllocator`] hands out small, dense ids suitable for indexing parallel
//! arrays such as object pools. Released ids are reused before the frontier
//! advances, and ids chosen out of band can be registered so they are never
//! issued twice.
//!
//! # Exhaustion
//!
//! [`IdAllocator::next`] returns `Option<u32>`: `None` means every id of the
//! range is live. Id `0` is an ordinary id when the range starts at zero.
//!
//! ```rust
//! use stowage_idgen::IdAllocator;
//! use stowage_core::StowageError;
//!
//! fn example() -> Result<(), StowageError> {
//!     let mut ids = IdAllocator::with_range(0, 8)?;
//!
//!     for expected in 0..8 {
//!         assert_eq!(ids.next(), Some(expected));
//!     }
//!     assert_eq!(ids.next(), None);
//!
//!     ids.unregister(3);
//!     assert_eq!(ids.next(), Some(3));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

mod bitset;
mod id_allocator;

#[cfg(test)]
mod tests;

pub use id_allocator::{IdAllocator, MAX_SAFE_IDS};
