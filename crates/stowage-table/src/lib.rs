// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Fixed-bucket, string-keyed hash table over an injectable allocator.
//!
//! [`StaticHashTable<V, A, BUCKETS>`] resolves collisions by chaining. Keys
//! are hashed with [`djb2_mix`] and reduced modulo `BUCKETS`
//! ([`DEFAULT_BUCKET_COUNT`] unless chosen otherwise). The bucket array never
//! grows; instead the table refuses new keys once it holds
//! [`LOAD_FACTOR_CEILING`] entries per bucket on average.
//!
//! # Core Guarantees
//!
//! - **Upsert**: inserting an existing key replaces its value and hands the
//!   old one back, leaving the entry count unchanged.
//! - **Owned keys**: each key is copied into a buffer from the table's
//!   allocator, so callers may drop their strings right after inserting.
//! - **No partial inserts**: a failed allocation releases whatever was
//!   obtained and leaves the table untouched.
//!
//! # Example
//!
//! ```rust
//! use stowage_table::{StaticHashTable, DEFAULT_BUCKET_COUNT};
//! use stowage_core::StowageError;
//!
//! fn example() -> Result<(), StowageError> {
//!     let mut table: StaticHashTable<&str> = StaticHashTable::new();
//!     assert_eq!(table.bucket_count(), DEFAULT_BUCKET_COUNT);
//!
//!     table.insert("a", "A")?;
//!     table.insert("b", "B")?;
//!     table.delete("a")?;
//!
//!     assert!(!table.contains("a"));
//!     assert_eq!(table.lookup("b"), Some(&"B"));
//!     assert_eq!(table.count(), 1);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

mod hash;
mod static_hash_table;

#[cfg(test)]
mod tests;

pub use hash::{DJB2_SEED, bucket_index, djb2_mix};
pub use static_hash_table::{DEFAULT_BUCKET_COUNT, LOAD_FACTOR_CEILING, StaticHashTable};
