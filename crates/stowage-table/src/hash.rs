// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! djb2 string hash with an extra rotate-xor mixing step.

/// Initial value of the djb2 accumulator.
pub const DJB2_SEED: u64 = 5381;

/// Hashes `bytes` with djb2 (`hash * 33 + byte`), folding a 7-bit left
/// rotation of the accumulator back into it after every byte.
///
/// Bytes are mixed as unsigned values. Deterministic and non-cryptographic.
///
/// # Example
///
/// ```rust
/// use stowage_table::{djb2_mix, DJB2_SEED};
///
/// assert_eq!(djb2_mix(b""), DJB2_SEED);
/// assert_eq!(djb2_mix(b"key"), djb2_mix(b"key"));
/// assert_ne!(djb2_mix(b"ab"), djb2_mix(b"ba"));
/// ```
#[inline]
pub fn djb2_mix(bytes: &[u8]) -> u64 {
    bytes.iter().fold(DJB2_SEED, |hash, &byte| {
        let hash = (hash << 5).wrapping_add(hash).wrapping_add(u64::from(byte));
        hash ^ hash.rotate_left(7)
    })
}

/// Bucket that `key` chains into in a table of `BUCKETS` buckets.
#[inline]
pub fn bucket_index<const BUCKETS: usize>(key: &str) -> usize {
    const { assert!(BUCKETS > 0, "a hash table needs at least one bucket") };
    (djb2_mix(key.as_bytes()) % BUCKETS as u64) as usize
}
