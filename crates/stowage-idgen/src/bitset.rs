// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use stowage_array::DynamicArray;
use stowage_core::{RawAlloc, StowageError};

const WORD_BITS: u32 = u32::BITS;

#[inline(always)]
fn word_of(bit: u32) -> usize {
    (bit / WORD_BITS) as usize
}

#[inline(always)]
fn mask_of(bit: u32) -> u32 {
    1 << (bit % WORD_BITS)
}

/// Fixed-width packed bitset over `u32` words, one bit per id offset.
pub(crate) struct Bitset<A: RawAlloc> {
    words: DynamicArray<u32, A>,
    bits: u32,
}

impl<A: RawAlloc> Bitset<A> {
    /// Allocates a cleared bitset able to hold `bits` bits.
    pub(crate) fn new_in(bits: u32, alloc: A) -> Result<Self, StowageError> {
        let word_count = bits.div_ceil(WORD_BITS).max(1) as usize;

        let mut words = DynamicArray::new_in(word_count, alloc)?;
        words.resize(word_count, 0)?;

        Ok(Self { words, bits })
    }

    #[inline]
    pub(crate) fn test(&self, bit: u32) -> bool {
        debug_assert!(bit < self.bits);
        self.words[word_of(bit)] & mask_of(bit) != 0
    }

    #[inline]
    pub(crate) fn set(&mut self, bit: u32) {
        debug_assert!(bit < self.bits);
        self.words[word_of(bit)] |= mask_of(bit);
    }

    #[inline]
    pub(crate) fn clear(&mut self, bit: u32) {
        debug_assert!(bit < self.bits);
        self.words[word_of(bit)] &= !mask_of(bit);
    }

    pub(crate) fn clear_all(&mut self) {
        self.words.fill(0);
    }

    pub(crate) fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    pub(crate) fn word_count(&self) -> usize {
        self.words.len()
    }
}
