// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use stowage_core::{AllocatorContext, RawAlloc, StowageError};

use crate::bitset::Bitset;

/// Upper bound (exclusive) of any id range: 16.7 million ids, 2 MiB of bitset.
pub const MAX_SAFE_IDS: u32 = 16_777_216;

/// Hands out unique `u32` ids from `[start_id, max_id)`, reusing released ids.
///
/// Liveness is tracked in a bitset with one bit per id. [`IdAllocator::next`]
/// scans circularly from a cursor that advances past every issued id and
/// rewinds when a lower id is released, so freed low ids are reused before
/// the frontier moves on.
///
/// Ids obtained elsewhere (read back from a file, for instance) can be
/// admitted with [`IdAllocator::register`] so `next` never hands them out.
///
/// # Example
///
/// ```rust
/// use stowage_idgen::IdAllocator;
/// use stowage_core::StowageError;
///
/// fn example() -> Result<(), StowageError> {
///     let mut ids = IdAllocator::new(100)?;
///
///     assert_eq!(ids.next(), Some(100));
///     assert_eq!(ids.next(), Some(101));
///     assert_eq!(ids.next(), Some(102));
///
///     assert!(ids.unregister(101));
///     assert_eq!(ids.next(), Some(101));
///     assert_eq!(ids.count(), 3);
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub struct IdAllocator<A: RawAlloc = AllocatorContext> {
    current_id: u32,
    start_id: u32,
    max_id: u32,
    count: u32,
    used: Bitset<A>,
}

impl IdAllocator {
    /// Creates an allocator over `[start_id, MAX_SAFE_IDS)` on the platform allocator.
    ///
    /// # Errors
    ///
    /// - [`StowageError::InvalidParam`] if `start_id >= MAX_SAFE_IDS`.
    /// - [`StowageError::AllocFailed`] if the bitset cannot be obtained.
    pub fn new(start_id: u32) -> Result<Self, StowageError> {
        Self::new_in(start_id, AllocatorContext::default())
    }

    /// Creates an allocator over `[start_id, max_id)` on the platform allocator.
    ///
    /// # Errors
    ///
    /// - [`StowageError::InvalidParam`] if `start_id >= max_id` or `max_id > MAX_SAFE_IDS`.
    /// - [`StowageError::AllocFailed`] if the bitset cannot be obtained.
    pub fn with_range(start_id: u32, max_id: u32) -> Result<Self, StowageError> {
        Self::with_range_in(start_id, max_id, AllocatorContext::default())
    }
}

impl<A: RawAlloc> IdAllocator<A> {
    /// Creates an allocator over `[start_id, MAX_SAFE_IDS)` whose bitset comes from `alloc`.
    ///
    /// # Errors
    ///
    /// Same as [`IdAllocator::new`].
    pub fn new_in(start_id: u32, alloc: A) -> Result<Self, StowageError> {
        Self::with_range_in(start_id, MAX_SAFE_IDS, alloc)
    }

    /// Creates an allocator over `[start_id, max_id)` whose bitset comes from `alloc`.
    ///
    /// The bitset is sized to the range, `ceil((max_id - start_id) / 32)` words.
    ///
    /// # Errors
    ///
    /// Same as [`IdAllocator::with_range`].
    pub fn with_range_in(start_id: u32, max_id: u32, alloc: A) -> Result<Self, StowageError> {
        if max_id > MAX_SAFE_IDS || start_id >= max_id {
            return Err(StowageError::InvalidParam);
        }

        let used = Bitset::new_in(max_id - start_id, alloc)?;

        Ok(Self {
            current_id: start_id,
            start_id,
            max_id,
            count: 0,
            used,
        })
    }

    /// First id of the range.
    pub fn start_id(&self) -> u32 {
        self.start_id
    }

    /// Exclusive upper bound of the range.
    pub fn max_id(&self) -> u32 {
        self.max_id
    }

    /// Number of ids the range can hold.
    pub fn capacity(&self) -> u32 {
        self.max_id - self.start_id
    }

    /// Number of live ids.
    pub fn count(&self) -> u32 {
        self.count
    }

    #[cfg(test)]
    pub(crate) fn live_bits(&self) -> u32 {
        self.used.count_ones()
    }

    #[cfg(test)]
    pub(crate) fn bitset_words(&self) -> usize {
        self.used.word_count()
    }

    #[inline]
    fn offset(&self, id: u32) -> Option<u32> {
        (self.start_id..self.max_id)
            .contains(&id)
            .then(|| id - self.start_id)
    }

    /// Issues the first free id at or after the cursor, wrapping around the range.
    ///
    /// Returns `None` once every id in the range is live.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<u32> {
        let range = self.capacity();

        for step in 0..range {
            let mut candidate = self.current_id + step;
            if candidate >= self.max_id {
                candidate = self.start_id + (candidate - self.max_id);
            }

            let bit = candidate - self.start_id;
            if self.used.test(bit) {
                continue;
            }

            self.used.set(bit);
            self.count += 1;

            self.current_id = candidate + 1;
            if self.current_id >= self.max_id {
                self.current_id = self.start_id;
            }

            return Some(candidate);
        }

        tracing::debug!(
            start_id = self.start_id,
            max_id = self.max_id,
            "id range exhausted"
        );
        None
    }

    /// Admits an externally chosen id into the live set.
    ///
    /// Returns `false` if `id` is outside the range or already live.
    pub fn register(&mut self, id: u32) -> bool {
        let Some(bit) = self.offset(id) else {
            return false;
        };

        if self.used.test(bit) {
            return false;
        }

        self.used.set(bit);
        self.count += 1;
        true
    }

    /// Releases a live id.
    ///
    /// Returns `false` if `id` is outside the range or not live. When the
    /// released id lies below the cursor, the cursor rewinds to it.
    pub fn unregister(&mut self, id: u32) -> bool {
        let Some(bit) = self.offset(id) else {
            return false;
        };

        if !self.used.test(bit) {
            return false;
        }

        self.used.clear(bit);
        self.count -= 1;

        if id < self.current_id {
            self.current_id = id;
        }

        true
    }

    /// Whether `id` is live. Out-of-range ids are never live.
    pub fn is_registered(&self, id: u32) -> bool {
        self.offset(id).is_some_and(|bit| self.used.test(bit))
    }

    /// Releases every id and rewinds the cursor, keeping the bitset allocation.
    pub fn reset(&mut self) {
        self.used.clear_all();
        self.count = 0;
        self.current_id = self.start_id;
    }
}

impl<A: RawAlloc> core::fmt::Debug for IdAllocator<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdAllocator")
            .field("start_id", &self.start_id)
            .field("max_id", &self.max_id)
            .field("current_id", &self.current_id)
            .field("count", &self.count)
            .field("bitset_words", &self.used.word_count())
            .field("live_bits", &self.used.count_ones())
            .finish()
    }
}
