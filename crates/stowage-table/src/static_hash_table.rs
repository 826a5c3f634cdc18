// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;

use stowage_array::DynamicArray;
use stowage_core::{AllocatorContext, RawAlloc, StowageError};

use crate::hash::bucket_index;

/// Bucket count used when none is given.
pub const DEFAULT_BUCKET_COUNT: usize = 128;

/// Entries allowed per bucket, on average, before inserts report [`StowageError::Full`].
pub const LOAD_FACTOR_CEILING: usize = 10;

type Link<V, A> = Option<NonNull<Entry<V, A>>>;

struct Entry<V, A: RawAlloc> {
    key: DynamicArray<u8, A>,
    value: V,
    next: Link<V, A>,
}

impl<V, A: RawAlloc> Entry<V, A> {
    #[inline]
    fn matches(&self, key: &str) -> bool {
        self.key.as_slice() == key.as_bytes()
    }
}

/// String-keyed hash table with a fixed number of chained buckets.
///
/// Keys are copied into memory obtained from the table's allocator; values
/// are stored as given. Each bucket is a singly-linked chain with the most
/// recently inserted key at its head, and a key appears at most once in the
/// whole table.
///
/// The bucket count is the `BUCKETS` const generic and never changes. Once
/// the table holds `LOAD_FACTOR_CEILING * BUCKETS` entries, inserting a new key
/// fails with [`StowageError::Full`]; updating an existing key still succeeds.
///
/// Dropping the table (or calling [`StaticHashTable::clear`]) releases every
/// node and key copy and drops the stored values. Whatever a value points to
/// is left alone.
///
/// # Example
///
/// ```rust
/// use stowage_table::StaticHashTable;
/// use stowage_core::StowageError;
///
/// fn example() -> Result<(), StowageError> {
///     let mut table = StaticHashTable::new();
///
///     table.insert("a", 1)?;
///     table.insert("b", 2)?;
///     assert_eq!(table.insert("a", 10)?, Some(1));
///     assert_eq!(table.count(), 2);
///
///     assert_eq!(table.delete("a")?, 10);
///     assert!(!table.contains("a"));
///     assert_eq!(table.lookup("b"), Some(&2));
///     assert_eq!(table.delete("a"), Err(StowageError::NotFound));
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub struct StaticHashTable<
    V,
    A: RawAlloc = AllocatorContext,
    const BUCKETS: usize = DEFAULT_BUCKET_COUNT,
> {
    buckets: [Link<V, A>; BUCKETS],
    alloc: A,
    count: usize,
    _marker: PhantomData<Entry<V, A>>,
}

// SAFETY: the table uniquely owns every node reachable from its buckets.
unsafe impl<V: Send, A: RawAlloc + Send, const BUCKETS: usize> Send
    for StaticHashTable<V, A, BUCKETS>
{
}

// SAFETY: shared access only hands out `&V`.
unsafe impl<V: Sync, A: RawAlloc + Sync, const BUCKETS: usize> Sync
    for StaticHashTable<V, A, BUCKETS>
{
}

impl<V> StaticHashTable<V> {
    /// Creates an empty table of [`DEFAULT_BUCKET_COUNT`] buckets on the
    /// platform allocator.
    ///
    /// Other bucket counts go through [`Default`] or [`StaticHashTable::new_in`].
    pub fn new() -> Self {
        Self::new_in(AllocatorContext::default())
    }
}

impl<V, const BUCKETS: usize> Default for StaticHashTable<V, AllocatorContext, BUCKETS> {
    fn default() -> Self {
        Self::new_in(AllocatorContext::default())
    }
}

impl<V, A: RawAlloc, const BUCKETS: usize> StaticHashTable<V, A, BUCKETS> {
    const CEILING: usize = LOAD_FACTOR_CEILING * BUCKETS;

    /// Creates an empty table whose nodes and key copies come from `alloc`.
    pub fn new_in(alloc: A) -> Self {
        const { assert!(BUCKETS > 0, "a hash table needs at least one bucket") };

        Self {
            buckets: [None; BUCKETS],
            alloc,
            count: 0,
            _marker: PhantomData,
        }
    }

    /// Number of entries across all chains.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Fixed number of buckets.
    pub const fn bucket_count(&self) -> usize {
        BUCKETS
    }

    /// Returns the allocator this table was built with.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    fn find(&self, key: &str) -> Link<V, A> {
        let mut cursor = self.buckets[bucket_index::<BUCKETS>(key)];

        while let Some(node) = cursor {
            // SAFETY: every node reachable from a bucket is live and owned by self.
            let entry = unsafe { node.as_ref() };
            if entry.matches(key) {
                return Some(node);
            }
            cursor = entry.next;
        }

        None
    }

    /// Returns the value stored under `key`.
    pub fn lookup(&self, key: &str) -> Option<&V> {
        // SAFETY: the node is live for as long as self is borrowed.
        self.find(key).map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn lookup_mut(&mut self, key: &str) -> Option<&mut V> {
        // SAFETY: the node is live and uniquely borrowed through &mut self.
        self.find(key)
            .map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Stores `value` under `key`.
    ///
    /// If `key` is already present its value is replaced in place (the key is
    /// not copied again) and the previous value is returned. Otherwise a new
    /// node is linked at the head of the key's chain and `None` is returned.
    ///
    /// # Errors
    ///
    /// - [`StowageError::Full`] if `key` is new and the table holds
    ///   `LOAD_FACTOR_CEILING * BUCKETS` entries.
    /// - [`StowageError::AllocFailed`] if the node or key copy cannot be
    ///   allocated. Nothing is leaked and the table is unchanged.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>, StowageError> {
        if let Some(slot) = self.lookup_mut(key) {
            return Ok(Some(mem::replace(slot, value)));
        }

        if self.count >= Self::CEILING {
            tracing::debug!(count = self.count, buckets = BUCKETS, "hash table full");
            return Err(StowageError::Full);
        }

        let node = self.allocate_entry(key, value)?;
        let index = bucket_index::<BUCKETS>(key);

        // SAFETY: node was just initialized and is not yet shared.
        unsafe { (*node.as_ptr()).next = self.buckets[index] };
        self.buckets[index] = Some(node);
        self.count += 1;

        Ok(None)
    }

    /// Removes `key` and hands its value back.
    ///
    /// # Errors
    ///
    /// [`StowageError::NotFound`] if `key` is not present.
    pub fn delete(&mut self, key: &str) -> Result<V, StowageError> {
        let mut link = &mut self.buckets[bucket_index::<BUCKETS>(key)];

        while let Some(node) = *link {
            // SAFETY: every node reachable from a bucket is live and owned by self.
            let entry = unsafe { &mut *node.as_ptr() };

            if entry.matches(key) {
                *link = entry.next;
                self.count -= 1;
                // SAFETY: node has just been unlinked and nothing else refers to it.
                return Ok(unsafe { self.release(node) });
            }

            link = &mut entry.next;
        }

        Err(StowageError::NotFound)
    }

    /// Releases every node and key copy, dropping the stored values.
    ///
    /// The table stays usable and keeps its allocator.
    pub fn clear(&mut self) {
        for index in 0..BUCKETS {
            let mut cursor = self.buckets[index].take();

            while let Some(node) = cursor {
                // SAFETY: the chain was detached from its bucket; each node is
                // visited once, its successor read before it is released.
                cursor = unsafe { node.as_ref() }.next;
                drop(unsafe { self.release(node) });
            }
        }

        self.count = 0;
    }

    fn allocate_entry(&self, key: &str, value: V) -> Result<NonNull<Entry<V, A>>, StowageError> {
        let layout = Layout::new::<Entry<V, A>>();
        let raw = self
            .alloc
            .allocate(layout)
            .ok_or(StowageError::AllocFailed)?;

        let key = match self.duplicate_key(key) {
            Ok(key) => key,
            Err(err) => {
                // SAFETY: raw was obtained from alloc for layout and never initialized.
                unsafe { self.alloc.deallocate(raw, layout) };
                return Err(err);
            }
        };

        let node = raw.cast::<Entry<V, A>>();
        // SAFETY (PRECONDITIONS ARE MET): raw is a fresh block sized and
        // aligned for Entry<V, A>.
        unsafe {
            node.as_ptr().write(Entry {
                key,
                value,
                next: None,
            })
        };

        Ok(node)
    }

    fn duplicate_key(&self, key: &str) -> Result<DynamicArray<u8, A>, StowageError> {
        let mut copy = DynamicArray::new_in(key.len(), self.alloc.clone())?;
        copy.extend_from_slice(key.as_bytes())?;
        Ok(copy)
    }

    /// Moves the entry out of `node`, frees the node and its key copy, and
    /// returns the value.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of this table that is no longer linked from
    /// any bucket or chain.
    unsafe fn release(&self, node: NonNull<Entry<V, A>>) -> V {
        // SAFETY: caller guarantees node is live and unreachable, so it is read once.
        let Entry { key, value, .. } = unsafe { node.as_ptr().read() };
        // SAFETY: node was obtained from alloc with this layout in allocate_entry.
        unsafe {
            self.alloc
                .deallocate(node.cast(), Layout::new::<Entry<V, A>>())
        };
        drop(key);

        value
    }

    #[cfg(test)]
    pub(crate) fn chain_keys(&self, index: usize) -> Vec<String> {
        let mut keys = Vec::new();
        let mut cursor = self.buckets[index];

        while let Some(node) = cursor {
            // SAFETY: chain nodes are live while self is borrowed.
            let entry = unsafe { node.as_ref() };
            keys.push(String::from_utf8(entry.key.as_slice().to_vec()).expect("utf8 key"));
            cursor = entry.next;
        }

        keys
    }
}

impl<V, A: RawAlloc, const BUCKETS: usize> Drop for StaticHashTable<V, A, BUCKETS> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<V: core::fmt::Debug, A: RawAlloc, const BUCKETS: usize> core::fmt::Debug
    for StaticHashTable<V, A, BUCKETS>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StaticHashTable")
            .field("count", &self.count)
            .field("buckets", &BUCKETS)
            .finish()
    }
}
