// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

#[cfg(test)]
mod hash_table_tests {
    use stowage::context::TrackingAllocator;
    use stowage::{StaticHashTable, StowageError};

    #[test]
    fn test_insert_insert_delete() {
        let mut table = StaticHashTable::new();

        table.insert("a", "A").expect("insert");
        table.insert("b", "B").expect("insert");
        table.delete("a").expect("delete");

        assert!(!table.contains("a"));
        assert_eq!(table.lookup("b"), Some(&"B"));
        assert_eq!(table.count(), 1);
    }

    #[test]
    fn test_upsert_and_not_found() {
        let mut table = StaticHashTable::new();

        assert_eq!(table.insert("k", 1u32), Ok(None));
        assert_eq!(table.insert("k", 2), Ok(Some(1)));
        assert_eq!(table.count(), 1);

        assert_eq!(table.delete("missing"), Err(StowageError::NotFound));
    }

    #[test]
    fn test_values_are_not_freed_by_the_table() {
        let payload = Box::new([7u8; 32]);
        let raw: *const [u8; 32] = &*payload;

        let mut table = StaticHashTable::new();
        table.insert("blob", raw).expect("insert");
        drop(table);

        assert_eq!(payload[0], 7);
    }

    #[test]
    fn test_every_block_returns_to_the_allocator() {
        let alloc = TrackingAllocator::new();

        {
            let mut table: StaticHashTable<usize, _, 16> = StaticHashTable::new_in(alloc.clone());
            for i in 0..100 {
                table.insert(&format!("item-{i}"), i).expect("insert");
            }
            for i in (0..100).step_by(3) {
                assert_eq!(table.delete(&format!("item-{i}")), Ok(i));
            }
        }

        assert_eq!(alloc.live_blocks(), 0);
        assert_eq!(alloc.allocations(), alloc.deallocations());
    }
}
