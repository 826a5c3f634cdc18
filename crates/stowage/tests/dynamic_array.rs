// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

#[cfg(test)]
mod dynamic_array_tests {
    use stowage::context::{AllocBehaviour, TrackingAllocator};
    use stowage::{AllocatorContext, DynamicArray, StowageError};

    #[test]
    fn test_push_doubles_then_pop_and_get() {
        let mut array = DynamicArray::new_in(2, AllocatorContext::default()).expect("new_in");

        array.push_back(1u32).expect("push_back");
        array.push_back(2).expect("push_back");
        array.push_back(3).expect("push_back");

        assert_eq!(array.len(), 3);
        assert_eq!(array.capacity(), 4);

        assert_eq!(array.pop_back(), Ok(3));
        assert_eq!(array.len(), 2);
        assert_eq!(array.get(0), Ok(&1));
    }

    #[test]
    fn test_insert_remove_round_through_the_middle() {
        let mut array = DynamicArray::new(4).expect("new");
        for v in [10u32, 20, 30] {
            array.push_back(v).expect("push_back");
        }

        array.insert_at(1, 15).expect("insert_at");
        assert_eq!(array.as_slice(), &[10, 15, 20, 30]);

        assert_eq!(array.remove_at(2), Ok(20));
        assert_eq!(array.as_slice(), &[10, 15, 30]);
        assert_eq!(array.get(3), Err(StowageError::InvalidParam));
    }

    #[test]
    fn test_empty_array_errors() {
        let mut array = DynamicArray::<u8>::new(1).expect("new");

        assert_eq!(array.pop_back(), Err(StowageError::Empty));
        assert_eq!(array.remove_at(0), Err(StowageError::Empty));
        assert_eq!(array.peek(0), None);
    }

    #[test]
    fn test_failed_growth_keeps_contents() {
        let alloc = TrackingAllocator::new();
        let mut array = DynamicArray::new_in(2, alloc.clone()).expect("new_in");
        array.push_back('a').expect("push_back");
        array.push_back('b').expect("push_back");

        alloc.change_behaviour(AllocBehaviour::FailAtReallocate);
        assert_eq!(array.push_back('c'), Err(StowageError::AllocFailed));
        assert_eq!(array.as_slice(), &['a', 'b']);
        assert_eq!(array.capacity(), 2);

        alloc.change_behaviour(AllocBehaviour::None);
        array.push_back('c').expect("push_back");
        assert_eq!(array.as_slice(), &['a', 'b', 'c']);
    }

    #[test]
    fn test_shrink_then_grow_again() {
        let mut array = DynamicArray::new(16).expect("new");
        array.push_back(1u64).expect("push_back");

        array.shrink_to_fit().expect("shrink_to_fit");
        assert_eq!(array.capacity(), 1);

        array.clear();
        array.shrink_to_fit().expect("shrink_to_fit");
        assert_eq!(array.capacity(), 0);

        array.push_back(9).expect("push_back");
        assert_eq!(array.capacity(), 1);
        assert_eq!(array.as_slice(), &[9]);
    }
}
