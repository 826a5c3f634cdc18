// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::alloc::Layout;
use core::cell::Cell;

use crate::{AllocatorContext, RawAlloc};

thread_local! {
    static ALLOCATE_CALLS: Cell<usize> = const { Cell::new(0) };
    static DEALLOCATE_CALLS: Cell<usize> = const { Cell::new(0) };
    static REALLOCATE_CALLS: Cell<usize> = const { Cell::new(0) };
}

fn bump(counter: &'static std::thread::LocalKey<Cell<usize>>) {
    counter.with(|c| c.set(c.get() + 1));
}

fn read(counter: &'static std::thread::LocalKey<Cell<usize>>) -> usize {
    counter.with(Cell::get)
}

unsafe fn counting_allocate(layout: Layout) -> *mut u8 {
    bump(&ALLOCATE_CALLS);
    unsafe { std::alloc::alloc(layout) }
}

unsafe fn counting_deallocate(ptr: *mut u8, layout: Layout) {
    bump(&DEALLOCATE_CALLS);
    unsafe { std::alloc::dealloc(ptr, layout) }
}

unsafe fn counting_reallocate(ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
    bump(&REALLOCATE_CALLS);
    unsafe { std::alloc::realloc(ptr, layout, new_size) }
}

unsafe fn null_allocate(_layout: Layout) -> *mut u8 {
    core::ptr::null_mut()
}

unsafe fn null_reallocate(_ptr: *mut u8, _layout: Layout, _new_size: usize) -> *mut u8 {
    core::ptr::null_mut()
}

// =============================================================================
// defaults
// =============================================================================

#[test]
fn test_default_is_platform() {
    let ctx = AllocatorContext::default();
    assert!(ctx.has_reallocate());

    let layout = Layout::array::<u64>(8).expect("layout");
    let ptr = ctx.allocate(layout).expect("allocate");
    unsafe { ctx.deallocate(ptr, layout) };
}

#[test]
fn test_empty_context_falls_back_to_platform() {
    let ctx = AllocatorContext::empty();
    assert!(!ctx.has_reallocate());

    let layout = Layout::array::<u32>(4).expect("layout");
    let ptr = ctx.allocate(layout).expect("allocate");
    unsafe {
        ptr.cast::<u32>().as_ptr().write(7);
        assert_eq!(ptr.cast::<u32>().as_ptr().read(), 7);
        ctx.deallocate(ptr, layout);
    }
}

#[test]
fn test_allocate_zeroed_returns_zeroes() {
    let ctx = AllocatorContext::empty();
    let layout = Layout::array::<u8>(64).expect("layout");

    let ptr = ctx.allocate_zeroed(layout).expect("allocate_zeroed");
    let bytes = unsafe { core::slice::from_raw_parts(ptr.as_ptr(), 64) };
    assert!(bytes.iter().all(|&b| b == 0));

    unsafe { ctx.deallocate(ptr, layout) };
}

#[test]
fn test_zero_sized_layout_is_refused() {
    let ctx = AllocatorContext::PLATFORM;
    let layout = Layout::new::<()>();

    assert!(ctx.allocate(layout).is_none());
    assert!(ctx.allocate_zeroed(layout).is_none());
}

#[test]
fn test_debug_reports_slots() {
    let rendered = format!("{:?}", AllocatorContext::PLATFORM.without_reallocate());
    assert!(rendered.contains("allocate: true"));
    assert!(rendered.contains("reallocate: false"));
}

// =============================================================================
// overrides
// =============================================================================

#[test]
fn test_custom_slots_are_called() {
    let ctx = unsafe {
        AllocatorContext::empty()
            .with_allocate(counting_allocate)
            .with_deallocate(counting_deallocate)
            .with_reallocate(counting_reallocate)
    };
    assert!(ctx.has_reallocate());

    let before = (
        read(&ALLOCATE_CALLS),
        read(&REALLOCATE_CALLS),
        read(&DEALLOCATE_CALLS),
    );

    let layout = Layout::array::<u8>(16).expect("layout");
    let ptr = ctx.allocate(layout).expect("allocate");
    let ptr = unsafe { ctx.reallocate(ptr, layout, 32) }.expect("reallocate");
    let grown = Layout::array::<u8>(32).expect("layout");
    unsafe { ctx.deallocate(ptr, grown) };

    assert_eq!(read(&ALLOCATE_CALLS), before.0 + 1);
    assert_eq!(read(&REALLOCATE_CALLS), before.1 + 1);
    assert_eq!(read(&DEALLOCATE_CALLS), before.2 + 1);
}

#[test]
fn test_unset_slot_does_not_use_other_overrides() {
    let ctx = unsafe { AllocatorContext::empty().with_allocate(counting_allocate) };
    let layout = Layout::array::<u8>(8).expect("layout");
    let before = read(&ALLOCATE_CALLS);

    let ptr = ctx.allocate_zeroed(layout).expect("allocate_zeroed");
    unsafe { ctx.deallocate(ptr, layout) };

    assert_eq!(read(&ALLOCATE_CALLS), before);
}

#[test]
fn test_null_allocate_propagates_none() {
    let ctx = unsafe { AllocatorContext::PLATFORM.with_allocate(null_allocate) };
    assert!(ctx.allocate(Layout::new::<u64>()).is_none());
}

#[test]
fn test_null_reallocate_leaves_block_owned() {
    let ctx = unsafe { AllocatorContext::PLATFORM.with_reallocate(null_reallocate) };
    let layout = Layout::array::<u8>(8).expect("layout");

    let ptr = ctx.allocate(layout).expect("allocate");
    unsafe {
        ptr.as_ptr().write(42);
        assert!(ctx.reallocate(ptr, layout, 64).is_none());
        assert_eq!(ptr.as_ptr().read(), 42);
        ctx.deallocate(ptr, layout);
    }
}
