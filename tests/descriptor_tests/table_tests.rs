//! Tests for the Descriptor Table
//!
//! Tests verify:
//! - Lowest-slot allocation and reuse of closed slots
//! - Doubling growth
//! - BadHandle for negative, out-of-range and empty descriptors

use userfs::descriptor::{DescriptorTable, Session};
use userfs::registry::FileId;
use userfs::UfsError;

// =============================================================================
// Acquire Tests
// =============================================================================

#[test]
fn test_new_table_has_no_slots() {
    let table = DescriptorTable::new(10);

    assert_eq!(table.capacity(), 0);
    assert_eq!(table.open_count(), 0);
}

#[test]
fn test_acquire_returns_sequential_descriptors() {
    let mut table = DescriptorTable::new(10);

    assert_eq!(table.acquire(FileId::new(0)).unwrap(), 0);
    assert_eq!(table.acquire(FileId::new(0)).unwrap(), 1);
    assert_eq!(table.acquire(FileId::new(1)).unwrap(), 2);

    assert_eq!(table.capacity(), 10);
    assert_eq!(table.open_count(), 3);
}

#[test]
fn test_acquire_starts_at_cursor_zero() {
    let mut table = DescriptorTable::new(4);

    let fd = table.acquire(FileId::new(7)).unwrap();

    assert_eq!(table.resolve(fd).unwrap(), &Session::new(FileId::new(7)));
    assert_eq!(table.resolve(fd).unwrap().pos, 0);
}

#[test]
fn test_acquire_reuses_lowest_free_slot() {
    let mut table = DescriptorTable::new(10);
    for _ in 0..4 {
        table.acquire(FileId::new(0)).unwrap();
    }

    table.release(2).unwrap();
    table.release(1).unwrap();

    assert_eq!(table.acquire(FileId::new(0)).unwrap(), 1);
    assert_eq!(table.acquire(FileId::new(0)).unwrap(), 2);
    assert_eq!(table.acquire(FileId::new(0)).unwrap(), 4);
}

#[test]
fn test_table_doubles_when_full() {
    let mut table = DescriptorTable::new(2);

    table.acquire(FileId::new(0)).unwrap();
    table.acquire(FileId::new(0)).unwrap();
    assert_eq!(table.capacity(), 2);

    assert_eq!(table.acquire(FileId::new(0)).unwrap(), 2);
    assert_eq!(table.capacity(), 4);

    table.acquire(FileId::new(0)).unwrap();
    table.acquire(FileId::new(0)).unwrap();
    assert_eq!(table.capacity(), 8);
    assert_eq!(table.open_count(), 5);
}

#[test]
fn test_grown_slots_are_empty() {
    let mut table = DescriptorTable::new(1);
    table.acquire(FileId::new(0)).unwrap();
    table.acquire(FileId::new(0)).unwrap();

    assert_eq!(table.capacity(), 2);
    assert_eq!(table.iter().count(), 2);

    table.acquire(FileId::new(0)).unwrap();
    assert_eq!(table.capacity(), 4);
    assert_eq!(table.resolve(3), Err(UfsError::BadHandle));
}

// =============================================================================
// Release / Resolve Tests
// =============================================================================

#[test]
fn test_release_returns_session() {
    let mut table = DescriptorTable::new(4);
    let fd = table.acquire(FileId::new(3)).unwrap();
    table.resolve_mut(fd).unwrap().pos = 42;

    let session = table.release(fd).unwrap();

    assert_eq!(session.file, FileId::new(3));
    assert_eq!(session.pos, 42);
    assert_eq!(table.open_count(), 0);
}

#[test]
fn test_release_twice_is_bad_handle() {
    let mut table = DescriptorTable::new(4);
    let fd = table.acquire(FileId::new(0)).unwrap();

    table.release(fd).unwrap();

    assert_eq!(table.release(fd), Err(UfsError::BadHandle));
    assert_eq!(table.resolve(fd), Err(UfsError::BadHandle));
}

#[test]
fn test_negative_descriptor_is_bad_handle() {
    let mut table = DescriptorTable::new(4);
    table.acquire(FileId::new(0)).unwrap();

    assert_eq!(table.resolve(-1), Err(UfsError::BadHandle));
    assert_eq!(table.release(-1), Err(UfsError::BadHandle));
}

#[test]
fn test_out_of_range_descriptor_is_bad_handle() {
    let mut table = DescriptorTable::new(4);
    table.acquire(FileId::new(0)).unwrap();

    assert_eq!(table.resolve(4), Err(UfsError::BadHandle));
    assert_eq!(table.resolve(1000), Err(UfsError::BadHandle));
    assert!(table.resolve_mut(i32::MAX).is_err());
}

#[test]
fn test_empty_slot_is_bad_handle() {
    let mut table = DescriptorTable::new(4);
    table.acquire(FileId::new(0)).unwrap();

    assert_eq!(table.resolve(1), Err(UfsError::BadHandle));
}

#[test]
fn test_resolve_on_unpopulated_table() {
    let table = DescriptorTable::new(4);

    assert_eq!(table.resolve(0), Err(UfsError::BadHandle));
}

#[test]
fn test_clear_drops_everything() {
    let mut table = DescriptorTable::new(4);
    let fd = table.acquire(FileId::new(0)).unwrap();

    table.clear();

    assert_eq!(table.capacity(), 0);
    assert_eq!(table.resolve(fd), Err(UfsError::BadHandle));
    assert_eq!(table.acquire(FileId::new(1)).unwrap(), 0);
}
