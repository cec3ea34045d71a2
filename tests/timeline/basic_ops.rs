//! Basic Operation Tests
//!
//! - Empty timeline behavior
//! - Upsert ordering and replacement
//! - Pagination windows
//! - Incremental reads with since
//! - Delete

use crate::*;

#[test]
fn test_empty_timeline() {
    let timeline = Timeline::ephemeral();

    assert_eq!(timeline.last_id(), 0);
    assert!(timeline.page(1).is_empty());
    assert!(timeline.since(0).is_empty());
    assert!(timeline.is_empty());
}

#[test]
fn test_upsert_orders_newest_first() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records([5, 3, 9])).unwrap();

    assert_eq!(timeline.last_id(), 9);
    assert_eq!(ids(&timeline.page(1)), vec![9, 5, 3]);
}

#[test]
fn test_upsert_replaces_by_id() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records([3, 2, 1])).unwrap();

    timeline.upsert(vec![record(2).with_favorited(true)]).unwrap();

    assert_eq!(timeline.len(), 3);
    assert!(timeline.get(2).unwrap().favorited);
    assert_eq!(ids(&timeline.page(1)), vec![3, 2, 1]);
}

#[test]
fn test_unsorted_batches_interleave() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records([10, 30, 20])).unwrap();
    timeline.upsert(records([25, 5, 35])).unwrap();

    assert_eq!(ids(&timeline.page(1)), vec![35, 30, 25, 20, 10, 5]);
}

#[test]
fn test_pages_of_fifty() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records(1..=120)).unwrap();

    let first = timeline.page(1);
    assert_eq!(first.len(), 50);
    assert_eq!(first[0].id, 120);
    assert_eq!(first[49].id, 71);

    let second = timeline.page(2);
    assert_eq!(ids(&second), (21..=70).rev().collect::<Vec<_>>());

    let third = timeline.page(3);
    assert_eq!(ids(&third), (1..=20).rev().collect::<Vec<_>>());

    assert!(timeline.page(4).is_empty());
}

#[test]
fn test_pages_partition_the_sequence() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records(1..=137)).unwrap();

    let joined: Vec<Record> = (1..=3).flat_map(|n| timeline.page(n)).collect();
    assert_eq!(joined, timeline.store().records());
}

#[test]
fn test_since_returns_newer_records() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records([1, 2, 3, 4, 5])).unwrap();

    assert_eq!(ids(&timeline.since(3)), vec![5, 4]);
    assert!(timeline.since(5).is_empty());
    assert_eq!(ids(&timeline.since(0)), vec![5, 4, 3, 2, 1]);
}

#[test]
fn test_since_id_between_stored_ids() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records([10, 20, 30])).unwrap();

    assert_eq!(ids(&timeline.since(15)), vec![30, 20]);
}

#[test]
fn test_delete_removes_only_that_record() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records([1, 2, 3])).unwrap();

    timeline.delete(2).unwrap();

    assert_eq!(ids(&timeline.page(1)), vec![3, 1]);
    assert!(timeline.get(2).is_none());
}

#[test]
fn test_delete_newest_moves_last_id() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records([1, 2, 3])).unwrap();

    timeline.delete(3).unwrap();
    assert_eq!(timeline.last_id(), 2);
}

#[test]
fn test_delete_missing_is_noop() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records([1, 2])).unwrap();

    timeline.delete(99).unwrap();
    assert_eq!(ids(&timeline.page(1)), vec![2, 1]);
}
