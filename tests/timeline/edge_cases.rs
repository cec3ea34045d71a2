//! Edge Case Tests
//!
//! - Page and id boundaries
//! - Duplicate ids within one batch
//! - Retention
//! - Ordering and uniqueness under random batches

use crate::*;
use mediatimeline::StoreOptions;
use proptest::prelude::*;

#[test]
fn test_page_zero_is_empty() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records(1..=10)).unwrap();

    assert!(timeline.page(0).is_empty());
}

#[test]
fn test_huge_page_number_is_empty() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records(1..=10)).unwrap();

    assert!(timeline.page(usize::MAX).is_empty());
}

#[test]
fn test_exactly_one_full_page() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records(1..=50)).unwrap();

    assert_eq!(timeline.page(1).len(), 50);
    assert!(timeline.page(2).is_empty());
}

#[test]
fn test_since_max_id_is_empty() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records([u64::MAX, 1])).unwrap();

    assert_eq!(timeline.last_id(), u64::MAX);
    assert!(timeline.since(u64::MAX).is_empty());
    assert_eq!(ids(&timeline.since(1)), vec![u64::MAX]);
}

#[test]
fn test_duplicate_ids_in_batch_last_wins() {
    let timeline = Timeline::ephemeral();
    timeline
        .upsert(vec![record(4), record(4).with_favorited(true)])
        .unwrap();

    assert_eq!(timeline.len(), 1);
    assert!(timeline.get(4).unwrap().favorited);
}

#[test]
fn test_empty_batch_changes_nothing() {
    let timeline = Timeline::ephemeral();
    timeline.upsert(records([1])).unwrap();

    timeline.upsert(Vec::new()).unwrap();
    assert_eq!(ids(&timeline.page(1)), vec![1]);
}

#[test]
fn test_retention_keeps_newest() {
    let timeline = Timeline::builder()
        .options(StoreOptions::new().retention(3))
        .open_ephemeral();

    timeline.upsert(records(1..=5)).unwrap();
    assert_eq!(ids(&timeline.page(1)), vec![5, 4, 3]);

    // An older record falls straight off the end
    timeline.upsert(records([2])).unwrap();
    assert_eq!(ids(&timeline.page(1)), vec![5, 4, 3]);
}

#[test]
fn test_custom_page_size() {
    let timeline = Timeline::builder()
        .options(StoreOptions::new().page_size(4))
        .open_ephemeral();
    timeline.upsert(records(1..=10)).unwrap();

    assert_eq!(ids(&timeline.page(2)), vec![6, 5, 4, 3]);
    assert_eq!(ids(&timeline.page(3)), vec![2, 1]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_batches_keep_sequence_ordered(
        batches in prop::collection::vec(prop::collection::vec(1u64..500, 0..30), 1..8),
        deletes in prop::collection::vec(1u64..500, 0..10),
    ) {
        let timeline = Timeline::ephemeral();
        let mut expected = std::collections::BTreeSet::new();

        for batch in &batches {
            timeline.upsert(records(batch.iter().copied())).unwrap();
            expected.extend(batch.iter().copied());
        }
        for id in &deletes {
            timeline.delete(*id).unwrap();
            expected.remove(id);
        }

        let all = timeline.since(0);
        assert_descending(&all);
        prop_assert_eq!(ids(&all), expected.iter().rev().copied().collect::<Vec<_>>());
        prop_assert_eq!(timeline.last_id(), expected.iter().next_back().copied().unwrap_or(0));
    }

    #[test]
    fn prop_since_is_prefix(
        batch in prop::collection::vec(1u64..1000, 0..100),
        bound in 0u64..1000,
    ) {
        let timeline = Timeline::ephemeral();
        timeline.upsert(records(batch)).unwrap();

        let all = timeline.since(0);
        let newer = timeline.since(bound);
        prop_assert!(newer.iter().all(|r| r.id > bound));
        prop_assert_eq!(&all[..newer.len()], &newer[..]);
        prop_assert!(all[newer.len()..].iter().all(|r| r.id <= bound));
    }
}
