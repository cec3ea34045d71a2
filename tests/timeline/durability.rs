//! Durability Tests
//!
//! - State survives reopen after every mutation kind
//! - Missing snapshot starts empty
//! - Corrupt snapshot is fatal at startup
//! - Failed writes leave memory and disk unchanged

use crate::*;
use mediatimeline::{InMemoryPersistence, RecordStore, StoreOptions};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_missing_snapshot_starts_empty() {
    let dir = tempdir().unwrap();
    let timeline = open_timeline(&dir.path().join("tweets.db"));

    assert_eq!(timeline.last_id(), 0);
    assert!(!dir.path().join("tweets.db").exists());
}

#[test]
fn test_upsert_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tweets.db");

    {
        let timeline = open_timeline(&path);
        timeline.upsert(records([5, 3, 9])).unwrap();
    }

    {
        let timeline = open_timeline(&path);
        assert_eq!(timeline.last_id(), 9);
        assert_eq!(timeline.page(1), records([9, 5, 3]));
    }
}

#[test]
fn test_replacement_and_delete_persist() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tweets.db");

    {
        let timeline = open_timeline(&path);
        timeline.upsert(records([1, 2, 3])).unwrap();
        timeline.upsert(vec![record(2).with_favorited(true)]).unwrap();
        timeline.delete(3).unwrap();
    }

    {
        let timeline = open_timeline(&path);
        assert_eq!(ids(&timeline.page(1)), vec![2, 1]);
        assert!(timeline.get(2).unwrap().favorited);
    }
}

#[test]
fn test_snapshot_written_before_upsert_returns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tweets.db");

    let writer = open_timeline(&path);
    writer.upsert(records([7])).unwrap();

    // Second handle opened while the first is still alive
    let reader = open_timeline(&path);
    assert_eq!(reader.last_id(), 7);
}

#[test]
fn test_corrupt_snapshot_fails_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tweets.db");
    fs::write(&path, b"definitely not a snapshot file").unwrap();

    let err = Timeline::open(&path).unwrap_err();
    assert!(err.is_corruption(), "unexpected error: {}", err);
}

#[test]
fn test_truncated_snapshot_fails_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tweets.db");
    {
        let timeline = open_timeline(&path);
        timeline.upsert(records(1..=20)).unwrap();
    }

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    assert!(Timeline::open(&path).unwrap_err().is_corruption());
}

#[test]
fn test_failed_write_keeps_previous_state() {
    let backend = Arc::new(InMemoryPersistence::new());
    let store = RecordStore::with_persistence(backend.clone(), StoreOptions::default()).unwrap();
    store.upsert(records([1, 2])).unwrap();

    backend.set_fail_writes(true);
    let err = store.upsert(records([3])).unwrap_err();
    assert!(err.is_persistence_failure());
    assert!(store.delete(1).unwrap_err().is_persistence_failure());

    assert_eq!(ids(&store.records()), vec![2, 1]);
    assert_eq!(ids(&backend.saved()), vec![2, 1]);
}

#[test]
fn test_info_reports_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tweets.db");
    let timeline = open_timeline(&path);
    timeline.upsert(records(1..=10)).unwrap();

    let info = mediatimeline::SnapshotFile::new(&path).inspect().unwrap().unwrap();
    assert_eq!(info.record_count, 10);
    assert_eq!(info.file_size, fs::metadata(&path).unwrap().len());
}

#[test]
fn test_from_config_applies_options() {
    let dir = tempdir().unwrap();
    let config = Config {
        database: dir.path().join("tweets.db"),
        page_size: 10,
        retention: Some(25),
        ..Config::default()
    };

    {
        let timeline = Timeline::from_config(&config).unwrap();
        timeline.upsert(records(1..=40)).unwrap();
        assert_eq!(timeline.len(), 25);
        assert_eq!(timeline.page(1).len(), 10);
    }

    let timeline = Timeline::from_config(&config).unwrap();
    assert_eq!(timeline.last_id(), 40);
    assert_eq!(ids(&timeline.page(3)), (16..=20).rev().collect::<Vec<_>>());
}

#[test]
fn test_zero_retention_config_rejected_and_data_kept() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tweets.db");
    {
        let timeline = open_timeline(&path);
        timeline.upsert(records(1..=5)).unwrap();
    }

    let config = Config {
        database: path.clone(),
        retention: Some(0),
        ..Config::default()
    };
    assert!(Timeline::from_config(&config).is_err());
    assert!(Config::from_toml_str("retention = 0").is_err());

    assert_eq!(open_timeline(&path).len(), 5);
}
