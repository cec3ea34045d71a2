//! Concurrency Tests
//!
//! Readers run while a writer upserts and deletes. Every read must observe
//! one complete sequence: strictly descending, and matching some state the
//! writer actually produced.

use crate::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

const NUM_READERS: usize = 8;
const BATCHES: u64 = 200;
const BATCH_SIZE: u64 = 5;

/// Readers never see a half-applied batch
#[test]
fn test_readers_see_whole_batches() {
    let timeline = Arc::new(Timeline::ephemeral());
    let done = Arc::new(AtomicBool::new(false));
    let barrier = Arc::new(Barrier::new(NUM_READERS + 1));

    let readers: Vec<_> = (0..NUM_READERS)
        .map(|i| {
            let timeline = Arc::clone(&timeline);
            let done = Arc::clone(&done);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                let mut reads = 0;
                while !done.load(Ordering::Acquire) || reads == 0 {
                    let snapshot = if i % 2 == 0 {
                        timeline.since(0)
                    } else {
                        timeline.store().records()
                    };
                    assert_descending(&snapshot);
                    // Batches are contiguous id ranges, so a whole number
                    // of them is always visible
                    assert_eq!(snapshot.len() as u64 % BATCH_SIZE, 0);
                    if let Some(newest) = snapshot.first() {
                        assert_eq!(newest.id, snapshot.len() as u64);
                    }
                    reads += 1;
                }
            })
        })
        .collect();

    barrier.wait();
    for b in 0..BATCHES {
        let start = b * BATCH_SIZE + 1;
        // Reverse order so the store has to sort each batch
        timeline
            .upsert(records((start..start + BATCH_SIZE).rev()))
            .unwrap();
    }
    done.store(true, Ordering::Release);

    for h in readers {
        h.join().unwrap();
    }
    assert_eq!(timeline.len() as u64, BATCHES * BATCH_SIZE);
}

/// last_id and page agree with each other under concurrent writes
#[test]
fn test_last_id_monotonic_under_writes() {
    let timeline = Arc::new(Timeline::ephemeral());
    let done = Arc::new(AtomicBool::new(false));
    let barrier = Arc::new(Barrier::new(NUM_READERS + 1));

    let readers: Vec<_> = (0..NUM_READERS)
        .map(|_| {
            let timeline = Arc::clone(&timeline);
            let done = Arc::clone(&done);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                let mut last_seen = 0;
                while !done.load(Ordering::Acquire) {
                    let id = timeline.last_id();
                    assert!(id >= last_seen, "last_id went backwards: {} < {}", id, last_seen);
                    last_seen = id;

                    let page = timeline.page(1);
                    assert_descending(&page);
                    assert!(page.len() <= 50);
                }
            })
        })
        .collect();

    barrier.wait();
    for id in 1..=500 {
        timeline.upsert(vec![record(id)]).unwrap();
    }
    done.store(true, Ordering::Release);

    for h in readers {
        h.join().unwrap();
    }
    assert_eq!(timeline.last_id(), 500);
}

/// Writers from several threads serialize without losing records
#[test]
fn test_concurrent_writers_disjoint_ids() {
    const NUM_WRITERS: u64 = 6;
    const PER_WRITER: u64 = 40;

    let timeline = Arc::new(Timeline::ephemeral());
    let barrier = Arc::new(Barrier::new(NUM_WRITERS as usize));

    let writers: Vec<_> = (0..NUM_WRITERS)
        .map(|w| {
            let timeline = Arc::clone(&timeline);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                for i in 0..PER_WRITER {
                    timeline.upsert(vec![record(i * NUM_WRITERS + w + 1)]).unwrap();
                }
            })
        })
        .collect();

    for h in writers {
        h.join().unwrap();
    }

    let all = timeline.store().records();
    assert_eq!(all.len() as u64, NUM_WRITERS * PER_WRITER);
    assert_descending(&all);
}

/// Concurrent writes through a file-backed store leave a readable snapshot
#[test]
fn test_concurrent_writes_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tweets.db");
    let timeline = Arc::new(open_timeline(&path));
    let barrier = Arc::new(Barrier::new(4));

    let writers: Vec<_> = (0..4u64)
        .map(|w| {
            let timeline = Arc::clone(&timeline);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..10u64 {
                    timeline.upsert(vec![record(w * 100 + i + 1)]).unwrap();
                }
            })
        })
        .collect();
    for h in writers {
        h.join().unwrap();
    }

    let reopened = open_timeline(&path);
    assert_eq!(reopened.len(), 40);
    assert_eq!(reopened.since(0), timeline.since(0));
}
