//! Ordered record store
//!
//! Holds the record sequence sorted strictly descending by id (newest first)
//! and mirrors it through a [`Persistence`] backend on every mutation.
//!
//! # Invariants
//!
//! - At most one record per id
//! - Sorted descending by id whenever no mutation is in progress
//! - A mutation is published only after its snapshot write succeeded
//!
//! # Locking
//!
//! One `RwLock` guards the sequence. Reads (`last_id`, `page`, `since`, `get`)
//! take the shared lock and return owned copies. Mutations (`upsert`,
//! `delete`) hold the exclusive lock across both the in-memory change and the
//! synchronous snapshot write, so saves are serialized and no reader ever
//! sees a half-applied change.
//!
//! # Failure
//!
//! Mutations build the next sequence beside the current one, save it, and
//! only then swap it in. When the save fails the caller gets
//! [`Error::PersistenceFailed`] and the store keeps serving the last durable
//! sequence.

use crate::options::StoreOptions;
use mediatimeline_core::{Error, Record, RecordId, Result};
use mediatimeline_durability::{InMemoryPersistence, Persistence, SnapshotFile};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error};

/// Thread-safe ordered record store
///
/// Share it between threads as `Arc<RecordStore>`.
///
/// # Example
///
/// ```ignore
/// use mediatimeline_store::RecordStore;
///
/// let store = RecordStore::open("tweets.db")?;
/// store.upsert(records)?;
/// let newest = store.page(1);
/// let fresh = store.since(client_last_seen);
/// ```
#[derive(Debug)]
pub struct RecordStore {
    records: RwLock<Vec<Record>>,
    persistence: Arc<dyn Persistence>,
    options: StoreOptions,
}

impl RecordStore {
    /// Open the store backed by the snapshot at `location`
    ///
    /// A missing snapshot yields an empty store.
    ///
    /// # Errors
    ///
    /// - `StorageIo` if the snapshot exists but cannot be read
    /// - `StorageCorrupt` if the snapshot does not decode
    pub fn open(location: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(location, StoreOptions::default())
    }

    /// Open with explicit options
    pub fn open_with(location: impl Into<PathBuf>, options: StoreOptions) -> Result<Self> {
        let backend = SnapshotFile::with_compression(location, options.compression_level);
        Self::with_persistence(Arc::new(backend), options)
    }

    /// Store that never touches disk
    pub fn ephemeral() -> Self {
        Self::ephemeral_with(StoreOptions::default())
    }

    /// In-memory store with explicit options
    pub fn ephemeral_with(options: StoreOptions) -> Self {
        RecordStore {
            records: RwLock::new(Vec::new()),
            persistence: Arc::new(InMemoryPersistence::new()),
            options,
        }
    }

    /// Open on top of any persistence backend
    ///
    /// Loaded records are normalized: sorted descending by id with duplicate
    /// ids collapsed to their first occurrence.
    pub fn with_persistence(
        persistence: Arc<dyn Persistence>,
        options: StoreOptions,
    ) -> Result<Self> {
        let mut records = persistence.load()?;
        normalize(&mut records);

        Ok(RecordStore {
            records: RwLock::new(records),
            persistence,
            options,
        })
    }

    /// Insert new records and replace existing ones with the same id
    ///
    /// The batch may arrive in any order; the resulting sequence is ordered
    /// by id alone. If the batch holds several records with one id, the last
    /// one wins. Applying the same batch twice leaves the same sequence.
    ///
    /// An empty batch changes nothing and writes nothing.
    ///
    /// # Errors
    ///
    /// `PersistenceFailed` if the snapshot write fails. The store is left
    /// unchanged in that case.
    pub fn upsert<I>(&self, batch: I) -> Result<()>
    where
        I: IntoIterator<Item = Record>,
    {
        let batch: Vec<Record> = batch.into_iter().collect();
        if batch.is_empty() {
            return Ok(());
        }

        let mut records = self.records.write();
        let mut next = records.clone();
        let mut positions: HashMap<RecordId, usize> =
            next.iter().enumerate().map(|(i, r)| (r.id, i)).collect();

        let (mut inserted, mut replaced) = (0usize, 0usize);
        for record in batch {
            match positions.get(&record.id) {
                Some(&i) => {
                    next[i] = record;
                    replaced += 1;
                }
                None => {
                    positions.insert(record.id, next.len());
                    next.push(record);
                    inserted += 1;
                }
            }
        }

        next.sort_unstable_by(|a, b| b.id.cmp(&a.id));

        let mut evicted = 0;
        if let Some(limit) = self.options.retention {
            // Never trim below the newest record
            let limit = limit.max(1);
            evicted = next.len().saturating_sub(limit);
            next.truncate(limit);
        }

        self.persist(&next)?;
        *records = next;

        debug!(
            "Upserted {} new, {} replaced, {} evicted; {} records stored",
            inserted,
            replaced,
            evicted,
            records.len()
        );
        Ok(())
    }

    /// Remove the record with `id`
    ///
    /// Deleting an unknown id succeeds without writing a snapshot.
    ///
    /// # Errors
    ///
    /// `PersistenceFailed` if the snapshot write fails. The record stays in
    /// the store in that case.
    pub fn delete(&self, id: RecordId) -> Result<()> {
        let mut records = self.records.write();

        let pos = match position(&records, id) {
            Some(pos) => pos,
            None => {
                debug!("Delete of unknown record {} ignored", id);
                return Ok(());
            }
        };

        let mut next = records.clone();
        next.remove(pos);

        self.persist(&next)?;
        *records = next;

        debug!("Deleted record {}; {} records stored", id, records.len());
        Ok(())
    }

    /// Id of the newest record, or 0 when empty
    pub fn last_id(&self) -> RecordId {
        self.records.read().first().map_or(0, |r| r.id)
    }

    /// Page `n` of the timeline, 1-indexed
    ///
    /// Page `n` covers offsets `(n-1)*page_size` up to `n*page_size - 1`.
    /// Pages past the end are empty and the last page may be short. Page 0
    /// does not exist and is returned empty.
    pub fn page(&self, n: usize) -> Vec<Record> {
        let size = self.options.page_size;
        let start = match n.checked_sub(1).and_then(|i| i.checked_mul(size)) {
            Some(start) => start,
            None => return Vec::new(),
        };

        let records = self.records.read();
        if start >= records.len() {
            return Vec::new();
        }

        let end = start.saturating_add(size).min(records.len());
        records[start..end].to_vec()
    }

    /// Every record newer than `id`, newest first
    pub fn since(&self, id: RecordId) -> Vec<Record> {
        self.records
            .read()
            .iter()
            .take_while(|r| r.id > id)
            .cloned()
            .collect()
    }

    /// Look up one record by id
    pub fn get(&self, id: RecordId) -> Option<Record> {
        let records = self.records.read();
        position(&records, id).map(|pos| records[pos].clone())
    }

    /// Copy of the whole sequence, newest first
    pub fn records(&self) -> Vec<Record> {
        self.records.read().clone()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Snapshot location, if the store is file-backed
    pub fn location(&self) -> Option<&Path> {
        self.persistence.location()
    }

    /// Whether mutations survive restart
    pub fn is_durable(&self) -> bool {
        self.persistence.is_durable()
    }

    /// Options this store was opened with
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    fn persist(&self, next: &[Record]) -> Result<()> {
        self.persistence.save(next).map_err(|e| {
            error!("Snapshot write failed, change not applied: {}", e);
            Error::persistence_failed(e)
        })
    }
}

/// Binary search in a sequence sorted descending by id
fn position(records: &[Record], id: RecordId) -> Option<usize> {
    records.binary_search_by(|r| id.cmp(&r.id)).ok()
}

fn normalize(records: &mut Vec<Record>) {
    records.sort_by(|a, b| b.id.cmp(&a.id));
    records.dedup_by_key(|r| r.id);
}
