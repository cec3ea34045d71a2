//! Main entry point for mediatimeline.
//!
//! This module provides the `Timeline` struct, a thin facade over the
//! shared [`RecordStore`] plus the settings needed to drive ingestion.

use crate::config::Config;
use crate::error::Result;
use mediatimeline_core::{Record, RecordId};
use mediatimeline_store::{
    FeedSource, IngestOptions, Ingestor, Poller, RecordStore, RefreshOutcome, StoreOptions,
    SyncReport,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// The media timeline.
///
/// Create one with [`Timeline::open`], [`Timeline::builder`] or
/// [`Timeline::from_config`]. Cloning is cheap; clones share the store.
///
/// # Example
///
/// ```ignore
/// use mediatimeline::prelude::*;
///
/// let timeline = Timeline::open("./tweets.db")?;
/// timeline.upsert(records)?;
///
/// for record in timeline.page(1) {
///     println!("{} {}", record.id, record.text);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Timeline {
    store: Arc<RecordStore>,
    ingest: IngestOptions,
    poll_interval: Duration,
}

impl Timeline {
    /// Open the timeline stored at `path` with default settings.
    ///
    /// A missing file is an empty timeline. A corrupt file is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// Open the timeline described by a config.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::builder()
            .path(&config.database)
            .options(config.store_options())
            .ingest(config.ingest_options())
            .poll_interval(config.poll_interval())
            .open()
    }

    /// Create a timeline that never touches disk.
    ///
    /// Mutations still run the full persist-then-publish path against an
    /// in-memory backend. Data is gone when the last clone is dropped.
    pub fn ephemeral() -> Self {
        Self::builder().open_ephemeral()
    }

    /// Create a builder for timeline configuration.
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    /// Shared store handle.
    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Snapshot path, if the timeline is file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.store.location()
    }

    /// Insert or replace records by id.
    pub fn upsert(&self, records: impl IntoIterator<Item = Record>) -> Result<()> {
        self.store.upsert(records).map_err(Into::into)
    }

    /// Remove a record; a missing id is a no-op.
    pub fn delete(&self, id: RecordId) -> Result<()> {
        self.store.delete(id).map_err(Into::into)
    }

    /// Newest id, or 0 when empty.
    pub fn last_id(&self) -> RecordId {
        self.store.last_id()
    }

    /// Page `n` (1-based), newest first.
    pub fn page(&self, n: usize) -> Vec<Record> {
        self.store.page(n)
    }

    /// Records newer than `id`, newest first.
    pub fn since(&self, id: RecordId) -> Vec<Record> {
        self.store.since(id)
    }

    /// Record with the given id.
    pub fn get(&self, id: RecordId) -> Option<Record> {
        self.store.get(id)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the timeline is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Ingestor filling this timeline from `source`.
    pub fn ingestor(&self, source: Arc<dyn FeedSource>) -> Ingestor {
        Ingestor::new(self.store.clone(), source, self.ingest)
    }

    /// Pull new records from `source` once.
    pub fn sync(&self, source: Arc<dyn FeedSource>, force: bool) -> Result<SyncReport> {
        self.ingestor(source).sync(force).map_err(Into::into)
    }

    /// Re-fetch one record from `source`.
    pub fn refresh(&self, source: Arc<dyn FeedSource>, id: RecordId) -> Result<RefreshOutcome> {
        self.ingestor(source).refresh(id).map_err(Into::into)
    }

    /// Favorite a record upstream and store the returned copy.
    pub fn favorite(&self, source: Arc<dyn FeedSource>, id: RecordId) -> Result<RefreshOutcome> {
        self.ingestor(source).favorite(id).map_err(Into::into)
    }

    /// Start background polling of `source`.
    ///
    /// The first sync runs immediately on the poller thread. Dropping the
    /// returned handle stops polling.
    pub fn poller(&self, source: Arc<dyn FeedSource>) -> Result<Poller> {
        Poller::spawn(self.ingestor(source), self.poll_interval).map_err(Into::into)
    }
}

/// Builder for timeline configuration.
///
/// # Example
///
/// ```ignore
/// let timeline = Timeline::builder()
///     .path("./tweets.db")
///     .options(StoreOptions::new().retention(5_000))
///     .open()?;
/// ```
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    path: Option<PathBuf>,
    options: StoreOptions,
    ingest: IngestOptions,
    poll_interval: Duration,
}

impl TimelineBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            path: None,
            options: StoreOptions::default(),
            ingest: IngestOptions::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the snapshot file path.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set store options.
    pub fn options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Set ingestion options.
    pub fn ingest(mut self, ingest: IngestOptions) -> Self {
        self.ingest = ingest;
        self
    }

    /// Set the background sync interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Open the timeline.
    ///
    /// Without a path this opens an ephemeral timeline.
    pub fn open(self) -> Result<Timeline> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => return Ok(self.open_ephemeral()),
        };
        let store = RecordStore::open_with(&path, self.options)?;
        info!("Opened timeline {} ({} records)", path.display(), store.len());
        Ok(self.finish(store))
    }

    /// Open an in-memory timeline, ignoring any path.
    pub fn open_ephemeral(self) -> Timeline {
        let store = RecordStore::ephemeral_with(self.options);
        self.finish(store)
    }

    fn finish(self, store: RecordStore) -> Timeline {
        Timeline {
            store: Arc::new(store),
            ingest: self.ingest,
            poll_interval: self.poll_interval,
        }
    }
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
