//! Ingestion from an upstream feed
//!
//! The [`Ingestor`] is an ordinary caller of the [`RecordStore`]: it reads
//! `last_id()` to decide what to request and hands normalized records to
//! `upsert()`. The upstream API itself sits behind [`FeedSource`].
//!
//! ## Sync
//!
//! ```text
//! last_id == 0 or force  →  fetch_timeline(None, count)        full reload
//! otherwise              →  fetch_timeline(Some(last_id), count) incremental
//!                        →  drop records without media (if required)
//!                        →  store.upsert(..)
//! ```

use crate::store::RecordStore;
use mediatimeline_core::{Error, Record, RecordId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Error type returned by feed sources
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Upstream feed of records
pub trait FeedSource: Send + Sync {
    /// Fetch up to `count` records, newest first
    ///
    /// With `since = Some(id)` only records newer than `id` are requested.
    fn fetch_timeline(
        &self,
        since: Option<RecordId>,
        count: usize,
    ) -> Result<Vec<Record>, SourceError>;

    /// Fetch one record
    ///
    /// `Ok(None)` means the upstream no longer has it.
    fn fetch_one(&self, id: RecordId) -> Result<Option<Record>, SourceError>;

    /// Mark a record as favorited upstream
    ///
    /// Returns the record as the upstream now reports it.
    fn favorite(&self, id: RecordId) -> Result<Record, SourceError>;
}

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    /// The feed source failed
    #[error("feed source error: {0}")]
    Source(#[source] SourceError),

    /// The store rejected the change
    #[error(transparent)]
    Store(#[from] Error),
}

/// Ingestion settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Records requested per fetch
    pub fetch_count: usize,
    /// Skip records without attached images
    pub require_media: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions {
            fetch_count: 100,
            require_media: true,
        }
    }
}

/// Outcome of one sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Whether the whole timeline was requested
    pub full_reload: bool,
    /// Records returned by the source
    pub fetched: usize,
    /// Records handed to the store
    pub stored: usize,
    /// Records dropped for lacking media
    pub skipped: usize,
}

/// Outcome of refreshing or favoriting one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The upstream copy was stored
    Updated(Record),
    /// The upstream no longer has it; removed from the store
    Gone,
    /// The record no longer has media and was left as stored
    Skipped,
}

/// Pulls records from a [`FeedSource`] into a [`RecordStore`]
pub struct Ingestor {
    store: Arc<RecordStore>,
    source: Arc<dyn FeedSource>,
    options: IngestOptions,
}

impl Ingestor {
    /// Create an ingestor
    pub fn new(store: Arc<RecordStore>, source: Arc<dyn FeedSource>, options: IngestOptions) -> Self {
        Ingestor {
            store,
            source,
            options,
        }
    }

    /// Store being filled
    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Pull new records into the store
    ///
    /// Requests only records newer than the store's newest unless the store
    /// is empty or `force` is set, in which case the latest page of the
    /// timeline is re-fetched so that changed payloads (e.g. favorites) are
    /// picked up.
    pub fn sync(&self, force: bool) -> Result<SyncReport, IngestError> {
        let last_id = self.store.last_id();
        let since = if last_id > 0 && !force {
            Some(last_id)
        } else {
            None
        };

        let fetched = self
            .source
            .fetch_timeline(since, self.options.fetch_count)
            .map_err(IngestError::Source)?;

        let report_fetched = fetched.len();
        let kept = self.filter(fetched);
        let report = SyncReport {
            full_reload: since.is_none(),
            fetched: report_fetched,
            stored: kept.len(),
            skipped: report_fetched - kept.len(),
        };

        self.store.upsert(kept)?;

        if report.stored > 0 {
            info!(
                "Synced {} records ({} skipped, full reload: {})",
                report.stored, report.skipped, report.full_reload
            );
        } else {
            debug!("Sync found nothing new since {}", last_id);
        }
        Ok(report)
    }

    /// Re-fetch one record and mirror its upstream state
    pub fn refresh(&self, id: RecordId) -> Result<RefreshOutcome, IngestError> {
        match self.source.fetch_one(id).map_err(IngestError::Source)? {
            Some(record) => {
                if self.options.require_media && !record.has_media() {
                    debug!("Refreshed record {} has no media, leaving stored copy", id);
                    return Ok(RefreshOutcome::Skipped);
                }
                self.store.upsert(vec![record.clone()])?;
                Ok(RefreshOutcome::Updated(record))
            }
            None => {
                info!("Removing record {} no longer present upstream", id);
                self.store.delete(id)?;
                Ok(RefreshOutcome::Gone)
            }
        }
    }

    /// Favorite a record upstream and store the updated copy
    pub fn favorite(&self, id: RecordId) -> Result<RefreshOutcome, IngestError> {
        let record = self.source.favorite(id).map_err(IngestError::Source)?;
        if self.options.require_media && !record.has_media() {
            debug!("Favorited record {} has no media, not stored", id);
            return Ok(RefreshOutcome::Skipped);
        }

        self.store.upsert(vec![record.clone()])?;
        info!("Favorited record {}", id);
        Ok(RefreshOutcome::Updated(record))
    }

    fn filter(&self, records: Vec<Record>) -> Vec<Record> {
        if !self.options.require_media {
            return records;
        }
        records.into_iter().filter(Record::has_media).collect()
    }
}
