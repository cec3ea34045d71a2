//! Record store for mediatimeline
//!
//! This crate implements the ordered record store and its callers:
//! - RecordStore: RwLock-guarded sequence, newest first, snapshot on every mutation
//! - StoreOptions: page size, retention, compression
//! - Ingestor: pulls records from a FeedSource into the store
//! - Poller: background thread driving the Ingestor on an interval

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ingest;
pub mod options;
pub mod poller;
pub mod store;

pub use ingest::{
    FeedSource, IngestError, IngestOptions, Ingestor, RefreshOutcome, SourceError, SyncReport,
};
pub use options::StoreOptions;
pub use poller::Poller;
pub use store::RecordStore;

// Re-export the persistence seam for callers that inject their own backend
pub use mediatimeline_durability::{InMemoryPersistence, Persistence, SnapshotFile};
