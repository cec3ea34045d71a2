//! # mediatimeline
//!
//! Durable, reverse-chronological store for media timeline posts.
//!
//! Records are kept newest first, unique by id, behind a reader/writer lock.
//! Every mutation atomically rewrites a compressed snapshot before it becomes
//! visible, so a restart always sees the last acknowledged state.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mediatimeline::prelude::*;
//!
//! let timeline = Timeline::open("./tweets.db")?;
//!
//! timeline.upsert(vec![record])?;
//! let newest = timeline.last_id();
//! let first_page = timeline.page(1);
//! let newer = timeline.since(newest);
//! timeline.delete(newest)?;
//! ```
//!
//! ## Ingestion
//!
//! A [`FeedSource`] supplies records from upstream. [`Timeline::poller`]
//! starts a background thread that pulls new records on an interval.
//!
//! ## Crates
//!
//! - `mediatimeline-core`: record types and store errors
//! - `mediatimeline-durability`: snapshot format and persistence backends
//! - `mediatimeline-store`: the record store, ingestion and polling

#![warn(missing_docs)]

mod config;
mod error;
mod timeline;

pub mod prelude;

pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use timeline::{Timeline, TimelineBuilder};

// Re-export the building blocks
pub use mediatimeline_core::{Media, Record, RecordId, User, PAGE_SIZE};
pub use mediatimeline_durability::SnapshotInfo;
pub use mediatimeline_store::{
    FeedSource, IngestOptions, Ingestor, InMemoryPersistence, Persistence, Poller, RecordStore,
    RefreshOutcome, SnapshotFile, SourceError, StoreOptions, SyncReport,
};
