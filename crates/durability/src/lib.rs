//! Durability layer for mediatimeline
//!
//! This crate persists the record sequence as a single snapshot:
//! - Format: header + zstd-compressed bincode body with a CRC32 checksum
//! - SnapshotFile: atomic full rewrite via temp file + fsync + rename
//! - Persistence: the trait the store writes through
//! - InMemoryPersistence: non-durable backend for tests and ephemeral stores

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod format;
pub mod inmemory;
pub mod snapshot;
pub mod traits;

pub use format::{
    decode_records, encode_records, FormatError, SnapshotHeader, DEFAULT_COMPRESSION_LEVEL,
    SNAPSHOT_FORMAT_VERSION, SNAPSHOT_HEADER_SIZE, SNAPSHOT_MAGIC,
};
pub use inmemory::InMemoryPersistence;
pub use snapshot::{SnapshotFile, SnapshotInfo};
pub use traits::Persistence;
