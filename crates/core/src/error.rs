//! Storage error types
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | `StorageIo` | Snapshot could not be read, created, written or renamed |
//! | `StorageCorrupt` | Snapshot exists but does not decode to a record sequence |
//! | `PersistenceFailed` | A mutation could not be made durable |
//!
//! A missing snapshot file is never an error: it is an empty store.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the record store and its persistence backends
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure other than the snapshot being absent
    #[error("storage I/O error on {}: {source}", .path.display())]
    StorageIo {
        /// File the operation targeted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Snapshot content is present but cannot be decoded
    #[error("corrupt snapshot {}: {reason}", .path.display())]
    StorageCorrupt {
        /// Snapshot file
        path: PathBuf,
        /// What failed to validate
        reason: String,
    },

    /// The in-memory change could not be persisted
    ///
    /// The store does not publish the change in this case, so the in-memory
    /// sequence still matches the last durable snapshot.
    #[error("persistence failed: {source}")]
    PersistenceFailed {
        /// Error raised by the persistence backend
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Build a `StorageIo` error
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::StorageIo {
            path: path.into(),
            source,
        }
    }

    /// Build a `StorageCorrupt` error
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::StorageCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a backend error as `PersistenceFailed`
    pub fn persistence_failed(source: Error) -> Self {
        Error::PersistenceFailed {
            source: Box::new(source),
        }
    }

    /// Check if this is a corruption error
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::StorageCorrupt { .. })
    }

    /// Check if a mutation failed to persist
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Error::PersistenceFailed { .. })
    }
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, Error>;
