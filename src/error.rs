//! Unified error type for mediatimeline.
//!
//! Wraps store, ingestion and configuration errors behind one enum so
//! callers of the facade only match on one type.

use crate::config::ConfigError;
use mediatimeline_store::IngestError;
use std::path::PathBuf;
use thiserror::Error;

/// All mediatimeline errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Snapshot could not be read or written
    #[error("storage I/O error on {}: {source}", .path.display())]
    StorageIo {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Snapshot exists but is unreadable
    #[error("corrupt snapshot {}: {reason}", .path.display())]
    StorageCorrupt {
        /// Snapshot path
        path: PathBuf,
        /// What failed to parse
        reason: String,
    },

    /// A mutation could not be persisted; the store is unchanged
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),

    /// The upstream feed failed
    #[error("feed source error: {0}")]
    Source(String),

    /// Invalid or unreadable configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error outside the snapshot path
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mediatimeline operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if the snapshot on disk is unreadable.
    ///
    /// Corruption is fatal at startup; the file must be repaired or removed.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::StorageCorrupt { .. })
    }

    /// Check if a mutation was rejected because it could not be persisted.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Error::PersistenceFailed(_))
    }

    /// Check if the upstream feed failed.
    ///
    /// Source errors are transient; the next sync may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Source(_))
    }
}

// Convert from store errors
impl From<mediatimeline_core::Error> for Error {
    fn from(e: mediatimeline_core::Error) -> Self {
        use mediatimeline_core::Error as CoreError;
        match e {
            CoreError::StorageIo { path, source } => Error::StorageIo { path, source },
            CoreError::StorageCorrupt { path, reason } => Error::StorageCorrupt { path, reason },
            CoreError::PersistenceFailed { source } => Error::PersistenceFailed(source.to_string()),
        }
    }
}

// Convert from ingestion errors
impl From<IngestError> for Error {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::Source(source) => Error::Source(source.to_string()),
            IngestError::Store(store) => store.into(),
        }
    }
}
