//! Persistence trait
//!
//! The store holds its sequence in memory and mirrors every mutation through
//! a [`Persistence`] backend:
//!
//! - [`SnapshotFile`](crate::SnapshotFile): durable, atomic full rewrite
//! - [`InMemoryPersistence`](crate::InMemoryPersistence): no disk I/O
//!
//! Backends are called with the store's write lock held, so at most one
//! `save` runs at a time per store.

use mediatimeline_core::{Record, Result};
use std::fmt;
use std::path::Path;

/// Durable mirror of a record sequence
pub trait Persistence: Send + Sync + fmt::Debug {
    /// Load the last saved sequence
    ///
    /// Returns an empty sequence when nothing has been saved yet.
    fn load(&self) -> Result<Vec<Record>>;

    /// Replace the saved sequence with `records`
    ///
    /// Must not return until the write is complete. On error the previously
    /// saved sequence must still be loadable.
    fn save(&self, records: &[Record]) -> Result<()>;

    /// Location of the durable copy, if any
    fn location(&self) -> Option<&Path> {
        None
    }

    /// Whether saved data survives process restart
    fn is_durable(&self) -> bool;
}
