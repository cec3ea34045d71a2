//! Non-durable persistence
//!
//! Keeps the last saved sequence in memory. Useful for:
//! - Ephemeral stores that never touch disk
//! - Tests that count saves or inject write failures

use crate::traits::Persistence;
use mediatimeline_core::{Error, Record, Result};
use parking_lot::Mutex;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// In-memory persistence backend
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    saved: Mutex<Vec<Record>>,
    saves: AtomicU64,
    fail_writes: AtomicBool,
}

impl InMemoryPersistence {
    /// Empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose first `load` returns `records`
    pub fn with_records(records: Vec<Record>) -> Self {
        InMemoryPersistence {
            saved: Mutex::new(records),
            ..Default::default()
        }
    }

    /// Number of successful saves
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Copy of the last saved sequence
    pub fn saved(&self) -> Vec<Record> {
        self.saved.lock().clone()
    }
}

impl Persistence for InMemoryPersistence {
    fn load(&self) -> Result<Vec<Record>> {
        Ok(self.saved.lock().clone())
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::io(
                PathBuf::from("<memory>"),
                io::Error::new(io::ErrorKind::Other, "write failure injected"),
            ));
        }

        *self.saved.lock() = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }
}
