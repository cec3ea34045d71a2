//! Store configuration
//!
//! ```ignore
//! use mediatimeline_store::StoreOptions;
//!
//! let opts = StoreOptions::new().retention(5_000).compression_level(9);
//! ```

use mediatimeline_core::PAGE_SIZE;
use mediatimeline_durability::DEFAULT_COMPRESSION_LEVEL;

/// Options for opening a [`RecordStore`](crate::RecordStore)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Records per page
    pub page_size: usize,
    /// Keep at most this many newest records; `None` keeps everything
    pub retention: Option<usize>,
    /// zstd level for snapshot files
    pub compression_level: i32,
}

impl StoreOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set records per page (zero is treated as one)
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Keep at most `limit` newest records (zero is treated as one)
    pub fn retention(mut self, limit: usize) -> Self {
        self.retention = Some(limit.max(1));
        self
    }

    /// Keep every record
    pub fn unbounded(mut self) -> Self {
        self.retention = None;
        self
    }

    /// Set the zstd level used for snapshots
    pub fn compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            retention: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}
