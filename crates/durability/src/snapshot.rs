//! Snapshot file management
//!
//! Every save rewrites the whole snapshot. The write sequence is:
//!
//! 1. Encode records into a complete snapshot buffer
//! 2. Write it to a uniquely named temp file in the destination directory
//! 3. fsync the temp file
//! 4. Rename the temp file over the destination
//! 5. fsync the directory (Unix)
//!
//! The rename is the commit point. A failure before it leaves the old
//! snapshot in place and the temp file is removed; a failure to fsync the
//! directory afterwards is logged and the save still counts as done, since
//! the new snapshot is already the one a reader will load.
//!
//! Temp names are unique per save, so two processes writing the same
//! snapshot never share a temp file. Whichever rename lands last wins.

use crate::format::{decode_records, encode_records, SnapshotHeader, DEFAULT_COMPRESSION_LEVEL};
use crate::traits::Persistence;
use mediatimeline_core::{Error, Record, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

type DirSync = fn(&Path) -> io::Result<()>;

/// Snapshot-backed persistence
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
    compression_level: i32,
    dir_sync: DirSync,
}

/// Metadata about a snapshot on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    /// Snapshot path
    pub path: PathBuf,
    /// Total file size in bytes
    pub file_size: u64,
    /// Header format version
    pub format_version: u32,
    /// Compressed body length
    pub body_len: u64,
    /// CRC32 of the body
    pub checksum: u32,
    /// Number of records in the snapshot
    pub record_count: usize,
}

impl SnapshotFile {
    /// Snapshot at `path` with the default compression level
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_compression(path, DEFAULT_COMPRESSION_LEVEL)
    }

    /// Snapshot at `path` with an explicit zstd level
    pub fn with_compression(path: impl Into<PathBuf>, compression_level: i32) -> Self {
        SnapshotFile {
            path: path.into(),
            compression_level,
            dir_sync: sync_dir,
        }
    }

    /// Snapshot path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configured zstd level
    pub fn compression_level(&self) -> i32 {
        self.compression_level
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Read the snapshot
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn read(&self) -> Result<Option<Vec<Record>>> {
        let bytes = match read_if_exists(&self.path)? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        let records =
            decode_records(&bytes).map_err(|e| Error::corrupt(&self.path, e.to_string()))?;
        Ok(Some(records))
    }

    /// Atomically replace the snapshot with `records`
    ///
    /// Returns an error only if the snapshot at the destination is still the
    /// previous one.
    pub fn write(&self, records: &[Record]) -> Result<()> {
        let bytes = encode_records(records, self.compression_level)
            .map_err(|e| Error::io(&self.path, io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

        // Dropping an unpersisted temp file removes it
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| Error::io(&dir, e))?;
        tmp.write_all(&bytes)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| Error::io(tmp.path(), e))?;

        tmp.persist(&self.path)
            .map_err(|e| Error::io(&self.path, e.error))?;

        if let Err(e) = (self.dir_sync)(&dir) {
            warn!(
                "Snapshot {} replaced but directory fsync failed: {}",
                self.path.display(),
                e
            );
        }

        debug!(
            "Wrote snapshot {} ({} records, {} bytes)",
            self.path.display(),
            records.len(),
            bytes.len()
        );
        Ok(())
    }

    /// Read header metadata and count records without keeping them
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn inspect(&self) -> Result<Option<SnapshotInfo>> {
        let bytes = match read_if_exists(&self.path)? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        let header = SnapshotHeader::from_bytes(&bytes)
            .map_err(|e| Error::corrupt(&self.path, e.to_string()))?;
        let records =
            decode_records(&bytes).map_err(|e| Error::corrupt(&self.path, e.to_string()))?;

        Ok(Some(SnapshotInfo {
            path: self.path.clone(),
            file_size: bytes.len() as u64,
            format_version: header.format_version,
            body_len: header.body_len,
            checksum: header.checksum,
            record_count: records.len(),
        }))
    }

    #[cfg(test)]
    pub(crate) fn with_dir_sync(mut self, dir_sync: DirSync) -> Self {
        self.dir_sync = dir_sync;
        self
    }
}

impl Persistence for SnapshotFile {
    fn load(&self) -> Result<Vec<Record>> {
        match self.read()? {
            Some(records) => {
                info!(
                    "Loaded {} records from snapshot {}",
                    records.len(),
                    self.path.display()
                );
                Ok(records)
            }
            None => {
                info!(
                    "No snapshot at {}, starting with an empty store",
                    self.path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        self.write(records)
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn is_durable(&self) -> bool {
        true
    }
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
