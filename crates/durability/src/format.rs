//! On-disk snapshot format
//!
//! A snapshot is one header followed by one body:
//!
//! ```text
//! ┌────────┬─────────┬──────────┬─────────┬──────────────────────────────┐
//! │ "MTLS" │ version │ body_len │ crc32   │ zstd(bincode(Vec<Record>))   │
//! │ 4 B    │ u32 LE  │ u64 LE   │ u32 LE  │ body_len bytes               │
//! └────────┴─────────┴──────────┴─────────┴──────────────────────────────┘
//! ```
//!
//! Only this format is read. Snapshots are always rewritten in full, so there
//! is no framing beyond the single body.

use byteorder::{ByteOrder, LittleEndian};
use mediatimeline_core::Record;
use thiserror::Error;

/// Magic bytes at the start of every snapshot
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"MTLS";

/// Current snapshot format version
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Size of the fixed header in bytes
pub const SNAPSHOT_HEADER_SIZE: usize = 20;

/// zstd level used when none is configured
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 19;

/// Errors decoding or encoding a snapshot
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer bytes than a header
    #[error("truncated snapshot: {len} bytes, header needs {}", SNAPSHOT_HEADER_SIZE)]
    TooShort {
        /// Bytes available
        len: usize,
    },

    /// Magic bytes did not match
    #[error("bad magic {found:?}")]
    BadMagic {
        /// Bytes found instead
        found: [u8; 4],
    },

    /// Format version this build cannot read
    #[error("unsupported snapshot format version {version}")]
    UnsupportedVersion {
        /// Version found in the header
        version: u32,
    },

    /// Body length differs from the header
    #[error("body length mismatch: header says {expected}, found {actual}")]
    LengthMismatch {
        /// Length recorded in the header
        expected: u64,
        /// Actual body length
        actual: u64,
    },

    /// Body checksum differs from the header
    #[error("checksum mismatch: header says {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch {
        /// Checksum recorded in the header
        expected: u32,
        /// Checksum of the body
        actual: u32,
    },

    /// zstd could not decompress the body
    #[error("decompression failed: {0}")]
    Decompress(String),

    /// Body did not decode into records
    #[error("decode failed: {0}")]
    Decode(String),

    /// Records could not be encoded
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Fixed-size snapshot header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    /// Format version
    pub format_version: u32,
    /// Length of the compressed body
    pub body_len: u64,
    /// CRC32 of the compressed body
    pub checksum: u32,
}

impl SnapshotHeader {
    /// Header describing `body` at the current format version
    pub fn for_body(body: &[u8]) -> Self {
        SnapshotHeader {
            format_version: SNAPSHOT_FORMAT_VERSION,
            body_len: body.len() as u64,
            checksum: crc32fast::hash(body),
        }
    }

    /// Serialize the header
    pub fn to_bytes(&self) -> [u8; SNAPSHOT_HEADER_SIZE] {
        let mut buf = [0u8; SNAPSHOT_HEADER_SIZE];
        buf[0..4].copy_from_slice(&SNAPSHOT_MAGIC);
        LittleEndian::write_u32(&mut buf[4..8], self.format_version);
        LittleEndian::write_u64(&mut buf[8..16], self.body_len);
        LittleEndian::write_u32(&mut buf[16..20], self.checksum);
        buf
    }

    /// Parse and validate the header at the start of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < SNAPSHOT_HEADER_SIZE {
            return Err(FormatError::TooShort { len: bytes.len() });
        }

        let mut found = [0u8; 4];
        found.copy_from_slice(&bytes[0..4]);
        if found != SNAPSHOT_MAGIC {
            return Err(FormatError::BadMagic { found });
        }

        let format_version = LittleEndian::read_u32(&bytes[4..8]);
        if format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion {
                version: format_version,
            });
        }

        Ok(SnapshotHeader {
            format_version,
            body_len: LittleEndian::read_u64(&bytes[8..16]),
            checksum: LittleEndian::read_u32(&bytes[16..20]),
        })
    }

    /// Check `body` against the recorded length and checksum
    pub fn verify(&self, body: &[u8]) -> Result<(), FormatError> {
        let actual = body.len() as u64;
        if actual != self.body_len {
            return Err(FormatError::LengthMismatch {
                expected: self.body_len,
                actual,
            });
        }

        let actual = crc32fast::hash(body);
        if actual != self.checksum {
            return Err(FormatError::ChecksumMismatch {
                expected: self.checksum,
                actual,
            });
        }

        Ok(())
    }
}

/// Encode `records` into a complete snapshot
pub fn encode_records(records: &[Record], compression_level: i32) -> Result<Vec<u8>, FormatError> {
    let raw = bincode::serialize(records).map_err(|e| FormatError::Encode(e.to_string()))?;
    let body = zstd::encode_all(raw.as_slice(), compression_level)
        .map_err(|e| FormatError::Encode(e.to_string()))?;

    let header = SnapshotHeader::for_body(&body);
    let mut out = Vec::with_capacity(SNAPSHOT_HEADER_SIZE + body.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode a complete snapshot into records
pub fn decode_records(bytes: &[u8]) -> Result<Vec<Record>, FormatError> {
    let header = SnapshotHeader::from_bytes(bytes)?;
    let body = &bytes[SNAPSHOT_HEADER_SIZE..];
    header.verify(body)?;

    let raw = zstd::decode_all(body).map_err(|e| FormatError::Decompress(e.to_string()))?;
    bincode::deserialize(&raw).map_err(|e| FormatError::Decode(e.to_string()))
}
