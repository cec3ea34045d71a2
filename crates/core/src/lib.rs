//! Core types for mediatimeline
//!
//! This crate defines the fundamental types shared by every layer:
//! - [`Record`]: a stored post with its author and attached media
//! - [`Error`]: the storage error taxonomy
//! - Sizing constants such as [`PAGE_SIZE`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Media, Record, RecordId, User};

/// Number of records returned by one page of the timeline.
pub const PAGE_SIZE: usize = 50;
