//! Convenient imports for mediatimeline.
//!
//! ```ignore
//! use mediatimeline::prelude::*;
//!
//! let timeline = Timeline::open("./tweets.db")?;
//! println!("newest: {}", timeline.last_id());
//! ```

// Main entry point
pub use crate::timeline::{Timeline, TimelineBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Configuration
pub use crate::config::Config;

// Record types
pub use crate::{Media, Record, RecordId, User};

// Ingestion
pub use crate::{FeedSource, IngestOptions, Poller, StoreOptions};
