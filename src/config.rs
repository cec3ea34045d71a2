//! Configuration loaded from TOML.
//!
//! Every key is optional; missing keys take the defaults below.
//!
//! ```toml
//! database = "tweets.db"
//! log_level = "info"
//! page_size = 50
//! # retention = 5000
//! compression_level = 19
//! poll_interval_secs = 60
//! fetch_count = 100
//! require_media = true
//! ```

use mediatimeline_core::PAGE_SIZE;
use mediatimeline_durability::DEFAULT_COMPRESSION_LEVEL;
use mediatimeline_store::{IngestOptions, StoreOptions};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The TOML did not parse
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config value for {key}: {reason}")]
    Invalid {
        /// Offending key
        key: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Snapshot file path
    pub database: PathBuf,
    /// Default log filter
    pub log_level: String,
    /// Records per page
    pub page_size: usize,
    /// Keep at most this many newest records
    pub retention: Option<usize>,
    /// zstd level for snapshots (1..=22)
    pub compression_level: i32,
    /// Seconds between background syncs
    pub poll_interval_secs: u64,
    /// Records requested per fetch
    pub fetch_count: usize,
    /// Skip records without images
    pub require_media: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: PathBuf::from("tweets.db"),
            log_level: "info".to_string(),
            page_size: PAGE_SIZE,
            retention: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            poll_interval_secs: 60,
            fetch_count: 100,
            require_media: true,
        }
    }
}

impl Config {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the store cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(invalid("page_size", "must be at least 1"));
        }
        if self.poll_interval_secs == 0 {
            return Err(invalid("poll_interval_secs", "must be at least 1"));
        }
        if self.retention == Some(0) {
            return Err(invalid("retention", "must be at least 1; omit it to keep everything"));
        }
        if self.fetch_count == 0 {
            return Err(invalid("fetch_count", "must be at least 1"));
        }
        if !(1..=22).contains(&self.compression_level) {
            return Err(invalid(
                "compression_level",
                format!("{} is outside 1..=22", self.compression_level),
            ));
        }
        Ok(())
    }

    /// Store options derived from this config
    pub fn store_options(&self) -> StoreOptions {
        let options = StoreOptions::new()
            .page_size(self.page_size)
            .compression_level(self.compression_level);
        match self.retention {
            Some(limit) => options.retention(limit),
            None => options,
        }
    }

    /// Ingestion options derived from this config
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            fetch_count: self.fetch_count,
            require_media: self.require_media,
        }
    }

    /// Interval between background syncs
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}
