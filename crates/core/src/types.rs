//! Record types held by the store
//!
//! - [`Record`]: a single post, identified by a [`RecordId`]
//! - [`User`]: the author of a post
//! - [`Media`]: an image attached to a post
//!
//! The store only interprets [`Record::id`]. Everything else is payload that
//! is replaced wholesale when a record with the same id is upserted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a record.
///
/// Identifiers are issued monotonically by the upstream feed, so a larger id
/// always denotes a newer post.
pub type RecordId = u64;

/// A stored post
///
/// # Examples
///
/// ```
/// use mediatimeline_core::{Record, User};
///
/// let record = Record::new(42, "hello", User::new(7, "someone"));
/// assert_eq!(record.id, 42);
/// assert!(!record.has_media());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier, the only field the store interprets
    ///
    /// JSON carries it as a decimal string so 64-bit ids survive consumers
    /// that parse numbers as doubles.
    #[serde(with = "id_format")]
    pub id: RecordId,
    /// Whether the account owner has favorited this post
    #[serde(default)]
    pub favorited: bool,
    /// Attached images
    #[serde(default)]
    pub images: Vec<Media>,
    /// When the post was published
    pub posted: DateTime<Utc>,
    /// Author of the post
    pub user: User,
    /// Post body
    pub text: String,
}

impl Record {
    /// Create a record with no media, posted now
    pub fn new(id: RecordId, text: impl Into<String>, user: User) -> Self {
        Record {
            id,
            favorited: false,
            images: Vec::new(),
            posted: Utc::now(),
            user,
            text: text.into(),
        }
    }

    /// Attach an image
    pub fn with_image(mut self, media: Media) -> Self {
        self.images.push(media);
        self
    }

    /// Set the publication time
    pub fn with_posted(mut self, posted: DateTime<Utc>) -> Self {
        self.posted = posted;
        self
    }

    /// Set the favorited flag
    pub fn with_favorited(mut self, favorited: bool) -> Self {
        self.favorited = favorited;
        self
    }

    /// Whether at least one image is attached
    pub fn has_media(&self) -> bool {
        !self.images.is_empty()
    }
}

/// Author of a post
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    /// Upstream account id
    pub id: i64,
    /// Handle without the leading `@`
    pub screen_name: String,
    /// Profile image URL
    #[serde(default)]
    pub image: String,
}

impl User {
    /// Create a user without a profile image
    pub fn new(id: i64, screen_name: impl Into<String>) -> Self {
        User {
            id,
            screen_name: screen_name.into(),
            image: String::new(),
        }
    }
}

/// An image attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Upstream media id
    pub id: i64,
    /// Image URL
    pub image: String,
}

impl Media {
    /// Create a media entry
    pub fn new(id: i64, image: impl Into<String>) -> Self {
        Media {
            id,
            image: image.into(),
        }
    }
}

/// Record ids as strings in human-readable formats, native u64 elsewhere
mod id_format {
    use super::RecordId;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(id: &RecordId, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(id)
        } else {
            serializer.serialize_u64(*id)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RecordId, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(IdVisitor)
        } else {
            deserializer.deserialize_u64(IdVisitor)
        }
    }

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = RecordId;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a record id as a decimal string or unsigned integer")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordId, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordId, E> {
            u64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordId, E> {
            v.parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}
