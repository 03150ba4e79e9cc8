//! # Object Keys
//!
//! Every key this service reads, writes or deletes is assembled here from
//! validated path segments. A segment is non-empty, is not `.` or `..`, and
//! contains no separator or NUL, so recipient-supplied ids cannot climb out
//! of the namespace the key was built for.
//!
//! | Bucket | Key |
//! |--------|-----|
//! | messages | `messages/{owner}/copies/{copy_id}` |
//! | messages | `messages/{owner}/invite_images/{copy_id}` |
//! | responses | `config/{owner}/config` |
//! | responses | `responses/{owner}/{type}/{unix_secs}_{uuid}` |

use std::fmt;

use uuid::Uuid;

use crate::{ResponseType, ValidationError};

/// Owner used by single-user (self-hosted) deployments.
pub const SELF_HOSTED_OWNER: &str = "_user";

const MAX_SEGMENT_LEN: usize = 256;

fn validate_segment(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let bad = value.is_empty()
        || value.len() > MAX_SEGMENT_LEN
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if bad {
        Err(ValidationError::InvalidPathSegment(field))
    } else {
        Ok(())
    }
}

/// Account whose objects a request touches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Owner(String);

impl Owner {
    /// Validate an owner segment.
    ///
    /// # Errors
    ///
    /// `InvalidPathSegment("owner")`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_segment("owner", &value)?;
        Ok(Self(value))
    }

    /// The self-hosted owner.
    pub fn self_hosted() -> Self {
        Self(SELF_HOSTED_OWNER.to_string())
    }

    /// Borrow as str.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sender config object.
    pub fn config_key(&self) -> String {
        format!("config/{}/config", self.0)
    }

    /// Prefix under which records of one type are stored.
    pub fn responses_prefix(&self, response_type: ResponseType) -> String {
        format!("responses/{}/{}/", self.0, response_type.as_str())
    }

    /// Copy object.
    pub fn copy_key(&self, copy_id: &CopyId) -> String {
        format!("messages/{}/copies/{}", self.0, copy_id.0)
    }

    /// Invite image object belonging to a copy.
    pub fn invite_image_key(&self, copy_id: &CopyId) -> String {
        format!("messages/{}/invite_images/{}", self.0, copy_id.0)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id of a recipient's copy of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CopyId(String);

impl CopyId {
    /// Validate a copy id taken from `field`.
    ///
    /// # Errors
    ///
    /// `InvalidPathSegment(field)`.
    pub fn new(field: &'static str, value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_segment(field, &value)?;
        Ok(Self(value))
    }

    /// Borrow as str.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CopyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of one stored response record.
///
/// Timestamp first so listings sort by arrival; the uuid makes retries and
/// same-second arrivals distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponseId(String);

impl ResponseId {
    /// Build `responses/{owner}/{type}/{unix_secs}_{uuid}`.
    pub fn new(owner: &Owner, response_type: ResponseType, unix_secs: u64, unique: Uuid) -> Self {
        Self(format!(
            "{}{}_{}",
            owner.responses_prefix(response_type),
            unix_secs,
            unique
        ))
    }

    /// Build with a fresh random uuid.
    pub fn generate(owner: &Owner, response_type: ResponseType, unix_secs: u64) -> Self {
        Self::new(owner, response_type, unix_secs, Uuid::new_v4())
    }

    /// Borrow as str.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
