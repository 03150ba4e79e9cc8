//! # Response Events
//!
//! A request body arrives as an untyped JSON object ([`RawEvent`]). After
//! validation it becomes a [`ResponseEvent`]; the raw object is still what
//! gets sealed into the stored record, verbatim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CopyId, ValidationError};

/// The JSON object posted by a recipient.
pub type RawEvent = serde_json::Map<String, serde_json::Value>;

/// Declared type of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Read receipt; may advance the copy's read counter.
    Read,
    /// Free-text reply.
    Reply,
    /// Short reaction code, or `null` to clear one.
    Reaction,
    /// Subscription change (recorded only).
    Subscription,
    /// Address change (recorded only).
    Address,
    /// Request for a message to be resent.
    Resend,
    /// Legacy: recipient deletes their own copy.
    Delete,
    /// Legacy: displayer-side error report.
    Error,
}

impl ResponseType {
    /// Wire name, also used as the record namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Reply => "reply",
            Self::Reaction => "reaction",
            Self::Subscription => "subscription",
            Self::Address => "address",
            Self::Resend => "resend",
            Self::Delete => "delete",
            Self::Error => "error",
        }
    }

    /// Whether this type is disabled unless legacy types are enabled.
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Delete | Self::Error)
    }

    /// Parse a declared type, refusing legacy types unless enabled.
    ///
    /// # Errors
    ///
    /// `ValidationError::InvalidType` for anything not accepted.
    pub fn parse(name: &str, legacy_enabled: bool) -> Result<Self, ValidationError> {
        let parsed: Self = name.parse()?;
        if parsed.is_legacy() && !legacy_enabled {
            return Err(ValidationError::InvalidType);
        }
        Ok(parsed)
    }
}

impl FromStr for ResponseType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "reply" => Ok(Self::Reply),
            "reaction" => Ok(Self::Reaction),
            "subscription" => Ok(Self::Subscription),
            "address" => Ok(Self::Address),
            "resend" => Ok(Self::Resend),
            "delete" => Ok(Self::Delete),
            "error" => Ok(Self::Error),
            _ => Err(ValidationError::InvalidType),
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional plaintext `content` of a reply, reaction or resend.
///
/// Absent and `null` are different: `null` on a reaction means the recipient
/// cleared a previous reaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Content {
    /// No `content` key.
    #[default]
    Absent,
    /// `"content": null`
    Cleared,
    /// `"content": "<text>"`
    Text(String),
}

impl Content {
    /// Text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A validated response, one variant per declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEvent {
    /// Read receipt.
    Read {
        /// Recipient's copy
        copy_id: CopyId,
        /// Whether the copy tracks a max-reads limit
        has_max_reads: bool,
    },
    /// Reply.
    Reply {
        /// Plaintext, only sent when the sender wants contents notified
        content: Content,
    },
    /// Reaction.
    Reaction {
        /// Validated reaction code, or cleared
        content: Content,
    },
    /// Subscription change.
    Subscription,
    /// Address change.
    Address,
    /// Resend request.
    Resend {
        /// Optional plaintext note
        content: Content,
    },
    /// Legacy copy deletion.
    Delete {
        /// Recipient's copy
        copy_id: CopyId,
    },
    /// Legacy displayer error report.
    Error,
}

impl ResponseEvent {
    /// Declared type of this event.
    pub fn response_type(&self) -> ResponseType {
        match self {
            Self::Read { .. } => ResponseType::Read,
            Self::Reply { .. } => ResponseType::Reply,
            Self::Reaction { .. } => ResponseType::Reaction,
            Self::Subscription => ResponseType::Subscription,
            Self::Address => ResponseType::Address,
            Self::Resend { .. } => ResponseType::Resend,
            Self::Delete { .. } => ResponseType::Delete,
            Self::Error => ResponseType::Error,
        }
    }

    /// Plaintext content carried by the event, if its type has one.
    pub fn content(&self) -> &Content {
        const ABSENT: &Content = &Content::Absent;
        match self {
            Self::Reply { content } | Self::Reaction { content } | Self::Resend { content } => {
                content
            }
            _ => ABSENT,
        }
    }
}
