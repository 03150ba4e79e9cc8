//! Event Validator
//!
//! Turns the untyped request body into a [`ResponseEvent`]. Each type has a
//! fixed set of required fields with exact JSON types; anything else in the
//! body is left alone (it is recorded verbatim, never interpreted).
//!
//! Error messages carry field names only, never values.

use serde_json::Value;
use shared_types::{Content, CopyId, RawEvent, ResponseEvent, ResponseType, ValidationError};

use super::config::IngestConfig;

/// Require `key` to be a JSON string.
pub fn require_str<'a>(raw: &'a RawEvent, key: &'static str) -> Result<&'a str, ValidationError> {
    raw.get(key)
        .and_then(Value::as_str)
        .ok_or(ValidationError::InvalidField(key))
}

/// Require `key` to be a JSON boolean.
pub fn require_bool(raw: &RawEvent, key: &'static str) -> Result<bool, ValidationError> {
    raw.get(key)
        .and_then(Value::as_bool)
        .ok_or(ValidationError::InvalidField(key))
}

/// Optional `content`: absent, `null`, or a string.
fn optional_content(raw: &RawEvent) -> Result<Content, ValidationError> {
    match raw.get("content") {
        None => Ok(Content::Absent),
        Some(Value::Null) => Ok(Content::Cleared),
        Some(Value::String(text)) => Ok(Content::Text(text.clone())),
        Some(_) => Err(ValidationError::InvalidField("content")),
    }
}

/// Character allow-list for short codes such as reactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodePolicy {
    pub allow_underscore: bool,
    pub max_len: usize,
}

impl CodePolicy {
    /// Check `value` of `field`: non-empty, ASCII letters, digits and hyphen
    /// (and underscore when allowed) only, at most `max_len` characters.
    pub fn check(&self, field: &'static str, value: &str) -> Result<(), ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyField(field));
        }
        let allowed = |c: char| {
            c.is_ascii_alphanumeric() || c == '-' || (self.allow_underscore && c == '_')
        };
        if !value.chars().all(allowed) {
            return Err(ValidationError::InvalidCharacter(field));
        }
        // All ASCII from here, so bytes == chars
        if value.len() > self.max_len {
            return Err(ValidationError::TooLong {
                field,
                max: self.max_len,
            });
        }
        Ok(())
    }
}

/// Validates request bodies for one deployment's settings.
#[derive(Clone, Debug)]
pub struct EventValidator {
    legacy_types: bool,
    reactions: CodePolicy,
}

impl EventValidator {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            legacy_types: config.legacy_types,
            reactions: CodePolicy {
                allow_underscore: config.allow_underscore_in_reactions,
                max_len: config.reaction_max_len,
            },
        }
    }

    /// Resolve the declared type. Unknown and disabled types get the same
    /// generic error.
    pub fn response_type(&self, name: &str) -> Result<ResponseType, ValidationError> {
        ResponseType::parse(name, self.legacy_types)
    }

    /// Check the fields `response_type` requires and build the typed event.
    pub fn validate(
        &self,
        response_type: ResponseType,
        raw: &RawEvent,
    ) -> Result<ResponseEvent, ValidationError> {
        let event = match response_type {
            ResponseType::Read => {
                let copy_id = require_str(raw, "copy_id")?;
                let has_max_reads = require_bool(raw, "has_max_reads")?;
                ResponseEvent::Read {
                    copy_id: CopyId::new("copy_id", copy_id)?,
                    has_max_reads,
                }
            }
            ResponseType::Reply => ResponseEvent::Reply {
                content: optional_content(raw)?,
            },
            ResponseType::Reaction => {
                let content = optional_content(raw)?;
                if let Content::Text(code) = &content {
                    self.reactions.check("content", code)?;
                }
                ResponseEvent::Reaction { content }
            }
            ResponseType::Subscription => ResponseEvent::Subscription,
            ResponseType::Address => ResponseEvent::Address,
            ResponseType::Resend => ResponseEvent::Resend {
                content: optional_content(raw)?,
            },
            ResponseType::Delete => ResponseEvent::Delete {
                copy_id: CopyId::new("copy_id", require_str(raw, "copy_id")?)?,
            },
            ResponseType::Error => ResponseEvent::Error,
        };
        Ok(event)
    }
}
