//! # Error Types
//!
//! Internally the responder distinguishes why a request failed. Externally it
//! never does: validation failures, authorization denials and crypto faults
//! all become the same generic failure at the boundary.

use shared_crypto::CryptoError;
use thiserror::Error;

/// Caller-fault errors found while checking a request body.
///
/// Messages name the offending field but never its value, so they are safe
/// to log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Body was not a JSON object.
    #[error("Malformed request body")]
    MalformedBody,

    /// Field missing or not of the expected JSON type.
    #[error("Invalid or missing value for '{0}'")]
    InvalidField(&'static str),

    /// Field present but empty.
    #[error("Empty string for '{0}'")]
    EmptyField(&'static str),

    /// Field contains a character outside its allow-list.
    #[error("Invalid character in '{0}'")]
    InvalidCharacter(&'static str),

    /// Field longer than permitted.
    #[error("Value for '{field}' exceeds {max} characters")]
    TooLong {
        /// Field name
        field: &'static str,
        /// Maximum length in characters
        max: usize,
    },

    /// Unrecognized response type. Deliberately says nothing else.
    #[error("Invalid response type")]
    InvalidType,

    /// An id that would not be a single safe path segment.
    #[error("Invalid path segment for '{0}'")]
    InvalidPathSegment(&'static str),
}

/// Why a sender's configuration refused a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// `allow_replies` is false
    RepliesDisabled,
    /// `allow_reactions` is false
    ReactionsDisabled,
    /// `allow_resend_requests` is false
    ResendRequestsDisabled,
    /// `allow_delete` is false
    DeleteDisabled,
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::RepliesDisabled => "replies disabled",
            Self::ReactionsDisabled => "reactions disabled",
            Self::ResendRequestsDisabled => "resend requests disabled",
            Self::DeleteDisabled => "delete disabled",
        };
        f.write_str(s)
    }
}

/// Outcome of a per-type authorization check against sender config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    /// The sender accepts this response type.
    Authorized,
    /// The sender disabled this response type. Expected traffic, not an anomaly.
    Denied(DenialReason),
}

/// Every way a response request can fail.
#[derive(Debug, Clone, Error)]
pub enum ResponderError {
    /// Missing, mistyped or malformed field.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Sender disabled this response type.
    #[error("denied: {0}")]
    Denied(DenialReason),

    /// Decrypt/verify mismatch or unusable key material.
    #[error("crypto failure: {0}")]
    Crypto(#[from] CryptoError),

    /// Sender config missing, unparsable or unusable.
    #[error("sender config error: {0}")]
    Config(String),

    /// Object store or another collaborator unreachable or misbehaving.
    #[error("dependency failure: {0}")]
    Dependency(String),

    /// Notification could not be planned or delivered.
    #[error("notification failure: {0}")]
    Notification(String),
}

impl ResponderError {
    /// Short label for logs, metrics and error-report records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Denied(_) => "denied",
            Self::Crypto(_) => "crypto",
            Self::Config(_) => "config",
            Self::Dependency(_) => "dependency",
            Self::Notification(_) => "notification",
        }
    }

    /// Metric label for a rejected request.
    pub fn reject_reason(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Denied(_) => "denied",
            Self::Crypto(_) => "crypto",
            Self::Config(_) | Self::Dependency(_) | Self::Notification(_) => "dependency",
        }
    }

    /// Whether this failure goes to error telemetry. Denials never do.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, Self::Denied(_))
    }
}

/// Result alias for responder operations.
pub type ResponderResult<T> = Result<T, ResponderError>;
