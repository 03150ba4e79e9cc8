//! Error types for the ingest crate's collaborators.
//!
//! Each converts into [`ResponderError`] so the pipeline can propagate with
//! `?` and still classify the failure for metrics and telemetry.

use shared_types::ResponderError;
use thiserror::Error;

/// Errors from an object store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Object not found: {key}")]
    NotFound { key: String },

    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Stored object unreadable: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Whether the object simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<StoreError> for ResponderError {
    fn from(err: StoreError) -> Self {
        ResponderError::Dependency(err.to_string())
    }
}

/// Errors from a notification transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("Sender config has no notification address")]
    MissingRecipient,

    #[error("Transport rejected notification: {0}")]
    Rejected(String),

    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

impl From<NotifyError> for ResponderError {
    fn from(err: NotifyError) -> Self {
        ResponderError::Notification(err.to_string())
    }
}

/// Invalid service configuration, found at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Messages bucket name must not be empty")]
    EmptyBucket,

    #[error("Hosted deployment needs at least one domain")]
    NoDomains,

    #[error("Invalid domain: {0:?}")]
    InvalidDomain(String),

    #[error("Reaction length limit {value} outside 1..={max}")]
    ReactionLimit { value: usize, max: usize },
}
