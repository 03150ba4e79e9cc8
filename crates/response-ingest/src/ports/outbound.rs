//! Outbound (Driven) ports.
//!
//! The object store holding copies, configs and records, the channel that
//! carries notifications, and the clock. Error telemetry is the
//! `responder_telemetry::ErrorReporter` port.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::TagSet;

use crate::domain::Notification;
use crate::error::{NotifyError, StoreError};

/// The two buckets a deployment uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Copies and invite images (written by the sender's client)
    Messages,
    /// Sender configs and response records
    Responses,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Messages => f.write_str("messages"),
            Self::Responses => f.write_str("responses"),
        }
    }
}

/// Object store operations the responder relies on.
///
/// The store is assumed durable. No operation here is conditional, so
/// read-modify-write sequences built on it are not atomic.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's body.
    ///
    /// # Errors
    /// `StoreError::NotFound` if absent.
    async fn get_object(&self, bucket: Bucket, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Create or replace an object. Replacing drops its tags.
    async fn put_object(&self, bucket: Bucket, key: &str, body: Vec<u8>)
        -> Result<(), StoreError>;

    /// Delete an object. Deleting an absent object succeeds.
    async fn delete_object(&self, bucket: Bucket, key: &str) -> Result<(), StoreError>;

    /// Fetch an object's tags.
    ///
    /// # Errors
    /// `StoreError::NotFound` if the object is absent.
    async fn get_tags(&self, bucket: Bucket, key: &str) -> Result<TagSet, StoreError>;

    /// Replace an object's whole tag set.
    ///
    /// # Errors
    /// `StoreError::NotFound` if the object is absent.
    async fn put_tags(&self, bucket: Bucket, key: &str, tags: TagSet) -> Result<(), StoreError>;

    /// Number of objects whose key starts with `prefix`.
    async fn count_prefix(&self, bucket: Bucket, prefix: &str) -> Result<u64, StoreError>;
}

/// Where a notification goes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "address", rename_all = "snake_case")]
pub enum Recipient {
    /// The deployment's broadcast topic (self-hosted).
    Topic,
    /// The sender's email address (hosted).
    Email(String),
}

/// Carries notifications to senders.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn deliver(
        &self,
        notification: &Notification,
        recipient: &Recipient,
    ) -> Result<(), NotifyError>;
}

/// Time source, abstracted for deterministic record ids in tests.
pub trait TimeSource: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now_secs(&self) -> u64;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_secs(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Fixed time source for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub u64);

impl TimeSource for FixedTimeSource {
    fn now_secs(&self) -> u64 {
        self.0
    }
}
