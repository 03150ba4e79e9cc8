//! # Inbound Port - ResponderApi
//!
//! What the HTTP gateway drives. The gateway resolves the owner from the
//! request origin and passes the raw body through untouched; everything
//! else happens behind this trait.

use async_trait::async_trait;
use serde::Deserialize;
use shared_types::{Owner, ResponderResult, ResponseId};

use crate::domain::InviteImage;

/// Request metadata. Used for the record's `ip` and for error reports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

/// One POSTed response.
#[derive(Clone, Debug)]
pub struct ResponseRequest {
    pub owner: Owner,
    /// Type name taken from the request path, not yet validated
    pub response_type: String,
    /// Raw request body
    pub body: Vec<u8>,
    pub meta: RequestMeta,
}

/// What happened to the notification for an accepted response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Delivered to the transport.
    Sent,
    /// Policy decided not to notify.
    Suppressed,
    /// Composed but not delivered (development).
    Skipped,
    /// Delivery or counting failed; reported, not fatal.
    Failed,
}

impl NotificationOutcome {
    /// Metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Suppressed => "suppressed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

/// Result of an accepted response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseReceipt {
    pub record_id: ResponseId,
    pub notification: NotificationOutcome,
}

/// Query string of an invite image request.
///
/// Newer displayers send `image`, older ones `copy`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ImageQuery {
    pub copy: Option<String>,
    pub image: Option<String>,
    /// url64 symmetric key
    pub k: Option<String>,
}

impl ImageQuery {
    /// The image id, preferring `image` over `copy`.
    pub fn image_id(&self) -> Option<&str> {
        self.image.as_deref().or(self.copy.as_deref())
    }
}

/// Primary API of the responder.
#[async_trait]
pub trait ResponderApi: Send + Sync {
    /// Validate, handle, record and (maybe) notify one response.
    ///
    /// # Errors
    /// Any [`shared_types::ResponderError`]. Callers must collapse all of
    /// them into one generic failure.
    async fn handle_response(&self, request: ResponseRequest) -> ResponderResult<ResponseReceipt>;

    /// Decrypt an invite image. Never fails; any problem yields the
    /// placeholder.
    async fn invite_image(&self, owner: &Owner, query: &ImageQuery) -> InviteImage;
}
