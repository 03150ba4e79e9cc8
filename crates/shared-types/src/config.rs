//! Sender configuration as uploaded by the sender's client.
//!
//! Stored at `config/{owner}/config`. Fetched once per request and never
//! cached beyond it. Fields the responder does not use (`version`,
//! `subscribe_forms`, ...) are ignored.

use serde::{Deserialize, Serialize};

/// When the sender wants to be notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyMode {
    /// Never notify.
    None,
    /// Notify only for the first unseen reply, without contents.
    FirstNewReply,
    /// Notify for replies and resend requests.
    Replies,
    /// Notify for replies, resend requests and reactions.
    RepliesAndReactions,
}

/// Per-sender settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderConfig {
    /// Notification policy
    pub notify_mode: NotifyMode,

    /// Include reply/reaction text in notifications
    #[serde(default)]
    pub notify_include_contents: bool,

    /// Accept `reply` responses
    #[serde(default)]
    pub allow_replies: bool,

    /// Accept `reaction` responses
    #[serde(default)]
    pub allow_reactions: bool,

    /// Accept `resend` responses
    #[serde(default)]
    pub allow_resend_requests: bool,

    /// Accept legacy `delete` responses
    #[serde(default)]
    pub allow_delete: bool,

    /// url64 SubjectPublicKeyInfo DER of the sender's response key
    pub resp_key_public: String,

    /// Notification address (hosted deployments)
    #[serde(default)]
    pub email: Option<String>,
}
