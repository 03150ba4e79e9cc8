//! Domain Layer - pure response-handling logic
//!
//! - Event validation and typed dispatch
//! - Read-counter transitions
//! - Notification policy and email rendering
//! - Record payloads and invite-image bodies
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod config;
pub mod dispatcher;
pub mod email_template;
pub mod image;
pub mod notify_policy;
pub mod read_counter;
pub mod record;
pub mod validator;

pub use config::{
    ConfigEncryption, DeploymentMode, Environment, IngestConfig, RecordPolicy, MAX_REACTION_LEN,
};
pub use dispatcher::{authorize, dispatch, Dispatch, HandlerAction};
pub use email_template::{escape_html, render_email};
pub use image::{InviteImage, EXPIRED_IMAGE, IMAGE_CONTENT_TYPE};
pub use notify_policy::{
    decide, summary_line, Notification, PolicyDecision, ResponseCounts, SkipReason, SummaryRule,
};
pub use read_counter::{next_read, ReadOutcome, ReadTransition};
pub use record::RecordPayload;
pub use validator::{require_bool, require_str, CodePolicy, EventValidator};
