//! # Shared Types Crate
//!
//! Domain types for recipient-response ingestion.
//!
//! ## Design Principles
//!
//! - **Typed events**: an incoming body becomes a [`ResponseEvent`] whose
//!   variant carries only the fields its type requires. Handlers match on it
//!   exhaustively instead of probing a map.
//! - **Contained keys**: every object key is built from validated path
//!   segments, so no recipient-supplied id can escape its namespace.
//! - **One external failure**: [`ResponderError`] keeps the internal
//!   distinction between denials and faults; the boundary reports neither.

pub mod config;
pub mod copy;
pub mod errors;
pub mod event;
pub mod keys;

pub use config::{NotifyMode, SenderConfig};
pub use copy::{CopyTags, TagSet, MAX_READS_TAG, READS_TAG};
pub use errors::*;
pub use event::{Content, RawEvent, ResponseEvent, ResponseType};
pub use keys::{CopyId, Owner, ResponseId, SELF_HOSTED_OWNER};
