//! # Production Adapters
//!
//! Port implementations the binary wires in. The in-memory adapters used by
//! tests live in `response-ingest`.

pub mod fs_store;
pub mod http_notifier;

pub use fs_store::FsObjectStore;
pub use http_notifier::{EmailTransport, HttpNotifier, TopicTransport, EMAIL_FROM};
