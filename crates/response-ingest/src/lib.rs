//! # Response Ingest
//!
//! Handles one recipient response at a time: validates it, applies the
//! sender's permissions, runs its handler, seals it into a record only the
//! sender can open, and decides whether the sender hears about it.
//!
//! ## Pipeline
//!
//! | Step | Component | Failure |
//! |------|-----------|---------|
//! | 1 | Body must be a JSON object with string `encrypted` | validation |
//! | 2 | Declared type, legacy types only when enabled | validation (generic) |
//! | 3 | Sender config + response public key | config / crypto / dependency |
//! | 4 | `EventValidator` builds the typed event | validation |
//! | 5 | `dispatch` authorizes and picks the handler | denied |
//! | 6 | Handler (read counter, legacy delete) | dependency |
//! | 7 | Notification planned (counts read here) | non-fatal |
//! | 8 | `RecordPayload` sealed and written | dependency (fatal) |
//! | 9 | Notification delivered | non-fatal |
//!
//! Every failure leaves the crate as a [`shared_types::ResponderError`]; the
//! gateway turns all of them into the same generic response.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/  MemoryObjectStore, MemoryTransport                  │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - ResponderApi                               │
//! │  ports/outbound.rs - ObjectStore, NotificationTransport,        │
//! │                      TimeSource                                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service/  ResponderService, ImageService, SenderConfigLoader   │
//! │  domain/   validator, dispatcher, read_counter, notify_policy,  │
//! │            record, image, email_template, config                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

#[cfg(test)]
mod test_support;

pub use adapters::*;
pub use domain::*;
pub use error::{ConfigError, NotifyError, StoreError};
pub use ports::*;
pub use service::*;
