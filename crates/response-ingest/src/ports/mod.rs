//! Ports Layer
//!
//! - Driving port (inbound): `ResponderApi`, called by the HTTP gateway
//! - Driven ports (outbound): object store, notification transport, clock

pub mod inbound;
pub mod outbound;

pub use inbound::{
    ImageQuery, NotificationOutcome, RequestMeta, ResponderApi, ResponseReceipt, ResponseRequest,
};
pub use outbound::{
    Bucket, FixedTimeSource, NotificationTransport, ObjectStore, Recipient, SystemTimeSource,
    TimeSource,
};
