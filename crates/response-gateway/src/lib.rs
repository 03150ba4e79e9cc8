//! # Response Gateway
//!
//! Thin axum surface in front of the ingest pipeline.
//!
//! | Route | Behaviour |
//! |-------|-----------|
//! | `POST /responder/{type}` | Body handed to [`ResponderApi::handle_response`] |
//! | `GET /inviter/image` | Decrypted invite image or the placeholder JPEG |
//! | `OPTIONS *` | Answered by the CORS layer, never processed |
//! | `GET /health` | Liveness, no origin needed |
//! | `GET /metrics` | Prometheus text, only when enabled |
//!
//! Anything else below the origin guard gets the generic failure.
//!
//! ## Security
//!
//! - The owner a request acts for comes only from its `Origin`
//! - Responses never distinguish failure causes
//! - `X-Forwarded-For` is ignored unless explicitly trusted
//!
//! [`ResponderApi::handle_response`]: response_ingest::ResponderApi::handle_response

pub mod client_ip;
pub mod config;
pub mod error;
pub mod origin;
pub mod router;
pub mod service;

pub use config::{GatewayConfig, ResponseShape, DEFAULT_MAX_BODY_BYTES};
pub use error::GatewayError;
pub use origin::OriginPolicy;
pub use router::{build_router, create_cors_layer, AppState};
pub use service::ResponderGateway;
