//! Gateway errors.
//!
//! None of these reach a client. Request failures are collapsed into the
//! coarse status by the handlers; these cover startup and origin checks.

use thiserror::Error;

/// Gateway-level errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(#[source] std::io::Error),

    /// Server stopped with an error
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// Request origin is not one this deployment serves
    #[error("origin not allowed: {0}")]
    OriginRejected(String),
}
