//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::GatewayError;

/// Largest accepted request body unless configured otherwise.
pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;

/// How success and failure are reported to the displayer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// Empty body, 200 on success and 400 on any failure.
    #[default]
    StatusOnly,
    /// Always 200 with `{"success": bool}`.
    SuccessBody,
}

/// HTTP surface configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address
    pub bind_addr: SocketAddr,
    pub response_shape: ResponseShape,
    /// Take the client IP from `X-Forwarded-For` (only behind a proxy that sets it)
    pub trust_forwarded_for: bool,
    /// Serve Prometheus text at `/metrics`
    pub expose_metrics: bool,
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 8080),
            response_shape: ResponseShape::default(),
            trust_forwarded_for: false,
            expose_metrics: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.max_body_bytes == 0 {
            return Err(GatewayError::Config("max_body_bytes cannot be 0".into()));
        }
        Ok(())
    }
}
