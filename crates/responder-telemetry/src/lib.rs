//! # Responder Telemetry
//!
//! Observability for the responder.
//!
//! ## Components
//!
//! - **Logging**: `tracing` subscriber, JSON in containers, pretty in development
//! - **Metrics**: Prometheus counters for responses, records and notifications
//! - **Error reporting**: the [`ErrorReporter`] port fatal failures are sent to
//!
//! ## Usage
//!
//! ```rust,ignore
//! use responder_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig {
//!     json_logs: true,
//!     ..Default::default()
//! };
//! let _guard = init_telemetry(&config)?;
//! ```
//!
//! Request payloads never reach telemetry: no event fields, no content, no
//! keys. Only kinds, field names and request metadata.

#![warn(missing_docs)]

mod config;
mod logging;
mod metrics;
mod reporter;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, register_metrics, HistogramTimer, MetricsHandle, COPIES_EXPIRED,
    INVITE_IMAGES_SERVED, NOTIFICATIONS, RECORDS_WRITTEN, REQUEST_DURATION, RESPONSES_RECEIVED,
    RESPONSES_REJECTED,
};
pub use reporter::{ErrorReport, ErrorReporter, MemoryReporter, NullReporter, TracingReporter};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration failed
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first, so anything logged during startup can be counted
    let metrics_handle = register_metrics()?;
    init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}
