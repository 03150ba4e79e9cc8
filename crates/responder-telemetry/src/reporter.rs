//! Error-telemetry port.
//!
//! Fatal request failures are reported with the failure kind and request
//! metadata (source IP, user agent). A report never carries event fields:
//! recipient-submitted content must not leak out through telemetry.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;

/// One reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Failure kind (validation, crypto, dependency, ...)
    pub kind: String,
    /// Display message of the failure
    pub message: String,
    /// Requesting IP, when known
    pub source_ip: Option<String>,
    /// Requesting user agent, when known
    pub user_agent: Option<String>,
}

/// Destination for error reports.
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    /// Report a failure. Must not fail or panic.
    async fn report(&self, report: ErrorReport);
}

/// Reports through `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

#[async_trait]
impl ErrorReporter for TracingReporter {
    async fn report(&self, report: ErrorReport) {
        tracing::error!(
            kind = %report.kind,
            source_ip = report.source_ip.as_deref().unwrap_or("-"),
            user_agent = report.user_agent.as_deref().unwrap_or("-"),
            "Response request failed: {}",
            report.message
        );
    }
}

/// Drops every report (development).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

#[async_trait]
impl ErrorReporter for NullReporter {
    async fn report(&self, _report: ErrorReport) {}
}

/// Keeps reports in memory for inspection in tests.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    reports: Mutex<Vec<ErrorReport>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of reports so far.
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().clone()
    }
}

#[async_trait]
impl ErrorReporter for MemoryReporter {
    async fn report(&self, report: ErrorReport) {
        self.reports.lock().push(report);
    }
}
