//! Telemetry configuration. Built by the binary from its runtime
//! configuration; this crate never reads the environment.

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name for logs
    pub service_name: String,

    /// `EnvFilter` directives, e.g. `info` or `response_ingest=debug,info`
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Deployment environment (development, production)
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "stello-responder".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            environment: "production".to_string(),
        }
    }
}
