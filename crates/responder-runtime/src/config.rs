//! # Runtime Configuration
//!
//! Everything the binary needs, read from `RESPONDER_*` environment
//! variables exactly once at startup. Components receive their slice of it
//! by value, telemetry included; nothing else reads the environment.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RESPONDER_MODE` | `self_hosted` | `self_hosted` or `hosted` |
//! | `RESPONDER_MESSAGES_BUCKET` | required when self-hosted | Messages bucket name |
//! | `RESPONDER_REGION` | required when self-hosted | Region of the displayer's S3 website |
//! | `RESPONDER_ALLOWED_ORIGIN` | derived from bucket and region | Override the self-hosted origin |
//! | `RESPONDER_DOMAINS` | required when hosted | Root domains, space or comma separated |
//! | `RESPONDER_ENV` | `production` | `development` or `production` |
//! | `RESPONDER_RECORD_FAILURES` | `false` | Record denied and failed requests too |
//! | `RESPONDER_CONFIG_ENCRYPTED` | `false` | Sender configs are symmetric envelopes |
//! | `RESPONDER_LEGACY_TYPES` | `false` | Accept `delete` and `error` |
//! | `RESPONDER_BIND_ADDR` | `0.0.0.0:8080` | Listen address |
//! | `RESPONDER_RESPONSE_SHAPE` | `status_only` | `status_only` or `success_body` |
//! | `RESPONDER_TRUST_FORWARDED_FOR` | `false` | Client IP from `X-Forwarded-For` |
//! | `RESPONDER_EXPOSE_METRICS` | `false` | Serve `/metrics` |
//! | `RESPONDER_MAX_BODY_BYTES` | `262144` | Request body limit |
//! | `RESPONDER_STORAGE_DIR` | `./data` | Root of the filesystem object store |
//! | `RESPONDER_NOTIFY_URL` | required in production | Topic or email relay endpoint |
//! | `RESPONDER_NOTIFY_TOKEN` | none | Bearer token for the relay |
//! | `RESPONDER_SERVICE_NAME` | `stello-responder` | Service name in logs |
//! | `RESPONDER_LOG_LEVEL` | `RUST_LOG`, then `info` | Log filter directives |
//! | `RESPONDER_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `RESPONDER_JSON_LOGS` | `true` in containers | JSON log lines |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use response_gateway::{GatewayConfig, ResponseShape};
use response_ingest::{
    ConfigEncryption, DeploymentMode, Environment, IngestConfig, RecordPolicy,
};
use responder_telemetry::TelemetryConfig;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },

    #[error("ingest configuration: {0}")]
    Ingest(#[from] response_ingest::ConfigError),

    #[error("gateway configuration: {0}")]
    Gateway(String),
}

/// Where notifications are relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    pub endpoint: Option<String>,
    pub auth_token: Option<String>,
    pub timeout: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            auth_token: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub ingest: IngestConfig,
    pub gateway: GatewayConfig,
    pub storage_dir: PathBuf,
    pub notifier: NotifierConfig,
    pub telemetry: TelemetryConfig,
}

impl RuntimeConfig {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self, RuntimeConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through `lookup`, which returns a variable's value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RuntimeConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let deployment = match var("RESPONDER_MODE").as_deref() {
            None | Some("self_hosted") => {
                let bucket = var("RESPONDER_MESSAGES_BUCKET")
                    .ok_or(RuntimeConfigError::Missing("RESPONDER_MESSAGES_BUCKET"))?;
                match var("RESPONDER_ALLOWED_ORIGIN") {
                    Some(allowed_origin) => DeploymentMode::SelfHosted {
                        messages_bucket: bucket,
                        allowed_origin,
                    },
                    None => {
                        let region = var("RESPONDER_REGION")
                            .ok_or(RuntimeConfigError::Missing("RESPONDER_REGION"))?;
                        DeploymentMode::self_hosted_s3(bucket, &region)
                    }
                }
            }
            Some("hosted") => DeploymentMode::Hosted {
                domains: var("RESPONDER_DOMAINS")
                    .map(|v| {
                        v.split(|c: char| c == ',' || c.is_whitespace())
                            .filter(|d| !d.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            Some(other) => {
                return Err(RuntimeConfigError::Invalid {
                    var: "RESPONDER_MODE",
                    value: other.to_string(),
                })
            }
        };

        let environment = match var("RESPONDER_ENV").as_deref() {
            None | Some("production") => Environment::Production,
            Some("development") => Environment::Development,
            Some(other) => {
                return Err(RuntimeConfigError::Invalid {
                    var: "RESPONDER_ENV",
                    value: other.to_string(),
                })
            }
        };

        let record_policy = if flag(&var, "RESPONDER_RECORD_FAILURES")? {
            RecordPolicy::IncludeFailures
        } else {
            RecordPolicy::SuccessOnly
        };
        let config_encryption = if flag(&var, "RESPONDER_CONFIG_ENCRYPTED")? {
            ConfigEncryption::Encrypted
        } else {
            ConfigEncryption::Plain
        };

        let ingest = IngestConfig::new(deployment)
            .with_environment(environment)
            .with_record_policy(record_policy)
            .with_config_encryption(config_encryption)
            .with_legacy_types(flag(&var, "RESPONDER_LEGACY_TYPES")?);

        let mut gateway = GatewayConfig::default();
        if let Some(addr) = var("RESPONDER_BIND_ADDR") {
            gateway.bind_addr = parse::<SocketAddr>("RESPONDER_BIND_ADDR", &addr)?;
        }
        gateway.response_shape = match var("RESPONDER_RESPONSE_SHAPE").as_deref() {
            None | Some("status_only") => ResponseShape::StatusOnly,
            Some("success_body") => ResponseShape::SuccessBody,
            Some(other) => {
                return Err(RuntimeConfigError::Invalid {
                    var: "RESPONDER_RESPONSE_SHAPE",
                    value: other.to_string(),
                })
            }
        };
        gateway.trust_forwarded_for = flag(&var, "RESPONDER_TRUST_FORWARDED_FOR")?;
        gateway.expose_metrics = flag(&var, "RESPONDER_EXPOSE_METRICS")?;
        if let Some(limit) = var("RESPONDER_MAX_BODY_BYTES") {
            gateway.max_body_bytes = parse("RESPONDER_MAX_BODY_BYTES", &limit)?;
        }

        let in_container =
            var("KUBERNETES_SERVICE_HOST").is_some() || var("DOCKER_CONTAINER").is_some();
        let telemetry = TelemetryConfig {
            service_name: var("RESPONDER_SERVICE_NAME")
                .unwrap_or_else(|| "stello-responder".to_string()),
            log_level: var("RESPONDER_LOG_LEVEL")
                .or_else(|| var("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),
            console_output: var("RESPONDER_CONSOLE_OUTPUT").is_none()
                || flag(&var, "RESPONDER_CONSOLE_OUTPUT")?,
            json_logs: match var("RESPONDER_JSON_LOGS") {
                Some(_) => flag(&var, "RESPONDER_JSON_LOGS")?,
                None => in_container,
            },
            environment: match environment {
                Environment::Production => "production",
                Environment::Development => "development",
            }
            .to_string(),
        };

        let config = Self {
            ingest,
            gateway,
            storage_dir: var("RESPONDER_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            notifier: NotifierConfig {
                endpoint: var("RESPONDER_NOTIFY_URL"),
                auth_token: var("RESPONDER_NOTIFY_TOKEN"),
                ..Default::default()
            },
            telemetry,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for startup.
    pub fn validate(&self) -> Result<(), RuntimeConfigError> {
        self.ingest.validate()?;
        self.gateway
            .validate()
            .map_err(|e| RuntimeConfigError::Gateway(e.to_string()))?;

        // Development composes notifications but never sends them
        if !self.ingest.is_development() && self.notifier.endpoint.is_none() {
            return Err(RuntimeConfigError::Missing("RESPONDER_NOTIFY_URL"));
        }
        Ok(())
    }
}

fn flag<F>(var: &F, key: &'static str) -> Result<bool, RuntimeConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key).map(|v| v.to_lowercase()).as_deref() {
        None | Some("false") | Some("0") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some(other) => Err(RuntimeConfigError::Invalid {
            var: key,
            value: other.to_string(),
        }),
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, RuntimeConfigError> {
    value.parse().map_err(|_| RuntimeConfigError::Invalid {
        var: key,
        value: value.to_string(),
    })
}
