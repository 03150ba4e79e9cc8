//! Ingest configuration
//!
//! Built once at startup and shared behind an `Arc`. Nothing in this crate
//! reads the process environment; the runtime binary does that and hands
//! the result in.

use serde::{Deserialize, Serialize};
use shared_types::Owner;

use crate::error::ConfigError;

/// Longest reaction code ever accepted.
pub const MAX_REACTION_LEN: usize = 25;

/// Where the responder runs and whom it serves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DeploymentMode {
    /// One sender with their own buckets. Notifications go to a topic.
    SelfHosted {
        /// Messages bucket, also used to tag notification subjects
        messages_bucket: String,
        /// Only origin allowed to call the responder
        allowed_origin: String,
    },
    /// Many senders, each on a subdomain of one of `domains`. Notifications
    /// are emailed.
    Hosted {
        /// Root domains senders' displayers are served from
        domains: Vec<String>,
    },
}

impl DeploymentMode {
    /// Self-hosted deployment whose displayer is served from S3 website
    /// hosting in `region`.
    pub fn self_hosted_s3(messages_bucket: impl Into<String>, region: &str) -> Self {
        let messages_bucket = messages_bucket.into();
        let allowed_origin = format!("https://{}.s3-{}.amazonaws.com", messages_bucket, region);
        Self::SelfHosted {
            messages_bucket,
            allowed_origin,
        }
    }

    /// Text appended to notification subjects, so senders with several
    /// profiles can tell them apart.
    pub fn subject_tag(&self, owner: &Owner) -> String {
        match self {
            Self::SelfHosted {
                messages_bucket, ..
            } => messages_bucket.clone(),
            Self::Hosted { .. } => owner.as_str().to_string(),
        }
    }

    /// Whether this is a multi-sender deployment.
    pub fn is_hosted(&self) -> bool {
        matches!(self, Self::Hosted { .. })
    }
}

/// Deployment environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Origin checks off, notifications not delivered, no error reports.
    Development,
    #[default]
    Production,
}

/// Whether a failed request still leaves a record for the sender.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// Only successful requests are recorded.
    #[default]
    SuccessOnly,
    /// A denial or handler fault after the sender config loaded is recorded
    /// with its error kind before the request fails.
    IncludeFailures,
}

/// How sender configs are stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigEncryption {
    /// Plain JSON.
    #[default]
    Plain,
    /// Symmetric envelope keyed by the request's `config_secret`.
    Encrypted,
}

/// Configuration of the ingest pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    pub deployment: DeploymentMode,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub record_policy: RecordPolicy,
    #[serde(default)]
    pub config_encryption: ConfigEncryption,
    /// Accept the retired `delete` and `error` types
    #[serde(default)]
    pub legacy_types: bool,
    #[serde(default)]
    pub allow_underscore_in_reactions: bool,
    #[serde(default = "default_reaction_max_len")]
    pub reaction_max_len: usize,
}

fn default_reaction_max_len() -> usize {
    MAX_REACTION_LEN
}

impl IngestConfig {
    /// Production config with defaults for everything but the deployment.
    pub fn new(deployment: DeploymentMode) -> Self {
        Self {
            deployment,
            environment: Environment::default(),
            record_policy: RecordPolicy::default(),
            config_encryption: ConfigEncryption::default(),
            legacy_types: false,
            allow_underscore_in_reactions: false,
            reaction_max_len: MAX_REACTION_LEN,
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_record_policy(mut self, policy: RecordPolicy) -> Self {
        self.record_policy = policy;
        self
    }

    pub fn with_config_encryption(mut self, encryption: ConfigEncryption) -> Self {
        self.config_encryption = encryption;
        self
    }

    pub fn with_legacy_types(mut self, enabled: bool) -> Self {
        self.legacy_types = enabled;
        self
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Check invariants that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.deployment {
            DeploymentMode::SelfHosted {
                messages_bucket, ..
            } => {
                if messages_bucket.trim().is_empty() {
                    return Err(ConfigError::EmptyBucket);
                }
            }
            DeploymentMode::Hosted { domains } => {
                if domains.is_empty() {
                    return Err(ConfigError::NoDomains);
                }
                if let Some(bad) = domains
                    .iter()
                    .find(|d| d.is_empty() || d.contains(['/', ' ']) || d.starts_with('.'))
                {
                    return Err(ConfigError::InvalidDomain(bad.clone()));
                }
            }
        }

        if self.reaction_max_len == 0 || self.reaction_max_len > MAX_REACTION_LEN {
            return Err(ConfigError::ReactionLimit {
                value: self.reaction_max_len,
                max: MAX_REACTION_LEN,
            });
        }

        Ok(())
    }
}
