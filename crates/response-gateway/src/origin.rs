//! Owner resolution from the request origin.
//!
//! The displayer is always served from an origin that identifies its
//! sender. Self-hosted deployments have exactly one allowed origin and the
//! fixed `_user` owner. Hosted deployments serve each sender from
//! `https://{owner}.{root}`.

use response_ingest::{DeploymentMode, IngestConfig};
use shared_types::Owner;

use crate::error::GatewayError;

/// Decides which owner a request acts for, or rejects it.
#[derive(Clone, Debug)]
pub struct OriginPolicy {
    deployment: DeploymentMode,
    development: bool,
}

impl OriginPolicy {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            deployment: config.deployment.clone(),
            development: config.is_development(),
        }
    }

    /// Whether origin checks are skipped.
    pub fn is_open(&self) -> bool {
        self.development
    }

    /// Resolve the owner for a request with the given `Origin` header.
    ///
    /// # Errors
    ///
    /// `OriginRejected` when the origin is missing, malformed or not served
    /// by this deployment. Development skips the allow-list but a hosted
    /// request still needs an origin to name its owner.
    pub fn resolve(&self, origin: Option<&str>) -> Result<Owner, GatewayError> {
        match &self.deployment {
            DeploymentMode::SelfHosted { allowed_origin, .. } => {
                if !self.development && origin != Some(allowed_origin.as_str()) {
                    return Err(rejected(origin));
                }
                Ok(Owner::self_hosted())
            }
            DeploymentMode::Hosted { domains } => {
                let origin = origin.ok_or_else(|| rejected(None))?;
                let host = origin
                    .split_once("//")
                    .map(|(_, host)| host)
                    .ok_or_else(|| rejected(Some(origin)))?;
                let (user, root) = host.split_once('.').ok_or_else(|| rejected(Some(origin)))?;

                if !self.development {
                    let expected = format!("https://{}.{}", user, root);
                    if origin != expected || !domains.iter().any(|d| d == root) {
                        return Err(rejected(Some(origin)));
                    }
                }

                Owner::new(user).map_err(|_| rejected(Some(origin)))
            }
        }
    }
}

fn rejected(origin: Option<&str>) -> GatewayError {
    GatewayError::OriginRejected(origin.unwrap_or("<none>").to_string())
}
