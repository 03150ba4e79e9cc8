//! Sender config loading.
//!
//! Fetched from the responses bucket once per request. With encrypted
//! configs the request's `config_secret` is the key; it is removed from the
//! event either way so it never reaches a stored record.

use std::sync::Arc;

use shared_crypto::SymmetricKey;
use shared_types::{Owner, RawEvent, ResponderError, ResponderResult, SenderConfig};
use tracing::debug;

use crate::domain::{require_str, ConfigEncryption};
use crate::ports::{Bucket, ObjectStore};

/// Field carrying the config key in encrypted-config deployments.
pub const CONFIG_SECRET_FIELD: &str = "config_secret";

/// Loads sender configs from the store.
pub struct SenderConfigLoader<S: ObjectStore> {
    store: Arc<S>,
    encryption: ConfigEncryption,
}

impl<S: ObjectStore> SenderConfigLoader<S> {
    pub fn new(store: Arc<S>, encryption: ConfigEncryption) -> Self {
        Self { store, encryption }
    }

    /// Load `owner`'s config, consuming `config_secret` from `event`.
    ///
    /// # Errors
    ///
    /// - `Config` when the config is missing or unparsable
    /// - `Validation` when an encrypted config's secret is missing
    /// - `Crypto` when the secret does not open the config
    /// - `Dependency` when the store fails
    pub async fn load(&self, owner: &Owner, event: &mut RawEvent) -> ResponderResult<SenderConfig> {
        let body = self
            .store
            .get_object(Bucket::Responses, &owner.config_key())
            .await
            .map_err(|err| {
                if err.is_not_found() {
                    ResponderError::Config(format!("no sender config for '{}'", owner))
                } else {
                    err.into()
                }
            })?;

        let json = match self.encryption {
            ConfigEncryption::Plain => body,
            ConfigEncryption::Encrypted => {
                let key = SymmetricKey::from_url64(require_str(event, CONFIG_SECRET_FIELD)?)?;
                key.open(&body)?
            }
        };
        event.remove(CONFIG_SECRET_FIELD);

        let config = serde_json::from_slice(&json)
            .map_err(|e| ResponderError::Config(format!("unparsable sender config: {}", e)))?;
        debug!(owner = %owner, "Loaded sender config");
        Ok(config)
    }
}
