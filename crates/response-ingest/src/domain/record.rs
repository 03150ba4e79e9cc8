//! Response Recorder payload
//!
//! A record seals `{event, ip, error?}` for the sender. The event is the
//! request body exactly as received (minus `config_secret`), so the sender's
//! client sees every field the recipient's displayer sent.

use serde::Serialize;
use shared_crypto::ResponsePublicKey;
use shared_types::{RawEvent, ResponderError};

/// Plaintext of one response record.
#[derive(Debug, Serialize)]
pub struct RecordPayload<'a> {
    pub event: &'a RawEvent,
    pub ip: Option<&'a str>,
    /// Failure kind, only on records of failed requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl RecordPayload<'_> {
    /// Seal for the sender and serialize to the stored JSON form.
    ///
    /// # Errors
    ///
    /// `Crypto` if sealing fails, `Dependency` if serialization does.
    pub fn seal(&self, key: &ResponsePublicKey) -> Result<Vec<u8>, ResponderError> {
        let plaintext = serde_json::to_vec(self)
            .map_err(|e| ResponderError::Dependency(format!("record encoding: {}", e)))?;
        let envelope = key.seal(&plaintext)?;
        serde_json::to_vec(&envelope)
            .map_err(|e| ResponderError::Dependency(format!("envelope encoding: {}", e)))
    }
}
