//! Fixtures shared by this crate's unit tests.

use std::sync::OnceLock;

use rsa::pkcs8::EncodePublicKey;
use rsa::RsaPrivateKey;
use serde_json::Value;
use shared_types::{NotifyMode, RawEvent, SenderConfig};

/// One 2048-bit key pair per test binary; generation is slow.
pub fn keypair() -> &'static (RsaPrivateKey, String) {
    static KEYS: OnceLock<(RsaPrivateKey, String)> = OnceLock::new();
    KEYS.get_or_init(|| {
        let private = RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).unwrap();
        let der = private.to_public_key().to_public_key_der().unwrap();
        (private, shared_crypto::bytes_to_url64(der.as_bytes()))
    })
}

/// Sender config accepting every type, notifying replies and reactions.
pub fn sender_config() -> SenderConfig {
    SenderConfig {
        notify_mode: NotifyMode::RepliesAndReactions,
        notify_include_contents: false,
        allow_replies: true,
        allow_reactions: true,
        allow_resend_requests: true,
        allow_delete: false,
        resp_key_public: keypair().1.clone(),
        email: Some("sender@example.com".into()),
    }
}

pub fn object(value: Value) -> RawEvent {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}
