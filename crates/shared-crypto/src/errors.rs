//! Crypto error types.

use thiserror::Error;

/// Envelope codec errors.
///
/// `DecryptionFailed` deliberately carries no detail: callers outside this
/// crate must not be able to tell a wrong key from tampered bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Authentication or decryption of an envelope failed
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Public key could not be parsed or is unusable
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Input was not valid url64
    #[error("Invalid url64 encoding")]
    InvalidEncoding,
}
