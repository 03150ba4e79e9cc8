//! # Symmetric Envelope
//!
//! AES-256-GCM with a random 96-bit IV and no associated data. The envelope
//! is the IV followed by the AEAD output (ciphertext with the 128-bit tag
//! appended), which is the layout the sender's client produces for invite
//! images and encrypted config.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use zeroize::Zeroize;

use crate::{url64_to_bytes, CryptoError};

/// IV length in bytes.
pub const IV_BYTES: usize = 12;

/// Key length in bytes (256-bit).
pub const KEY_BYTES: usize = 32;

/// Authentication tag length in bytes (128-bit).
pub const TAG_BYTES: usize = 16;

/// Symmetric key (256-bit), zeroized on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SymmetricKey([u8; KEY_BYTES]);

impl SymmetricKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; KEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking its length.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` unless exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; KEY_BYTES] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: KEY_BYTES,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Decode a url64 key as supplied in query strings and request bodies.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` or `InvalidKeyLength`.
    pub fn from_url64(encoded: &str) -> Result<Self, CryptoError> {
        let mut bytes = url64_to_bytes(encoded)?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// Generate a random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        &self.0
    }

    /// Encrypt into an `IV || ciphertext` envelope with a fresh random IV.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::EncryptionFailed` if the cipher rejects the input.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let cipher = Aes256Gcm::new(self.as_bytes().into());

        let mut iv = [0u8; IV_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut iv);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&iv), plaintext)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

        let mut envelope = Vec::with_capacity(IV_BYTES + ciphertext.len());
        envelope.extend_from_slice(&iv);
        envelope.extend_from_slice(&ciphertext);
        Ok(envelope)
    }

    /// Authenticate and decrypt an `IV || ciphertext` envelope.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::DecryptionFailed` for truncation, tag mismatch
    /// or wrong key. There is no other error path.
    pub fn open(&self, envelope: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if envelope.len() < IV_BYTES + TAG_BYTES {
            return Err(CryptoError::DecryptionFailed);
        }
        let (iv, ciphertext) = envelope.split_at(IV_BYTES);

        let cipher = Aes256Gcm::new(self.as_bytes().into());
        cipher
            .decrypt(Nonce::from_slice(iv), ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}
