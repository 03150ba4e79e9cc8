//! # Hybrid Envelope
//!
//! Seals a payload for one sender: a fresh AES-256-GCM key encrypts the data
//! through the symmetric envelope, and RSA-OAEP (SHA-256 digest, SHA-256 MGF1,
//! no label) wraps that key with the sender's public key.
//!
//! This service only ever seals. Opening requires the sender's private key,
//! which never leaves their client; the `open` feature exposes the inverse
//! for tests and sender-side tooling.

use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{bytes_to_url64, url64_to_bytes, CryptoError, SymmetricKey};

/// Smallest modulus accepted for a sender's response key.
pub const MIN_MODULUS_BITS: usize = 2048;

/// A sender's response public key (`resp_key_public`).
#[derive(Clone, Debug)]
pub struct ResponsePublicKey {
    inner: RsaPublicKey,
}

impl ResponsePublicKey {
    /// Parse a url64-encoded SubjectPublicKeyInfo DER key.
    ///
    /// # Errors
    ///
    /// `InvalidPublicKey` for bad encoding, bad DER, or a modulus shorter
    /// than [`MIN_MODULUS_BITS`].
    pub fn from_url64(encoded: &str) -> Result<Self, CryptoError> {
        let der = url64_to_bytes(encoded)
            .map_err(|_| CryptoError::InvalidPublicKey("not url64".into()))?;
        Self::from_der(&der)
    }

    /// Parse a SubjectPublicKeyInfo DER key.
    ///
    /// # Errors
    ///
    /// See [`ResponsePublicKey::from_url64`].
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let inner = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

        let bits = inner.size() * 8;
        if bits < MIN_MODULUS_BITS {
            return Err(CryptoError::InvalidPublicKey(format!(
                "modulus of {} bits is below {}",
                bits, MIN_MODULUS_BITS
            )));
        }

        Ok(Self { inner })
    }

    /// Seal `plaintext` for the holder of the matching private key.
    ///
    /// # Errors
    ///
    /// `EncryptionFailed` if either layer fails.
    pub fn seal(&self, plaintext: &[u8]) -> Result<HybridEnvelope, CryptoError> {
        let data_key = SymmetricKey::generate();
        let encrypted_data = data_key.seal(plaintext)?;

        let encrypted_key = self
            .inner
            .encrypt(
                &mut rand::rngs::OsRng,
                Oaep::new::<Sha256>(),
                data_key.as_bytes(),
            )
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

        Ok(HybridEnvelope {
            encrypted_data: bytes_to_url64(&encrypted_data),
            encrypted_key: bytes_to_url64(&encrypted_key),
        })
    }
}

/// Serialized form of a sealed response record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridEnvelope {
    /// url64(IV || AES-GCM ciphertext)
    pub encrypted_data: String,
    /// url64(RSA-OAEP wrapped data key)
    pub encrypted_key: String,
}

#[cfg(any(test, feature = "open"))]
impl HybridEnvelope {
    /// Unwrap the data key and decrypt the payload.
    ///
    /// # Errors
    ///
    /// `DecryptionFailed` for any failure, including bad encoding.
    pub fn open(&self, private_key: &rsa::RsaPrivateKey) -> Result<Vec<u8>, CryptoError> {
        let wrapped =
            url64_to_bytes(&self.encrypted_key).map_err(|_| CryptoError::DecryptionFailed)?;
        let data =
            url64_to_bytes(&self.encrypted_data).map_err(|_| CryptoError::DecryptionFailed)?;

        let key_bytes = private_key
            .decrypt(Oaep::new::<Sha256>(), &wrapped)
            .map_err(|_| CryptoError::DecryptionFailed)?;
        let data_key =
            SymmetricKey::from_slice(&key_bytes).map_err(|_| CryptoError::DecryptionFailed)?;

        data_key.open(&data)
    }
}
