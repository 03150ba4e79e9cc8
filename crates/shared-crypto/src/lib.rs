//! # Shared Crypto - Response Envelope Codec
//!
//! Every byte this service persists for a sender passes through here.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `url64` | URL-safe base64, `=` → `~` | Ids and keys embedded in URLs/storage keys |
//! | `symmetric` | AES-256-GCM, 96-bit IV, 128-bit tag | Invite images, encrypted sender config |
//! | `hybrid` | AES-256-GCM + RSA-OAEP(SHA-256) | Every stored response record |
//!
//! ## Security Properties
//!
//! - **Symmetric envelope**: layout is `IV(12) || ciphertext+tag`, no associated
//!   data. Every decrypt failure collapses to `CryptoError::DecryptionFailed`
//!   with no detail, so wrong keys and corrupted data look the same.
//! - **Hybrid envelope**: encrypt-only. A fresh 256-bit key per record, wrapped
//!   with the sender's public key; only the sender can ever open it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hybrid;
pub mod symmetric;
pub mod url64;

#[cfg(test)]
mod proptests;

// Re-exports
pub use errors::CryptoError;
pub use hybrid::{HybridEnvelope, ResponsePublicKey};
pub use symmetric::{SymmetricKey, IV_BYTES, KEY_BYTES, TAG_BYTES};
pub use url64::{bytes_to_url64, url64_to_bytes};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
