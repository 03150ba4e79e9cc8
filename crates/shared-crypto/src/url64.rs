//! # url64
//!
//! URL-safe base64 with the `=` padding character swapped for `~`, so encoded
//! values can sit unescaped inside URLs and object keys. Matches the encoding
//! the sender's client uses for keys and stored records.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

use crate::CryptoError;

/// Encode bytes as url64.
pub fn bytes_to_url64(bytes: &[u8]) -> String {
    URL_SAFE.encode(bytes).replace('=', "~")
}

/// Decode a url64 string.
///
/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` for anything that is not canonical
/// padded url-safe base64 once `~` is mapped back to `=`.
pub fn url64_to_bytes(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    URL_SAFE
        .decode(encoded.replace('~', "="))
        .map_err(|_| CryptoError::InvalidEncoding)
}
