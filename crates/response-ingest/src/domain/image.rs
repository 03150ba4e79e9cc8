//! Invite images
//!
//! An invite image is stored encrypted with a per-copy symmetric key that
//! only travels in the invite link. Anything that prevents serving the real
//! image yields the same placeholder, so a link never reveals whether its
//! copy still exists.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A 3×1 solid `#ddeeff` JPEG, base64.
pub const EXPIRED_IMAGE: &str = "/9j/4AAQSkZJRgABAQEBLAEsAAD/2wBDAAoHBwgHBgoICAgLCgoLDhgQDg0NDh0VFhEYIx8lJCIfIiEmKzcvJik0KSEiMEExNDk7Pj4+JS5ESUM8SDc9Pjv/2wBDAQoLCw4NDhwQEBw7KCIoOzs7Ozs7Ozs7Ozs7Ozs7Ozs7Ozs7Ozs7Ozs7Ozs7Ozs7Ozs7Ozs7Ozs7Ozs7Ozs7Ozv/wAARCAABAAMDAREAAhEBAxEB/8QAFAABAAAAAAAAAAAAAAAAAAAAB//EABQQAQAAAAAAAAAAAAAAAAAAAAD/xAAUAQEAAAAAAAAAAAAAAAAAAAAE/8QAFBEBAAAAAAAAAAAAAAAAAAAAAP/aAAwDAQACEQMRAD8AViR3/9k=";

/// Media type of every invite image response.
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Body of an invite image response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InviteImage {
    /// The decrypted image.
    Decrypted(Vec<u8>),
    /// The placeholder.
    Expired,
}

impl InviteImage {
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }

    /// Base64 body, for transports that carry binary bodies that way.
    pub fn to_base64(&self) -> String {
        match self {
            Self::Decrypted(bytes) => STANDARD.encode(bytes),
            Self::Expired => EXPIRED_IMAGE.to_string(),
        }
    }

    /// Raw JPEG bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Decrypted(bytes) => bytes,
            Self::Expired => STANDARD.decode(EXPIRED_IMAGE).unwrap_or_default(),
        }
    }
}
