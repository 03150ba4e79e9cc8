//! Invite image pass-through.

use std::sync::Arc;

use shared_crypto::SymmetricKey;
use shared_types::{CopyId, Owner};
use tracing::debug;

use crate::domain::InviteImage;
use crate::ports::{Bucket, ImageQuery, ObjectStore};
use responder_telemetry::INVITE_IMAGES_SERVED;

/// Decrypts invite images for display in invitations.
pub struct ImageService<S: ObjectStore> {
    store: Arc<S>,
}

impl<S: ObjectStore> ImageService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Decrypt the requested image, or fall back to the placeholder.
    pub async fn invite_image(&self, owner: &Owner, query: &ImageQuery) -> InviteImage {
        match self.decrypt(owner, query).await {
            Some(bytes) => {
                INVITE_IMAGES_SERVED.with_label_values(&["decrypted"]).inc();
                InviteImage::Decrypted(bytes)
            }
            None => {
                INVITE_IMAGES_SERVED.with_label_values(&["placeholder"]).inc();
                InviteImage::Expired
            }
        }
    }

    async fn decrypt(&self, owner: &Owner, query: &ImageQuery) -> Option<Vec<u8>> {
        let copy_id = CopyId::new("image", query.image_id()?).ok()?;
        let key = SymmetricKey::from_url64(query.k.as_deref()?).ok()?;

        let encrypted = match self
            .store
            .get_object(Bucket::Messages, &owner.invite_image_key(&copy_id))
            .await
        {
            Ok(body) => body,
            Err(err) => {
                debug!(copy_id = %copy_id, error = %err, "Invite image unavailable");
                return None;
            }
        };

        match key.open(&encrypted) {
            Ok(bytes) => Some(bytes),
            Err(_) => {
                debug!(copy_id = %copy_id, "Invite image did not decrypt");
                None
            }
        }
    }
}
