//! Notification transport that keeps deliveries in memory.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::Notification;
use crate::error::NotifyError;
use crate::ports::{NotificationTransport, Recipient};

#[derive(Debug, Default)]
pub struct MemoryTransport {
    delivered: Mutex<Vec<(Notification, Recipient)>>,
    unavailable: AtomicBool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of deliveries so far.
    pub fn delivered(&self) -> Vec<(Notification, Recipient)> {
        self.delivered.lock().clone()
    }

    /// Make every delivery fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl NotificationTransport for MemoryTransport {
    async fn deliver(
        &self,
        notification: &Notification,
        recipient: &Recipient,
    ) -> Result<(), NotifyError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(NotifyError::Unavailable("memory transport disabled".into()));
        }
        self.delivered
            .lock()
            .push((notification.clone(), recipient.clone()));
        Ok(())
    }
}
