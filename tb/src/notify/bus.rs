//! Notification bus - broadcast channel for toast messages
//!
//! Producers (the task store) emit, consumers (the terminal front end,
//! tests) subscribe. Emitting with no subscribers drops the message.

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{Level, Notification, messages_for};
use crate::api::ApiError;

/// Default channel capacity (notifications)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Cheap-to-clone handle to the notification channel
#[derive(Debug, Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<Notification>,
}

impl NotificationBus {
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "NotificationBus::new: creating notification bus");
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn emit(&self, notification: Notification) {
        debug!(level = ?notification.level, message = %notification.message, "NotificationBus::emit");
        // no subscribers is fine
        let _ = self.tx.send(notification);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(Notification::success(message));
    }

    /// Report a failure to the user. Call exactly once per failed operation.
    pub fn report(&self, err: &ApiError) {
        warn!(kind = %err.kind(), error = %err, "task service request failed");
        for message in messages_for(err) {
            self.emit(Notification {
                level: Level::Error,
                message,
            });
        }
    }

    /// Receive every notification emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        debug!("NotificationBus::subscribe: new subscriber");
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
