//! In-memory notification sinks (development and tests).

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::{Notification, PushMessage};
use crate::ports::{NotificationRepository, PushSender, SinkError};

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    saved: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn saved(&self) -> Vec<Notification> {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<(), SinkError> {
        self.saved.lock().await.push(notification.clone());
        Ok(())
    }
}

/// Keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingPushSender {
    sent: Mutex<Vec<PushMessage>>,
}

impl RecordingPushSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl PushSender for RecordingPushSender {
    async fn send(&self, message: &PushMessage) -> Result<(), SinkError> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

/// Logs messages instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingPushSender;

#[async_trait]
impl PushSender for LoggingPushSender {
    async fn send(&self, message: &PushMessage) -> Result<(), SinkError> {
        info!(data = ?message.data, "Push message (not sent)");
        Ok(())
    }
}
