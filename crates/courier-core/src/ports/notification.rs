//! Notification sinks: record persistence and push transport.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Notification, PushMessage};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("notification store failed: {0}")]
    Store(String),

    #[error("push transport failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn save(&self, notification: &Notification) -> Result<(), SinkError>;
}

#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, message: &PushMessage) -> Result<(), SinkError>;
}
