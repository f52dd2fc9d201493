//! Notifier - dispatch a payload, persist the record, send the message.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::dispatcher::MessageDispatcher;
use super::provider::ProviderError;
use crate::domain::{NotificationId, NotificationPayload};
use crate::ports::{NotificationRepository, PushSender, SinkError};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Record saved and message handed to the transport.
    Sent(NotificationId),
    /// No provider recognized the payload.
    Ignored,
}

pub struct Notifier {
    dispatcher: MessageDispatcher,
    repository: Arc<dyn NotificationRepository>,
    sender: Arc<dyn PushSender>,
}

impl Notifier {
    pub fn new(
        dispatcher: MessageDispatcher,
        repository: Arc<dyn NotificationRepository>,
        sender: Arc<dyn PushSender>,
    ) -> Self {
        Self {
            dispatcher,
            repository,
            sender,
        }
    }

    /// The record is saved before the message is sent, so a transport
    /// failure never leaves a delivered push without its record.
    pub async fn notify(&self, payload: &NotificationPayload) -> Result<NotifyOutcome, NotifyError> {
        let Some(dispatch) = self.dispatcher.dispatch(payload)? else {
            return Ok(NotifyOutcome::Ignored);
        };

        self.repository.save(&dispatch.notification).await?;
        self.sender.send(&dispatch.message).await?;

        info!(
            kind = %payload.kind,
            notification_id = %dispatch.notification.id,
            receiver = %dispatch.notification.receiver,
            "Notification sent"
        );
        Ok(NotifyOutcome::Sent(dispatch.notification.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::TYPE_APPROVE;
    use crate::impls::{InMemoryNotificationRepository, RecordingPushSender};
    use crate::ports::{SnowflakeIdGenerator, SystemClock};
    use serde_json::json;

    fn notifier() -> (Notifier, Arc<InMemoryNotificationRepository>, Arc<RecordingPushSender>) {
        let repo = Arc::new(InMemoryNotificationRepository::new());
        let sender = Arc::new(RecordingPushSender::new());
        let dispatcher = MessageDispatcher::with_default_providers(
            Arc::new(SnowflakeIdGenerator::new(SystemClock, 1).unwrap()),
            Arc::new(SystemClock),
        );
        (Notifier::new(dispatcher, repo.clone(), sender.clone()), repo, sender)
    }

    #[tokio::test]
    async fn saves_and_sends_recognized_payload() {
        let (notifier, repo, sender) = notifier();
        let payload = NotificationPayload::new(
            TYPE_APPROVE,
            json!({"token": "t", "postId": "42", "commentOwnerId": "7", "postOwnerId": "3"}),
        );

        let outcome = notifier.notify(&payload).await.unwrap();

        let saved = repo.saved().await;
        assert_eq!(saved.len(), 1);
        assert_eq!(outcome, NotifyOutcome::Sent(saved[0].id));
        assert_eq!(sender.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn unrecognized_payload_touches_nothing() {
        let (notifier, repo, sender) = notifier();
        let payload = NotificationPayload::new("TYPE_UNKNOWN", json!({}));

        assert_eq!(notifier.notify(&payload).await.unwrap(), NotifyOutcome::Ignored);
        assert!(repo.saved().await.is_empty());
        assert!(sender.sent().await.is_empty());
    }
}
