//! Notification payloads through the dispatcher, repository and push sender.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use courier_core::domain::notification::{
    FCM_KEY_COMMENT_CONTENT, FCM_KEY_POST_ID, FCM_KEY_TYPE, TYPE_APPROVE,
};
use courier_core::domain::{NotificationPayload, NotificationType, PushMessage, UserId};
use courier_core::impls::{InMemoryNotificationRepository, RecordingPushSender};
use courier_core::notify::{MessageDispatcher, Notifier, NotifyError, NotifyOutcome, ProviderError};
use courier_core::ports::{Clock, FixedClock, PushSender, SinkError, SnowflakeIdGenerator};
use serde_json::json;

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
}

fn dispatcher() -> MessageDispatcher {
    MessageDispatcher::with_default_providers(
        Arc::new(SnowflakeIdGenerator::new(clock(), 1).unwrap()),
        Arc::new(clock()),
    )
}

fn approve_payload() -> NotificationPayload {
    NotificationPayload::new(
        TYPE_APPROVE,
        json!({
            "token": "device-token",
            "postId": "42",
            "commentOwnerId": "7",
            "postOwnerId": "3",
            "commentContent": "Great post, thanks for writing it up",
        }),
    )
}

#[test]
fn approve_payload_builds_message_and_record() {
    let dispatch = dispatcher().dispatch(&approve_payload()).unwrap().unwrap();

    assert_eq!(dispatch.message.token, "device-token");
    assert_eq!(dispatch.message.data(FCM_KEY_TYPE), Some(TYPE_APPROVE));
    assert_eq!(dispatch.message.data(FCM_KEY_POST_ID), Some("42"));
    assert_eq!(
        dispatch.message.data(FCM_KEY_COMMENT_CONTENT),
        Some("Great post, thanks for writing it up")
    );

    let record = dispatch.notification;
    assert_eq!(record.entity_type, NotificationType::CommentApproved);
    assert_eq!(record.actor, UserId::from_raw(3));
    assert_eq!(record.receiver, UserId::from_raw(7));
    assert!(record.id.get() > 0);
    assert_eq!(record.created_at, clock().now());
}

#[test]
fn unknown_discriminator_is_absent_not_an_error() {
    let payload = NotificationPayload::new("TYPE_LIKE", json!({"token": "t"}));
    assert!(dispatcher().dispatch(&payload).unwrap().is_none());
}

#[test]
fn non_numeric_owner_id_is_rejected() {
    let payload = NotificationPayload::new(
        TYPE_APPROVE,
        json!({"token": "t", "postId": "42", "commentOwnerId": "seven", "postOwnerId": "3"}),
    );
    let err = dispatcher().dispatch(&payload).unwrap_err();
    assert!(matches!(err, ProviderError::InvalidId { field: "commentOwnerId", .. }));
}

#[tokio::test]
async fn notifier_saves_then_sends() {
    let repository = Arc::new(InMemoryNotificationRepository::new());
    let sender = Arc::new(RecordingPushSender::new());
    let notifier = Notifier::new(dispatcher(), repository.clone(), sender.clone());

    let outcome = notifier.notify(&approve_payload()).await.unwrap();

    let saved = repository.saved().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(outcome, NotifyOutcome::Sent(saved[0].id));
    assert_eq!(sender.sent().await[0].data(FCM_KEY_POST_ID), Some("42"));
}

struct DownSender;

#[async_trait]
impl PushSender for DownSender {
    async fn send(&self, _message: &PushMessage) -> Result<(), SinkError> {
        Err(SinkError::Transport("503".into()))
    }
}

#[tokio::test]
async fn transport_failure_keeps_the_saved_record() {
    let repository = Arc::new(InMemoryNotificationRepository::new());
    let notifier = Notifier::new(dispatcher(), repository.clone(), Arc::new(DownSender));

    let err = notifier.notify(&approve_payload()).await.unwrap_err();

    assert!(matches!(err, NotifyError::Sink(SinkError::Transport(_))));
    assert_eq!(repository.saved().await.len(), 1);
}
