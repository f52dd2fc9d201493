//! Notification payloads, push messages and persisted notification records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{NotificationId, UserId};

pub const TYPE_APPROVE: &str = "TYPE_APPROVE";
pub const TYPE_COMMENT: &str = "TYPE_COMMENT";
pub const TYPE_FOLLOW: &str = "TYPE_FOLLOW";

pub const FCM_KEY_TYPE: &str = "FCM_KEY_TYPE";
pub const FCM_KEY_POST_ID: &str = "FCM_KEY_POST_ID";
pub const FCM_KEY_COMMENT_ID: &str = "FCM_KEY_COMMENT_ID";
pub const FCM_KEY_COMMENT_CONTENT: &str = "FCM_KEY_COMMENT_CONTENT";
pub const FCM_KEY_USER_ID: &str = "FCM_KEY_USER_ID";
pub const FCM_KEY_DISPLAY_NAME: &str = "FCM_KEY_DISPLAY_NAME";

/// Max characters of comment content copied into a push message.
pub const TRIMMED_CONTENT_LEN: usize = 50;

/// Discriminated notification payload.
///
/// `kind` selects the provider; `body` is decoded by that provider only, so a
/// payload nobody recognizes never fails to parse here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub body: serde_json::Value,
}

impl NotificationPayload {
    pub fn new(kind: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            body,
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveBody {
    pub token: String,
    pub post_id: String,
    pub comment_owner_id: String,
    pub post_owner_id: String,
    #[serde(default)]
    pub comment_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub token: String,
    pub post_id: String,
    pub comment_id: String,
    pub comment_owner_id: String,
    pub post_owner_id: String,
    #[serde(default)]
    pub comment_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowBody {
    pub token: String,
    pub follower_id: String,
    pub followee_id: String,
    #[serde(default)]
    pub follower_name: String,
}

/// Cut `content` to at most `TRIMMED_CONTENT_LEN` characters.
pub fn trim_content(content: &str) -> String {
    content.chars().take(TRIMMED_CONTENT_LEN).collect()
}

/// Outbound push message: a device token plus string key/value data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    pub token: String,
    pub data: BTreeMap<String, String>,
}

impl PushMessage {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn put_data(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    CommentApproved,
    NewComment,
    NewFollower,
}

/// Persisted notification entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub entity_type: NotificationType,
    pub actor: UserId,
    pub receiver: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// What a provider produces for a payload it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub message: PushMessage,
    pub notification: Notification,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_content_is_char_safe() {
        let long = "ü".repeat(80);
        let trimmed = trim_content(&long);
        assert_eq!(trimmed.chars().count(), TRIMMED_CONTENT_LEN);
        assert_eq!(trim_content("short"), "short");
    }

    #[test]
    fn payload_accepts_unknown_kind() {
        let raw = r#"{"type":"TYPE_SOMETHING_NEW","body":{"x":1}}"#;
        let payload: NotificationPayload = serde_json::from_str(raw).unwrap();
        assert!(payload.is("TYPE_SOMETHING_NEW"));
    }
}
