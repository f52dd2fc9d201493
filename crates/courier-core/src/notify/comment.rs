//! `TYPE_COMMENT`: someone commented on a post.

use std::sync::Arc;

use super::provider::{MessageProvider, ProviderError, decode_body, parse_id};
use crate::domain::ids::{Comment, Post, User};
use crate::domain::notification::{
    FCM_KEY_COMMENT_CONTENT, FCM_KEY_COMMENT_ID, FCM_KEY_POST_ID, FCM_KEY_TYPE, TYPE_COMMENT,
    trim_content,
};
use crate::domain::{
    CommentBody, Dispatch, Notification, NotificationId, NotificationPayload, NotificationType,
    PushMessage,
};
use crate::ports::{Clock, IdGenerator};

pub struct NewCommentProvider {
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl NewCommentProvider {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }
}

impl MessageProvider for NewCommentProvider {
    fn kind(&self) -> &'static str {
        TYPE_COMMENT
    }

    fn check(&self, payload: &NotificationPayload) -> Result<Option<Dispatch>, ProviderError> {
        if !payload.is(TYPE_COMMENT) {
            return Ok(None);
        }
        let body: CommentBody = decode_body(payload)?;

        let post_id = parse_id::<Post>("postId", &body.post_id)?;
        let comment_id = parse_id::<Comment>("commentId", &body.comment_id)?;
        let comment_owner = parse_id::<User>("commentOwnerId", &body.comment_owner_id)?;
        let post_owner = parse_id::<User>("postOwnerId", &body.post_owner_id)?;
        let content = trim_content(&body.comment_content);

        let message = PushMessage::new(body.token)
            .put_data(FCM_KEY_TYPE, TYPE_COMMENT)
            .put_data(FCM_KEY_POST_ID, post_id.to_string())
            .put_data(FCM_KEY_COMMENT_ID, comment_id.to_string())
            .put_data(FCM_KEY_COMMENT_CONTENT, content.clone());

        Ok(Some(Dispatch {
            message,
            notification: Notification {
                id: NotificationId::from_raw(self.ids.generate_id()),
                entity_type: NotificationType::NewComment,
                actor: comment_owner,
                receiver: post_owner,
                content: Some(content),
                created_at: self.clock.now(),
            },
        }))
    }
}
