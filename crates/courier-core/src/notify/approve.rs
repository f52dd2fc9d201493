//! `TYPE_APPROVE`: a post owner approved someone's comment.

use std::sync::Arc;

use super::provider::{MessageProvider, ProviderError, decode_body, parse_id};
use crate::domain::ids::{Post, User};
use crate::domain::notification::{
    FCM_KEY_COMMENT_CONTENT, FCM_KEY_POST_ID, FCM_KEY_TYPE, TYPE_APPROVE, trim_content,
};
use crate::domain::{
    ApproveBody, Dispatch, Notification, NotificationId, NotificationPayload, NotificationType,
    PushMessage,
};
use crate::ports::{Clock, IdGenerator};

pub struct CommentApproveProvider {
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl CommentApproveProvider {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }
}

impl MessageProvider for CommentApproveProvider {
    fn kind(&self) -> &'static str {
        TYPE_APPROVE
    }

    fn check(&self, payload: &NotificationPayload) -> Result<Option<Dispatch>, ProviderError> {
        if !payload.is(TYPE_APPROVE) {
            return Ok(None);
        }
        let body: ApproveBody = decode_body(payload)?;

        let post_id = parse_id::<Post>("postId", &body.post_id)?;
        let post_owner = parse_id::<User>("postOwnerId", &body.post_owner_id)?;
        let comment_owner = parse_id::<User>("commentOwnerId", &body.comment_owner_id)?;
        let content = trim_content(&body.comment_content);

        let message = PushMessage::new(body.token)
            .put_data(FCM_KEY_TYPE, TYPE_APPROVE)
            .put_data(FCM_KEY_POST_ID, post_id.to_string())
            .put_data(FCM_KEY_COMMENT_CONTENT, content.clone());

        let notification = Notification {
            id: NotificationId::from_raw(self.ids.generate_id()),
            entity_type: NotificationType::CommentApproved,
            actor: post_owner,
            receiver: comment_owner,
            content: Some(content),
            created_at: self.clock.now(),
        };

        Ok(Some(Dispatch {
            message,
            notification,
        }))
    }
}
