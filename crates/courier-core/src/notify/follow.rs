//! `TYPE_FOLLOW`: someone started following a user.

use std::sync::Arc;

use super::provider::{MessageProvider, ProviderError, decode_body, parse_id};
use crate::domain::ids::User;
use crate::domain::notification::{FCM_KEY_DISPLAY_NAME, FCM_KEY_TYPE, FCM_KEY_USER_ID, TYPE_FOLLOW};
use crate::domain::{
    Dispatch, FollowBody, Notification, NotificationId, NotificationPayload, NotificationType,
    PushMessage,
};
use crate::ports::{Clock, IdGenerator};

pub struct NewFollowerProvider {
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl NewFollowerProvider {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }
}

impl MessageProvider for NewFollowerProvider {
    fn kind(&self) -> &'static str {
        TYPE_FOLLOW
    }

    fn check(&self, payload: &NotificationPayload) -> Result<Option<Dispatch>, ProviderError> {
        if !payload.is(TYPE_FOLLOW) {
            return Ok(None);
        }
        let body: FollowBody = decode_body(payload)?;

        let follower = parse_id::<User>("followerId", &body.follower_id)?;
        let followee = parse_id::<User>("followeeId", &body.followee_id)?;

        let message = PushMessage::new(body.token)
            .put_data(FCM_KEY_TYPE, TYPE_FOLLOW)
            .put_data(FCM_KEY_USER_ID, follower.to_string())
            .put_data(FCM_KEY_DISPLAY_NAME, body.follower_name);

        Ok(Some(Dispatch {
            message,
            notification: Notification {
                id: NotificationId::from_raw(self.ids.generate_id()),
                entity_type: NotificationType::NewFollower,
                actor: follower,
                receiver: followee,
                content: None,
                created_at: self.clock.now(),
            },
        }))
    }
}
