//! Domain model (ids, queue items, events, notification payloads).

pub mod batch;
pub mod errors;
pub mod event;
pub mod ids;
pub mod item;
pub mod notification;
pub mod outcome;

pub use batch::EventBatch;
pub use errors::{DecodeCause, DecodeError, FieldError, IdParseError};
pub use event::{DomainEvent, EventMetadata, EventType};
pub use ids::{CommentId, Id, IdMarker, NotificationId, PostId, UserId};
pub use item::QueueItem;
pub use notification::{
    ApproveBody, CommentBody, Dispatch, FollowBody, Notification, NotificationPayload,
    NotificationType, PushMessage,
};
pub use outcome::ProcessingOutcome;
