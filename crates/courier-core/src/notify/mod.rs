//! Notification variant dispatch.
//!
//! A discriminated payload is offered to providers in order; the owner of
//! its discriminator builds the push message and the notification record.

pub mod approve;
pub mod comment;
pub mod dispatcher;
pub mod follow;
pub mod notifier;
pub mod provider;

pub use self::approve::CommentApproveProvider;
pub use self::comment::NewCommentProvider;
pub use self::dispatcher::MessageDispatcher;
pub use self::follow::NewFollowerProvider;
pub use self::notifier::{Notifier, NotifyError, NotifyOutcome};
pub use self::provider::{MessageProvider, ProviderError};
