//! Impls - in-process adapters for the ports (development and tests).
//!
//! Production adapters (cloud pull queue, search backend, push transport)
//! live outside this crate.

pub mod decoders;
pub mod inmem_index;
pub mod inmem_notification;
pub mod inmem_queue;

pub use self::decoders::{JsonEventDecoder, PubSubEnvelopeDecoder};
pub use self::inmem_index::{InMemoryPostIndex, InMemoryUserIndex};
pub use self::inmem_notification::{
    InMemoryNotificationRepository, LoggingPushSender, RecordingPushSender,
};
pub use self::inmem_queue::InMemoryPullQueue;
