//! Ports - seams to the external collaborators.
//!
//! Each trait hides one outside system (pull queue, search index, id
//! generation, notification storage, push transport) so the leasing and
//! dispatch logic can run against in-memory adapters in tests.

pub mod clock;
pub mod decoder;
pub mod id_generator;
pub mod index;
pub mod notification;
pub mod queue;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::decoder::{EventDecoder, decode_item};
pub use self::id_generator::{IdGenerator, IdGeneratorError, SnowflakeIdGenerator};
pub use self::index::{FieldChanges, IndexError, PostDocument, PostIndex, UserDocument, UserIndex};
pub use self::notification::{NotificationRepository, PushSender, SinkError};
pub use self::queue::{PullQueue, QueueError};
