//! Per-item decode outcome.
//!
//! Every leased item ends up in exactly one variant. Both variants keep the
//! item handle, because deletion bookkeeping happens after routing and must
//! not depend on whether the payload could be parsed.

use super::errors::DecodeError;
use super::event::DomainEvent;
use super::item::QueueItem;

#[derive(Debug)]
pub enum ProcessingOutcome {
    Decoded { item: QueueItem, event: DomainEvent },
    DecodeFailed { item: QueueItem, error: DecodeError },
}

impl ProcessingOutcome {
    pub fn item(&self) -> &QueueItem {
        match self {
            ProcessingOutcome::Decoded { item, .. } => item,
            ProcessingOutcome::DecodeFailed { item, .. } => item,
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, ProcessingOutcome::Decoded { .. })
    }
}
