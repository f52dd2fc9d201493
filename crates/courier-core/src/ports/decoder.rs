//! EventDecoder port - raw queue payload to typed event.

use crate::domain::{DecodeCause, DecodeError, DomainEvent, ProcessingOutcome, QueueItem};

/// Decodes one payload. Pure: the same bytes always decode to equal events.
pub trait EventDecoder: Send + Sync {
    fn decode(&self, payload: &[u8]) -> Result<DomainEvent, DecodeCause>;
}

/// Decode a leased item into its outcome. Never fails: decode errors become
/// `ProcessingOutcome::DecodeFailed` tagged with the item's provenance.
pub fn decode_item(decoder: &dyn EventDecoder, item: QueueItem) -> ProcessingOutcome {
    match decoder.decode(item.payload()) {
        Ok(event) => ProcessingOutcome::Decoded { item, event },
        Err(cause) => {
            let error = DecodeError::new(item.name(), item.payload().len(), cause);
            ProcessingOutcome::DecodeFailed { item, error }
        }
    }
}
