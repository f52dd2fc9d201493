//! Event decoders.
//!
//! - `JsonEventDecoder`: payload is the event JSON.
//! - `PubSubEnvelopeDecoder`: payload is a push-subscription message whose
//!   `data` field holds the base64-encoded event JSON.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use crate::domain::{DecodeCause, DomainEvent};
use crate::ports::EventDecoder;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEventDecoder;

impl EventDecoder for JsonEventDecoder {
    fn decode(&self, payload: &[u8]) -> Result<DomainEvent, DecodeCause> {
        Ok(serde_json::from_slice(payload)?)
    }
}

/// Push-subscription message shape. `message_id` and `attributes` are
/// accepted and ignored.
#[derive(Debug, Deserialize)]
struct PubSubMessage {
    data: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PubSubEnvelopeDecoder;

impl EventDecoder for PubSubEnvelopeDecoder {
    fn decode(&self, payload: &[u8]) -> Result<DomainEvent, DecodeCause> {
        let message: PubSubMessage = serde_json::from_slice(payload)?;
        let bytes = STANDARD.decode(message.data.as_bytes())?;
        let json = String::from_utf8(bytes)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventType, ProcessingOutcome, QueueItem};
    use crate::ports::decode_item;

    const EVENT: &str = r#"{"metadata":{"type":"NEW_USER"},"data":{"id":"7","displayName":"ana"}}"#;

    #[test]
    fn json_decoding_is_idempotent() {
        let a = JsonEventDecoder.decode(EVENT.as_bytes()).unwrap();
        let b = JsonEventDecoder.decode(EVENT.as_bytes()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.event_type(), EventType::NewUser);
    }

    #[test]
    fn unknown_event_type_is_a_decode_failure() {
        let raw = br#"{"metadata":{"type":"NEW_GROUP"},"data":{}}"#;
        assert!(matches!(JsonEventDecoder.decode(raw), Err(DecodeCause::Json(_))));
    }

    #[test]
    fn pubsub_envelope_unwraps_base64_data() {
        let wrapped = serde_json::json!({
            "message_id": "m-1",
            "attributes": {"origin": "post-service"},
            "data": STANDARD.encode(EVENT),
        });
        let payload = serde_json::to_vec(&wrapped).unwrap();

        let event = PubSubEnvelopeDecoder.decode(&payload).unwrap();
        assert_eq!(event, JsonEventDecoder.decode(EVENT.as_bytes()).unwrap());
    }

    #[test]
    fn pubsub_envelope_rejects_bad_base64() {
        let payload = br#"{"data":"***"}"#;
        assert!(matches!(
            PubSubEnvelopeDecoder.decode(payload),
            Err(DecodeCause::Base64(_))
        ));
    }

    #[test]
    fn decode_item_keeps_provenance() {
        let item = QueueItem::new("task-1", b"not json".to_vec());
        match decode_item(&JsonEventDecoder, item) {
            ProcessingOutcome::DecodeFailed { item, error } => {
                assert_eq!(item.name(), "task-1");
                assert_eq!(error.item, "task-1");
                assert_eq!(error.payload_len, 8);
            }
            other => panic!("expected decode failure, got {other:?}"),
        }
    }
}
