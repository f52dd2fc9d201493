//! MessageProvider trait - one link of the notification provider chain.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::{Dispatch, Id, IdMarker, IdParseError, NotificationPayload};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("malformed {kind} body: {source}")]
    Body {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {field}: {source}")]
    InvalidId {
        field: &'static str,
        #[source]
        source: IdParseError,
    },
}

/// Builds a push message and a notification record for the one payload
/// variant it owns.
///
/// `check` returns `Ok(None)` when the discriminator is not its own, which
/// lets the dispatcher move on to the next provider.
pub trait MessageProvider: Send + Sync {
    /// Discriminator this provider owns (e.g. `TYPE_APPROVE`).
    fn kind(&self) -> &'static str;

    fn check(&self, payload: &NotificationPayload) -> Result<Option<Dispatch>, ProviderError>;
}

pub(crate) fn decode_body<T: DeserializeOwned>(
    payload: &NotificationPayload,
) -> Result<T, ProviderError> {
    serde_json::from_value(payload.body.clone()).map_err(|source| ProviderError::Body {
        kind: payload.kind.clone(),
        source,
    })
}

pub(crate) fn parse_id<T: IdMarker>(field: &'static str, raw: &str) -> Result<Id<T>, ProviderError> {
    Id::parse(raw).map_err(|source| ProviderError::InvalidId { field, source })
}
