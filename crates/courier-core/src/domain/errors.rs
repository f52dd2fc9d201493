//! Errors raised while turning raw bytes and strings into domain values.

use thiserror::Error;

/// A string-encoded id that could not be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("{kind} id '{value}' is not a number")]
    NotNumeric { kind: &'static str, value: String },

    #[error("{kind} id {value} must be positive")]
    NotPositive { kind: &'static str, value: i64 },
}

/// A decoded event is missing a field or carries an unusable one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("missing field '{0}'")]
    Missing(String),

    #[error("invalid field '{field}': {source}")]
    InvalidId {
        field: String,
        #[source]
        source: IdParseError,
    },
}

/// Decode failure for one queue item.
///
/// Carries the provenance of the offending payload (item name and size) so
/// the failure can be logged without keeping the bytes around.
#[derive(Debug, Error)]
#[error("failed to decode item '{item}' ({payload_len} bytes): {cause}")]
pub struct DecodeError {
    pub item: String,
    pub payload_len: usize,
    #[source]
    pub cause: DecodeCause,
}

#[derive(Debug, Error)]
pub enum DecodeCause {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed base64 data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl DecodeError {
    pub fn new(item: impl Into<String>, payload_len: usize, cause: impl Into<DecodeCause>) -> Self {
        Self {
            item: item.into(),
            payload_len,
            cause: cause.into(),
        }
    }
}
