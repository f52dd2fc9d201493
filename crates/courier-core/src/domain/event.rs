//! Domain events carried by the pull queue.
//!
//! Wire shape (JSON):
//! `{"metadata":{"type":"NEW_POST","createdAt":"..."},"data":{"id":"42",...}}`

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::FieldError;
use super::ids::{Id, IdMarker};

/// Closed set of event types published by the upstream services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    NewPost,
    UpdatePost,
    DeletePost,
    NewUser,
    UpdateUser,
    DeleteUser,
    NewComment,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        EventType::NewPost,
        EventType::UpdatePost,
        EventType::DeletePost,
        EventType::NewUser,
        EventType::UpdateUser,
        EventType::DeleteUser,
        EventType::NewComment,
    ];

    /// Types the search index consumes.
    pub const SEARCH: [EventType; 6] = [
        EventType::NewPost,
        EventType::UpdatePost,
        EventType::DeletePost,
        EventType::NewUser,
        EventType::UpdateUser,
        EventType::DeleteUser,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::NewPost => "NEW_POST",
            EventType::UpdatePost => "UPDATE_POST",
            EventType::DeletePost => "DELETE_POST",
            EventType::NewUser => "NEW_USER",
            EventType::UpdateUser => "UPDATE_USER",
            EventType::DeleteUser => "DELETE_USER",
            EventType::NewComment => "NEW_COMMENT",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    #[serde(rename = "type")]
    pub event_type: EventType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A decoded, typed event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    metadata: EventMetadata,

    #[serde(default)]
    data: BTreeMap<String, String>,
}

impl DomainEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            metadata: EventMetadata {
                event_type,
                created_at: None,
            },
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.metadata.created_at = Some(at);
        self
    }

    pub fn event_type(&self) -> EventType {
        self.metadata.event_type
    }

    pub fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str, FieldError> {
        self.get(key)
            .ok_or_else(|| FieldError::Missing(key.to_string()))
    }

    /// Read a string-encoded id field.
    pub fn require_id<T: IdMarker>(&self, key: &str) -> Result<Id<T>, FieldError> {
        let raw = self.require(key)?;
        Id::parse(raw).map_err(|source| FieldError::InvalidId {
            field: key.to_string(),
            source,
        })
    }
}
