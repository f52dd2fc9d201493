//! Domain identifiers (strongly-typed numeric IDs).
//!
//! Entity ids in this system are positive 63-bit integers. Upstream services
//! ship them as strings inside event data and notification bodies, so every
//! id type has a parse-or-reject constructor instead of an unguarded numeric
//! conversion.
//!
//! `Id<T>` carries a phantom marker so a `UserId` can never be passed where a
//! `PostId` is expected, while sharing one implementation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use super::errors::IdParseError;

/// Marker trait for each id type.
pub trait IdMarker: Send + Sync + 'static {
    /// Human readable kind, used in error messages (e.g. "user").
    fn kind() -> &'static str;
}

/// Generic numeric id.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: i64,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// Wrap an already validated value.
    pub fn from_raw(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Parse a string-encoded id. Rejects non-numeric and non-positive input.
    pub fn parse(raw: &str) -> Result<Self, IdParseError> {
        let trimmed = raw.trim();
        let value: i64 = trimmed.parse().map_err(|_| IdParseError::NotNumeric {
            kind: T::kind(),
            value: raw.to_string(),
        })?;
        if value <= 0 {
            return Err(IdParseError::NotPositive {
                kind: T::kind(),
                value,
            });
        }
        Ok(Self::from_raw(value))
    }

    pub fn get(&self) -> i64 {
        self.value
    }
}

impl<T: IdMarker> FromStr for Id<T> {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

// ========================================
// Markers
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum User {}

impl IdMarker for User {
    fn kind() -> &'static str {
        "user"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Post {}

impl IdMarker for Post {
    fn kind() -> &'static str {
        "post"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Comment {}

impl IdMarker for Comment {
    fn kind() -> &'static str {
        "comment"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Notification {}

impl IdMarker for Notification {
    fn kind() -> &'static str {
        "notification"
    }
}

pub type UserId = Id<User>;
pub type PostId = Id<Post>;
pub type CommentId = Id<Comment>;
pub type NotificationId = Id<Notification>;
