//! Search index ports used by the leaf event handlers.
//!
//! The search service keeps one document per post and per user. Handlers
//! translate events into the calls below; storage is external.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PostId, UserId};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("index backend failed: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDocument {
    pub id: PostId,
    pub author_id: Option<UserId>,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    pub id: UserId,
    pub display_name: String,
    pub email: Option<String>,
}

/// Partial update: only the listed fields change.
pub type FieldChanges = BTreeMap<String, String>;

/// Split a comma separated tag list, dropping blanks.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
pub trait PostIndex: Send + Sync {
    async fn index(&self, doc: PostDocument) -> Result<(), IndexError>;
    async fn update(&self, id: PostId, changes: FieldChanges) -> Result<(), IndexError>;
    async fn remove(&self, id: PostId) -> Result<(), IndexError>;
}

#[async_trait]
pub trait UserIndex: Send + Sync {
    async fn index(&self, doc: UserDocument) -> Result<(), IndexError>;
    async fn update(&self, id: UserId, changes: FieldChanges) -> Result<(), IndexError>;
    async fn remove(&self, id: UserId) -> Result<(), IndexError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_tags_drops_blanks() {
        assert_eq!(split_tags("rust, queues,,  "), vec!["rust", "queues"]);
        assert!(split_tags("").is_empty());
    }
}
