//! In-memory search indexes (development and tests).

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PostId, UserId};
use crate::ports::index::split_tags;
use crate::ports::{FieldChanges, IndexError, PostDocument, PostIndex, UserDocument, UserIndex};

#[derive(Default)]
pub struct InMemoryPostIndex {
    docs: Mutex<HashMap<PostId, PostDocument>>,
}

impl InMemoryPostIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: PostId) -> Option<PostDocument> {
        self.docs.lock().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.docs.lock().await.len()
    }
}

#[async_trait]
impl PostIndex for InMemoryPostIndex {
    async fn index(&self, doc: PostDocument) -> Result<(), IndexError> {
        self.docs.lock().await.insert(doc.id, doc);
        Ok(())
    }

    async fn update(&self, id: PostId, changes: FieldChanges) -> Result<(), IndexError> {
        let mut docs = self.docs.lock().await;
        let doc = docs
            .get_mut(&id)
            .ok_or_else(|| IndexError::NotFound(format!("post {id}")))?;
        for (field, value) in changes {
            match field.as_str() {
                "title" => doc.title = value,
                "content" => doc.content = value,
                "tags" => doc.tags = split_tags(&value),
                _ => {}
            }
        }
        Ok(())
    }

    async fn remove(&self, id: PostId) -> Result<(), IndexError> {
        self.docs.lock().await.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserIndex {
    docs: Mutex<HashMap<UserId, UserDocument>>,
}

impl InMemoryUserIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: UserId) -> Option<UserDocument> {
        self.docs.lock().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.docs.lock().await.len()
    }
}

#[async_trait]
impl UserIndex for InMemoryUserIndex {
    async fn index(&self, doc: UserDocument) -> Result<(), IndexError> {
        self.docs.lock().await.insert(doc.id, doc);
        Ok(())
    }

    async fn update(&self, id: UserId, changes: FieldChanges) -> Result<(), IndexError> {
        let mut docs = self.docs.lock().await;
        let doc = docs
            .get_mut(&id)
            .ok_or_else(|| IndexError::NotFound(format!("user {id}")))?;
        for (field, value) in changes {
            match field.as_str() {
                "displayName" => doc.display_name = value,
                "email" => doc.email = Some(value),
                _ => {}
            }
        }
        Ok(())
    }

    async fn remove(&self, id: UserId) -> Result<(), IndexError> {
        self.docs.lock().await.remove(&id);
        Ok(())
    }
}
