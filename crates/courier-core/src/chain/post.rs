//! Post search documents: NEW_POST, UPDATE_POST, DELETE_POST.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::handler::{EventHandler, HandlerError};
use crate::domain::ids::{Post, User};
use crate::domain::{DomainEvent, EventType};
use crate::ports::index::split_tags;
use crate::ports::{FieldChanges, PostDocument, PostIndex};

const OWNED: [EventType; 3] = [EventType::NewPost, EventType::UpdatePost, EventType::DeletePost];

pub struct PostIndexHandler {
    index: Arc<dyn PostIndex>,
}

impl PostIndexHandler {
    pub fn new(index: Arc<dyn PostIndex>) -> Self {
        Self { index }
    }

    async fn apply(&self, event_type: EventType, event: &DomainEvent) -> Result<(), HandlerError> {
        let id = event.require_id::<Post>("id")?;
        match event_type {
            EventType::NewPost => {
                let author_id = match event.get("authorId") {
                    Some(_) => Some(event.require_id::<User>("authorId")?),
                    None => None,
                };
                let doc = PostDocument {
                    id,
                    author_id,
                    title: event.require("title")?.to_string(),
                    content: event.get("content").unwrap_or_default().to_string(),
                    tags: event.get("tags").map(split_tags).unwrap_or_default(),
                };
                self.index.index(doc).await?;
            }
            EventType::UpdatePost => {
                let changes: FieldChanges = event
                    .data()
                    .iter()
                    .filter(|(k, _)| k.as_str() != "id")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                self.index.update(id, changes).await?;
            }
            EventType::DeletePost => self.index.remove(id).await?,
            other => {
                return Err(HandlerError::Other(format!("post handler cannot apply {other}")));
            }
        }
        debug!(event_type = %event_type, post_id = %id, "Applied post event");
        Ok(())
    }
}

#[async_trait]
impl EventHandler for PostIndexHandler {
    fn name(&self) -> &str {
        "post-index"
    }

    fn owned_types(&self) -> &[EventType] {
        &OWNED
    }

    async fn handle(&self, event_type: EventType, events: &[DomainEvent]) -> Result<(), HandlerError> {
        for event in events {
            self.apply(event_type, event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostId;
    use crate::impls::InMemoryPostIndex;

    fn handler() -> (Arc<InMemoryPostIndex>, PostIndexHandler) {
        let index = Arc::new(InMemoryPostIndex::new());
        (index.clone(), PostIndexHandler::new(index))
    }

    #[tokio::test]
    async fn new_update_delete_lifecycle() {
        let (index, handler) = handler();
        let id = PostId::from_raw(42);

        let created = DomainEvent::new(EventType::NewPost)
            .with_data("id", "42")
            .with_data("authorId", "3")
            .with_data("title", "Lisbon")
            .with_data("tags", "travel, food");
        handler.handle(EventType::NewPost, &[created]).await.unwrap();

        let doc = index.get(id).await.unwrap();
        assert_eq!(doc.title, "Lisbon");
        assert_eq!(doc.tags, vec!["travel", "food"]);
        assert_eq!(doc.author_id.map(|a| a.get()), Some(3));

        let updated = DomainEvent::new(EventType::UpdatePost)
            .with_data("id", "42")
            .with_data("title", "Porto");
        handler.handle(EventType::UpdatePost, &[updated]).await.unwrap();
        assert_eq!(index.get(id).await.unwrap().title, "Porto");

        let deleted = DomainEvent::new(EventType::DeletePost).with_data("id", "42");
        handler.handle(EventType::DeletePost, &[deleted]).await.unwrap();
        assert!(index.get(id).await.is_none());
    }

    #[tokio::test]
    async fn malformed_id_fails_the_group() {
        let (index, handler) = handler();
        let events = vec![
            DomainEvent::new(EventType::NewPost).with_data("id", "1").with_data("title", "a"),
            DomainEvent::new(EventType::NewPost).with_data("id", "x").with_data("title", "b"),
        ];

        let err = handler.handle(EventType::NewPost, &events).await.unwrap_err();

        assert!(matches!(err, HandlerError::Field(_)));
        // events before the bad one were applied
        assert_eq!(index.len().await, 1);
    }
}
