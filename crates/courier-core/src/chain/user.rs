//! User search documents: NEW_USER, UPDATE_USER, DELETE_USER.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::handler::{EventHandler, HandlerError};
use crate::domain::ids::User;
use crate::domain::{DomainEvent, EventType};
use crate::ports::{FieldChanges, UserDocument, UserIndex};

const OWNED: [EventType; 3] = [EventType::NewUser, EventType::UpdateUser, EventType::DeleteUser];

pub struct UserIndexHandler {
    index: Arc<dyn UserIndex>,
}

impl UserIndexHandler {
    pub fn new(index: Arc<dyn UserIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl EventHandler for UserIndexHandler {
    fn name(&self) -> &str {
        "user-index"
    }

    fn owned_types(&self) -> &[EventType] {
        &OWNED
    }

    async fn handle(&self, event_type: EventType, events: &[DomainEvent]) -> Result<(), HandlerError> {
        for event in events {
            let id = event.require_id::<User>("id")?;
            match event_type {
                EventType::NewUser => {
                    let doc = UserDocument {
                        id,
                        display_name: event.require("displayName")?.to_string(),
                        email: event.get("email").map(str::to_string),
                    };
                    self.index.index(doc).await?;
                }
                EventType::UpdateUser => {
                    let changes: FieldChanges = event
                        .data()
                        .iter()
                        .filter(|(k, _)| k.as_str() != "id")
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect();
                    self.index.update(id, changes).await?;
                }
                EventType::DeleteUser => self.index.remove(id).await?,
                other => {
                    return Err(HandlerError::Other(format!("user handler cannot apply {other}")));
                }
            }
            debug!(event_type = %event_type, user_id = %id, "Applied user event");
        }
        Ok(())
    }
}
