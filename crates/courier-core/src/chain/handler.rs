//! EventHandler trait - one link of the handler chain.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{DomainEvent, EventType, FieldError};
use crate::ports::IndexError;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("bad event: {0}")]
    Field(#[from] FieldError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("{0}")]
    Other(String),
}

/// A handler owns one or more event types and applies them to a repository.
///
/// It is called once per type per leasing cycle with every event of that
/// type, in arrival order, and iterates the batch itself.
///
/// # Usage
/// ```ignore
/// struct AuditHandler;
///
/// #[async_trait]
/// impl EventHandler for AuditHandler {
///     fn name(&self) -> &str { "audit" }
///     fn owned_types(&self) -> &[EventType] { &[EventType::NewComment] }
///     async fn handle(&self, _t: EventType, events: &[DomainEvent]) -> Result<(), HandlerError> {
///         tracing::info!(count = events.len(), "audited");
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    fn name(&self) -> &str;

    fn owned_types(&self) -> &[EventType];

    fn owns(&self, event_type: EventType) -> bool {
        self.owned_types().contains(&event_type)
    }

    async fn handle(&self, event_type: EventType, events: &[DomainEvent])
    -> Result<(), HandlerError>;
}
