//! ChainBuilder - builds the handler chain once, at startup.
//!
//! # Fail-fast
//! - `link()` rejects a handler claiming a type an earlier link already owns,
//!   so "first owner wins" never silently shadows a handler.
//! - `expect_types()` declares the types that must be owned; `build()`
//!   returns `MissingEventTypes` if any of them is not.

use std::sync::Arc;

use thiserror::Error;

use super::router::HandlerChain;
use super::handler::EventHandler;
use crate::domain::EventType;

#[derive(Debug, Error)]
pub enum ChainBuildError {
    #[error("event type {event_type} is owned by '{existing}', cannot also link '{handler}'")]
    DuplicateOwner {
        event_type: EventType,
        existing: String,
        handler: String,
    },

    #[error("Missing event types: {0:?}. These types were expected but no handler owns them.")]
    MissingEventTypes(Vec<EventType>),
}

/// # Usage
/// ```ignore
/// let chain = ChainBuilder::new()
///     .link(Arc::new(PostIndexHandler::new(posts)))?
///     .link(Arc::new(UserIndexHandler::new(users)))?
///     .expect_types(&[EventType::NewPost, EventType::NewUser])
///     .build()?;
/// ```
#[derive(Default)]
pub struct ChainBuilder {
    links: Vec<Arc<dyn EventHandler>>,
    expected_types: Option<Vec<EventType>>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to the end of the chain.
    pub fn link(mut self, handler: Arc<dyn EventHandler>) -> Result<Self, ChainBuildError> {
        for &event_type in handler.owned_types() {
            if let Some(existing) = self.links.iter().find(|h| h.owns(event_type)) {
                return Err(ChainBuildError::DuplicateOwner {
                    event_type,
                    existing: existing.name().to_string(),
                    handler: handler.name().to_string(),
                });
            }
        }
        self.links.push(handler);
        Ok(self)
    }

    pub fn expect_types(mut self, event_types: &[EventType]) -> Self {
        self.expected_types = Some(event_types.to_vec());
        self
    }

    pub fn build(self) -> Result<HandlerChain, ChainBuildError> {
        if let Some(expected) = &self.expected_types {
            let missing: Vec<EventType> = expected
                .iter()
                .filter(|t| !self.links.iter().any(|h| h.owns(**t)))
                .copied()
                .collect();
            if !missing.is_empty() {
                return Err(ChainBuildError::MissingEventTypes(missing));
            }
        }
        Ok(HandlerChain::new(self.links))
    }
}
