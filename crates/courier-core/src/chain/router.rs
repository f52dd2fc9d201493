//! HandlerChain - ordered dispatch of type-groups to their owning handler.

use std::sync::Arc;

use tracing::{debug, error, warn};

use super::handler::EventHandler;
use crate::domain::{EventBatch, EventType};

/// One type-group whose handler returned an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFailure {
    pub event_type: EventType,
    pub handler: String,
    pub events: usize,
    pub error: String,
}

/// What happened to each type-group of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainReport {
    /// (type, event count) handled successfully.
    pub handled: Vec<(EventType, usize)>,

    /// (type, event count) no handler owns; consumed without effect.
    pub unclaimed: Vec<(EventType, usize)>,

    pub failed: Vec<GroupFailure>,
}

impl ChainReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Ordered, read-only sequence of handlers. Built once by `ChainBuilder`.
///
/// For every type present in a batch the first handler that owns it gets
/// the whole group. The chain is total: a type nobody owns is dropped with a
/// warning rather than an error.
pub struct HandlerChain {
    links: Vec<Arc<dyn EventHandler>>,
}

impl HandlerChain {
    pub(crate) fn new(links: Vec<Arc<dyn EventHandler>>) -> Self {
        Self { links }
    }

    pub fn owner_of(&self, event_type: EventType) -> Option<&Arc<dyn EventHandler>> {
        self.links.iter().find(|h| h.owns(event_type))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Route each type-group of `batch`. Groups are independent: a failing
    /// handler is logged and recorded, and the remaining groups still run.
    pub async fn process(&self, batch: &EventBatch) -> ChainReport {
        let mut report = ChainReport::default();

        for (event_type, events) in batch.iter() {
            let event_type = *event_type;
            let Some(handler) = self.owner_of(event_type) else {
                warn!(event_type = %event_type, count = events.len(), "No handler owns event type, dropping");
                report.unclaimed.push((event_type, events.len()));
                continue;
            };

            debug!(event_type = %event_type, handler = handler.name(), count = events.len(), "Dispatching");

            match handler.handle(event_type, events).await {
                Ok(()) => report.handled.push((event_type, events.len())),
                Err(e) => {
                    error!(
                        event_type = %event_type,
                        handler = handler.name(),
                        count = events.len(),
                        error = %e,
                        "Handler failed for type group"
                    );
                    report.failed.push(GroupFailure {
                        event_type,
                        handler: handler.name().to_string(),
                        events: events.len(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
