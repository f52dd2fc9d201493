//! Events of one leasing cycle grouped by type.

use std::collections::BTreeMap;
use std::collections::btree_map;

use super::event::{DomainEvent, EventType};

/// Mapping from event type to the events of that type, in arrival order.
///
/// Order inside a bucket is preserved; order across buckets is not
/// meaningful (iteration follows `EventType` ordering).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBatch {
    buckets: BTreeMap<EventType, Vec<DomainEvent>>,
}

impl EventBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the bucket of its declared type.
    pub fn push(&mut self, event: DomainEvent) {
        self.buckets
            .entry(event.event_type())
            .or_default()
            .push(event);
    }

    pub fn get(&self, event_type: EventType) -> Option<&[DomainEvent]> {
        self.buckets.get(&event_type).map(Vec::as_slice)
    }

    pub fn types(&self) -> impl Iterator<Item = EventType> + '_ {
        self.buckets.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, EventType, Vec<DomainEvent>> {
        self.buckets.iter()
    }

    /// Number of distinct types.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of events across all buckets.
    pub fn event_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

impl FromIterator<DomainEvent> for EventBatch {
    fn from_iter<I: IntoIterator<Item = DomainEvent>>(iter: I) -> Self {
        let mut batch = EventBatch::new();
        for event in iter {
            batch.push(event);
        }
        batch
    }
}
