//! InMemoryPullQueue - development pull queue with timed leases.
//!
//! # Behavior
//! - Items are kept in insertion order and leased oldest first.
//! - `lease` only hands out items whose tag matches and whose previous lease
//!   (if any) has expired; each lease bumps the item's retry count.
//! - `delete` matches handles by name and retry count, so a handle from an
//!   older lease cannot delete an item that was re-leased since.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::warn;
use ulid::Ulid;

use crate::domain::QueueItem;
use crate::ports::{PullQueue, QueueError};

#[derive(Debug, Clone)]
struct StoredItem {
    name: String,
    payload: Vec<u8>,
    tag: String,
    retry_count: u32,
    leased_until: Option<Instant>,
}

impl StoredItem {
    fn is_leasable(&self, tag: &str, now: Instant) -> bool {
        self.tag == tag && self.leased_until.is_none_or(|until| until <= now)
    }

    fn handle(&self) -> QueueItem {
        QueueItem::new(self.name.clone(), self.payload.clone())
            .with_tag(self.tag.clone())
            .with_retry_count(self.retry_count)
    }
}

#[derive(Default)]
struct QueueState {
    items: VecDeque<StoredItem>,
    /// Names passed to each successful `delete` call, for inspection.
    deletions: Vec<Vec<String>>,
}

#[derive(Default)]
pub struct InMemoryPullQueue {
    state: Mutex<QueueState>,
}

impl InMemoryPullQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item under `tag`; returns its generated name.
    pub async fn add(&self, tag: &str, payload: Vec<u8>) -> String {
        let name = format!("task-{}", Ulid::new());
        self.add_named(name.clone(), tag, payload).await;
        name
    }

    pub async fn add_named(&self, name: impl Into<String>, tag: &str, payload: Vec<u8>) {
        let mut state = self.state.lock().await;
        state.items.push_back(StoredItem {
            name: name.into(),
            payload,
            tag: tag.to_string(),
            retry_count: 0,
            leased_until: None,
        });
    }

    /// Items still stored (leased or not).
    pub async fn len(&self) -> usize {
        self.state.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Names removed by each `delete` call, in call order.
    pub async fn deletions(&self) -> Vec<Vec<String>> {
        self.state.lock().await.deletions.clone()
    }
}

#[async_trait]
impl PullQueue for InMemoryPullQueue {
    async fn lease(
        &self,
        lease_for: Duration,
        max_items: usize,
        tag: &str,
    ) -> Result<Vec<QueueItem>, QueueError> {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        let until = now + lease_for;

        let mut leased = Vec::new();
        for item in state.items.iter_mut() {
            if leased.len() >= max_items {
                break;
            }
            if item.is_leasable(tag, now) {
                item.retry_count += 1;
                item.leased_until = Some(until);
                leased.push(item.handle());
            }
        }
        Ok(leased)
    }

    async fn delete(&self, items: Vec<QueueItem>) -> Result<(), QueueError> {
        let mut state = self.state.lock().await;
        let mut removed = Vec::with_capacity(items.len());

        for handle in items {
            let position = state
                .items
                .iter()
                .position(|i| i.name == handle.name() && i.retry_count == handle.retry_count());
            match position {
                Some(idx) => {
                    state.items.remove(idx);
                    removed.push(handle.name().to_string());
                }
                None => {
                    warn!(item = handle.name(), "Delete skipped: item gone or re-leased");
                }
            }
        }

        state.deletions.push(removed);
        Ok(())
    }
}
