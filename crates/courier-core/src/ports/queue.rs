//! PullQueue port - durable work-item store with timed leases.
//!
//! # Design
//! - `lease` claims up to `max_items` items carrying `tag` for `lease_for`.
//!   Items not deleted before the lease expires become leasable again.
//! - `delete` removes leased items permanently, in one batch call.
//! - Both calls are the only network suspension points of a leasing cycle.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::QueueItem;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("lease failed: {0}")]
    Lease(String),

    #[error("delete failed: {0}")]
    Delete(String),

    #[error("queue unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PullQueue: Send + Sync {
    async fn lease(
        &self,
        lease_for: Duration,
        max_items: usize,
        tag: &str,
    ) -> Result<Vec<QueueItem>, QueueError>;

    async fn delete(&self, items: Vec<QueueItem>) -> Result<(), QueueError>;
}
