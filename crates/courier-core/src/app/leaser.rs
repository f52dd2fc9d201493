//! QueueLeaser - one lease, decode, dispatch and delete cycle.
//!
//! # Cycle
//! 1. Lease up to `batch_size` items tagged `tag`.
//! 2. Decode each item; failures are logged with the item's name.
//! 3. Group decoded events by type and hand the batch to the chain once.
//! 4. Delete every leased item in one call, whether or not its handler
//!    succeeded. Undecodable items are deleted too unless the
//!    [`DecodeFailurePolicy`] keeps them for redelivery.
//!
//! The pending-delete list lives on the stack of a single `run_cycle`
//! call, so concurrent cycles never see each other's items.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::chain::{ChainReport, HandlerChain};
use crate::domain::{EventBatch, ProcessingOutcome, QueueItem};
use crate::ports::{EventDecoder, PullQueue, QueueError, decode_item};

#[derive(Debug, Error)]
pub enum LeaserError {
    #[error("leasing from the pull queue failed")]
    Lease(#[source] QueueError),

    #[error("deleting {items} processed items failed")]
    Delete {
        items: usize,
        #[source]
        source: QueueError,
    },
}

/// What to do with an item whose payload cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeFailurePolicy {
    /// Delete it with the rest of the batch.
    #[default]
    Discard,
    /// Leave it leased so it is redelivered after the lease expires, until
    /// it has been leased `max_leases` times.
    RetryThenDiscard { max_leases: u32 },
}

impl DecodeFailurePolicy {
    fn discards(&self, item: &QueueItem) -> bool {
        match *self {
            Self::Discard => true,
            Self::RetryThenDiscard { max_leases } => item.retry_count() >= max_leases,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseSettings {
    pub lease_for: Duration,
    pub batch_size: usize,
    pub tag: String,
    pub decode_failure_policy: DecodeFailurePolicy,
}

/// Counters and chain results of one cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub leased: usize,
    pub decoded: usize,
    pub decode_failed: usize,
    pub deleted: usize,
    /// Undecodable items left on the queue for another attempt.
    pub retained: usize,
    pub chain: ChainReport,
}

pub struct QueueLeaser {
    queue: Arc<dyn PullQueue>,
    decoder: Arc<dyn EventDecoder>,
    chain: Arc<HandlerChain>,
    settings: LeaseSettings,
}

impl QueueLeaser {
    pub fn new(
        queue: Arc<dyn PullQueue>,
        decoder: Arc<dyn EventDecoder>,
        chain: Arc<HandlerChain>,
        settings: LeaseSettings,
    ) -> Self {
        Self {
            queue,
            decoder,
            chain,
            settings,
        }
    }

    pub fn settings(&self) -> &LeaseSettings {
        &self.settings
    }

    pub async fn run_cycle(&self) -> Result<CycleReport, LeaserError> {
        let settings = &self.settings;
        let policy = settings.decode_failure_policy;

        info!(count = settings.batch_size, tag = %settings.tag, "Pulling tasks from the pull queue");
        let items = self
            .queue
            .lease(settings.lease_for, settings.batch_size, &settings.tag)
            .await
            .map_err(LeaserError::Lease)?;

        let mut report = CycleReport {
            leased: items.len(),
            ..CycleReport::default()
        };
        if items.is_empty() {
            info!("Task queue has no tasks available for lease");
            return Ok(report);
        }

        let mut pending_delete = Vec::with_capacity(items.len());
        let mut batch = EventBatch::new();

        for item in items {
            info!(item = item.name(), retry_count = item.retry_count(), "Processing task");
            match decode_item(self.decoder.as_ref(), item) {
                ProcessingOutcome::Decoded { item, event } => {
                    batch.push(event);
                    pending_delete.push(item);
                }
                ProcessingOutcome::DecodeFailed { item, error } => {
                    report.decode_failed += 1;
                    error!(item = item.name(), error = %error, "Processing failed");
                    if policy.discards(&item) {
                        if policy != DecodeFailurePolicy::Discard {
                            warn!(
                                item = item.name(),
                                retry_count = item.retry_count(),
                                "Discarding undecodable task after repeated leases"
                            );
                        }
                        pending_delete.push(item);
                    } else {
                        report.retained += 1;
                    }
                }
            }
        }

        report.decoded = batch.event_count();
        if !batch.is_empty() {
            report.chain = self.chain.process(&batch).await;
        }

        let deleted = pending_delete.len();
        if deleted > 0 {
            self.queue
                .delete(pending_delete)
                .await
                .map_err(|source| LeaserError::Delete {
                    items: deleted,
                    source,
                })?;
        }
        report.deleted = deleted;

        info!(deleted, retained = report.retained, "Processed and deleted tasks");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::chain::test_support::RecordingHandler;
    use crate::chain::{EventHandler, HandlerError};
    use crate::domain::EventType;
    use crate::impls::{InMemoryPullQueue, JsonEventDecoder};

    const TAG: &str = "search";

    fn settings(policy: DecodeFailurePolicy) -> LeaseSettings {
        LeaseSettings {
            lease_for: Duration::from_secs(3600),
            batch_size: 100,
            tag: TAG.to_string(),
            decode_failure_policy: policy,
        }
    }

    fn event(event_type: &str, id: &str) -> Vec<u8> {
        format!(r#"{{"metadata":{{"type":"{event_type}"}},"data":{{"id":"{id}","title":"t"}}}}"#)
            .into_bytes()
    }

    fn leaser(
        queue: Arc<dyn PullQueue>,
        handler: Arc<RecordingHandler>,
        policy: DecodeFailurePolicy,
    ) -> QueueLeaser {
        let chain = HandlerChain::new(vec![handler as Arc<dyn EventHandler>]);
        QueueLeaser::new(
            queue,
            Arc::new(JsonEventDecoder),
            Arc::new(chain),
            settings(policy),
        )
    }

    fn post_handler() -> Arc<RecordingHandler> {
        Arc::new(RecordingHandler::new(
            "posts",
            &[EventType::NewPost, EventType::UpdatePost, EventType::DeletePost],
        ))
    }

    #[tokio::test]
    async fn empty_lease_skips_chain_and_delete() {
        let queue = Arc::new(InMemoryPullQueue::new());
        let handler = post_handler();
        let leaser = leaser(queue.clone(), handler.clone(), DecodeFailurePolicy::Discard);

        let report = leaser.run_cycle().await.unwrap();

        assert_eq!(report.leased, 0);
        assert!(handler.calls().is_empty());
        assert!(queue.deletions().await.is_empty());
    }

    #[tokio::test]
    async fn bad_item_is_skipped_and_every_item_deleted() {
        let queue = Arc::new(InMemoryPullQueue::new());
        queue.add_named("a", TAG, event("NEW_POST", "1")).await;
        queue.add_named("b", TAG, b"{not json".to_vec()).await;
        queue.add_named("c", TAG, event("NEW_POST", "3")).await;
        let handler = post_handler();
        let leaser = leaser(queue.clone(), handler.clone(), DecodeFailurePolicy::Discard);

        let report = leaser.run_cycle().await.unwrap();

        assert_eq!(report.leased, 3);
        assert_eq!(report.decoded, 2);
        assert_eq!(report.decode_failed, 1);
        assert_eq!(report.deleted, 3);
        assert_eq!(
            handler.calls(),
            vec![(EventType::NewPost, vec!["1".to_string(), "3".to_string()])]
        );
        assert_eq!(queue.deletions().await, vec![vec!["a", "b", "c"]]);
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn failing_handler_does_not_block_deletion() {
        let queue = Arc::new(InMemoryPullQueue::new());
        queue.add_named("a", TAG, event("UPDATE_POST", "1")).await;
        let handler = Arc::new(
            RecordingHandler::new("posts", &[EventType::UpdatePost])
                .failing_with(|| HandlerError::Other("index down".into())),
        );
        let leaser = leaser(queue.clone(), handler, DecodeFailurePolicy::Discard);

        let report = leaser.run_cycle().await.unwrap();

        assert_eq!(report.chain.failed.len(), 1);
        assert_eq!(report.deleted, 1);
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn unowned_type_is_deleted_without_dispatch() {
        let queue = Arc::new(InMemoryPullQueue::new());
        queue.add_named("a", TAG, event("NEW_COMMENT", "9")).await;
        let handler = post_handler();
        let leaser = leaser(queue.clone(), handler.clone(), DecodeFailurePolicy::Discard);

        let report = leaser.run_cycle().await.unwrap();

        assert_eq!(report.chain.unclaimed, vec![(EventType::NewComment, 1)]);
        assert!(handler.calls().is_empty());
        assert_eq!(report.deleted, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_policy_keeps_poison_item_until_limit() {
        let queue = Arc::new(InMemoryPullQueue::new());
        queue.add_named("poison", TAG, b"garbage".to_vec()).await;
        let mut leaser = leaser(
            queue.clone(),
            post_handler(),
            DecodeFailurePolicy::RetryThenDiscard { max_leases: 2 },
        );
        leaser.settings.lease_for = Duration::from_secs(10);

        let first = leaser.run_cycle().await.unwrap();
        assert_eq!((first.retained, first.deleted), (1, 0));

        // still leased: nothing to pull
        let idle = leaser.run_cycle().await.unwrap();
        assert_eq!(idle.leased, 0);

        tokio::time::advance(Duration::from_secs(11)).await;
        let second = leaser.run_cycle().await.unwrap();
        assert_eq!((second.retained, second.deleted), (0, 1));
        assert!(queue.is_empty().await);
    }

    #[derive(Default)]
    struct FailingQueue {
        fail_lease: bool,
        deletes: Mutex<usize>,
    }

    #[async_trait]
    impl PullQueue for FailingQueue {
        async fn lease(
            &self,
            _lease_for: Duration,
            _max_items: usize,
            _tag: &str,
        ) -> Result<Vec<QueueItem>, QueueError> {
            if self.fail_lease {
                return Err(QueueError::Unavailable("connection refused".into()));
            }
            Ok(vec![QueueItem::new("a", event("DELETE_POST", "1"))])
        }

        async fn delete(&self, _items: Vec<QueueItem>) -> Result<(), QueueError> {
            *self.deletes.lock().unwrap() += 1;
            Err(QueueError::Delete("timeout".into()))
        }
    }

    #[tokio::test]
    async fn lease_error_surfaces() {
        let queue = Arc::new(FailingQueue {
            fail_lease: true,
            ..Default::default()
        });
        let handler = post_handler();
        let leaser = leaser(queue.clone(), handler.clone(), DecodeFailurePolicy::Discard);

        let err = leaser.run_cycle().await.unwrap_err();

        assert!(matches!(err, LeaserError::Lease(QueueError::Unavailable(_))));
        assert!(handler.calls().is_empty());
        assert_eq!(*queue.deletes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_error_surfaces_after_dispatch() {
        let queue = Arc::new(FailingQueue::default());
        let handler = post_handler();
        let leaser = leaser(queue.clone(), handler.clone(), DecodeFailurePolicy::Discard);

        let err = leaser.run_cycle().await.unwrap_err();

        assert!(matches!(err, LeaserError::Delete { items: 1, .. }));
        assert_eq!(handler.calls().len(), 1);
    }
}
