//! Scheduler - runs leasing cycles at a fixed rate.
//!
//! # Behavior
//! - The first cycle starts after `initial_delay`, then one per `period`.
//! - A cycle that overruns its period delays the next tick instead of
//!   bursting to catch up.
//! - Cycles never overlap: both ticks and `run_once` go through the same
//!   single-flight guard.
//! - A cycle error is logged and the schedule keeps going.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use super::leaser::{CycleReport, LeaserError, QueueLeaser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub period: Duration,
    pub initial_delay: Duration,
}

pub struct Scheduler {
    leaser: QueueLeaser,
    in_flight: Mutex<()>,
}

impl Scheduler {
    pub fn new(leaser: QueueLeaser) -> Self {
        Self {
            leaser,
            in_flight: Mutex::new(()),
        }
    }

    /// Run one cycle now, waiting for any in-flight cycle to finish first.
    pub async fn run_once(&self) -> Result<CycleReport, LeaserError> {
        let _guard = self.in_flight.lock().await;
        self.leaser.run_cycle().await
    }

    /// Start the fixed-rate loop on the tokio runtime.
    pub fn spawn(self: Arc<Self>, config: ScheduleConfig) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(async move {
            self.tick_loop(config, &mut shutdown_rx).await;
        });
        SchedulerHandle { shutdown_tx, join }
    }

    async fn tick_loop(&self, config: ScheduleConfig, shutdown_rx: &mut watch::Receiver<bool>) {
        info!(
            period_ms = config.period.as_millis() as u64,
            initial_delay_ms = config.initial_delay.as_millis() as u64,
            "Scheduler started"
        );
        let mut ticker = tokio::time::interval_at(Instant::now() + config.initial_delay, config.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown_rx.changed() => {
                    // sender dropped counts as shutdown
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            match self.run_once().await {
                Ok(report) => debug!(
                    leased = report.leased,
                    deleted = report.deleted,
                    failed_groups = report.chain.failed.len(),
                    "Leasing cycle finished"
                ),
                Err(e) => error!(error = %e, "Leasing cycle failed"),
            }
        }
        info!("Scheduler stopped");
    }
}

/// Handle to a spawned schedule.
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop scheduling new cycles. An in-flight cycle runs to completion.
    pub fn request_shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        if let Err(e) = self.join.await {
            error!(error = %e, "Scheduler task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::app::leaser::{DecodeFailurePolicy, LeaseSettings};
    use crate::chain::HandlerChain;
    use crate::domain::QueueItem;
    use crate::impls::JsonEventDecoder;
    use crate::ports::{PullQueue, QueueError};

    /// Counts leases and tracks how many run at once.
    #[derive(Default)]
    struct SlowQueue {
        leases: AtomicUsize,
        active: AtomicUsize,
        max_active: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PullQueue for SlowQueue {
        async fn lease(
            &self,
            _lease_for: Duration,
            _max_items: usize,
            _tag: &str,
        ) -> Result<Vec<QueueItem>, QueueError> {
            self.leases.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            if self.fail {
                return Err(QueueError::Unavailable("down".into()));
            }
            Ok(Vec::new())
        }

        async fn delete(&self, _items: Vec<QueueItem>) -> Result<(), QueueError> {
            Ok(())
        }
    }

    fn scheduler(queue: Arc<SlowQueue>) -> Arc<Scheduler> {
        let leaser = QueueLeaser::new(
            queue,
            Arc::new(JsonEventDecoder),
            Arc::new(HandlerChain::new(Vec::new())),
            LeaseSettings {
                lease_for: Duration::from_secs(3600),
                batch_size: 100,
                tag: "search".to_string(),
                decode_failure_policy: DecodeFailurePolicy::Discard,
            },
        );
        Arc::new(Scheduler::new(leaser))
    }

    const FIVE_SECONDS: ScheduleConfig = ScheduleConfig {
        period: Duration::from_secs(5),
        initial_delay: Duration::from_secs(5),
    };

    #[tokio::test(start_paused = true)]
    async fn concurrent_run_once_calls_do_not_overlap() {
        let queue = Arc::new(SlowQueue::default());
        let scheduler = scheduler(queue.clone());

        let (a, b) = tokio::join!(scheduler.run_once(), scheduler.run_once());

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(queue.leases.load(Ordering::SeqCst), 2);
        assert_eq!(queue.max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_after_initial_delay_then_every_period() {
        let queue = Arc::new(SlowQueue::default());
        let handle = scheduler(queue.clone()).spawn(FIVE_SECONDS);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(queue.leases.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(queue.leases.load(Ordering::SeqCst), 3);

        handle.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failing_cycles_keep_the_schedule_alive() {
        let queue = Arc::new(SlowQueue {
            fail: true,
            ..Default::default()
        });
        let handle = scheduler(queue.clone()).spawn(FIVE_SECONDS);

        tokio::time::sleep(Duration::from_secs(16)).await;
        assert_eq!(queue.leases.load(Ordering::SeqCst), 3);

        handle.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_further_cycles() {
        let queue = Arc::new(SlowQueue::default());
        let handle = scheduler(queue.clone()).spawn(FIVE_SECONDS);

        tokio::time::sleep(Duration::from_secs(6)).await;
        handle.shutdown_and_join().await;
        let after_shutdown = queue.leases.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(queue.leases.load(Ordering::SeqCst), after_shutdown);
    }
}
