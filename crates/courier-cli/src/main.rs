//! courier - search-index leaser with in-memory adapters.
//!
//! Usage: `courier [--once]`
//!
//! Configuration comes from `COURIER_*` environment variables (a `.env` file
//! is honored). `COURIER_SEED_FILE` enqueues one payload per line before
//! leasing starts; `COURIER_NOTIFY_FILE` dispatches one notification payload
//! per line through the logging push sender.

mod config;
mod logging;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use courier_core::app::{App, AppBuilder};
use courier_core::chain::{PostIndexHandler, UserIndexHandler};
use courier_core::domain::{EventType, NotificationPayload};
use courier_core::impls::{
    InMemoryNotificationRepository, InMemoryPostIndex, InMemoryPullQueue, InMemoryUserIndex,
    JsonEventDecoder, LoggingPushSender,
};
use courier_core::notify::{MessageDispatcher, Notifier, NotifyOutcome};
use courier_core::ports::{SnowflakeIdGenerator, SystemClock};
use tracing::{info, warn};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    logging::init(config.cli.log_format);
    let once = std::env::args().skip(1).any(|arg| arg == "--once");

    let queue = Arc::new(InMemoryPullQueue::new());
    let posts = Arc::new(InMemoryPostIndex::new());
    let users = Arc::new(InMemoryUserIndex::new());

    if let Some(path) = &config.cli.seed_file {
        let seeded = seed_queue(&queue, path, &config.leaser.tag).await?;
        info!(count = seeded, path = %path.display(), "Seeded pull queue");
    }

    if let Some(path) = &config.cli.notify_file {
        replay_notifications(path, config.leaser.worker_id).await?;
    }

    let app = AppBuilder::new(config.leaser.clone())
        .queue(queue.clone())
        .decoder(Arc::new(JsonEventDecoder))
        .handler(Arc::new(PostIndexHandler::new(posts.clone())))?
        .handler(Arc::new(UserIndexHandler::new(users.clone())))?
        .expect_types(&EventType::SEARCH)
        .build()?;

    if once {
        let report = app.scheduler.run_once().await?;
        info!(
            leased = report.leased,
            decoded = report.decoded,
            decode_failed = report.decode_failed,
            deleted = report.deleted,
            failed_groups = report.chain.failed.len(),
            "Cycle complete"
        );
    } else {
        run_until_ctrl_c(&app).await?;
    }

    info!(
        posts = posts.len().await,
        users = users.len().await,
        remaining = queue.len().await,
        "Index state"
    );
    Ok(())
}

async fn run_until_ctrl_c(app: &App) -> Result<()> {
    let handle = app.start();
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("Shutdown requested");
    handle.shutdown_and_join().await;
    Ok(())
}

async fn seed_queue(queue: &InMemoryPullQueue, path: &Path, tag: &str) -> Result<usize> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;

    let mut count = 0;
    for line in contents.lines().map(str::trim).filter(|l| !l.is_empty()) {
        // enqueued as-is: malformed lines exercise the decode-failure path
        queue.add(tag, line.as_bytes().to_vec()).await;
        count += 1;
    }
    Ok(count)
}

async fn replay_notifications(path: &Path, worker_id: u16) -> Result<()> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read notify file {}", path.display()))?;

    let ids = Arc::new(SnowflakeIdGenerator::new(SystemClock, worker_id)?);
    let dispatcher = MessageDispatcher::with_default_providers(ids, Arc::new(SystemClock));
    let notifier = Notifier::new(
        dispatcher,
        Arc::new(InMemoryNotificationRepository::new()),
        Arc::new(LoggingPushSender),
    );

    for (n, line) in contents.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
        let payload: NotificationPayload = match serde_json::from_str(line) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(line = n + 1, error = %e, "Skipping malformed notification payload");
                continue;
            }
        };
        match notifier.notify(&payload).await {
            Ok(NotifyOutcome::Sent(id)) => info!(line = n + 1, id = %id, "Notification sent"),
            Ok(NotifyOutcome::Ignored) => info!(line = n + 1, kind = %payload.kind, "Notification ignored"),
            Err(e) => warn!(line = n + 1, error = %e, "Notification failed"),
        }
    }
    Ok(())
}
