//! AppBuilder - wiring of the search-index leaser.
//!
//! Every check runs in `build()`, before anything is spawned: invalid
//! configuration, a missing adapter, two handlers claiming one event type,
//! or an expected event type nobody handles all fail fast with a
//! `BuildError`.

use std::sync::Arc;

use super::config::{ConfigError, LeaserConfig};
use super::leaser::QueueLeaser;
use super::scheduler::{ScheduleConfig, Scheduler, SchedulerHandle};
use crate::chain::{ChainBuildError, ChainBuilder, EventHandler};
use crate::domain::EventType;
use crate::ports::{EventDecoder, PullQueue};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("no {0} configured")]
    MissingComponent(&'static str),

    #[error(transparent)]
    Chain(#[from] ChainBuildError),
}

/// # Example
/// ```ignore
/// let app = AppBuilder::new(config)
///     .queue(queue)
///     .decoder(Arc::new(JsonEventDecoder))
///     .handler(Arc::new(PostIndexHandler::new(posts)))?
///     .handler(Arc::new(UserIndexHandler::new(users)))?
///     .expect_types(&EventType::SEARCH)
///     .build()?;
/// ```
pub struct AppBuilder {
    config: LeaserConfig,
    queue: Option<Arc<dyn PullQueue>>,
    decoder: Option<Arc<dyn EventDecoder>>,
    chain: ChainBuilder,
}

impl AppBuilder {
    pub fn new(config: LeaserConfig) -> Self {
        Self {
            config,
            queue: None,
            decoder: None,
            chain: ChainBuilder::new(),
        }
    }

    pub fn queue(mut self, queue: Arc<dyn PullQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn decoder(mut self, decoder: Arc<dyn EventDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Append a handler to the chain. Order is dispatch priority.
    pub fn handler(mut self, handler: Arc<dyn EventHandler>) -> Result<Self, BuildError> {
        self.chain = self.chain.link(handler)?;
        Ok(self)
    }

    pub fn expect_types(mut self, event_types: &[EventType]) -> Self {
        self.chain = self.chain.expect_types(event_types);
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        self.config.validate()?;
        let queue = self.queue.ok_or(BuildError::MissingComponent("queue"))?;
        let decoder = self.decoder.ok_or(BuildError::MissingComponent("decoder"))?;
        let chain = self.chain.build()?;

        let leaser = QueueLeaser::new(queue, decoder, Arc::new(chain), self.config.lease_settings());
        Ok(App {
            scheduler: Arc::new(Scheduler::new(leaser)),
            schedule: self.config.schedule(),
        })
    }
}

/// A validated leaser ready to run.
pub struct App {
    pub scheduler: Arc<Scheduler>,
    pub schedule: ScheduleConfig,
}

impl App {
    pub fn start(&self) -> SchedulerHandle {
        Arc::clone(&self.scheduler).spawn(self.schedule)
    }
}
