//! App - the leasing pipeline assembled from ports.
//!
//! - **config**: `LeaserConfig`, loaded by the binary and validated at build
//! - **leaser**: one lease/decode/dispatch/delete cycle
//! - **scheduler**: fixed-rate, non-overlapping cycle runner
//! - **builder**: fail-fast wiring of queue, decoder and handler chain

pub mod builder;
pub mod config;
pub mod leaser;
pub mod scheduler;

pub use self::builder::{App, AppBuilder, BuildError};
pub use self::config::{ConfigError, DecodePolicyKind, LeaserConfig};
pub use self::leaser::{CycleReport, DecodeFailurePolicy, LeaseSettings, LeaserError, QueueLeaser};
pub use self::scheduler::{ScheduleConfig, Scheduler, SchedulerHandle};
