//! Leaser configuration.
//!
//! Fields are flat so the binary can fill them from `COURIER_*` environment
//! variables; every field has a default matching the production setup.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::leaser::{DecodeFailurePolicy, LeaseSettings};
use super::scheduler::ScheduleConfig;
use crate::ports::id_generator::MAX_WORKER_ID;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("worker_id {0} exceeds {max}", max = MAX_WORKER_ID)]
    WorkerId(u16),

    #[error("tag must not be empty")]
    EmptyTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicyKind {
    #[default]
    Discard,
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaserConfig {
    /// How long a leased item stays invisible to other leasers.
    pub lease_seconds: u64,
    /// Max items leased per cycle.
    pub batch_size: usize,
    /// Queue tag selecting the items this leaser consumes.
    pub tag: String,
    pub period_ms: u64,
    pub initial_delay_ms: u64,
    /// Snowflake worker id (0..=1023).
    pub worker_id: u16,
    pub decode_policy: DecodePolicyKind,
    /// With `decode_policy = retry`: leases before an undecodable item is discarded.
    pub decode_max_leases: u32,
}

impl Default for LeaserConfig {
    fn default() -> Self {
        Self {
            lease_seconds: 3600,
            batch_size: 100,
            tag: "search".to_string(),
            period_ms: 5_000,
            initial_delay_ms: 5_000,
            worker_id: 1,
            decode_policy: DecodePolicyKind::Discard,
            decode_max_leases: 3,
        }
    }
}

impl LeaserConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lease_seconds == 0 {
            return Err(ConfigError::Zero("lease_seconds"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Zero("batch_size"));
        }
        if self.period_ms == 0 {
            return Err(ConfigError::Zero("period_ms"));
        }
        if self.decode_policy == DecodePolicyKind::Retry && self.decode_max_leases == 0 {
            return Err(ConfigError::Zero("decode_max_leases"));
        }
        if self.worker_id > MAX_WORKER_ID {
            return Err(ConfigError::WorkerId(self.worker_id));
        }
        if self.tag.trim().is_empty() {
            return Err(ConfigError::EmptyTag);
        }
        Ok(())
    }

    pub fn decode_failure_policy(&self) -> DecodeFailurePolicy {
        match self.decode_policy {
            DecodePolicyKind::Discard => DecodeFailurePolicy::Discard,
            DecodePolicyKind::Retry => DecodeFailurePolicy::RetryThenDiscard {
                max_leases: self.decode_max_leases,
            },
        }
    }

    pub fn lease_settings(&self) -> LeaseSettings {
        LeaseSettings {
            lease_for: Duration::from_secs(self.lease_seconds),
            batch_size: self.batch_size,
            tag: self.tag.clone(),
            decode_failure_policy: self.decode_failure_policy(),
        }
    }

    pub fn schedule(&self) -> ScheduleConfig {
        ScheduleConfig {
            period: Duration::from_millis(self.period_ms),
            initial_delay: Duration::from_millis(self.initial_delay_ms),
        }
    }
}
