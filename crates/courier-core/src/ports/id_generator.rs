//! IdGenerator port - unique 63-bit ids for persisted records.
//!
//! # Implementation
//! - **SnowflakeIdGenerator**: timestamp + worker + sequence, process-local.

use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use thiserror::Error;

use crate::ports::Clock;

/// Generates unique, non-zero, positive 63-bit ids.
///
/// # Thread Safety
/// - `Send + Sync` is required; implementations are shared between tasks.
pub trait IdGenerator: Send + Sync {
    fn generate_id(&self) -> i64;
}

const WORKER_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const TIMESTAMP_BITS: u32 = 41;

pub const MAX_WORKER_ID: u16 = (1 << WORKER_BITS) - 1;
const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;
const MAX_TIMESTAMP: i64 = (1 << TIMESTAMP_BITS) - 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdGeneratorError {
    #[error("worker id {0} exceeds 1023")]
    WorkerOutOfRange(u16),
}

/// `last_ms` starts at 0, so the first id issued exactly at the epoch already
/// carries sequence 1 and no id is ever 0.
#[derive(Debug, Default)]
struct SnowflakeState {
    last_ms: i64,
    sequence: u16,
}

/// Snowflake-style generator.
///
/// Layout (most significant first): 41 bits of milliseconds since
/// 2020-01-01T00:00:00Z, 10 bits of worker id, 12 bits of sequence. The sign
/// bit is always clear.
///
/// Ids are strictly increasing per generator: when the clock stands still or
/// moves backwards the sequence keeps counting, and a sequence overflow
/// borrows the next millisecond instead of waiting for it.
pub struct SnowflakeIdGenerator<C> {
    clock: C,
    worker_id: u16,
    epoch_ms: i64,
    state: Mutex<SnowflakeState>,
}

impl<C: Clock> SnowflakeIdGenerator<C> {
    pub fn new(clock: C, worker_id: u16) -> Result<Self, IdGeneratorError> {
        if worker_id > MAX_WORKER_ID {
            return Err(IdGeneratorError::WorkerOutOfRange(worker_id));
        }
        let epoch_ms = Utc
            .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .single()
            .map(|at| at.timestamp_millis())
            .unwrap_or_default();
        Ok(Self {
            clock,
            worker_id,
            epoch_ms,
            state: Mutex::new(SnowflakeState::default()),
        })
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }

    fn next_parts(&self) -> (i64, u16) {
        let elapsed = (self.clock.now().timestamp_millis() - self.epoch_ms).clamp(0, MAX_TIMESTAMP);
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if elapsed > state.last_ms {
            state.last_ms = elapsed;
            state.sequence = 0;
        } else if state.sequence == MAX_SEQUENCE {
            state.last_ms += 1;
            state.sequence = 0;
        } else {
            state.sequence += 1;
        }

        (state.last_ms, state.sequence)
    }
}

impl<C: Clock> IdGenerator for SnowflakeIdGenerator<C> {
    fn generate_id(&self) -> i64 {
        let (ms, sequence) = self.next_parts();
        (ms << (WORKER_BITS + SEQUENCE_BITS))
            | (i64::from(self.worker_id) << SEQUENCE_BITS)
            | i64::from(sequence)
    }
}
