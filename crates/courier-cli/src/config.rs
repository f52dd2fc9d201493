use std::path::PathBuf;

use anyhow::{Context, Result};
use courier_core::app::LeaserConfig;
use dotenvy::dotenv;
use serde::Deserialize;

const PREFIX: &str = "COURIER_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Binary-only settings, read from the same `COURIER_*` variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    pub log_format: LogFormat,
    /// JSON-lines file whose lines are enqueued before the first cycle.
    pub seed_file: Option<PathBuf>,
    /// JSON-lines file of notification payloads to dispatch at startup.
    pub notify_file: Option<PathBuf>,
}

pub struct Config {
    pub leaser: LeaserConfig,
    pub cli: CliSettings,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let leaser = envy::prefixed(PREFIX)
            .from_env::<LeaserConfig>()
            .context("invalid COURIER_* leaser variable")?;
        let cli = envy::prefixed(PREFIX)
            .from_env::<CliSettings>()
            .context("invalid COURIER_* cli variable")?;
        Ok(Self { leaser, cli })
    }
}
