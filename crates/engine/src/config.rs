//! Engine config module - scheduler settings

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use blockfall_types::{FIXED_STEP_HZ, MAX_FRAME_DELTA_MS};

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Logic steps per second.
    pub fixed_step_hz: u32,
    /// Longest frame delta fed to the accumulator.
    pub max_frame_delta_ms: u32,
    /// Level the scoring system starts at.
    pub start_level: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_step_hz: FIXED_STEP_HZ,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            start_level: 0,
        }
    }
}

impl EngineConfig {
    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(u64::from(self.max_frame_delta_ms))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid engine config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fixed_step_hz == 0 {
            bail!("fixedStepHz must be positive");
        }
        if self.max_frame_delta_ms == 0 {
            bail!("maxFrameDeltaMs must be positive");
        }
        Ok(())
    }
}
