use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use blockfall_core::LogicConfig;
use blockfall_engine::EngineConfig;

/// Everything a host can configure, as one JSON document:
///
/// ```json
/// { "logic": { "seed": 42, "lockDelayMs": 500 }, "engine": { "startLevel": 2 } }
/// ```
///
/// Both sections and every field inside them are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logic: LogicConfig,
    pub engine: EngineConfig,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json).context("invalid settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings = Self::from_json(&json).with_context(|| format!("in {}", path.display()))?;
        log::debug!("settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.logic.validate().context("logic settings")?;
        self.engine.validate().context("engine settings")?;
        Ok(())
    }
}
