//! Game logic configuration
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a playable setup.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use blockfall_types::{BOARD_HEIGHT, BOARD_WIDTH, LINE_CLEAR_MS, LOCK_DELAY_MS, PREVIEW_COUNT};

/// Smallest board that still fits every piece in every rotation.
pub const MIN_BOARD_SIZE: usize = 4;

/// Largest accepted board side.
pub const MAX_BOARD_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogicConfig {
    pub width: usize,
    pub height: usize,
    pub lock_delay_ms: u32,
    pub line_clear_ms: u32,
    pub ghost_enabled: bool,
    pub preview_count: usize,
    /// Cap on lock timer resets per piece; `None` allows unlimited resets.
    pub lock_reset_limit: Option<u32>,
    /// Piece sequence seed; `None` draws one at random.
    pub seed: Option<u64>,
}

impl Default for LogicConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            lock_delay_ms: LOCK_DELAY_MS,
            line_clear_ms: LINE_CLEAR_MS,
            ghost_enabled: true,
            preview_count: PREVIEW_COUNT,
            lock_reset_limit: None,
            seed: None,
        }
    }
}

impl LogicConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn lock_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.lock_delay_ms))
    }

    pub fn line_clear_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.line_clear_ms))
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid logic config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&value) {
                bail!(
                    "board {} {} outside {}..={}",
                    name,
                    value,
                    MIN_BOARD_SIZE,
                    MAX_BOARD_SIZE
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogicConfig::default();
        assert_eq!((config.width, config.height), (10, 20));
        assert_eq!(config.lock_delay(), Duration::from_millis(500));
        assert_eq!(config.line_clear_duration(), Duration::from_millis(300));
        assert!(config.ghost_enabled);
        assert_eq!(config.lock_reset_limit, None);
    }

    #[test]
    fn test_partial_json() {
        let config = LogicConfig::from_json(r#"{"lockDelayMs": 750, "seed": 42}"#).unwrap();
        assert_eq!(config.lock_delay_ms, 750);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.width, 10);
    }

    #[test]
    fn test_rejects_tiny_board() {
        let err = LogicConfig::from_json(r#"{"width": 3}"#).unwrap_err();
        assert!(err.to_string().contains("width"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(LogicConfig::from_json("{width: }").is_err());
    }
}
