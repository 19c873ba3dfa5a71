//! Graph-wide settings, loadable from JSON.
use crate::time::TimeInterval;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Time interval [{start}, {end}] is not a valid range")]
    InvalidInterval { start: f64, end: f64 },
    #[error("Default entry origin {0} must lie in [0, 1]")]
    InvalidOrigin(f64),
}

/// What bulk list construction does when an item is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkPolicy {
    /// Check every item first; build nothing if one fails.
    #[default]
    AllOrNothing,
    /// Add items in order and stop at the first failure, keeping what was added.
    PartialCommit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Interval of the root canvas; also used for nodes without a canvas.
    pub time: TimeInterval,
    /// Interpolation factor for entries synthesized between two neighbours.
    pub entry_origin: f64,
    pub bulk_policy: BulkPolicy,
    /// Log every reference acquire/release at trace level.
    pub trace_refs: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            time: TimeInterval::default(),
            entry_origin: 0.5,
            bulk_policy: BulkPolicy::default(),
            trace_refs: false,
        }
    }
}

impl GraphConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time.is_valid() {
            return Err(ConfigError::InvalidInterval { start: self.time.start, end: self.time.end });
        }
        if !(0.0..=1.0).contains(&self.entry_origin) {
            return Err(ConfigError::InvalidOrigin(self.entry_origin));
        }
        Ok(())
    }
}
