//! Engine configuration

use guardline_classify::ClassifyConfig;
use serde::{Deserialize, Serialize};

use crate::decision::DecisionThresholds;
use crate::responses::ResponseConfig;

/// Top-level configuration for [`crate::ContentFilter`]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Store, matcher, scorer, and disambiguator settings
    #[serde(default)]
    pub classify: ClassifyConfig,

    /// Decision ladder thresholds
    #[serde(default)]
    pub thresholds: DecisionThresholds,

    /// Response template catalog
    #[serde(default)]
    pub responses: ResponseConfig,

    /// Runtime limits and lifecycles
    #[serde(default)]
    pub limits: EngineLimits,
}

/// Buffer sizes, input caps, and retention settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineLimits {
    /// Oversized input is truncated to this many characters before scanning
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Analysis history ring buffer capacity
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Level the buffer is trimmed to on overflow
    #[serde(default = "default_history_trim_to")]
    pub history_trim_to: usize,

    /// Retention TTL in days
    #[serde(default = "default_retention_ttl_days")]
    pub retention_ttl_days: u32,

    /// How often the background purge runs, in seconds
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_message_chars: default_max_message_chars(),
            history_capacity: default_history_capacity(),
            history_trim_to: default_history_trim_to(),
            retention_ttl_days: default_retention_ttl_days(),
            purge_interval_secs: default_purge_interval_secs(),
        }
    }
}

impl EngineConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load from file
    pub fn from_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml(&content)?)
    }
}

fn default_max_message_chars() -> usize {
    50_000
}

fn default_history_capacity() -> usize {
    1000
}

fn default_history_trim_to() -> usize {
    500
}

fn default_retention_ttl_days() -> u32 {
    30
}

fn default_purge_interval_secs() -> u64 {
    3600
}
