use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tunables of the report that are not exposed as command line flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Neurons with stake strictly above this are listed as validators
    pub validator_stake_threshold: f64,
    /// Neurons with stake above this get their raw weights dumped in weight mode
    pub notable_stake_threshold: f64,
    pub seconds_per_block: u64,
    /// Fixed multiplier from per-epoch to per-day emission
    pub epochs_per_day: u32,
    /// Characters kept of hot and cold keys unless `--long_key` is given
    pub key_abbreviation: usize,
    /// Round decimals before sorting. Rows whose rounded values look equal can
    /// then appear in arbitrary relative order; set to false to sort on the
    /// exact values and round for display only.
    pub round_before_sort: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            validator_stake_threshold: 1024.0,
            notable_stake_threshold: 1000.0,
            seconds_per_block: 12,
            epochs_per_day: 20,
            key_abbreviation: 12,
            round_before_sort: true,
        }
    }
}

impl ReportConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ReportConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Loaded report config: {config:?}");
        Ok(config)
    }
}
