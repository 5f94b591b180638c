use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Static per-run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Gates whether the tracker reacts to host events at all.
    pub is_enabled: bool,
    /// Verbosity toggle for hosts that map it onto their log level.
    pub debug: bool,
    /// How many calendar months of date stamps to keep.
    pub data_retention_months: u32,
    /// Where the JSON activity data lives.
    pub data_path: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            is_enabled: true,
            debug: false,
            data_retention_months: default_retention_months(),
            data_path: default_data_path(),
        }
    }
}

/// Load config from a TOML file; a missing file means defaults.
///
/// Unlike the data file, a malformed config is operator input and propagates
/// as an error instead of being silently replaced.
pub fn load_config(path: &Path) -> Result<TrackerConfig> {
    if !path.exists() {
        return Ok(TrackerConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<TrackerConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_retention_months() -> u32 {
    2
}

fn default_data_path() -> PathBuf {
    PathBuf::from("player_activity_data.json")
}
