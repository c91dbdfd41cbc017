//! Draft builder configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CalGridError, CalGridResult};

/// What to do when a weekly repeat is saved with no weekday ticked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeeklyFallback {
    /// Repeat on the weekday the event starts on.
    #[default]
    StartWeekday,
    /// Refuse to save and ask for a weekday.
    Reject,
}

fn default_until_inclusive() -> bool {
    true
}

/// Configuration at ~/.config/calgrid/config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    #[serde(default)]
    pub weekly_fallback: WeeklyFallback,

    /// Whether a repeat's end date includes occurrences on that day.
    #[serde(default = "default_until_inclusive")]
    pub until_inclusive: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            weekly_fallback: WeeklyFallback::default(),
            until_inclusive: default_until_inclusive(),
        }
    }
}

impl BuilderConfig {
    pub fn config_path() -> CalGridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalGridError::Config("Could not determine config directory".into()))?
            .join("calgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from `path`, falling back to defaults if it doesn't exist.
    pub fn load(path: &Path) -> CalGridResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CalGridError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> CalGridResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalGridError::Config(e.to_string()))
    }
}
