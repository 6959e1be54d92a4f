use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::parser::{LogType, Severity};

const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
const DEFAULT_BUFFER_SIZE: usize = 1000;

/// User configuration loaded from `~/.config/log-analyzer/config.toml`.
///
/// Every field is optional on disk; CLI flags take precedence over
/// config values, which take precedence over built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Default format profile when `-t` is not given.
    #[serde(default)]
    pub log_type: Option<LogType>,

    /// Default severity threshold when `--severity` is not given.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// How often the tail thread polls for new lines.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Number of recent entries retained for the logs view.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_type: None,
            severity: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path:?}"))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file {path:?}"))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {parent:?}"))?;
        }

        let contents =
            toml::to_string_pretty(self).context("Failed to serialize log-analyzer config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {path:?}"))?;
        Ok(())
    }
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}
