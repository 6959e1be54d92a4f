use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Get the config directory for log-analyzer
///
/// Returns `$XDG_CONFIG_HOME/log-analyzer` or `~/.config/log-analyzer` if not set
pub fn config_dir() -> Result<PathBuf> {
    let base = match env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => home_dir()?.join(".config"),
    };

    Ok(base.join("log-analyzer"))
}

/// Get the config file path
///
/// Returns `<config_dir>/config.toml`
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get the user's local bin directory
///
/// Returns `$HOME/.local/bin`
pub fn bin_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(".local/bin"))
}

/// Get the home directory
pub fn home_dir() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .context("Failed to get home directory")
        .map(|bd| bd.home_dir().to_path_buf())
}
