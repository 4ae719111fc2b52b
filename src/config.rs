//! Configuration for the buildlog binary
//!
//! The library takes an explicit log file path; this module only backs the
//! command-line binary with its defaults and optional config file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Path of the log file appends go to
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_log_file() -> PathBuf {
    config_dir().join("build.log")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Load configuration from file, or defaults if no file exists
    pub fn load() -> Result<Self> {
        let path = config_file_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }
}

/// Get the configuration directory (~/.buildlog)
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".buildlog")
    })
}

/// Get the configuration directory if the home directory is known
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".buildlog"))
}

/// Get the configuration file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Ensure the config directory and the log file's parent directory exist
pub fn ensure_directories(config: &Config) -> Result<()> {
    std::fs::create_dir_all(config_dir()).context("Failed to create config directory")?;

    if let Some(parent) = config.log_file.parent() {
        std::fs::create_dir_all(parent).context("Failed to create log directory")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_file, config_dir().join("build.log"));
    }

    #[test]
    fn test_parse_config_with_log_file() {
        let config: Config = toml::from_str("log_file = \"/tmp/ci/build.log\"").unwrap();
        assert_eq!(config.log_file, PathBuf::from("/tmp/ci/build.log"));
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_file_path_is_under_config_dir() {
        assert_eq!(config_file_path(), config_dir().join("config.toml"));
    }
}
