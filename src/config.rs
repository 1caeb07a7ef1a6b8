//! Configuration file handling

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings handed to every interface at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Diagnostic verbosity
    pub log_level: LogLevel,
    /// Read timeout used by `poll_pressed_keys`
    #[serde(with = "humantime_serde")]
    pub key_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::None,
            key_timeout: Duration::from_secs(1),
        }
    }
}

impl Config {
    /// Get the config file path for this platform
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "g15").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the platform config file, falling back to defaults if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path().ok_or(ConfigError::NoConfigDir)?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level, LogLevel::None);
        assert_eq!(config.key_timeout, Duration::from_secs(1));
    }

    #[test]
    fn parses_all_fields() {
        let config = Config::from_toml_str(
            r#"
            log_level = "info"
            key_timeout = "250ms"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.key_timeout, Duration::from_millis(250));
    }

    #[test]
    fn rejects_unknown_level() {
        let err = Config::from_toml_str(r#"log_level = "debug""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn serializes_back() {
        let config = Config {
            log_level: LogLevel::Warn,
            key_timeout: Duration::from_millis(500),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}
