//! Application configuration.
//!
//! This module handles loading, validating, and saving the application
//! configuration in TOML format with platform-specific directory
//! resolution. Device settings are not configuration; they live on the
//! device and travel over `get_settings`/`set_settings`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Serial connection preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SerialConfig {
    /// Default serial port (e.g. "/dev/ttyACM0"); CLI `--port` overrides it
    pub port: Option<String>,
}

/// The application configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Serial connection preferences
    #[serde(default)]
    pub serial: SerialConfig,
}

impl Config {
    /// Gets the platform configuration directory for this application.
    ///
    /// - Linux: `~/.config/LazyPad/`
    /// - macOS: `~/Library/Application Support/LazyPad/`
    /// - Windows: `%APPDATA%\LazyPad\`
    pub fn config_dir() -> Result<PathBuf> {
        let base = dirs::config_dir().context("Could not determine the config directory")?;
        Ok(base.join("LazyPad"))
    }

    /// Path of the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Whether a configuration file exists.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }

    /// Loads the configuration file, or defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Saves the configuration file, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("Failed to encode config")?;
        fs::write(&path, raw).with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_port() {
        let config = Config::default();
        assert_eq!(config.serial.port, None);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config {
            serial: SerialConfig {
                port: Some("/dev/ttyACM0".to_string()),
            },
        };
        let raw = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&raw).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_missing_sections_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }
}
