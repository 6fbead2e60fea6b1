//! TOML-based application configuration.
//!
//! Stores shell-level preferences that do not belong in the timer snapshot:
//! - whether a previously running countdown restarts after a reload
//! - notification dispatch and alarm volume
//!
//! Stored at `~/.config/pomotick/config.toml` and written back with
//! defaults on first run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::data_dir;

/// Restore behavior after a process restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreConfig {
    /// Restart the countdown when the loaded snapshot was running at
    /// shutdown. Off by default: a reloaded timer counting down without the
    /// user asking for it risks surprise completions.
    #[serde(default)]
    pub auto_resume: bool,
}

/// Notification and alarm configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Alarm volume in percent, mapped to the sound sink's `0.0..=1.0`.
    #[serde(default = "default_volume")]
    pub volume: u32,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub restore: RestoreConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_true() -> bool {
    true
}

fn default_volume() -> u32 {
    50
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self { auto_resume: false }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: default_volume(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            restore: RestoreConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, logging and falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            log::warn!("using default configuration: {e}");
            Self::default()
        })
    }

    /// Alarm volume as the sound sink expects it.
    pub fn alarm_volume(&self) -> f32 {
        (self.notifications.volume.min(100) as f32) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(!parsed.restore.auto_resume);
        assert!(parsed.notifications.enabled);
        assert_eq!(parsed.notifications.volume, 50);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert!(!parsed.restore.auto_resume);
        assert_eq!(parsed.notifications.volume, 50);

        let parsed: Config = toml::from_str("[restore]\nauto_resume = true\n").unwrap();
        assert!(parsed.restore.auto_resume);
        assert!(parsed.notifications.enabled);
    }

    #[test]
    fn alarm_volume_maps_to_unit_range() {
        let mut cfg = Config::default();
        assert!((cfg.alarm_volume() - 0.5).abs() < f32::EPSILON);
        cfg.notifications.volume = 100;
        assert_eq!(cfg.alarm_volume(), 1.0);
        cfg.notifications.volume = 250;
        assert_eq!(cfg.alarm_volume(), 1.0);
        cfg.notifications.volume = 0;
        assert_eq!(cfg.alarm_volume(), 0.0);
    }
}
