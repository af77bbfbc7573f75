//! Configuration management
//!
//! Persistent configuration, automatically saved to and loaded from a
//! platform-specific config file. Only presentational settings live here:
//! the validator's tolerance and variance thresholds are fixed constants
//! and deliberately not configurable.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/rhythm-captcha/config.toml` |
//! | macOS | `~/Library/Application Support/rhythm-captcha/config.toml` |
//! | Windows | `%APPDATA%\rhythm-captcha\config.toml` |

use crate::challenge::{TRAILING_BUFFER_MS, VERIFY_DELAY_MS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file, creating the config directory if
/// it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("rhythm-captcha");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Challenge timing settings
    pub challenge: ChallengeConfig,
    /// Audible feedback settings
    pub audio: AudioConfig,
    /// UI settings
    pub ui: UiConfig,
}

/// Challenge timing configuration. These are presentational delays; they
/// have no bearing on the verification verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeConfig {
    /// Quiet period after the final cue before taps are accepted, in ms
    pub trailing_buffer_ms: u64,
    /// Artificial delay before the verdict is shown, in ms
    pub verify_delay_ms: u64,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            trailing_buffer_ms: TRAILING_BUFFER_MS,
            verify_delay_ms: VERIFY_DELAY_MS,
        }
    }
}

/// Audible feedback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Ring the terminal bell for each playback cue
    pub cue_bell: bool,
    /// Acknowledge each accepted tap with a bell
    pub tap_feedback: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            cue_bell: true,
            tap_feedback: true,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Refresh rate for UI updates (in Hz)
    pub refresh_rate_hz: u32,
    /// Color theme (dark/light)
    pub theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_hz: 60,
            theme: Theme::Dark,
        }
    }
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// Useful for testing or using custom config locations.
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get UI refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.ui.refresh_rate_hz as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path() -> PathBuf {
        env::temp_dir().join(format!("rhythm-captcha-test-{}.toml", std::process::id()))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.challenge.trailing_buffer_ms, 1_000);
        assert_eq!(config.challenge.verify_delay_ms, 1_000);
        assert!(config.audio.cue_bell);
        assert!(config.audio.tap_feedback);
        assert_eq!(config.ui.refresh_rate_hz, 60);
        assert_eq!(config.ui.theme, Theme::Dark);
    }

    #[test]
    fn config_refresh_interval() {
        let config = Config::default();
        // 60 Hz = 16666 microseconds per frame
        assert_eq!(config.refresh_interval().as_micros(), 16_666);
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path();

        let mut config = Config::default();
        config.challenge.verify_delay_ms = 250;
        config.audio.cue_bell = false;
        config.ui.theme = Theme::Light;

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");

        assert_eq!(loaded.challenge.verify_delay_ms, 250);
        assert!(!loaded.audio.cue_bell);
        assert_eq!(loaded.ui.theme, Theme::Light);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn config_serializes_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("[challenge]"));
        assert!(toml_str.contains("[audio]"));
        assert!(toml_str.contains("[ui]"));
        assert!(toml_str.contains("trailing_buffer_ms = 1000"));
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml_str = r#"
[challenge]
trailing_buffer_ms = 500
verify_delay_ms = 750

[audio]
cue_bell = false
tap_feedback = true

[ui]
refresh_rate_hz = 144
theme = "Light"
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.challenge.trailing_buffer_ms, 500);
        assert_eq!(config.challenge.verify_delay_ms, 750);
        assert!(!config.audio.cue_bell);
        assert!(config.audio.tap_feedback);
        assert_eq!(config.ui.refresh_rate_hz, 144);
        assert_eq!(config.ui.theme, Theme::Light);
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "could not determine config directory");
    }
}
