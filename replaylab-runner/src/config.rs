//! Serializable replay configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Command-line flags are applied on top by the binaries.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use replaylab_core::PlaybackConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration for building and replaying one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub data: DataConfig,
    pub strategy: StrategyParams,
    pub playback: PlaybackSettings,
}

impl ReplayConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.data.validate()?;
        self.strategy.validate()?;
        self.playback.validate()
    }
}

/// Where the input series come from and which dates to keep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV with `Date` and `Close` columns.
    pub price_csv: PathBuf,
    /// CSV with a `date` or `timestamp` column and `value`.
    pub sentiment_csv: PathBuf,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            price_csv: PathBuf::from("data/btc_usd.csv"),
            sentiment_csv: PathBuf::from("data/fear_greed_2022_2024.csv"),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
        }
    }
}

impl DataConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.start_date > self.end_date {
            return Err(ConfigError::Invalid(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }
}

/// Strategy and indicator parameters. These select the built dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    pub short_window: usize,
    pub long_window: usize,
    pub extreme_fear: u32,
    pub extreme_greed: u32,
    pub bollinger_window: usize,
    pub bollinger_std: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            short_window: 5,
            long_window: 50,
            extreme_fear: 25,
            extreme_greed: 75,
            bollinger_window: 20,
            bollinger_std: 2.0,
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_window == 0 || self.long_window == 0 || self.bollinger_window == 0 {
            return Err(ConfigError::Invalid("windows must be >= 1".into()));
        }
        if self.short_window >= self.long_window {
            return Err(ConfigError::Invalid(format!(
                "short_window ({}) must be less than long_window ({})",
                self.short_window, self.long_window
            )));
        }
        if self.extreme_greed > 100 {
            return Err(ConfigError::Invalid(format!(
                "extreme_greed ({}) must be within 0..=100",
                self.extreme_greed
            )));
        }
        if self.extreme_fear >= self.extreme_greed {
            return Err(ConfigError::Invalid(format!(
                "extreme_fear ({}) must be less than extreme_greed ({})",
                self.extreme_fear, self.extreme_greed
            )));
        }
        if !self.bollinger_std.is_finite() || self.bollinger_std < 0.0 {
            return Err(ConfigError::Invalid("bollinger_std must be finite and >= 0".into()));
        }
        Ok(())
    }
}

/// Playback timing as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub initial_points: usize,
    pub tick_ms: u64,
    pub latch_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        let core = PlaybackConfig::default();
        Self {
            initial_points: core.initial_points,
            tick_ms: core.tick_period.as_millis() as u64,
            latch_ms: core.latch_duration.as_millis() as u64,
        }
    }
}

impl PlaybackSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_points == 0 {
            return Err(ConfigError::Invalid("initial_points must be >= 1".into()));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be >= 1".into()));
        }
        Ok(())
    }

    pub fn to_playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            initial_points: self.initial_points,
            tick_period: Duration::from_millis(self.tick_ms),
            latch_duration: Duration::from_millis(self.latch_ms),
        }
    }
}
