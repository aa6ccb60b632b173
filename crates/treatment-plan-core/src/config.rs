//! Engine configuration.
//!
//! Settings can come from a TOML file; every field has a default so an empty
//! file (or no file) yields the standard waking-hours window.
//!
//! ```toml
//! [window]
//! start = "08:00"
//! end = "22:00"
//! granularity_minutes = 5
//! shift_step_minutes = 15
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DoseTime, MAX_FREQUENCY_PER_DAY};

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid dosing window: {0}")]
    InvalidWindow(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Daily dosing window settings.
    #[serde(default)]
    pub window: DosingWindow,
}

/// The daily range `[start, end)` in which every dose is placed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DosingWindow {
    /// First possible dose time.
    #[serde(default = "default_start")]
    pub start: DoseTime,

    /// Doses must fall strictly before this time.
    #[serde(default = "default_end")]
    pub end: DoseTime,

    /// Dose times are rounded to multiples of this many minutes.
    #[serde(default = "default_granularity")]
    pub granularity_minutes: u32,

    /// Step used when shifting a medication to satisfy a separation constraint.
    #[serde(default = "default_shift_step")]
    pub shift_step_minutes: u32,
}

impl Default for DosingWindow {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
            granularity_minutes: default_granularity(),
            shift_step_minutes: default_shift_step(),
        }
    }
}

fn default_start() -> DoseTime {
    DoseTime::clamped(8 * 60)
}

fn default_end() -> DoseTime {
    DoseTime::clamped(22 * 60)
}

fn default_granularity() -> u32 {
    5
}

fn default_shift_step() -> u32 {
    15
}

impl DosingWindow {
    /// Window width in minutes.
    pub fn width_minutes(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Whether a dose time lies inside `[start, end)`.
    pub fn contains(&self, time: DoseTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Check the window can hold the densest schedule on aligned times.
    pub fn validate(&self) -> ConfigResult<()> {
        let granularity = self.granularity_minutes;
        if granularity == 0 || 60 % granularity != 0 {
            return Err(ConfigError::InvalidWindow(format!(
                "granularity_minutes must divide 60, got {}",
                granularity
            )));
        }
        if self.shift_step_minutes == 0 || self.shift_step_minutes % granularity != 0 {
            return Err(ConfigError::InvalidWindow(format!(
                "shift_step_minutes must be a positive multiple of {}, got {}",
                granularity, self.shift_step_minutes
            )));
        }
        if self.start >= self.end {
            return Err(ConfigError::InvalidWindow(format!(
                "start {} must be before end {}",
                self.start, self.end
            )));
        }
        if self.start.minutes() % granularity != 0 || self.end.minutes() % granularity != 0 {
            return Err(ConfigError::InvalidWindow(format!(
                "start and end must be aligned to {} minutes",
                granularity
            )));
        }
        if self.width_minutes() < MAX_FREQUENCY_PER_DAY * granularity {
            return Err(ConfigError::InvalidWindow(format!(
                "window of {} minutes cannot hold {} distinct doses",
                self.width_minutes(),
                MAX_FREQUENCY_PER_DAY
            )));
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.window.validate()
    }
}
