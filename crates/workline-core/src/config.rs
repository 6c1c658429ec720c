//! Engine configuration.
//!
//! Every knob has a default, so an empty file (or no file) yields the stock
//! behaviour: 14-day steps, 8-hour days, nominal resources and the minimal
//! "overdue means at risk" rule.
//!
//! ```toml
//! default_duration_days = 10
//! hours_per_day = 7.5
//!
//! [default_resources]
//! labor = 3
//! materials = "2500.00"
//! equipment = 1
//!
//! [risk]
//! mode = "buffer-aware"
//! buffer_days = 5
//! working_days_per_week = 5
//! ```

use crate::{Calendar, Resources};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default span of a project window when no end date is known
pub const DEFAULT_GRID_SPAN_DAYS: i64 = 90;

/// Default length of a synthesized task
pub const DEFAULT_DURATION_DAYS: u32 = 14;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// How tasks are classified as at risk
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum RiskPolicy {
    /// Overdue and incomplete
    Minimal,
    /// Overdue, or slipping by more than the remaining buffer
    BufferAware {
        /// Contingency days held at the end of the chain
        #[serde(default)]
        buffer_days: i64,
        /// Used to convert calendar slippage into working days
        #[serde(default = "default_working_days_per_week")]
        working_days_per_week: u8,
    },
}

fn default_working_days_per_week() -> u8 {
    5
}

impl Default for RiskPolicy {
    fn default() -> Self {
        RiskPolicy::Minimal
    }
}

/// Scheduling engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Task length when a step carries no duration of its own
    pub default_duration_days: u32,
    /// Hours per day for `estimated_hours`
    pub hours_per_day: f64,
    /// Resources attached to tasks whose step supplies none
    pub default_resources: Resources,
    pub risk: RiskPolicy,
    /// Window length when the project has no expected end date
    pub grid_default_span_days: i64,
    pub calendar: Calendar,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            default_duration_days: DEFAULT_DURATION_DAYS,
            hours_per_day: 8.0,
            default_resources: Resources::nominal(),
            risk: RiskPolicy::Minimal,
            grid_default_span_days: DEFAULT_GRID_SPAN_DAYS,
            calendar: Calendar::default(),
        }
    }
}

impl ScheduleConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Set the risk policy (builder pattern)
    pub fn with_risk(mut self, risk: RiskPolicy) -> Self {
        self.risk = risk;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_duration_days == 0 {
            return Err(ConfigError::Invalid(
                "default_duration_days must be at least 1".into(),
            ));
        }
        if !(self.hours_per_day > 0.0 && self.hours_per_day <= 24.0) {
            return Err(ConfigError::Invalid(format!(
                "hours_per_day must be in (0, 24], got {}",
                self.hours_per_day
            )));
        }
        if self.grid_default_span_days < 0 {
            return Err(ConfigError::Invalid(
                "grid_default_span_days cannot be negative".into(),
            ));
        }
        if let RiskPolicy::BufferAware {
            buffer_days,
            working_days_per_week,
        } = &self.risk
        {
            if !(1..=7).contains(working_days_per_week) {
                return Err(ConfigError::Invalid(format!(
                    "working_days_per_week must be 1-7, got {}",
                    working_days_per_week
                )));
            }
            if *buffer_days < 0 {
                return Err(ConfigError::Invalid("buffer_days cannot be negative".into()));
            }
        }
        Ok(())
    }
}
