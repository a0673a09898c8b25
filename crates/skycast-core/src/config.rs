//! Environment-driven server configuration.
//!
//! Read once at startup. A missing API key or an unrecognized unit system is
//! fatal before the server accepts its first request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable holding the OpenWeatherMap API key.
pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";

/// Environment variable selecting the unit system.
pub const UNITS_VAR: &str = "OPENWEATHER_UNITS";

/// Unit system passed through to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    /// Query-parameter value expected by OpenWeatherMap.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }

    /// Suffix for rendered temperatures.
    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
            Self::Standard => "K",
        }
    }

    /// Suffix for rendered wind speeds.
    pub fn wind_suffix(&self) -> &'static str {
        match self {
            Self::Imperial => "mph",
            Self::Metric | Self::Standard => "m/s",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            "standard" => Ok(Self::Standard),
            other => Err(ConfigError::InvalidUnits(other.to_string())),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenWeatherMap API key.
    pub api_key: String,
    /// Unit system for all provider requests.
    pub units: Units,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] when `OPENWEATHER_API_KEY` is
    /// absent or empty, and [`ConfigError::InvalidUnits`] when
    /// `OPENWEATHER_UNITS` holds anything other than
    /// `metric`/`imperial`/`standard`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(API_KEY_VAR).ok(),
            std::env::var(UNITS_VAR).ok(),
        )
    }

    /// Build configuration from raw environment values.
    ///
    /// Factored out of [`Config::from_env`] so tests don't need to mutate
    /// process-global environment state.
    pub fn from_values(
        api_key: Option<String>,
        units: Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = match api_key {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(ConfigError::MissingApiKey),
        };

        // Absent defaults to metric; a present-but-unknown value fails fast
        // rather than silently falling back.
        let units = match units {
            Some(raw) => raw.parse()?,
            None => Units::default(),
        };

        Ok(Self { api_key, units })
    }
}
