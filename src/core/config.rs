//! Engine configuration with documented constants
//!
//! All tuning numbers for the arithmetic engine, the weather generator
//! and the event feed are collected here. Configuration is passed
//! explicitly to whatever needs it; there is no process-wide instance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{CalendarError, Result};

/// Configuration for the calendar engine and its consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === ARITHMETIC ===
    /// Largest year cycle (in years) the engine will precompute
    ///
    /// The pattern of month presence and leap days repeats every
    /// lcm(all intervals) years. Up to this length the engine builds a
    /// prefix table and answers `days_from_epoch` in constant time.
    /// Longer cycles fall back to summing year by year.
    pub max_cycle_years: u64,

    // === WEATHER ===
    pub weather: WeatherTuning,

    // === EVENT FEED ===
    /// Capacity of the bounded queue of scan requests sent to the
    /// note-scanning worker
    ///
    /// A full queue drops the request with a warning. Requests are
    /// idempotent, so a dropped one is re-sent on the next change.
    pub scan_queue_capacity: usize,
}

/// Spreads and multipliers used by the weather generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherTuning {
    /// Standard deviation (°C) of the daily low/high draws around the
    /// season's temperature range
    pub temperature_spread: f64,

    /// Standard deviation of the daily precipitation chance draw
    pub precipitation_spread: f64,

    /// Standard deviation of the precipitation intensity draw
    pub intensity_spread: f64,

    /// Wind speed (km/h) reached by a season with `windy = 1.0`
    ///
    /// Daily speed is drawn around `windy * max_wind_speed`.
    pub max_wind_speed: f64,

    /// Standard deviation (km/h) of the daily wind speed draw
    pub wind_spread: f64,

    /// Standard deviation (degrees) of wind direction around the
    /// prevailing direction
    pub direction_jitter: f64,
}

impl Default for WeatherTuning {
    fn default() -> Self {
        Self {
            temperature_spread: 3.0,
            precipitation_spread: 0.1,
            intensity_spread: 0.15,
            max_wind_speed: 60.0,
            wind_spread: 8.0,
            direction_jitter: 30.0,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cycle_years: 100_000,
            weather: WeatherTuning::default(),
            scan_queue_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_cycle_years == 0 {
            return Err("max_cycle_years must be at least 1".into());
        }

        if self.scan_queue_capacity == 0 {
            return Err("scan_queue_capacity must be at least 1".into());
        }

        let w = &self.weather;
        let spreads = [
            ("temperature_spread", w.temperature_spread),
            ("precipitation_spread", w.precipitation_spread),
            ("intensity_spread", w.intensity_spread),
            ("wind_spread", w.wind_spread),
            ("direction_jitter", w.direction_jitter),
        ];
        for (name, value) in spreads {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} ({}) must be a finite, non-negative number", name, value));
            }
        }

        if !w.max_wind_speed.is_finite() || w.max_wind_speed <= 0.0 {
            return Err(format!("max_wind_speed ({}) must be positive", w.max_wind_speed));
        }

        Ok(())
    }

    /// Parse and validate a config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate().map_err(CalendarError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            scan_queue_capacity = 8

            [weather]
            temperature_spread = 1.5
            "#,
        )
        .unwrap();

        assert_eq!(config.scan_queue_capacity, 8);
        assert_eq!(config.weather.temperature_spread, 1.5);
        assert_eq!(config.weather.max_wind_speed, 60.0);
        assert_eq!(config.max_cycle_years, 100_000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = EngineConfig::from_toml_str("max_cycle_years = 0").unwrap_err();
        assert!(matches!(err, CalendarError::InvalidConfig(_)));

        let mut config = EngineConfig::default();
        config.weather.wind_spread = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let err = EngineConfig::from_toml_str("max_cycle_years = \"lots\"").unwrap_err();
        assert!(matches!(err, CalendarError::TomlError(_)));
    }
}
