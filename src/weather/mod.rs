//! Weather model - daily conditions and the calendar-wide weather settings
//!
//! Daily weather is generated procedurally from the season in effect (see
//! [`generator`]) unless an authoritative entry has been stored for the
//! date. Precipitation, cloud and wind tiers carry the multipliers the
//! generator applies when one condition feeds into another.

pub mod archetype;
pub mod generator;
pub mod location;

use serde::{Deserialize, Serialize};

use crate::core::types::{CalDate, LocationId};

/// Unit used when presenting temperatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

/// Calendar-wide weather settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub enabled: bool,
    /// Seed mixed into every day's generator
    pub seed: u64,
    /// Prevailing wind direction in degrees (0 = north, clockwise)
    pub prevailing_wind: f64,
    pub temperature_unit: TemperatureUnit,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: 0,
            prevailing_wind: 0.0,
            temperature_unit: TemperatureUnit::Celsius,
        }
    }
}

/// How heavy a day's precipitation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PrecipitationStrength {
    #[default]
    None,
    Light,
    Moderate,
    Heavy,
    Extreme,
}

impl PrecipitationStrength {
    /// Tier for an intensity draw in 0..1
    pub fn from_intensity(intensity: f64) -> Self {
        match intensity {
            i if i < 0.25 => Self::Light,
            i if i < 0.5 => Self::Moderate,
            i if i < 0.8 => Self::Heavy,
            _ => Self::Extreme,
        }
    }

    /// Wind speed multiplier under this precipitation
    pub fn wind_multiplier(&self) -> f64 {
        match self {
            Self::None => 1.0,
            Self::Light => 1.0,
            Self::Moderate => 1.15,
            Self::Heavy => 1.35,
            Self::Extreme => 1.7,
        }
    }

    /// Cloud cover that comes with this precipitation
    pub fn cloud_cover(&self) -> CloudCover {
        match self {
            Self::None => CloudCover::Clear,
            Self::Light => CloudCover::Mostly,
            Self::Moderate | Self::Heavy | Self::Extreme => CloudCover::Overcast,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrecipitationKind {
    #[default]
    Rain,
    Snow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Precipitation {
    pub kind: PrecipitationKind,
    pub strength: PrecipitationStrength,
}

impl Precipitation {
    pub fn is_dry(&self) -> bool {
        self.strength == PrecipitationStrength::None
    }

    pub fn describe(&self) -> &'static str {
        use PrecipitationKind::{Rain, Snow};
        use PrecipitationStrength as S;
        match (self.kind, self.strength) {
            (_, S::None) => "dry",
            (Rain, S::Light) => "drizzle",
            (Rain, S::Moderate) => "rain",
            (Rain, S::Heavy) => "heavy rain",
            (Rain, S::Extreme) => "downpour",
            (Snow, S::Light) => "flurries",
            (Snow, S::Moderate) => "snow",
            (Snow, S::Heavy) => "heavy snow",
            (Snow, S::Extreme) => "blizzard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum CloudCover {
    #[default]
    Clear,
    Partly,
    Mostly,
    Overcast,
}

impl CloudCover {
    /// Fraction of the sky covered
    pub fn coverage(&self) -> f64 {
        match self {
            Self::Clear => 0.0,
            Self::Partly => 0.35,
            Self::Mostly => 0.7,
            Self::Overcast => 1.0,
        }
    }
}

/// Wind tier, loosely following the Beaufort scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WindStrength {
    Calm,
    Breeze,
    Strong,
    Gale,
    Storm,
}

impl WindStrength {
    /// Tier for a speed in km/h
    pub fn from_speed(speed: f64) -> Self {
        match speed {
            s if s < 5.0 => Self::Calm,
            s if s < 29.0 => Self::Breeze,
            s if s < 50.0 => Self::Strong,
            s if s < 89.0 => Self::Gale,
            _ => Self::Storm,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// km/h
    pub speed: f64,
    /// Degrees the wind blows from, 0..360
    pub direction: f64,
}

impl Wind {
    pub fn strength(&self) -> WindStrength {
        WindStrength::from_speed(self.speed)
    }
}

/// Daily temperatures in °C
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub low: f64,
    pub high: f64,
    pub actual: f64,
}

impl Temperature {
    pub fn in_unit(&self, unit: TemperatureUnit) -> Self {
        Self {
            low: unit.from_celsius(self.low),
            high: unit.from_celsius(self.high),
            actual: unit.from_celsius(self.actual),
        }
    }
}

/// One day's weather
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub date: CalDate,
    #[serde(default)]
    pub location: Option<LocationId>,
    /// Id of the season the weather was generated for
    #[serde(default)]
    pub season: Option<String>,
    pub temperature: Temperature,
    pub precipitation: Precipitation,
    pub clouds: CloudCover,
    pub wind: Wind,
    /// Entered by hand rather than generated
    #[serde(default)]
    pub stored: bool,
}

impl Weather {
    /// One-line human readable summary
    pub fn summary(&self, unit: TemperatureUnit) -> String {
        let t = self.temperature.in_unit(unit);
        format!(
            "{:.0}{} (low {:.0}, high {:.0}), {}, {:?} sky ({:.0}% cover), {:?} wind {:.0} km/h from {:.0}°",
            t.actual,
            unit.symbol(),
            t.low,
            t.high,
            self.precipitation.describe(),
            self.clouds,
            self.clouds.coverage() * 100.0,
            self.wind.strength(),
            self.wind.speed,
            self.wind.direction
        )
    }
}
