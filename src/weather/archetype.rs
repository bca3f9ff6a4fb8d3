//! Climate archetypes and per-season weather data

use serde::{Deserialize, Serialize};

/// Raw weather parameters for one season
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalWeatherData {
    /// Typical daily `[low, high]` in °C
    pub temp_range: [f64; 2],
    /// Chance of any precipitation (0..1)
    pub precipitation_chance: f64,
    /// How heavy precipitation tends to be (0..1)
    pub precipitation_intensity: f64,
    /// Chance of cloud cover on a dry day (0..1)
    pub cloudy: f64,
    /// How windy the season is (0..1)
    pub windy: f64,
}

impl SeasonalWeatherData {
    /// Linear blend between two seasons
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            temp_range: [
                mix(self.temp_range[0], other.temp_range[0]),
                mix(self.temp_range[1], other.temp_range[1]),
            ],
            precipitation_chance: mix(self.precipitation_chance, other.precipitation_chance),
            precipitation_intensity: mix(self.precipitation_intensity, other.precipitation_intensity),
            cloudy: mix(self.cloudy, other.cloudy),
            windy: mix(self.windy, other.windy),
        }
    }
}

/// Built-in climates a season can pick instead of custom numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherArchetype {
    Frigid,
    Cold,
    Temperate,
    Warm,
    Hot,
    Arid,
    Monsoon,
}

impl WeatherArchetype {
    pub const ALL: [WeatherArchetype; 7] = [
        Self::Frigid,
        Self::Cold,
        Self::Temperate,
        Self::Warm,
        Self::Hot,
        Self::Arid,
        Self::Monsoon,
    ];

    pub fn data(&self) -> SeasonalWeatherData {
        let (low, high, chance, intensity, cloudy, windy) = match self {
            Self::Frigid => (-25.0, -10.0, 0.4, 0.5, 0.5, 0.6),
            Self::Cold => (-8.0, 3.0, 0.45, 0.4, 0.6, 0.5),
            Self::Temperate => (8.0, 18.0, 0.35, 0.35, 0.45, 0.35),
            Self::Warm => (16.0, 26.0, 0.25, 0.4, 0.3, 0.25),
            Self::Hot => (24.0, 35.0, 0.15, 0.5, 0.2, 0.2),
            Self::Arid => (18.0, 40.0, 0.03, 0.2, 0.05, 0.45),
            Self::Monsoon => (24.0, 31.0, 0.8, 0.8, 0.85, 0.55),
        };
        SeasonalWeatherData {
            temp_range: [low, high],
            precipitation_chance: chance,
            precipitation_intensity: intensity,
            cloudy,
            windy,
        }
    }
}

/// Weather of a season: a named archetype or explicit numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonWeather {
    Archetype(WeatherArchetype),
    Custom(SeasonalWeatherData),
}

impl Default for SeasonWeather {
    fn default() -> Self {
        Self::Archetype(WeatherArchetype::Temperate)
    }
}

impl SeasonWeather {
    pub fn data(&self) -> SeasonalWeatherData {
        match self {
            Self::Archetype(archetype) => archetype.data(),
            Self::Custom(data) => *data,
        }
    }
}
