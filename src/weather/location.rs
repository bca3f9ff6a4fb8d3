//! Named locations with their own seasonal weather

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::LocationId;
use crate::weather::archetype::SeasonWeather;

/// Weather overrides for one location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationWeather {
    /// Replacement weather keyed by season id
    #[serde(default)]
    pub seasons: AHashMap<String, SeasonWeather>,
    /// Replaces the calendar's prevailing wind direction (degrees)
    #[serde(default)]
    pub prevailing_wind: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub weather: Option<LocationWeather>,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: LocationId::new(id),
            name: name.into(),
            weather: None,
        }
    }

    /// Override the weather of one season
    pub fn with_season(mut self, season_id: impl Into<String>, weather: SeasonWeather) -> Self {
        self.weather
            .get_or_insert_with(LocationWeather::default)
            .seasons
            .insert(season_id.into(), weather);
        self
    }

    pub fn season_override(&self, season_id: &str) -> Option<SeasonWeather> {
        self.weather.as_ref()?.seasons.get(season_id).copied()
    }

    pub fn prevailing_wind(&self) -> Option<f64> {
        self.weather.as_ref()?.prevailing_wind
    }
}
