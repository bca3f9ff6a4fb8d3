//! Weather per date: stored entries first, generated weather otherwise
//!
//! Stored (hand-entered) weather is authoritative and lives in the cache
//! tree's buckets. Generated weather is memoized per date and location
//! and dropped whenever an entry is stored for that date.

use ahash::AHashMap;

use crate::cache::node::{CacheLayer, CacheStats, CacheTree};
use crate::calendar::engine::CalendarEngine;
use crate::core::types::{CalDate, LocationId};
use crate::season::SeasonState;
use crate::weather::generator::generate_for_season;
use crate::weather::location::Location;
use crate::weather::Weather;

/// Stored weather entries, keyed by date
pub struct WeatherLayer {
    stored: AHashMap<CalDate, Vec<Weather>>,
}

impl CacheLayer for WeatherLayer {
    type YearItem = CalDate;
    type MonthItem = CalDate;
    type DayItem = Weather;

    fn year_items(&self, _: &CalendarEngine, year: i64) -> Vec<CalDate> {
        let mut dates: Vec<CalDate> = self.stored.keys().copied().filter(|d| d.year == year).collect();
        dates.sort();
        dates
    }

    fn month_items(&self, _: &CalendarEngine, parent: &[CalDate], _: i64, month: usize) -> Vec<CalDate> {
        parent.iter().copied().filter(|d| d.month == month).collect()
    }

    fn day_items(&self, _: &CalendarEngine, parent: &[CalDate], date: CalDate) -> Vec<Weather> {
        if !parent.contains(&date) {
            return Vec::new();
        }
        self.stored.get(&date).cloned().unwrap_or_default()
    }
}

/// Stored weather buckets plus the generated-weather memo
///
/// The memo lives as long as the session's calendar definition: it is
/// only emptied by [`WeatherCache::clear`] (structural edits and location
/// changes) and per date when weather is stored there. Each entry is one
/// small `Weather`, so a long session grows it by the number of distinct
/// (date, location) pairs queried.
pub struct WeatherCache {
    tree: CacheTree<WeatherLayer>,
    generated: AHashMap<(CalDate, Option<LocationId>), Weather>,
}

impl WeatherCache {
    pub fn new() -> Self {
        Self {
            tree: CacheTree::new(WeatherLayer {
                stored: AHashMap::new(),
            }),
            generated: AHashMap::new(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.tree.stats()
    }

    /// Number of memoized generated entries
    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    /// Store authoritative weather; replaces any entry for the same date
    /// and location
    pub fn store(&mut self, mut weather: Weather) {
        weather.stored = true;
        let date = weather.date;
        let entries = self.tree.layer_mut().stored.entry(date).or_default();
        entries.retain(|w| w.location != weather.location);
        entries.push(weather);
        self.tree.invalidate(date);
        self.generated.retain(|(d, _), _| *d != date);
        tracing::debug!(%date, "stored weather");
    }

    /// Remove stored weather for `date` and `location`
    pub fn remove_stored(&mut self, date: CalDate, location: Option<&LocationId>) -> Option<Weather> {
        let stored = &mut self.tree.layer_mut().stored;
        let entries = stored.get_mut(&date)?;
        let index = entries.iter().position(|w| w.location.as_ref() == location)?;
        let removed = entries.remove(index);
        if entries.is_empty() {
            stored.remove(&date);
        }
        self.tree.invalidate(date);
        Some(removed)
    }

    /// Weather on `date` at `location`
    ///
    /// `season` is the season in effect on `date`; without one only
    /// stored weather can be returned.
    pub fn weather_on(
        &mut self,
        engine: &CalendarEngine,
        date: CalDate,
        location: Option<&Location>,
        season: Option<&SeasonState>,
    ) -> Option<Weather> {
        let location_id = location.map(|l| l.id.clone());
        let stored = self.tree.get_items_or_recalculate(engine, date);
        if let Some(weather) = stored.iter().find(|w| w.location == location_id) {
            return Some(weather.clone());
        }

        if !engine.data().weather.enabled {
            return None;
        }
        let key = (date, location_id);
        if let Some(weather) = self.generated.get(&key) {
            return Some(weather.clone());
        }
        let weather = generate_for_season(engine, date, season?, location);
        self.generated.insert(key, weather.clone());
        Some(weather)
    }

    /// Drop buckets and memoized weather, keeping stored entries
    pub fn clear(&mut self) {
        self.tree.clear();
        self.generated.clear();
    }
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new()
    }
}
