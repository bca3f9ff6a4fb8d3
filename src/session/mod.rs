//! Calendar session - one calendar, its engine and every per-date cache
//!
//! Structural edits go through [`CalendarSession::replace_definition`],
//! which rebuilds the engine and drops every cached bucket. Event and
//! stored-weather edits invalidate only the buckets they touch.

pub mod feed;

use crate::cache::{CalEvent, EraCache, EventCache, MoonCache, SeasonCache, WeatherCache};
use crate::calendar::engine::CalendarEngine;
use crate::calendar::model::{Calendar, Era, StaticCalendarData};
use crate::calendar::moon::MoonState;
use crate::core::config::EngineConfig;
use crate::core::error::{CalendarError, Result};
use crate::core::types::{CalDate, EpochDay, EventId, LocationId};
use crate::season::SeasonState;
use crate::weather::location::Location;
use crate::weather::Weather;

use feed::EventDelta;

pub struct CalendarSession {
    calendar: Calendar,
    engine: CalendarEngine,
    events: EventCache,
    eras: EraCache,
    moons: MoonCache,
    seasons: SeasonCache,
    weather: WeatherCache,
}

impl CalendarSession {
    pub fn new(calendar: Calendar, config: EngineConfig) -> Result<Self> {
        calendar.static_data.validate()?;
        config.validate().map_err(CalendarError::InvalidConfig)?;
        let engine = CalendarEngine::new(calendar.static_data.clone(), config);
        tracing::info!(calendar = %calendar.name, "opened calendar session");
        Ok(Self {
            calendar,
            engine,
            events: EventCache::new(),
            eras: EraCache::new(),
            moons: MoonCache::new(),
            seasons: SeasonCache::new(),
            weather: WeatherCache::new(),
        })
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn engine(&self) -> &CalendarEngine {
        &self.engine
    }

    pub fn event_cache(&self) -> &EventCache {
        &self.events
    }

    pub fn location(&self, id: &LocationId) -> Option<&Location> {
        self.calendar.locations.iter().find(|l| &l.id == id)
    }

    /// Move the displayed date; rejects dates the calendar does not have
    pub fn set_current(&mut self, date: CalDate) -> Result<()> {
        if !self.engine.is_valid_day(date) {
            return Err(CalendarError::InvalidDate(date.to_string()));
        }
        self.calendar.current = date;
        Ok(())
    }

    fn is_valid(&self, date: CalDate) -> bool {
        let valid = self.engine.is_valid_day(date);
        if !valid {
            tracing::warn!(%date, "query for a date the calendar does not have");
        }
        valid
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn events_on(&mut self, date: CalDate) -> Vec<&CalEvent> {
        if !self.is_valid(date) {
            return Vec::new();
        }
        self.events.events_on(&self.engine, date)
    }

    pub fn eras_on(&mut self, date: CalDate) -> Option<&Era> {
        if !self.is_valid(date) {
            return None;
        }
        self.eras.era_on(&self.engine, date)
    }

    pub fn moons_on(&mut self, date: CalDate) -> &[MoonState] {
        if !self.is_valid(date) {
            return &[];
        }
        self.moons.moons_on(&self.engine, date)
    }

    pub fn season_on(&mut self, date: CalDate) -> Option<&SeasonState> {
        if !self.is_valid(date) {
            return None;
        }
        self.seasons.season_on(&self.engine, date)
    }

    /// Stored weather if any, generated weather otherwise
    ///
    /// An unknown location id falls back to the calendar-wide weather.
    pub fn weather_on(&mut self, date: CalDate, location: Option<&LocationId>) -> Option<Weather> {
        if !self.is_valid(date) {
            return None;
        }
        let season = self.seasons.season_on(&self.engine, date).cloned();
        let location = location.and_then(|id| self.calendar.locations.iter().find(|l| &l.id == id));
        self.weather.weather_on(&self.engine, date, location, season.as_ref())
    }

    pub fn days_before(&self, date: CalDate) -> EpochDay {
        self.engine.days_before(date)
    }

    pub fn days_between(&self, a: CalDate, b: CalDate) -> i64 {
        self.engine.days_between(a, b)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn insert_event(&mut self, event: CalEvent) -> EventId {
        let id = event.id;
        self.events.insert(event);
        id
    }

    pub fn remove_event(&mut self, id: EventId) -> Option<CalEvent> {
        self.events.remove(id)
    }

    pub fn remove_note_events(&mut self, note: &str) -> Vec<CalEvent> {
        self.events.remove_note(note)
    }

    pub fn apply_delta(&mut self, delta: EventDelta) {
        match delta {
            EventDelta::Upsert(event) => {
                self.insert_event(event);
            }
            EventDelta::Remove(id) => {
                if self.remove_event(id).is_none() {
                    tracing::debug!(?id, "remove for unknown event ignored");
                }
            }
            EventDelta::RemoveNote(note) => {
                self.remove_note_events(&note);
            }
        }
    }

    pub fn store_weather(&mut self, weather: Weather) -> Result<()> {
        if !self.engine.is_valid_day(weather.date) {
            return Err(CalendarError::InvalidDate(weather.date.to_string()));
        }
        self.weather.store(weather);
        Ok(())
    }

    pub fn remove_stored_weather(&mut self, date: CalDate, location: Option<&LocationId>) -> Option<Weather> {
        self.weather.remove_stored(date, location)
    }

    /// Swap in a new structural definition
    ///
    /// The engine is rebuilt and every cache bucket dropped; events and
    /// stored weather are kept.
    pub fn replace_definition(&mut self, data: StaticCalendarData) -> Result<()> {
        data.validate()?;
        let config = self.engine.config().clone();
        self.engine = CalendarEngine::new(data.clone(), config);
        self.calendar.static_data = data;
        self.events.clear_buckets();
        self.eras.clear();
        self.moons.clear();
        self.seasons.clear();
        self.weather.clear();
        tracing::info!(calendar = %self.calendar.name, "calendar definition replaced");
        Ok(())
    }

    /// Replace the location list; generated weather is recomputed
    pub fn set_locations(&mut self, locations: Vec<Location>) {
        self.calendar.locations = locations;
        self.weather.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::model::Month;
    use crate::calendar::presets;
    use crate::weather::archetype::{SeasonWeather, WeatherArchetype};

    fn session() -> CalendarSession {
        CalendarSession::new(presets::gregorian_calendar(), EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_definitions() {
        let mut calendar = presets::gregorian_calendar();
        calendar.static_data.weekdays.clear();
        assert!(CalendarSession::new(calendar, EngineConfig::default()).is_err());

        let config = EngineConfig {
            max_cycle_years: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            CalendarSession::new(presets::gregorian_calendar(), config),
            Err(CalendarError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_queries_on_a_date() {
        let mut session = session();
        let date = CalDate::new(2024, 6, 4);
        session.insert_event(CalEvent::on("Festival", date));

        assert_eq!(session.events_on(date).len(), 1);
        assert_eq!(session.eras_on(date).map(|e| e.id.as_str()), Some("ce"));
        assert_eq!(session.moons_on(date).len(), 1);
        assert_eq!(session.season_on(date).map(|s| s.id.as_str()), Some("summer"));
        let weather = session.weather_on(date, None).unwrap();
        assert_eq!(weather.season.as_deref(), Some("summer"));
    }

    #[test]
    fn test_invalid_dates_degrade_quietly() {
        let mut session = session();
        let bad = CalDate::new(2023, 1, 30);
        assert!(session.events_on(bad).is_empty());
        assert!(session.eras_on(bad).is_none());
        assert!(session.moons_on(bad).is_empty());
        assert!(session.weather_on(bad, None).is_none());
        assert!(session.set_current(bad).is_err());
    }

    #[test]
    fn test_location_weather_differs() {
        let mut session = session();
        let date = CalDate::new(2024, 0, 10);
        let highlands = LocationId::new("highlands");
        let global = session.weather_on(date, None).unwrap();
        let local = session.weather_on(date, Some(&highlands)).unwrap();
        assert_eq!(local.location, Some(highlands));
        assert_ne!(global.temperature, local.temperature);

        let unknown = session.weather_on(date, Some(&LocationId::new("nowhere"))).unwrap();
        assert_eq!(unknown, global);
    }

    #[test]
    fn test_replace_definition_keeps_events() {
        let mut session = session();
        let date = CalDate::new(2024, 0, 1);
        session.insert_event(CalEvent::on("New Year", date));
        assert_eq!(session.events_on(date).len(), 1);

        let mut data = session.calendar().static_data.clone();
        data.months.push(Month::regular("Extra", 5));
        session.replace_definition(data).unwrap();
        assert_eq!(session.engine().month_count(2024), 13);
        assert_eq!(session.events_on(date).len(), 1);
        assert!(session.events_on(CalDate::new(2024, 12, 3)).is_empty());

        let mut broken = session.calendar().static_data.clone();
        broken.months.clear();
        assert!(session.replace_definition(broken).is_err());
        assert_eq!(session.engine().month_count(2024), 13);
    }

    #[test]
    fn test_set_locations_replaces_local_weather() {
        let mut session = session();
        let date = CalDate::new(2024, 0, 10);
        let highlands = LocationId::new("highlands");
        let before = session.weather_on(date, Some(&highlands)).unwrap();
        assert_eq!(before.location, Some(highlands.clone()));

        let coast = Location::new("coast", "Coast").with_season("winter", SeasonWeather::Archetype(WeatherArchetype::Warm));
        session.set_locations(vec![coast]);
        assert!(session.location(&highlands).is_none());

        // highlands is gone, so its id falls back to the calendar-wide weather
        let global = session.weather_on(date, None).unwrap();
        assert_eq!(session.weather_on(date, Some(&highlands)).unwrap(), global);

        let local = session.weather_on(date, Some(&LocationId::new("coast"))).unwrap();
        assert_eq!(local.location, Some(LocationId::new("coast")));
        assert!(local.temperature.low > global.temperature.low);
    }

    #[test]
    fn test_store_weather_validates_date() {
        let mut session = session();
        let date = CalDate::new(2024, 0, 10);
        let mut weather = session.weather_on(date, None).unwrap();
        weather.date = CalDate::new(2024, 0, 40);
        assert!(session.store_weather(weather.clone()).is_err());
        weather.date = date;
        weather.temperature.actual = 30.0;
        session.store_weather(weather).unwrap();
        assert_eq!(session.weather_on(date, None).unwrap().temperature.actual, 30.0);
        assert!(session.remove_stored_weather(date, None).is_some());
    }
}
