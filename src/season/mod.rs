//! Seasons - dated or periodic, with colour blending at the boundaries
//!
//! Season resolution works on a sorted list of season starts expressed in
//! epoch days. Dated seasons start on a fixed month/day every year;
//! periodic seasons tile the timeline in a repeating cycle of durations
//! counted from `SeasonalConfig::offset`.

pub mod color;

use serde::{Deserialize, Serialize};

use crate::calendar::engine::CalendarEngine;
use crate::core::types::{CalDate, EpochDay};
use crate::weather::archetype::SeasonWeather;

/// How a season is placed on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeasonKind {
    /// Starts on a fixed date; `month` indexes the static month list
    Dated { month: usize, day: u32 },
    /// Lasts `duration` days; colour peaks `peak` days in
    Periodic {
        duration: u32,
        #[serde(default)]
        peak: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub kind: SeasonKind,
    /// Days into the season before its own weather takes over
    #[serde(default)]
    pub weather_offset: u32,
    /// Days the season's weather stays pure after `weather_offset`
    #[serde(default)]
    pub weather_peak: u32,
    #[serde(default)]
    pub weather: SeasonWeather,
}

impl Season {
    pub fn dated(id: impl Into<String>, name: impl Into<String>, month: usize, day: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: String::new(),
            kind: SeasonKind::Dated { month, day },
            weather_offset: 0,
            weather_peak: 0,
            weather: SeasonWeather::default(),
        }
    }

    pub fn periodic(id: impl Into<String>, name: impl Into<String>, duration: u32, peak: u32) -> Self {
        Self {
            kind: SeasonKind::Periodic { duration, peak },
            ..Self::dated(id, name, 0, 1)
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_weather(mut self, weather: SeasonWeather, offset: u32, peak: u32) -> Self {
        self.weather = weather;
        self.weather_offset = offset;
        self.weather_peak = peak;
        self
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalConfig {
    #[serde(default)]
    pub seasons: Vec<Season>,
    /// Epoch day on which the first periodic season begins a cycle
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_true")]
    pub interpolate_colors: bool,
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            seasons: Vec::new(),
            offset: 0,
            interpolate_colors: true,
        }
    }
}

impl SeasonalConfig {
    /// Dated seasons take precedence when a list mixes both kinds
    pub fn is_dated(&self) -> bool {
        self.seasons
            .iter()
            .any(|s| matches!(s.kind, SeasonKind::Dated { .. }))
    }
}

/// A season beginning on an epoch day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonStart {
    /// Index into the seasonal config's season list
    pub season: usize,
    pub epoch_day: EpochDay,
}

/// The season in effect on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonState {
    pub season: usize,
    pub id: String,
    pub name: String,
    /// Display colour, blended toward the neighbours when enabled
    pub color: String,
    /// Epoch day the season began
    pub start: EpochDay,
    /// Days since the season began (0 on its first day)
    pub days_passed: i64,
    /// Length of this occurrence of the season in days
    pub duration: i64,
    pub previous: usize,
    pub next: usize,
}

fn dated_starts_in_year(engine: &CalendarEngine, year: i64, out: &mut Vec<SeasonStart>) {
    let seasons = &engine.data().seasonal.seasons;
    let months = engine.months_for_year(year);
    for (index, season) in seasons.iter().enumerate() {
        let SeasonKind::Dated { month, day } = season.kind else {
            continue;
        };
        let Some(resolved) = months.iter().position(|ym| ym.index == month) else {
            continue;
        };
        let length = engine.days_in_month(year, resolved).unwrap_or(1).max(1);
        let date = CalDate::new(year, resolved, day.clamp(1, length));
        out.push(SeasonStart {
            season: index,
            epoch_day: engine.days_before(date),
        });
    }
}

fn periodic_starts(engine: &CalendarEngine, from: EpochDay, to: EpochDay) -> Vec<SeasonStart> {
    let seasonal = &engine.data().seasonal;
    let cycle: Vec<(usize, i64)> = seasonal
        .seasons
        .iter()
        .enumerate()
        .filter_map(|(index, season)| match season.kind {
            SeasonKind::Periodic { duration, .. } if duration > 0 => Some((index, duration as i64)),
            _ => None,
        })
        .collect();
    let total: i64 = cycle.iter().map(|(_, d)| d).sum();
    if total == 0 {
        return Vec::new();
    }

    // One full cycle before `from` so the previous season is always known
    let cycle_start = from - (from - seasonal.offset).rem_euclid(total) - total;
    let mut starts = Vec::new();
    let mut day = cycle_start;
    'outer: loop {
        for (season, duration) in &cycle {
            starts.push(SeasonStart {
                season: *season,
                epoch_day: day,
            });
            if day > to {
                break 'outer;
            }
            day += duration;
        }
    }
    starts
}

/// Season starts around the epoch-day window `from..=to`, sorted
///
/// The list reaches back far enough to know the season in effect at
/// `from` and its predecessor, and forward to the first start after `to`.
pub fn season_starts(engine: &CalendarEngine, from: EpochDay, to: EpochDay) -> Vec<SeasonStart> {
    let seasonal = &engine.data().seasonal;
    if seasonal.seasons.is_empty() {
        return Vec::new();
    }
    if !seasonal.is_dated() {
        return periodic_starts(engine, from, to);
    }

    let first_year = engine.date_from_epoch_day(from).year;
    let last_year = engine.date_from_epoch_day(to).year;
    let mut year = engine.previous_year(engine.previous_year(first_year));
    let end = engine.next_year(last_year);

    let mut starts = Vec::new();
    loop {
        dated_starts_in_year(engine, year, &mut starts);
        if year >= end {
            break;
        }
        year = engine.next_year(year);
    }
    starts.sort_by_key(|s| (s.epoch_day, s.season));
    starts.dedup_by_key(|s| s.epoch_day);
    starts
}

/// Keep only the starts needed to resolve days in `from..=to`
pub fn starts_within(starts: &[SeasonStart], from: EpochDay, to: EpochDay) -> Vec<SeasonStart> {
    let current = starts.iter().rposition(|s| s.epoch_day <= from).unwrap_or(0);
    let lower = current.saturating_sub(1);
    let upper = starts
        .iter()
        .position(|s| s.epoch_day > to)
        .unwrap_or(starts.len().saturating_sub(1));
    if starts.is_empty() || upper < lower {
        return Vec::new();
    }
    starts[lower..=upper].to_vec()
}

fn peak_day(kind: SeasonKind, duration: i64) -> i64 {
    match kind {
        SeasonKind::Periodic { peak, .. } => (peak as i64).min(duration),
        SeasonKind::Dated { .. } => duration / 2,
    }
}

fn blended_color(engine: &CalendarEngine, state: &SeasonState) -> String {
    let seasons = &engine.data().seasonal.seasons;
    let own = &seasons[state.season];
    if !engine.data().seasonal.interpolate_colors {
        return own.color.clone();
    }
    let (Some(cur), Some(prev), Some(next)) = (
        color::parse_hex(&own.color),
        color::parse_hex(&seasons[state.previous].color),
        color::parse_hex(&seasons[state.next].color),
    ) else {
        return own.color.clone();
    };

    let peak = peak_day(own.kind, state.duration);
    let blended = if state.days_passed < peak {
        let t = state.days_passed as f64 / peak as f64;
        color::mix(color::mix(prev, cur, 0.5), cur, t)
    } else {
        let tail = (state.duration - peak).max(1);
        let t = (state.days_passed - peak) as f64 / tail as f64;
        color::mix(cur, color::mix(cur, next, 0.5), t)
    };
    color::to_hex(blended)
}

/// Season in effect on `epoch_day`, given starts that bracket it
pub fn resolve_season(engine: &CalendarEngine, starts: &[SeasonStart], epoch_day: EpochDay) -> Option<SeasonState> {
    let seasons = &engine.data().seasonal.seasons;
    let i = starts.iter().rposition(|s| s.epoch_day <= epoch_day)?;
    let current = starts[i];
    let following = starts.get(i + 1)?;
    let season = seasons.get(current.season)?;

    let previous = if i > 0 { starts[i - 1].season } else { current.season };
    let mut state = SeasonState {
        season: current.season,
        id: season.id.clone(),
        name: season.name.clone(),
        color: String::new(),
        start: current.epoch_day,
        days_passed: epoch_day - current.epoch_day,
        duration: (following.epoch_day - current.epoch_day).max(1),
        previous,
        next: following.season,
    };
    state.color = blended_color(engine, &state);
    Some(state)
}

/// Resolve the season for a date without any caching
pub fn season_on(engine: &CalendarEngine, date: CalDate) -> Option<SeasonState> {
    let day = engine.days_before(date);
    let starts = season_starts(engine, day, day);
    resolve_season(engine, &starts, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::presets;

    fn periodic_engine() -> CalendarEngine {
        let mut data = presets::gregorian();
        data.seasonal = SeasonalConfig {
            seasons: vec![
                Season::periodic("wet", "Wet", 90, 10).with_color("#0000ff"),
                Season::periodic("dry", "Dry", 60, 30).with_color("#ff0000"),
            ],
            offset: 0,
            interpolate_colors: true,
        };
        CalendarEngine::with_defaults(data)
    }

    #[test]
    fn test_dated_seasons_gregorian() {
        let engine = CalendarEngine::with_defaults(presets::gregorian());
        let state = season_on(&engine, CalDate::new(2024, 6, 4)).unwrap();
        assert_eq!(state.name, "Summer");
        let state = season_on(&engine, CalDate::new(2024, 0, 15)).unwrap();
        assert_eq!(state.name, "Winter");
        assert_eq!(state.previous, 2);
        assert_eq!(state.next, 0);

        // Spring begins March 20th
        let start = season_on(&engine, CalDate::new(2024, 2, 20)).unwrap();
        assert_eq!(start.name, "Spring");
        assert_eq!(start.days_passed, 0);
        let eve = season_on(&engine, CalDate::new(2024, 2, 19)).unwrap();
        assert_eq!(eve.name, "Winter");
        assert_eq!(eve.days_passed, eve.duration - 1);
    }

    #[test]
    fn test_periodic_seasons_cycle() {
        let engine = periodic_engine();
        let at = |day: i64| {
            let starts = season_starts(&engine, day, day);
            resolve_season(&engine, &starts, day).unwrap()
        };
        assert_eq!(at(0).id, "wet");
        assert_eq!(at(89).id, "wet");
        assert_eq!(at(90).id, "dry");
        assert_eq!(at(90).days_passed, 0);
        assert_eq!(at(149).id, "dry");
        assert_eq!(at(150).id, "wet");
        assert_eq!(at(-1).id, "dry");
        assert_eq!(at(-1).days_passed, 59);
        assert_eq!(at(10).duration, 90);
    }

    #[test]
    fn test_color_peaks_and_blends() {
        let engine = periodic_engine();
        let at = |day: i64| {
            let starts = season_starts(&engine, day, day);
            resolve_season(&engine, &starts, day).unwrap()
        };
        assert_eq!(at(10).color, "#0000ff");
        // first day of wet is halfway between dry and wet
        assert_eq!(at(0).color, "#800080");
        // the colour is continuous over the season boundary
        let end = color::parse_hex(&at(89).color).unwrap();
        let start = color::parse_hex(&at(90).color).unwrap();
        for c in 0..3 {
            assert!((end[c] as i32 - start[c] as i32).abs() <= 4);
        }
    }

    #[test]
    fn test_starts_within_keeps_bracketing_entries() {
        let engine = periodic_engine();
        let starts = season_starts(&engine, 0, 400);
        let window = starts_within(&starts, 100, 120);
        assert_eq!(window.first().map(|s| s.epoch_day), Some(0));
        assert_eq!(window.last().map(|s| s.epoch_day), Some(150));
        let state = resolve_season(&engine, &window, 110).unwrap();
        assert_eq!(state.id, "dry");
        assert_eq!(state.previous, 0);
    }

    #[test]
    fn test_no_seasons() {
        let mut data = presets::gregorian();
        data.seasonal.seasons.clear();
        let engine = CalendarEngine::with_defaults(data);
        assert!(season_on(&engine, CalDate::new(2024, 0, 1)).is_none());
    }
}
