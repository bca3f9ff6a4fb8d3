//! Calendar definition - months, leap days, eras and the static record
//! that ties them together.

use serde::{Deserialize, Serialize};

use crate::calendar::leap::test_leap_day;
use crate::calendar::moon::Moon;
use crate::core::error::{CalendarError, Result};
use crate::core::types::CalDate;
use crate::season::{SeasonKind, SeasonalConfig};
use crate::weather::location::Location;
use crate::weather::WeatherConfig;

/// A named day of the week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weekday {
    pub name: String,
}

impl Weekday {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Whether a month takes part in the week grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MonthKind {
    /// Laid out on the week grid
    #[default]
    Regular,
    /// A day container outside the week grid (festivals, "between" days)
    Intercalary,
}

/// A month as defined by the calendar author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    pub name: String,
    pub length: u32,
    #[serde(default)]
    pub kind: MonthKind,
    /// The month exists only in years where `(year - offset) % interval == 0`
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub offset: i64,
}

fn default_interval() -> u32 {
    1
}

impl Month {
    pub fn regular(name: impl Into<String>, length: u32) -> Self {
        Self {
            name: name.into(),
            length,
            kind: MonthKind::Regular,
            interval: 1,
            offset: 0,
        }
    }

    pub fn intercalary(name: impl Into<String>, length: u32) -> Self {
        Self {
            kind: MonthKind::Intercalary,
            ..Self::regular(name, length)
        }
    }

    /// Restrict the month to every `interval`th year, counted from `offset`
    pub fn every(mut self, interval: u32, offset: i64) -> Self {
        self.interval = interval;
        self.offset = offset;
        self
    }

    pub fn is_intercalary(&self) -> bool {
        self.kind == MonthKind::Intercalary
    }

    /// Does this month exist in `year`?
    pub fn appears_in(&self, year: i64) -> bool {
        self.interval <= 1 || (year - self.offset).rem_euclid(self.interval as i64) == 0
    }
}

/// One divisibility rule of a leap day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeapDayCondition {
    pub interval: u32,
    #[serde(default)]
    pub exclusive: bool,
    #[serde(default)]
    pub ignore_offset: bool,
}

impl LeapDayCondition {
    pub fn every(interval: u32) -> Self {
        Self {
            interval,
            exclusive: false,
            ignore_offset: false,
        }
    }

    pub fn except(interval: u32) -> Self {
        Self {
            interval,
            exclusive: true,
            ignore_offset: false,
        }
    }
}

/// A day added to some years
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeapDay {
    pub name: String,
    /// Index into the calendar's static month list
    pub timespan: usize,
    /// Intercalary leap days are standalone one-day blocks unless numbered
    #[serde(default)]
    pub intercalary: bool,
    #[serde(default)]
    pub offset: i64,
    /// Day of the owning month after which a standalone leap day sits;
    /// `None` places it after the month's last day
    #[serde(default)]
    pub after: Option<u32>,
    /// Numbered intercalary leap days extend their month instead of
    /// standing alone
    #[serde(default)]
    pub numbered: bool,
    #[serde(default)]
    pub interval: Vec<LeapDayCondition>,
}

impl LeapDay {
    pub fn new(name: impl Into<String>, timespan: usize, interval: Vec<LeapDayCondition>) -> Self {
        Self {
            name: name.into(),
            timespan,
            intercalary: false,
            offset: 0,
            after: None,
            numbered: false,
            interval,
        }
    }

    /// Does the leap day occur in `year`?
    pub fn applies(&self, year: i64) -> bool {
        test_leap_day(&self.interval, self.offset, year)
    }

    /// A standalone leap day occupies its own grid block and is not part
    /// of its month's numbering
    pub fn is_standalone(&self) -> bool {
        self.intercalary && !self.numbered
    }
}

/// How an era is anchored in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EraKind {
    /// The fallback era that covers everything no dated era claims
    Starting,
    Dated {
        start: CalDate,
        #[serde(default)]
        end: Option<CalDate>,
    },
}

/// A named epoch that can renumber or truncate years
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Era {
    pub id: String,
    pub name: String,
    /// Display template, see [`crate::calendar::era::format_era`]
    #[serde(default)]
    pub format: String,
    pub kind: EraKind,
    /// Restart year numbering at the era's start
    #[serde(default)]
    pub restart: bool,
    /// The year the era starts in ends on the era's start day
    #[serde(default)]
    pub ends_year: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl Era {
    pub fn starting(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            format: String::new(),
            kind: EraKind::Starting,
            restart: false,
            ends_year: false,
            description: None,
        }
    }

    pub fn dated(id: impl Into<String>, name: impl Into<String>, start: CalDate) -> Self {
        Self {
            kind: EraKind::Dated { start, end: None },
            ..Self::starting(id, name)
        }
    }

    pub fn is_starting_era(&self) -> bool {
        matches!(self.kind, EraKind::Starting)
    }

    pub fn start(&self) -> Option<CalDate> {
        match self.kind {
            EraKind::Starting => None,
            EraKind::Dated { start, .. } => Some(start),
        }
    }

    pub fn end(&self) -> Option<CalDate> {
        match self.kind {
            EraKind::Starting => None,
            EraKind::Dated { end, .. } => end,
        }
    }
}

/// Display name for a year when custom years are enabled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Year {
    pub name: String,
}

fn default_true() -> bool {
    true
}

/// Everything structural about a calendar
///
/// Editing any of this invalidates every cache built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticCalendarData {
    pub weekdays: Vec<Weekday>,
    pub months: Vec<Month>,
    #[serde(default)]
    pub leap_days: Vec<LeapDay>,
    #[serde(default)]
    pub eras: Vec<Era>,
    #[serde(default)]
    pub moons: Vec<Moon>,
    #[serde(default)]
    pub years: Vec<Year>,
    #[serde(default)]
    pub use_custom_years: bool,
    /// Weekday of year 1, day 1
    #[serde(default)]
    pub first_weekday: usize,
    /// Weeks run on across month boundaries; when false every month
    /// starts on the first weekday
    #[serde(default = "default_true")]
    pub overflow: bool,
    /// Additional shift applied to every weekday computation
    #[serde(default)]
    pub week_offset: i64,
    /// When false the year before 1 is -1
    #[serde(default)]
    pub year_zero_exists: bool,
    #[serde(default)]
    pub seasonal: SeasonalConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

impl StaticCalendarData {
    /// Number of days in a week
    pub fn week_length(&self) -> usize {
        self.weekdays.len()
    }

    /// Sort eras so the starting era comes first and dated eras follow in
    /// chronological order of their start
    pub fn sort_eras(&mut self) {
        self.eras.sort_by(|a, b| a.start().cmp(&b.start()));
    }

    /// Reject definitions the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.months.is_empty() {
            return Err(CalendarError::NoMonths);
        }
        if self.weekdays.is_empty() {
            return Err(CalendarError::NoWeekdays);
        }
        for leap_day in &self.leap_days {
            if leap_day.timespan >= self.months.len() {
                return Err(CalendarError::LeapDayOutOfRange {
                    name: leap_day.name.clone(),
                    timespan: leap_day.timespan,
                    months: self.months.len(),
                });
            }
        }
        for season in &self.seasonal.seasons {
            if let SeasonKind::Dated { month, .. } = season.kind {
                if month >= self.months.len() {
                    return Err(CalendarError::SeasonOutOfRange {
                        name: season.name.clone(),
                        month,
                        months: self.months.len(),
                    });
                }
            }
        }
        for moon in &self.moons {
            if !(moon.cycle.is_finite() && moon.cycle > 0.0) {
                return Err(CalendarError::InvalidMoonCycle(moon.name.clone()));
            }
        }
        Ok(())
    }
}

/// A complete calendar: definition, locations and the displayed date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub static_data: StaticCalendarData,
    pub current: CalDate,
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl Calendar {
    /// Parse and validate a calendar from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let calendar: Calendar = serde_json::from_str(json)?;
        calendar.static_data.validate()?;
        Ok(calendar)
    }

    /// Load and validate a calendar from a JSON file on disk
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_interval_with_offset() {
        let month = Month::regular("Shieldmeet", 1).every(4, 2);
        assert!(month.appears_in(2));
        assert!(month.appears_in(6));
        assert!(month.appears_in(-2));
        assert!(!month.appears_in(4));
        assert!(Month::regular("Every", 30).appears_in(-7));
        assert!(Month::regular("Zero", 30).every(0, 0).appears_in(3));
    }

    #[test]
    fn test_sort_eras_puts_starting_era_first() {
        let mut data = crate::calendar::presets::gregorian();
        data.eras = vec![
            Era::dated("late", "Late", CalDate::new(500, 0, 1)),
            Era::starting("start", "Before"),
            Era::dated("early", "Early", CalDate::new(10, 3, 1)),
        ];
        data.sort_eras();
        let ids: Vec<&str> = data.eras.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["start", "early", "late"]);
    }

    #[test]
    fn test_validate_rejects_structural_errors() {
        let mut data = crate::calendar::presets::gregorian();
        data.leap_days[0].timespan = 40;
        assert!(matches!(data.validate(), Err(CalendarError::LeapDayOutOfRange { .. })));

        let mut data = crate::calendar::presets::gregorian();
        data.months.clear();
        assert!(matches!(data.validate(), Err(CalendarError::NoMonths)));

        let mut data = crate::calendar::presets::gregorian();
        data.weekdays.clear();
        assert!(matches!(data.validate(), Err(CalendarError::NoWeekdays)));
    }

    #[test]
    fn test_era_serde_is_tagged() {
        let era = Era::dated("ad", "Anno Domini", CalDate::new(1, 0, 1));
        let json = serde_json::to_string(&era).unwrap();
        assert!(json.contains("\"kind\":\"dated\""));
        let back: Era = serde_json::from_str(&json).unwrap();
        assert_eq!(back, era);
    }

    #[test]
    fn test_calendar_json_round_trip_validates() {
        let calendar = crate::calendar::presets::gregorian_calendar();
        let json = serde_json::to_string(&calendar).unwrap();
        let parsed = Calendar::from_json(&json).unwrap();
        assert_eq!(parsed.static_data.months.len(), 12);

        let broken = json.replace("\"weekdays\":[", "\"weekdays\":[],\"unused\":[");
        assert!(Calendar::from_json(&broken).is_err());
    }
}
