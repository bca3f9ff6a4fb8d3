//! Calendar engine - epoch-day arithmetic over one calendar definition
//!
//! The engine owns a normalized copy of the static definition (eras
//! sorted) together with the precomputed year cycle. It is rebuilt, never
//! patched, when the definition changes.

use crate::calendar::arithmetic::{
    self, months_for_year, standalone_leap_days, standalone_position, tally_month,
    tally_plain_year, YearMonth, YearTally,
};
use crate::calendar::cycle::YearCycle;
use crate::calendar::model::StaticCalendarData;
use crate::core::config::EngineConfig;
use crate::core::types::{CalDate, EpochDay};

/// Upper bound on the year search in [`CalendarEngine::date_from_epoch_day`]
const MAX_YEAR_STEPS: usize = 100_000;

/// Arithmetic over one calendar definition
#[derive(Debug, Clone)]
pub struct CalendarEngine {
    data: StaticCalendarData,
    config: EngineConfig,
    cycle: Option<YearCycle>,
    /// `(year, plain - truncated)` for every year an `ends_year` era cuts
    truncations: Vec<(i64, YearTally)>,
}

impl CalendarEngine {
    pub fn new(mut data: StaticCalendarData, config: EngineConfig) -> Self {
        data.sort_eras();
        let cycle = YearCycle::build(&data.months, &data.leap_days, config.max_cycle_years);

        let mut truncations: Vec<(i64, YearTally)> = Vec::new();
        for era in data.eras.iter().filter(|era| era.ends_year) {
            let Some(start) = era.start() else { continue };
            if truncations.iter().any(|(year, _)| *year == start.year) {
                continue;
            }
            let plain = tally_plain_year(start.year, &data.months, &data.leap_days);
            let actual = arithmetic::tally_year(start.year, &data);
            truncations.push((start.year, plain - actual));
        }

        match &cycle {
            Some(cycle) => tracing::debug!(
                period = cycle.period(),
                truncated_years = truncations.len(),
                "built calendar engine"
            ),
            None => tracing::debug!("year cycle exceeds cap, summing years directly"),
        }

        Self {
            data,
            config,
            cycle,
            truncations,
        }
    }

    pub fn with_defaults(data: StaticCalendarData) -> Self {
        Self::new(data, EngineConfig::default())
    }

    pub fn data(&self) -> &StaticCalendarData {
        &self.data
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn week_length(&self) -> usize {
        self.data.week_length().max(1)
    }

    // ------------------------------------------------------------------
    // Year stepping
    // ------------------------------------------------------------------

    pub fn next_year(&self, year: i64) -> i64 {
        if !self.data.year_zero_exists && year == -1 {
            1
        } else {
            year + 1
        }
    }

    pub fn previous_year(&self, year: i64) -> i64 {
        if !self.data.year_zero_exists && year == 1 {
            -1
        } else {
            year - 1
        }
    }

    // ------------------------------------------------------------------
    // Months
    // ------------------------------------------------------------------

    pub fn months_for_year(&self, year: i64) -> Vec<YearMonth<'_>> {
        months_for_year(year, &self.data.months, &self.data.eras)
    }

    pub fn month_count(&self, year: i64) -> usize {
        self.months_for_year(year).len()
    }

    pub fn month(&self, year: i64, month: usize) -> Option<YearMonth<'_>> {
        self.months_for_year(year).get(month).copied()
    }

    /// Length of a resolved month, including era truncation
    pub fn days_in_month(&self, year: i64, month: usize) -> Option<u32> {
        self.month(year, month).map(|ym| self.resolved_length(&ym, year))
    }

    fn resolved_length(&self, ym: &YearMonth<'_>, year: i64) -> u32 {
        let full = arithmetic::days_in_month(ym.index, ym.month, year, &self.data.leap_days);
        ym.cut_at.map_or(full, |cut| cut.min(full))
    }

    // ------------------------------------------------------------------
    // Years
    // ------------------------------------------------------------------

    pub fn tally_year(&self, year: i64) -> YearTally {
        arithmetic::tally_year(year, &self.data)
    }

    pub fn days_in_year(&self, year: i64) -> i64 {
        self.tally_year(year).days
    }

    /// Sum over the calendar years in `from..to`
    fn tally_range(&self, from: i64, to: i64) -> YearTally {
        if to <= from {
            return YearTally::default();
        }
        let plain = |year: i64| tally_plain_year(year, &self.data.months, &self.data.leap_days);

        let mut total = match &self.cycle {
            Some(cycle) => cycle.sum(from, to),
            None => (from..to).fold(YearTally::default(), |acc, year| acc + plain(year)),
        };

        let skips_zero = !self.data.year_zero_exists;
        if skips_zero && from <= 0 && 0 < to {
            total = total - plain(0);
        }
        for (year, delta) in &self.truncations {
            if (from..to).contains(year) && !(skips_zero && *year == 0) {
                total = total - *delta;
            }
        }
        total
    }

    /// Tally of every year strictly before `year`, signed from the epoch
    fn epoch_tally(&self, year: i64) -> YearTally {
        if year >= 1 {
            self.tally_range(1, year)
        } else {
            -self.tally_range(year, 1)
        }
    }

    /// Days from year 1, day 1 to the first day of `year`
    ///
    /// Negative for years before the origin. The magnitude for `-n` is the
    /// length of the `n` years before year 1, so `days_from_epoch(-1)` is
    /// `-365` on a Gregorian calendar.
    pub fn days_from_epoch(&self, year: i64) -> EpochDay {
        self.epoch_tally(year).days
    }

    /// Weekday of the first day of `year`; always 0 without overflow
    pub fn first_weekday_of_year(&self, year: i64) -> usize {
        if !self.data.overflow {
            return 0;
        }
        self.wrap_weekday(self.epoch_tally(year).week_days)
    }

    fn wrap_weekday(&self, week_days: i64) -> usize {
        let shifted = week_days + self.data.first_weekday as i64 + self.data.week_offset;
        shifted.rem_euclid(self.week_length() as i64) as usize
    }

    // ------------------------------------------------------------------
    // Dates
    // ------------------------------------------------------------------

    /// Tally of the days in `date.year` that come before `date`
    fn tally_before(&self, date: CalDate) -> YearTally {
        let months = self.months_for_year(date.year);
        let mut tally = YearTally::default();
        for ym in months.iter().take(date.month) {
            tally = tally + tally_month(ym, date.year, &self.data.leap_days);
        }
        if let Some(ym) = months.get(date.month) {
            let full = arithmetic::days_in_month(ym.index, ym.month, date.year, &self.data.leap_days);
            let elapsed = date.day.saturating_sub(1) as i64;
            let standalone = standalone_leap_days(ym.index, date.year, &self.data.leap_days)
                .filter(|leap| standalone_position(leap, full) < date.day)
                .count() as i64;
            tally = tally
                + YearTally {
                    days: elapsed + standalone,
                    week_days: if ym.month.is_intercalary() { 0 } else { elapsed },
                };
        }
        tally
    }

    /// Epoch day of `date`
    ///
    /// Callers validate the date first; an out-of-range month or day is
    /// counted as if the month were long enough.
    pub fn days_before(&self, date: CalDate) -> EpochDay {
        self.days_from_epoch(date.year) + self.tally_before(date).days
    }

    /// Signed number of days from `a` to `b`
    pub fn days_between(&self, a: CalDate, b: CalDate) -> i64 {
        self.days_before(b) - self.days_before(a)
    }

    /// Weekday index of `date`
    pub fn weekday_of(&self, date: CalDate) -> usize {
        if !self.data.overflow {
            return (date.day.saturating_sub(1) as usize) % self.week_length();
        }
        let week_days = self.epoch_tally(date.year).week_days + self.tally_before(date).week_days;
        self.wrap_weekday(week_days)
    }

    /// Weekday of day 1 of a resolved month
    pub fn first_weekday_of_month(&self, year: i64, month: usize) -> usize {
        self.weekday_of(CalDate::new(year, month, 1))
    }

    /// Inverse of [`Self::days_before`]
    ///
    /// An epoch day that falls on a standalone leap day maps to the day
    /// it follows.
    pub fn date_from_epoch_day(&self, epoch_day: EpochDay) -> CalDate {
        let mut year = self.estimate_year(epoch_day);
        let mut steps = 0;
        while self.days_from_epoch(year) > epoch_day && steps < MAX_YEAR_STEPS {
            year = self.previous_year(year);
            steps += 1;
        }
        while self.days_from_epoch(self.next_year(year)) <= epoch_day && steps < MAX_YEAR_STEPS {
            year = self.next_year(year);
            steps += 1;
        }

        let mut remaining = epoch_day - self.days_from_epoch(year);
        let months = self.months_for_year(year);
        let mut last = CalDate::new(year, 0, 1);
        for (month_index, ym) in months.iter().enumerate() {
            let full = arithmetic::days_in_month(ym.index, ym.month, year, &self.data.leap_days);
            let length = ym.cut_at.map_or(full, |cut| cut.min(full));
            let positions: Vec<u32> = standalone_leap_days(ym.index, year, &self.data.leap_days)
                .map(|leap| standalone_position(leap, full))
                .filter(|position| ym.cut_at.map_or(true, |cut| *position < cut))
                .collect();

            let leading = positions.iter().filter(|p| **p == 0).count() as i64;
            if remaining < leading {
                return CalDate::new(year, month_index, 1);
            }
            remaining -= leading;

            for day in 1..=length {
                last = CalDate::new(year, month_index, day);
                if remaining == 0 {
                    return last;
                }
                remaining -= 1;
                let after = positions.iter().filter(|p| **p == day).count() as i64;
                if remaining < after {
                    return last;
                }
                remaining -= after;
            }
        }
        last
    }

    fn estimate_year(&self, epoch_day: EpochDay) -> i64 {
        let average = match &self.cycle {
            Some(cycle) => cycle.total().days as f64 / cycle.period() as f64,
            None => tally_plain_year(1, &self.data.months, &self.data.leap_days).days as f64,
        };
        if average <= 0.0 {
            return 1;
        }
        let linear = (epoch_day as f64 / average).floor() as i64 + 1;
        if !self.data.year_zero_exists && linear <= 0 {
            linear - 1
        } else {
            linear
        }
    }

    /// `date` moved by `days` (negative moves backwards)
    pub fn add_days(&self, date: CalDate, days: i64) -> CalDate {
        self.date_from_epoch_day(self.days_before(date) + days)
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    pub fn is_valid_year(&self, year: i64) -> bool {
        year != 0 || self.data.year_zero_exists
    }

    pub fn is_valid_month(&self, year: i64, month: usize) -> bool {
        self.is_valid_year(year) && month < self.month_count(year)
    }

    pub fn is_valid_day(&self, date: CalDate) -> bool {
        match self.days_in_month(date.year, date.month) {
            Some(length) => self.is_valid_year(date.year) && date.day >= 1 && date.day <= length,
            None => false,
        }
    }
}
