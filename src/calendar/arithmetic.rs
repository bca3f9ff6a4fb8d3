//! Year and month arithmetic
//!
//! Pure functions over the static definition: which months exist in a
//! year, how long each one is, and how many days (and week-grid days) a
//! whole year holds. The engine layers caching and epoch math on top.

use crate::calendar::model::{Era, LeapDay, Month, StaticCalendarData};

/// A month as it appears in one particular year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearMonth<'a> {
    /// Index into the static month list
    pub index: usize,
    pub month: &'a Month,
    /// Set on the final month of a year an `ends_year` era cuts short:
    /// the year ends on this day of the month
    pub cut_at: Option<u32>,
}

/// Day totals for one year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearTally {
    /// Every day in the year
    pub days: i64,
    /// Days that advance the weekday (regular months only)
    pub week_days: i64,
}

impl std::ops::Add for YearTally {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            days: self.days + rhs.days,
            week_days: self.week_days + rhs.week_days,
        }
    }
}

impl std::ops::Sub for YearTally {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            days: self.days - rhs.days,
            week_days: self.week_days - rhs.week_days,
        }
    }
}

impl std::ops::Mul<i64> for YearTally {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self {
            days: self.days * rhs,
            week_days: self.week_days * rhs,
        }
    }
}

impl std::ops::Neg for YearTally {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            days: -self.days,
            week_days: -self.week_days,
        }
    }
}

/// The `ends_year` era that starts in `year`, if any (earliest wins)
pub fn ending_era(eras: &[Era], year: i64) -> Option<&Era> {
    eras.iter()
        .filter(|era| era.ends_year)
        .filter_map(|era| era.start().map(|start| (start, era)))
        .filter(|(start, _)| start.year == year)
        .min_by_key(|(start, _)| *start)
        .map(|(_, era)| era)
}

/// Months that exist in `year`, truncated by an `ends_year` era starting
/// in that year
pub fn months_for_year<'a>(year: i64, months: &'a [Month], eras: &[Era]) -> Vec<YearMonth<'a>> {
    let mut resolved: Vec<YearMonth<'a>> = months
        .iter()
        .enumerate()
        .filter(|(_, month)| month.appears_in(year))
        .map(|(index, month)| YearMonth {
            index,
            month,
            cut_at: None,
        })
        .collect();

    if let Some(start) = ending_era(eras, year).and_then(Era::start) {
        if start.month < resolved.len() {
            resolved.truncate(start.month + 1);
            if let Some(last) = resolved.last_mut() {
                last.cut_at = Some(start.day.max(1));
            }
        }
    }
    resolved
}

/// Length of a month in `year`: base length plus its applicable leap days
/// that are folded into the month's numbering
pub fn days_in_month(index: usize, month: &Month, year: i64, leap_days: &[LeapDay]) -> u32 {
    let extra = leap_days
        .iter()
        .filter(|leap| leap.timespan == index && !leap.is_standalone() && leap.applies(year))
        .count() as u32;
    month.length + extra
}

/// Standalone leap days attached to month `index` that occur in `year`
pub fn standalone_leap_days<'a>(
    index: usize,
    year: i64,
    leap_days: &'a [LeapDay],
) -> impl Iterator<Item = &'a LeapDay> + 'a {
    leap_days
        .iter()
        .filter(move |leap| leap.timespan == index && leap.is_standalone() && leap.applies(year))
}

/// Position (day of the month) after which a standalone leap day sits
pub fn standalone_position(leap: &LeapDay, month_length: u32) -> u32 {
    leap.after.map_or(month_length, |after| after.min(month_length))
}

/// Day totals contributed by one resolved month, honouring `cut_at`
pub fn tally_month(year_month: &YearMonth<'_>, year: i64, leap_days: &[LeapDay]) -> YearTally {
    let full = days_in_month(year_month.index, year_month.month, year, leap_days);
    let length = year_month.cut_at.map_or(full, |cut| cut.min(full));

    let standalone = standalone_leap_days(year_month.index, year, leap_days)
        .filter(|leap| match year_month.cut_at {
            Some(cut) => standalone_position(leap, full) < cut,
            None => true,
        })
        .count() as i64;

    let week_days = if year_month.month.is_intercalary() { 0 } else { length as i64 };
    YearTally {
        days: length as i64 + standalone,
        week_days,
    }
}

/// Day totals of `year` ignoring era truncation
pub fn tally_plain_year(year: i64, months: &[Month], leap_days: &[LeapDay]) -> YearTally {
    months_for_year(year, months, &[])
        .iter()
        .fold(YearTally::default(), |acc, ym| acc + tally_month(ym, year, leap_days))
}

/// Day totals of `year` including era truncation
pub fn tally_year(year: i64, data: &StaticCalendarData) -> YearTally {
    months_for_year(year, &data.months, &data.eras)
        .iter()
        .fold(YearTally::default(), |acc, ym| acc + tally_month(ym, year, &data.leap_days))
}
