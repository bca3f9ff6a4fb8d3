//! Month grids and year layout
//!
//! Regular months are laid out on the week grid. Intercalary months and
//! standalone leap days become their own blocks; a standalone leap day
//! anchored inside a month splits that month's grid in two and the
//! continuation picks up on the weekday where the first part stopped.

use serde::{Deserialize, Serialize};

use crate::calendar::arithmetic::{self, standalone_leap_days, standalone_position};
use crate::calendar::engine::CalendarEngine;
use crate::core::types::CalDate;

/// A run of days of one month laid out in weeks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i64,
    /// Resolved month index
    pub month: usize,
    pub name: String,
    pub first_day: u32,
    pub last_day: u32,
    /// Weekday column of `first_day`
    pub leading_blanks: usize,
    /// Rows of `week_length` cells; `None` cells are padding
    pub weeks: Vec<Vec<Option<u32>>>,
}

impl MonthGrid {
    pub fn day_count(&self) -> u32 {
        self.last_day + 1 - self.first_day
    }
}

/// One block of a year's layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutBlock {
    Month(MonthGrid),
    /// Days of an intercalary month, outside the week grid
    Intercalary {
        month: usize,
        name: String,
        days: Vec<u32>,
    },
    /// A standalone leap day following `after` of resolved month `month`
    LeapDay { month: usize, name: String, after: u32 },
}

fn build_grid(engine: &CalendarEngine, year: i64, month: usize, name: &str, first: u32, last: u32) -> MonthGrid {
    let week = engine.week_length();
    let leading = engine.weekday_of(CalDate::new(year, month, first));

    let mut cells: Vec<Option<u32>> = vec![None; leading];
    cells.extend((first..=last).map(Some));
    let remainder = cells.len() % week;
    if remainder != 0 {
        cells.extend(std::iter::repeat(None).take(week - remainder));
    }

    MonthGrid {
        year,
        month,
        name: name.to_string(),
        first_day: first,
        last_day: last,
        leading_blanks: leading,
        weeks: cells.chunks(week).map(<[Option<u32>]>::to_vec).collect(),
    }
}

/// Full week grid of one resolved month
pub fn month_grid(engine: &CalendarEngine, year: i64, month: usize) -> Option<MonthGrid> {
    let ym = engine.month(year, month)?;
    let length = engine.days_in_month(year, month)?;
    if length == 0 {
        return None;
    }
    Some(build_grid(engine, year, month, &ym.month.name, 1, length))
}

/// Every block of `year` in display order
pub fn year_layout(engine: &CalendarEngine, year: i64) -> Vec<LayoutBlock> {
    let data = engine.data();
    let mut blocks = Vec::new();

    for (month, ym) in engine.months_for_year(year).iter().enumerate() {
        let full = arithmetic::days_in_month(ym.index, ym.month, year, &data.leap_days);
        let length = ym.cut_at.map_or(full, |cut| cut.min(full));

        let mut leaps: Vec<(u32, String)> = standalone_leap_days(ym.index, year, &data.leap_days)
            .map(|leap| (standalone_position(leap, full), leap.name.clone()))
            .filter(|(position, _)| ym.cut_at.map_or(true, |cut| *position < cut))
            .collect();
        leaps.sort_by_key(|(position, _)| *position);

        let mut first = 1;
        let mut pending = leaps.into_iter().peekable();
        loop {
            let split = pending.peek().map(|(position, _)| *position);
            let last = split.map_or(length, |position| position.min(length));
            if last >= first {
                blocks.push(if ym.month.is_intercalary() {
                    LayoutBlock::Intercalary {
                        month,
                        name: ym.month.name.clone(),
                        days: (first..=last).collect(),
                    }
                } else {
                    LayoutBlock::Month(build_grid(engine, year, month, &ym.month.name, first, last))
                });
                first = last + 1;
            }
            match split {
                Some(position) => {
                    while let Some((_, name)) = pending.next_if(|(p, _)| *p == position) {
                        blocks.push(LayoutBlock::LeapDay {
                            month,
                            name,
                            after: position,
                        });
                    }
                }
                None => break,
            }
        }
    }
    blocks
}
