//! Year cycle - prefix sums over the repeating pattern of year types
//!
//! Month presence and leap days are all "every N years" rules, so the
//! day count of a year depends only on `year mod lcm(all N)`. One pass
//! over that cycle turns any sum over a range of years into two table
//! lookups.

use crate::calendar::arithmetic::{tally_plain_year, YearTally};
use crate::calendar::model::{LeapDay, Month};

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: u64, b: u64) -> Option<u64> {
    (a / gcd(a, b)).checked_mul(b)
}

/// Length in years of the repeating pattern, or `None` once it exceeds
/// `max_years`
pub fn cycle_length(months: &[Month], leap_days: &[LeapDay], max_years: u64) -> Option<u64> {
    let month_intervals = months.iter().map(|m| m.interval.max(1) as u64);
    let leap_intervals = leap_days
        .iter()
        .flat_map(|leap| leap.interval.iter())
        .filter(|c| c.interval > 0)
        .map(|c| c.interval as u64);

    let mut period = 1u64;
    for interval in month_intervals.chain(leap_intervals) {
        period = lcm(period, interval)?;
        if period > max_years {
            return None;
        }
    }
    Some(period)
}

/// Prefix sums of plain (untruncated) year tallies over one cycle
#[derive(Debug, Clone)]
pub struct YearCycle {
    period: i64,
    /// `prefix[r]` is the sum over residues `0..r`
    prefix: Vec<YearTally>,
}

impl YearCycle {
    pub fn build(months: &[Month], leap_days: &[LeapDay], max_years: u64) -> Option<Self> {
        let period = cycle_length(months, leap_days, max_years)? as i64;
        let mut prefix = Vec::with_capacity(period as usize + 1);
        let mut running = YearTally::default();
        prefix.push(running);
        for residue in 0..period {
            running = running + tally_plain_year(residue, months, leap_days);
            prefix.push(running);
        }
        Some(Self { period, prefix })
    }

    pub fn period(&self) -> i64 {
        self.period
    }

    /// Total of one full cycle
    pub fn total(&self) -> YearTally {
        self.prefix[self.period as usize]
    }

    /// Sum over years `0..n` (negated sum over `n..0` for negative `n`)
    fn cumulative(&self, n: i64) -> YearTally {
        let cycles = n.div_euclid(self.period);
        let residue = n.rem_euclid(self.period) as usize;
        self.total() * cycles + self.prefix[residue]
    }

    /// Sum of plain tallies over the integer years `from..to`
    pub fn sum(&self, from: i64, to: i64) -> YearTally {
        if to <= from {
            return YearTally::default();
        }
        self.cumulative(to) - self.cumulative(from)
    }
}
