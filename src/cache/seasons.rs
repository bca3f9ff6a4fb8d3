//! Season state per date
//!
//! Year buckets hold the season starts that bracket the year; month
//! buckets narrow those to the starts bracketing the month, so a day only
//! searches a handful of entries.

use crate::cache::node::{CacheLayer, CacheStats, CacheTree};
use crate::calendar::engine::CalendarEngine;
use crate::core::types::{CalDate, EpochDay};
use crate::season::{resolve_season, season_starts, starts_within, SeasonStart, SeasonState};

pub struct SeasonLayer;

fn month_span(engine: &CalendarEngine, year: i64, month: usize) -> Option<(EpochDay, EpochDay)> {
    let length = engine.days_in_month(year, month)?;
    let first = engine.days_before(CalDate::new(year, month, 1));
    let last = engine.days_before(CalDate::new(year, month, length.max(1)));
    Some((first, last))
}

impl CacheLayer for SeasonLayer {
    type YearItem = SeasonStart;
    type MonthItem = SeasonStart;
    type DayItem = SeasonState;

    fn year_items(&self, engine: &CalendarEngine, year: i64) -> Vec<SeasonStart> {
        let first = engine.days_from_epoch(year);
        let last = engine.days_from_epoch(engine.next_year(year)) - 1;
        let starts = season_starts(engine, first, last.max(first));
        starts_within(&starts, first, last.max(first))
    }

    fn month_items(&self, engine: &CalendarEngine, parent: &[SeasonStart], year: i64, month: usize) -> Vec<SeasonStart> {
        match month_span(engine, year, month) {
            Some((first, last)) => starts_within(parent, first, last),
            None => Vec::new(),
        }
    }

    fn day_items(&self, engine: &CalendarEngine, parent: &[SeasonStart], date: CalDate) -> Vec<SeasonState> {
        resolve_season(engine, parent, engine.days_before(date))
            .into_iter()
            .collect()
    }
}

pub struct SeasonCache {
    tree: CacheTree<SeasonLayer>,
}

impl SeasonCache {
    pub fn new() -> Self {
        Self {
            tree: CacheTree::new(SeasonLayer),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.tree.stats()
    }

    pub fn season_on(&mut self, engine: &CalendarEngine, date: CalDate) -> Option<&SeasonState> {
        self.tree.get_items_or_recalculate(engine, date).first()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl Default for SeasonCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::presets;
    use crate::season;

    #[test]
    fn test_cached_seasons_match_direct_resolution() {
        for data in [presets::gregorian(), presets::harptos()] {
            let engine = CalendarEngine::with_defaults(data);
            let mut cache = SeasonCache::new();
            let start = engine.days_from_epoch(1372);
            for offset in (0..800).step_by(7) {
                let date = engine.date_from_epoch_day(start + offset);
                let direct = season::season_on(&engine, date);
                assert_eq!(cache.season_on(&engine, date).cloned(), direct, "{}", date);
            }
        }
    }

    #[test]
    fn test_year_bucket_is_shared() {
        let engine = CalendarEngine::with_defaults(presets::gregorian());
        let mut cache = SeasonCache::new();
        for day in 1..=28 {
            assert!(cache.season_on(&engine, CalDate::new(2024, 1, day)).is_some());
        }
        assert_eq!(cache.stats().year_recomputes, 1);
        assert_eq!(cache.stats().month_recomputes, 1);
        assert_eq!(cache.stats().day_recomputes, 28);
    }
}
