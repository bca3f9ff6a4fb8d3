//! Moon phases per date

use crate::cache::node::{CacheLayer, CacheStats, CacheTree};
use crate::calendar::engine::CalendarEngine;
use crate::calendar::moon::MoonState;
use crate::core::types::CalDate;

/// Year and month buckets hold the visible moon indices
pub struct MoonLayer;

impl CacheLayer for MoonLayer {
    type YearItem = usize;
    type MonthItem = usize;
    type DayItem = MoonState;

    fn year_items(&self, engine: &CalendarEngine, _: i64) -> Vec<usize> {
        engine
            .data()
            .moons
            .iter()
            .enumerate()
            .filter(|(_, moon)| !moon.hidden)
            .map(|(i, _)| i)
            .collect()
    }

    fn month_items(&self, _: &CalendarEngine, parent: &[usize], _: i64, _: usize) -> Vec<usize> {
        parent.to_vec()
    }

    fn day_items(&self, engine: &CalendarEngine, parent: &[usize], date: CalDate) -> Vec<MoonState> {
        let epoch_day = engine.days_before(date);
        let moons = &engine.data().moons;
        parent
            .iter()
            .filter_map(|&i| moons.get(i).map(|moon| MoonState::new(i, moon, epoch_day)))
            .collect()
    }
}

pub struct MoonCache {
    tree: CacheTree<MoonLayer>,
}

impl MoonCache {
    pub fn new() -> Self {
        Self {
            tree: CacheTree::new(MoonLayer),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.tree.stats()
    }

    pub fn moons_on(&mut self, engine: &CalendarEngine, date: CalDate) -> &[MoonState] {
        self.tree.get_items_or_recalculate(engine, date)
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl Default for MoonCache {
    fn default() -> Self {
        Self::new()
    }
}
