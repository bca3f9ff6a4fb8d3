//! Era in effect per date

use crate::cache::node::{CacheLayer, CacheStats, CacheTree};
use crate::calendar::engine::CalendarEngine;
use crate::calendar::era::{era_covers, resolve_era};
use crate::calendar::model::Era;
use crate::core::types::CalDate;

/// Year and month buckets keep indices of candidate eras; a day bucket
/// holds the single resolved era
pub struct EraLayer;

/// Eras that can never be excluded by narrowing: the starting era, or
/// the earliest era when there is none
fn is_fallback(eras: &[Era], index: usize) -> bool {
    eras[index].is_starting_era() || (index == 0 && !eras.iter().any(Era::is_starting_era))
}

impl CacheLayer for EraLayer {
    type YearItem = usize;
    type MonthItem = usize;
    type DayItem = Era;

    fn year_items(&self, engine: &CalendarEngine, year: i64) -> Vec<usize> {
        let eras = &engine.data().eras;
        (0..eras.len())
            .filter(|&i| is_fallback(eras, i) || era_covers(&eras[i], year, None, None))
            .collect()
    }

    fn month_items(&self, engine: &CalendarEngine, parent: &[usize], year: i64, month: usize) -> Vec<usize> {
        let eras = &engine.data().eras;
        parent
            .iter()
            .copied()
            .filter(|&i| is_fallback(eras, i) || era_covers(&eras[i], year, Some(month), None))
            .collect()
    }

    fn day_items(&self, engine: &CalendarEngine, parent: &[usize], date: CalDate) -> Vec<Era> {
        let eras = &engine.data().eras;
        let candidates: Vec<Era> = parent.iter().map(|&i| eras[i].clone()).collect();
        resolve_era(&candidates, date.year, Some(date.month), Some(date.day))
            .cloned()
            .into_iter()
            .collect()
    }
}

pub struct EraCache {
    tree: CacheTree<EraLayer>,
}

impl EraCache {
    pub fn new() -> Self {
        Self {
            tree: CacheTree::new(EraLayer),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.tree.stats()
    }

    pub fn era_on(&mut self, engine: &CalendarEngine, date: CalDate) -> Option<&Era> {
        self.tree.get_items_or_recalculate(engine, date).first()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl Default for EraCache {
    fn default() -> Self {
        Self::new()
    }
}
