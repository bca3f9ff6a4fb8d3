//! Year -> Month -> Day cache tree with per-bucket dirty flags
//!
//! A [`CacheLayer`] says how to derive each level's items from the level
//! above. [`CacheTree`] materializes buckets lazily on first query and
//! recomputes a bucket only while its own dirty flag is set; invalidating
//! one date never forces its siblings to recompute.

use ahash::AHashMap;

use crate::calendar::engine::CalendarEngine;
use crate::core::types::CalDate;

/// Derived items of one bucket
#[derive(Debug, Clone)]
pub struct CacheNode<T> {
    dirty: bool,
    items: Vec<T>,
}

impl<T> CacheNode<T> {
    pub fn new() -> Self {
        Self {
            dirty: true,
            items: Vec::new(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    fn store(&mut self, items: Vec<T>) {
        self.items = items;
        self.dirty = false;
    }
}

impl<T> Default for CacheNode<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// How one kind of derived value is computed at each level
pub trait CacheLayer {
    type YearItem;
    type MonthItem;
    type DayItem;

    fn year_items(&self, engine: &CalendarEngine, year: i64) -> Vec<Self::YearItem>;

    fn month_items(
        &self,
        engine: &CalendarEngine,
        parent: &[Self::YearItem],
        year: i64,
        month: usize,
    ) -> Vec<Self::MonthItem>;

    fn day_items(&self, engine: &CalendarEngine, parent: &[Self::MonthItem], date: CalDate) -> Vec<Self::DayItem>;
}

/// A materialized bucket, as seen by [`CacheTree::invalidate_where`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Year(i64),
    Month(i64, usize),
    Day(CalDate),
}

/// Recompute counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub year_recomputes: u64,
    pub month_recomputes: u64,
    pub day_recomputes: u64,
}

impl CacheStats {
    pub fn total(&self) -> u64 {
        self.year_recomputes + self.month_recomputes + self.day_recomputes
    }
}

struct MonthEntry<L: CacheLayer> {
    node: CacheNode<L::MonthItem>,
    days: AHashMap<u32, CacheNode<L::DayItem>>,
}

impl<L: CacheLayer> MonthEntry<L> {
    fn new() -> Self {
        Self {
            node: CacheNode::new(),
            days: AHashMap::new(),
        }
    }
}

struct YearEntry<L: CacheLayer> {
    node: CacheNode<L::YearItem>,
    months: AHashMap<usize, MonthEntry<L>>,
}

impl<L: CacheLayer> YearEntry<L> {
    fn new() -> Self {
        Self {
            node: CacheNode::new(),
            months: AHashMap::new(),
        }
    }
}

/// Lazily built cache of one [`CacheLayer`]
pub struct CacheTree<L: CacheLayer> {
    layer: L,
    years: AHashMap<i64, YearEntry<L>>,
    stats: CacheStats,
}

impl<L: CacheLayer> CacheTree<L> {
    pub fn new(layer: L) -> Self {
        Self {
            layer,
            years: AHashMap::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    /// Mutable access to the layer's sources; callers invalidate what
    /// their edit affects
    pub fn layer_mut(&mut self) -> &mut L {
        &mut self.layer
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Items for `date`, recomputing any dirty bucket on its path
    pub fn get_items_or_recalculate(&mut self, engine: &CalendarEngine, date: CalDate) -> &[L::DayItem] {
        let layer = &self.layer;
        let stats = &mut self.stats;

        let year = self.years.entry(date.year).or_insert_with(YearEntry::new);
        if year.node.is_dirty() {
            year.node.store(layer.year_items(engine, date.year));
            stats.year_recomputes += 1;
        }

        let month = year.months.entry(date.month).or_insert_with(MonthEntry::new);
        if month.node.is_dirty() {
            month
                .node
                .store(layer.month_items(engine, year.node.items(), date.year, date.month));
            stats.month_recomputes += 1;
        }

        let day = month.days.entry(date.day).or_insert_with(CacheNode::new);
        if day.is_dirty() {
            day.store(layer.day_items(engine, month.node.items(), date));
            stats.day_recomputes += 1;
            tracing::trace!(%date, "recomputed day bucket");
        }
        day.items()
    }

    /// Cached items for `date` without recomputing; `None` if the bucket
    /// is missing or dirty
    pub fn peek(&self, date: CalDate) -> Option<&[L::DayItem]> {
        let day = self
            .years
            .get(&date.year)?
            .months
            .get(&date.month)?
            .days
            .get(&date.day)?;
        (!day.is_dirty()).then(|| day.items())
    }

    /// Mark the year, month and day buckets of `date` dirty
    ///
    /// Levels that were never materialized are left alone. Returns how
    /// many buckets were marked.
    pub fn invalidate(&mut self, date: CalDate) -> usize {
        let Some(year) = self.years.get_mut(&date.year) else {
            return 0;
        };
        year.node.mark_dirty();
        let Some(month) = year.months.get_mut(&date.month) else {
            return 1;
        };
        month.node.mark_dirty();
        match month.days.get_mut(&date.day) {
            Some(day) => {
                day.mark_dirty();
                3
            }
            None => 2,
        }
    }

    /// Mark every materialized bucket the predicate selects; returns how
    /// many were marked
    pub fn invalidate_where(&mut self, mut affected: impl FnMut(Bucket) -> bool) -> usize {
        let mut marked = 0;
        for (&y, year) in self.years.iter_mut() {
            if affected(Bucket::Year(y)) {
                year.node.mark_dirty();
                marked += 1;
            }
            for (&m, month) in year.months.iter_mut() {
                if affected(Bucket::Month(y, m)) {
                    month.node.mark_dirty();
                    marked += 1;
                }
                for (&d, day) in month.days.iter_mut() {
                    if affected(Bucket::Day(CalDate::new(y, m, d))) {
                        day.mark_dirty();
                        marked += 1;
                    }
                }
            }
        }
        marked
    }

    pub fn invalidate_all(&mut self) {
        self.invalidate_where(|_| true);
    }

    /// Drop every bucket; the layer and its sources are kept
    pub fn clear(&mut self) {
        self.years.clear();
    }

    /// Number of materialized day buckets
    pub fn day_count(&self) -> usize {
        self.years
            .values()
            .flat_map(|year| year.months.values())
            .map(|month| month.days.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::presets;

    /// Year items are the year, month items add the month, day items add
    /// the day; a multiplier makes stale output observable
    struct Positional {
        scale: i64,
    }

    impl CacheLayer for Positional {
        type YearItem = i64;
        type MonthItem = i64;
        type DayItem = i64;

        fn year_items(&self, _: &CalendarEngine, year: i64) -> Vec<i64> {
            vec![year * self.scale]
        }

        fn month_items(&self, _: &CalendarEngine, parent: &[i64], _: i64, month: usize) -> Vec<i64> {
            parent.iter().map(|v| v * 100 + month as i64).collect()
        }

        fn day_items(&self, _: &CalendarEngine, parent: &[i64], date: CalDate) -> Vec<i64> {
            parent.iter().map(|v| v * 100 + date.day as i64).collect()
        }
    }

    fn engine() -> CalendarEngine {
        CalendarEngine::with_defaults(presets::gregorian())
    }

    #[test]
    fn test_nodes_start_dirty() {
        let node: CacheNode<u8> = CacheNode::default();
        assert!(node.is_dirty());
        assert!(node.items().is_empty());
    }

    #[test]
    fn test_lazy_build_and_reuse() {
        let engine = engine();
        let mut tree = CacheTree::new(Positional { scale: 1 });
        let date = CalDate::new(2024, 2, 5);
        assert_eq!(tree.get_items_or_recalculate(&engine, date), &[20240205]);
        assert_eq!(tree.stats().total(), 3);

        assert_eq!(tree.get_items_or_recalculate(&engine, date), &[20240205]);
        assert_eq!(tree.stats().total(), 3);

        // sibling day reuses year and month
        tree.get_items_or_recalculate(&engine, CalDate::new(2024, 2, 6));
        assert_eq!(tree.stats().day_recomputes, 2);
        assert_eq!(tree.stats().month_recomputes, 1);
        assert_eq!(tree.day_count(), 2);
    }

    #[test]
    fn test_invalidate_recomputes_only_the_path() {
        let engine = engine();
        let mut tree = CacheTree::new(Positional { scale: 1 });
        let a = CalDate::new(2024, 2, 5);
        let b = CalDate::new(2024, 2, 6);
        tree.get_items_or_recalculate(&engine, a);
        tree.get_items_or_recalculate(&engine, b);

        tree.layer_mut().scale = 2;
        tree.invalidate(a);
        assert!(tree.peek(a).is_none());
        assert_eq!(tree.peek(b), Some(&[20240206][..]));

        assert_eq!(tree.get_items_or_recalculate(&engine, a), &[40480205]);
        // b was not invalidated and keeps its cached output
        assert_eq!(tree.get_items_or_recalculate(&engine, b), &[20240206]);
        let stats = tree.stats();
        assert_eq!((stats.year_recomputes, stats.month_recomputes, stats.day_recomputes), (2, 2, 3));
    }

    #[test]
    fn test_invalidate_missing_levels_is_noop() {
        let mut tree = CacheTree::new(Positional { scale: 1 });
        tree.invalidate(CalDate::new(1, 0, 1));
        assert_eq!(tree.day_count(), 0);
        assert_eq!(tree.stats(), CacheStats::default());
    }

    #[test]
    fn test_invalidate_where_and_clear() {
        let engine = engine();
        let mut tree = CacheTree::new(Positional { scale: 1 });
        for day in 1..=10 {
            tree.get_items_or_recalculate(&engine, CalDate::new(2024, 0, day));
        }
        let marked = tree.invalidate_where(|bucket| matches!(bucket, Bucket::Day(d) if d.day % 2 == 0));
        assert_eq!(marked, 5);
        for day in 1..=10 {
            assert_eq!(tree.peek(CalDate::new(2024, 0, day)).is_none(), day % 2 == 0);
        }

        tree.invalidate_all();
        assert!(tree.peek(CalDate::new(2024, 0, 1)).is_none());
        tree.clear();
        assert_eq!(tree.day_count(), 0);
    }
}
