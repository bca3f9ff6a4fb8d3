//! Event store and the per-date event cache
//!
//! An event's date components may be wildcards (`None` recurs every
//! year, month or day). An event with an `end` spans every date from its
//! start through `end` and needs a fully specified start.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::cache::node::{Bucket, CacheLayer, CacheStats, CacheTree};
use crate::calendar::engine::CalendarEngine;
use crate::core::types::{CalDate, EventId};

/// Possibly partial event date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventDate {
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub month: Option<usize>,
    #[serde(default)]
    pub day: Option<u32>,
}

impl EventDate {
    pub fn exact(date: CalDate) -> Self {
        Self {
            year: Some(date.year),
            month: Some(date.month),
            day: Some(date.day),
        }
    }

    /// Every year on the given month and day
    pub fn yearly(month: usize, day: u32) -> Self {
        Self {
            year: None,
            month: Some(month),
            day: Some(day),
        }
    }

    pub fn as_date(&self) -> Option<CalDate> {
        Some(CalDate::new(self.year?, self.month?, self.day?))
    }

    fn matches_year(&self, year: i64) -> bool {
        self.year.map_or(true, |y| y == year)
    }

    fn matches_month(&self, month: usize) -> bool {
        self.month.map_or(true, |m| m == month)
    }

    fn matches_day(&self, day: u32) -> bool {
        self.day.map_or(true, |d| d == day)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalEvent {
    #[serde(default)]
    pub id: EventId,
    pub name: String,
    /// Path of the note the event was read from
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    pub date: EventDate,
    #[serde(default)]
    pub end: Option<CalDate>,
}

impl CalEvent {
    pub fn new(name: impl Into<String>, date: EventDate) -> Self {
        Self {
            id: EventId::new(),
            name: name.into(),
            note: None,
            category: None,
            description: String::new(),
            date,
            end: None,
        }
    }

    pub fn on(name: impl Into<String>, date: CalDate) -> Self {
        Self::new(name, EventDate::exact(date))
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn until(mut self, end: CalDate) -> Self {
        self.end = Some(end);
        self
    }

    /// `(start, end)` for a ranged event with a concrete start
    pub fn span(&self) -> Option<(CalDate, CalDate)> {
        let end = self.end?;
        let start = self.date.as_date()?;
        Some((start, end.max(start)))
    }

    pub fn occurs_in_year(&self, year: i64) -> bool {
        match self.span() {
            Some((start, end)) => start.year <= year && year <= end.year,
            None => self.date.matches_year(year),
        }
    }

    pub fn occurs_in_month(&self, year: i64, month: usize) -> bool {
        match self.span() {
            Some((start, end)) => (start.year, start.month) <= (year, month) && (year, month) <= (end.year, end.month),
            None => self.date.matches_year(year) && self.date.matches_month(month),
        }
    }

    pub fn occurs_on(&self, date: CalDate) -> bool {
        match self.span() {
            Some((start, end)) => start <= date && date <= end,
            None => {
                self.date.matches_year(date.year) && self.date.matches_month(date.month) && self.date.matches_day(date.day)
            }
        }
    }

    /// Could this event appear in `bucket`?
    pub fn touches(&self, bucket: Bucket) -> bool {
        match bucket {
            Bucket::Year(year) => self.occurs_in_year(year),
            Bucket::Month(year, month) => self.occurs_in_month(year, month),
            Bucket::Day(date) => self.occurs_on(date),
        }
    }
}

/// All known events with an index by source note
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: AHashMap<EventId, CalEvent>,
    by_note: AHashMap<String, Vec<EventId>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<&CalEvent> {
        self.events.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalEvent> {
        self.events.values()
    }

    /// Insert or replace; returns the replaced event
    pub fn insert(&mut self, event: CalEvent) -> Option<CalEvent> {
        let previous = self.remove(event.id);
        if let Some(note) = &event.note {
            self.by_note.entry(note.clone()).or_default().push(event.id);
        }
        self.events.insert(event.id, event);
        previous
    }

    pub fn remove(&mut self, id: EventId) -> Option<CalEvent> {
        let event = self.events.remove(&id)?;
        if let Some(note) = &event.note {
            if let Some(ids) = self.by_note.get_mut(note) {
                ids.retain(|other| *other != id);
                if ids.is_empty() {
                    self.by_note.remove(note);
                }
            }
        }
        Some(event)
    }

    /// Remove every event read from `note`
    pub fn remove_note(&mut self, note: &str) -> Vec<CalEvent> {
        let ids = self.by_note.remove(note).unwrap_or_default();
        ids.into_iter().filter_map(|id| self.events.remove(&id)).collect()
    }

    pub fn note_events(&self, note: &str) -> Vec<&CalEvent> {
        self.by_note
            .get(note)
            .map(|ids| ids.iter().filter_map(|id| self.events.get(id)).collect())
            .unwrap_or_default()
    }

    fn sorted_matching(&self, mut keep: impl FnMut(&CalEvent) -> bool) -> Vec<EventId> {
        let mut matching: Vec<&CalEvent> = self.events.values().filter(|event| keep(event)).collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        matching.into_iter().map(|event| event.id).collect()
    }
}

/// Event ids per bucket, filtered level by level
pub struct EventLayer {
    store: EventStore,
}

impl CacheLayer for EventLayer {
    type YearItem = EventId;
    type MonthItem = EventId;
    type DayItem = EventId;

    fn year_items(&self, _: &CalendarEngine, year: i64) -> Vec<EventId> {
        self.store.sorted_matching(|event| event.occurs_in_year(year))
    }

    fn month_items(&self, _: &CalendarEngine, parent: &[EventId], year: i64, month: usize) -> Vec<EventId> {
        parent
            .iter()
            .copied()
            .filter(|id| self.store.get(*id).map_or(false, |e| e.occurs_in_month(year, month)))
            .collect()
    }

    fn day_items(&self, _: &CalendarEngine, parent: &[EventId], date: CalDate) -> Vec<EventId> {
        parent
            .iter()
            .copied()
            .filter(|id| self.store.get(*id).map_or(false, |e| e.occurs_on(date)))
            .collect()
    }
}

/// Events per date, invalidated precisely on every store change
pub struct EventCache {
    tree: CacheTree<EventLayer>,
}

impl EventCache {
    pub fn new() -> Self {
        Self {
            tree: CacheTree::new(EventLayer { store: EventStore::new() }),
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.tree.layer().store
    }

    pub fn stats(&self) -> CacheStats {
        self.tree.stats()
    }

    /// Events on `date`, ordered by name
    pub fn events_on(&mut self, engine: &CalendarEngine, date: CalDate) -> Vec<&CalEvent> {
        let ids = self.tree.get_items_or_recalculate(engine, date).to_vec();
        let store = &self.tree.layer().store;
        ids.iter().filter_map(|id| store.get(*id)).collect()
    }

    /// Exact single-day events mark one path; wildcards and ranges scan
    /// every materialized bucket
    fn invalidate_for(&mut self, event: &CalEvent) -> usize {
        let marked = match (event.date.as_date(), event.end) {
            (Some(date), None) => self.tree.invalidate(date),
            _ => self.tree.invalidate_where(|bucket| event.touches(bucket)),
        };
        tracing::debug!(event = %event.name, marked, "invalidated event buckets");
        marked
    }

    /// Insert or replace an event; returns the replaced version
    pub fn insert(&mut self, event: CalEvent) -> Option<CalEvent> {
        self.invalidate_for(&event);
        let previous = self.tree.layer_mut().store.insert(event);
        if let Some(old) = &previous {
            self.invalidate_for(old);
        }
        previous
    }

    pub fn remove(&mut self, id: EventId) -> Option<CalEvent> {
        let removed = self.tree.layer_mut().store.remove(id)?;
        self.invalidate_for(&removed);
        Some(removed)
    }

    pub fn remove_note(&mut self, note: &str) -> Vec<CalEvent> {
        let removed = self.tree.layer_mut().store.remove_note(note);
        for event in &removed {
            self.invalidate_for(event);
        }
        removed
    }

    /// Drop every bucket, keeping the events
    pub fn clear_buckets(&mut self) {
        self.tree.clear();
    }
}

impl Default for EventCache {
    fn default() -> Self {
        Self::new()
    }
}
