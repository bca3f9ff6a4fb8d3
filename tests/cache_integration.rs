//! Cache invalidation integration tests

use fabled_calendar::cache::{CalEvent, EventCache, EventDate};
use fabled_calendar::calendar::{presets, CalendarEngine};
use fabled_calendar::core::config::EngineConfig;
use fabled_calendar::core::types::CalDate;
use fabled_calendar::session::CalendarSession;

fn engine() -> CalendarEngine {
    CalendarEngine::with_defaults(presets::gregorian())
}

#[test]
fn test_invalidation_is_local_to_the_touched_date() {
    let engine = engine();
    let mut cache = EventCache::new();

    let dates: Vec<CalDate> = (1..=31).map(|d| CalDate::new(2024, 0, d)).collect();
    for date in &dates {
        cache.events_on(&engine, *date);
    }
    let warm = cache.stats();
    assert_eq!(warm.day_recomputes, 31);

    cache.insert(CalEvent::on("Audience", dates[9]));
    for date in &dates {
        cache.events_on(&engine, *date);
    }
    let after = cache.stats();
    assert_eq!(after.day_recomputes - warm.day_recomputes, 1);
    assert_eq!(after.month_recomputes - warm.month_recomputes, 1);
    assert_eq!(after.year_recomputes - warm.year_recomputes, 1);
}

#[test]
fn test_wildcard_event_invalidates_every_matching_bucket() {
    let engine = engine();
    let mut cache = EventCache::new();
    let firsts: Vec<CalDate> = (0..12).map(|m| CalDate::new(2024, m, 1)).collect();
    let seconds: Vec<CalDate> = (0..12).map(|m| CalDate::new(2024, m, 2)).collect();
    for date in firsts.iter().chain(&seconds) {
        cache.events_on(&engine, *date);
    }
    let warm = cache.stats();

    cache.insert(CalEvent::new(
        "Rent Due",
        EventDate {
            year: None,
            month: None,
            day: Some(1),
        },
    ));
    for date in &firsts {
        assert_eq!(cache.events_on(&engine, *date).len(), 1, "{}", date);
    }
    for date in &seconds {
        assert!(cache.events_on(&engine, *date).is_empty());
    }
    assert_eq!(cache.stats().day_recomputes - warm.day_recomputes, 12);
}

#[test]
fn test_results_match_a_fresh_cache_after_edits() {
    let engine = engine();
    let mut warm = EventCache::new();
    let dates: Vec<CalDate> = (0..60).map(|n| engine.add_days(CalDate::new(2023, 11, 1), n)).collect();
    for date in &dates {
        warm.events_on(&engine, *date);
    }

    let festival = CalEvent::on("Winter Festival", CalDate::new(2023, 11, 20)).until(CalDate::new(2024, 0, 6));
    let festival_id = festival.id;
    warm.insert(festival);
    warm.insert(CalEvent::new("Feast", EventDate::yearly(0, 15)));
    warm.insert(CalEvent::on("Storm", CalDate::new(2024, 0, 3)));
    warm.remove(festival_id);
    warm.insert(CalEvent::on("Thaw", CalDate::new(2024, 0, 28)).until(CalDate::new(2024, 1, 2)));

    let mut fresh = EventCache::new();
    for event in warm.store().iter().cloned().collect::<Vec<_>>() {
        fresh.insert(event);
    }
    for date in &dates {
        let a: Vec<String> = warm.events_on(&engine, *date).iter().map(|e| e.name.clone()).collect();
        let b: Vec<String> = fresh.events_on(&engine, *date).iter().map(|e| e.name.clone()).collect();
        assert_eq!(a, b, "{}", date);
    }
}

#[test]
fn test_session_replace_definition_rebuilds_caches() {
    let mut session = CalendarSession::new(presets::gregorian_calendar(), EngineConfig::default()).unwrap();
    let date = CalDate::new(2024, 5, 1);
    let before = session.season_on(date).map(|s| s.name.clone());
    assert_eq!(before.as_deref(), Some("Spring"));

    let mut data = session.calendar().static_data.clone();
    data.seasonal.seasons.retain(|s| s.id != "spring");
    session.replace_definition(data).unwrap();
    let after = session.season_on(date).map(|s| s.name.clone());
    assert_eq!(after.as_deref(), Some("Winter"));
}
