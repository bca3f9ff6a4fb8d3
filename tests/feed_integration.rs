//! Event feed integration tests

use fabled_calendar::cache::CalEvent;
use fabled_calendar::calendar::presets;
use fabled_calendar::core::config::EngineConfig;
use fabled_calendar::core::types::CalDate;
use fabled_calendar::session::feed::{channel, EventDelta};
use fabled_calendar::session::CalendarSession;

#[tokio::test]
async fn test_worker_round_trip() {
    let config = EngineConfig::default();
    let mut session = CalendarSession::new(presets::gregorian_calendar(), config.clone()).unwrap();
    let (queue, mut inbox, mut worker) = channel(&config);
    let date = CalDate::new(2024, 8, 9);

    // A stand-in worker: every scanned note yields one event on `date`
    let handle = tokio::spawn(async move {
        while let Some(request) = worker.requests.recv().await {
            let event = CalEvent::on(format!("from {}", request.path), date).with_note(request.path.clone());
            worker.events.send(EventDelta::Upsert(event));
        }
    });

    assert!(queue.request("notes/a.md"));
    assert!(queue.request("notes/b.md"));
    drop(queue);
    handle.await.unwrap();

    assert_eq!(inbox.drain_into(&mut session), 2);
    let mut names: Vec<String> = session.events_on(date).iter().map(|e| e.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["from notes/a.md", "from notes/b.md"]);

    session.apply_delta(EventDelta::RemoveNote("notes/a.md".into()));
    assert_eq!(session.events_on(date).len(), 1);
}

#[tokio::test]
async fn test_inbox_recv_then_apply() {
    let config = EngineConfig::default();
    let mut session = CalendarSession::new(presets::gregorian_calendar(), config.clone()).unwrap();
    let (_queue, mut inbox, worker) = channel(&config);
    let date = CalDate::new(2024, 1, 29);
    let event = CalEvent::on("Leap Festival", date);
    let id = event.id;

    worker.events.send(EventDelta::Upsert(event));
    worker.events.send(EventDelta::Remove(id));
    drop(worker);

    let mut applied = 0;
    while let Some(delta) = inbox.recv().await {
        session.apply_delta(delta);
        applied += 1;
    }
    assert_eq!(applied, 2);
    assert!(session.events_on(date).is_empty());
}
