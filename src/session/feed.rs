//! Channel boundary to the note-scanning worker
//!
//! Requests to scan a note go out on a bounded queue; a full queue drops
//! the request with a warning since asking for the same note again is
//! harmless. Event changes come back on an unbounded queue in whatever
//! order the worker produces them and are applied to the session on the
//! caller's thread.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::cache::events::CalEvent;
use crate::core::config::EngineConfig;
use crate::core::types::EventId;
use crate::session::CalendarSession;

/// Ask the worker to (re)scan one note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub path: String,
}

/// One change to the event store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventDelta {
    Upsert(CalEvent),
    Remove(EventId),
    /// Every event read from the note at this path is gone
    RemoveNote(String),
}

/// Sending half of the scan request queue
#[derive(Debug, Clone)]
pub struct ScanQueue {
    tx: mpsc::Sender<ScanRequest>,
}

impl ScanQueue {
    /// Queue a scan of `path`; returns false if the request was dropped
    pub fn request(&self, path: impl Into<String>) -> bool {
        match self.tx.try_send(ScanRequest { path: path.into() }) {
            Ok(()) => true,
            Err(TrySendError::Full(request)) => {
                tracing::warn!(path = %request.path, "scan queue full, dropping request");
                false
            }
            Err(TrySendError::Closed(request)) => {
                tracing::warn!(path = %request.path, "scan worker has stopped, dropping request");
                false
            }
        }
    }
}

/// Worker-side handle for reporting event changes
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<EventDelta>,
}

impl EventSink {
    /// Returns false once the inbox has been dropped
    pub fn send(&self, delta: EventDelta) -> bool {
        self.tx.send(delta).is_ok()
    }
}

/// Session-side receiver of event changes
#[derive(Debug)]
pub struct EventInbox {
    rx: mpsc::UnboundedReceiver<EventDelta>,
}

impl EventInbox {
    /// Apply every delta already waiting; returns how many were applied
    pub fn drain_into(&mut self, session: &mut CalendarSession) -> usize {
        let mut applied = 0;
        while let Ok(delta) = self.rx.try_recv() {
            session.apply_delta(delta);
            applied += 1;
        }
        if applied > 0 {
            tracing::debug!(applied, "applied event deltas");
        }
        applied
    }

    /// Wait for the next delta; `None` once every sink is dropped
    pub async fn recv(&mut self) -> Option<EventDelta> {
        self.rx.recv().await
    }
}

/// The worker's ends of both queues
#[derive(Debug)]
pub struct WorkerEnd {
    pub requests: mpsc::Receiver<ScanRequest>,
    pub events: EventSink,
}

/// Create both queues, sized from `config`
pub fn channel(config: &EngineConfig) -> (ScanQueue, EventInbox, WorkerEnd) {
    let (request_tx, request_rx) = mpsc::channel(config.scan_queue_capacity.max(1));
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (
        ScanQueue { tx: request_tx },
        EventInbox { rx: event_rx },
        WorkerEnd {
            requests: request_rx,
            events: EventSink { tx: event_tx },
        },
    )
}
