//! Schedule event sinks.
//!
//! Every scheduling call can report when it dispatches a callback and when it
//! observes that callback's outcome. Events of one call share a `run_id`.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::core::PolicyKind;
use crate::util::clock::now_ms;

/// What happened to a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The callback was handed to the runtime (or invoked inline, for serial runs).
    Dispatched,
    /// The scheduler observed a successful outcome.
    Completed,
    /// The scheduler observed a failed outcome.
    Failed,
}

/// A single dispatch or completion observed by the scheduler.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScheduleEvent {
    /// Identifier shared by all events of one scheduling call.
    pub run_id: Uuid,
    /// Policy the call ran under.
    pub policy: PolicyKind,
    /// Position of the callback in the input list.
    pub index: usize,
    /// What happened.
    pub kind: EventKind,
    /// Timestamp in milliseconds since epoch.
    pub at_ms: u128,
}

impl ScheduleEvent {
    /// Build an event stamped with the current time.
    pub fn now(run_id: Uuid, policy: PolicyKind, index: usize, kind: EventKind) -> Self {
        Self {
            run_id,
            policy,
            index,
            kind,
            at_ms: now_ms(),
        }
    }
}

/// Event sink abstraction.
///
/// Sinks are called from the scheduler's coordination loop, so `record` must be cheap.
pub trait EventSink: Send + Sync {
    /// Record a schedule event.
    fn record(&self, event: ScheduleEvent);
}

/// In-memory event sink for testing and dev.
///
/// Clones share the same buffer, so a test can keep one handle and give another
/// to the scheduler.
#[derive(Clone)]
pub struct InMemoryEventSink {
    events: Arc<Mutex<VecDeque<ScheduleEvent>>>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events, oldest first.
    pub fn events(&self) -> Vec<ScheduleEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Retrieve the events of one scheduling call, oldest first.
    pub fn events_for(&self, run_id: Uuid) -> Vec<ScheduleEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.run_id == run_id)
            .cloned()
            .collect()
    }

    /// Drop all stored events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&self, event: ScheduleEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Highest number of callbacks in flight at once, replayed from an event sequence.
///
/// A callback counts as in flight from its `Dispatched` event until its `Completed`
/// or `Failed` event.
pub fn peak_in_flight(events: &[ScheduleEvent]) -> usize {
    let mut current = 0usize;
    let mut peak = 0usize;
    for event in events {
        match event.kind {
            EventKind::Dispatched => {
                current += 1;
                peak = peak.max(current);
            }
            EventKind::Completed | EventKind::Failed => current = current.saturating_sub(1),
        }
    }
    peak
}

/// Indices in the order they were dispatched.
pub fn dispatch_order(events: &[ScheduleEvent]) -> Vec<usize> {
    events
        .iter()
        .filter(|e| e.kind == EventKind::Dispatched)
        .map(|e| e.index)
        .collect()
}
