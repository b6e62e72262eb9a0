//! Tests for event sinks

use prometheus_control_flow::core::{
    EventKind, EventSink, InMemoryEventSink, PolicyKind, ScheduleEvent,
};
use uuid::Uuid;

fn event(run_id: Uuid, index: usize, kind: EventKind) -> ScheduleEvent {
    ScheduleEvent::now(run_id, PolicyKind::Batch, index, kind)
}

#[test]
fn test_in_memory_event_sink() {
    let sink = InMemoryEventSink::new(10);
    let run = Uuid::new_v4();

    sink.record(event(run, 4, EventKind::Dispatched));
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].run_id, run);
    assert_eq!(events[0].index, 4);
    assert_eq!(events[0].kind, EventKind::Dispatched);
    assert_eq!(events[0].policy, PolicyKind::Batch);
    assert!(events[0].at_ms > 0);
}

#[test]
fn test_event_sink_overflow() {
    let sink = InMemoryEventSink::new(2);
    let run = Uuid::new_v4();

    sink.record(event(run, 1, EventKind::Dispatched));
    sink.record(event(run, 2, EventKind::Dispatched));
    sink.record(event(run, 3, EventKind::Dispatched));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].index, 2); // First one popped
    assert_eq!(events[1].index, 3);
}

#[test]
fn test_events_for_filters_by_run() {
    let sink = InMemoryEventSink::new(10);
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    sink.record(event(first, 0, EventKind::Dispatched));
    sink.record(event(second, 0, EventKind::Dispatched));
    sink.record(event(first, 0, EventKind::Completed));

    let events = sink.events_for(first);
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].kind, EventKind::Completed);
}

#[test]
fn test_event_serializes_snake_case() {
    let json = serde_json::to_value(event(Uuid::nil(), 0, EventKind::Failed)).unwrap();
    assert_eq!(json["kind"], "failed");
    assert_eq!(json["policy"], "batch");
}
