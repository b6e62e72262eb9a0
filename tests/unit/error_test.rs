//! Tests for error types

use prometheus_control_flow::core::ScheduleError;

#[test]
fn test_task_error() {
    let err: ScheduleError<String> = ScheduleError::Task {
        index: 3,
        error: "connection reset".to_string(),
    };
    assert_eq!(format!("{}", err), "task 3 failed: connection reset");
    assert_eq!(err.task_error().map(String::as_str), Some("connection reset"));
}

#[test]
fn test_invalid_configuration_error() {
    let err: ScheduleError<String> = ScheduleError::InvalidConfiguration("bad".to_string());
    assert_eq!(format!("{}", err), "invalid configuration: bad");
    assert_eq!(err.into_task_error(), None);
}

#[test]
fn test_task_panicked_error() {
    let err: ScheduleError<String> = ScheduleError::TaskPanicked { index: 7 };
    assert_eq!(
        format!("{}", err),
        "task 7 panicked or was dropped before completing"
    );
    assert_eq!(err.index(), Some(7));
}

#[test]
fn test_task_error_carries_callback_error_unchanged() {
    #[derive(Debug, PartialEq)]
    struct Io(i32);

    let err = ScheduleError::Task {
        index: 0,
        error: Io(-2),
    };
    assert_eq!(err.into_task_error(), Some(Io(-2)));
}
