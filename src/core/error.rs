//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by a scheduling call.
///
/// `E` is the callbacks' own error type. It is carried unchanged so the caller
/// sees exactly what the failing callback produced.
#[derive(Debug, Error)]
pub enum ScheduleError<E> {
    /// A callback failed; the first failure observed ends the call.
    #[error("task {index} failed: {error}")]
    Task {
        /// Position of the failing callback in the input list.
        index: usize,
        /// The callback's own error.
        error: E,
    },
    /// The call was rejected before any callback was dispatched.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A dispatched callback panicked, or its future was dropped by the runtime,
    /// before producing an outcome.
    #[error("task {index} panicked or was dropped before completing")]
    TaskPanicked {
        /// Position of the lost callback in the input list.
        index: usize,
    },
}

impl<E> ScheduleError<E> {
    /// Index of the callback this error belongs to, if any.
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::Task { index, .. } | Self::TaskPanicked { index } => Some(*index),
            Self::InvalidConfiguration(_) => None,
        }
    }

    /// Borrow the callback's own error, if this is a task failure.
    pub const fn task_error(&self) -> Option<&E> {
        match self {
            Self::Task { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Consume the error and return the callback's own error, if this is a task failure.
    pub fn into_task_error(self) -> Option<E> {
        match self {
            Self::Task { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Result alias for scheduling calls that resolve to ordered values.
pub type ScheduleResult<T, E> = Result<Vec<T>, ScheduleError<E>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_display_includes_index_and_source() {
        let err: ScheduleError<String> = ScheduleError::Task {
            index: 1,
            error: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "task 1 failed: boom");
        assert_eq!(err.index(), Some(1));
        assert_eq!(err.into_task_error().as_deref(), Some("boom"));
    }

    #[test]
    fn test_invalid_configuration_has_no_index() {
        let err: ScheduleError<String> =
            ScheduleError::InvalidConfiguration("concurrency must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: concurrency must be greater than 0"
        );
        assert!(err.index().is_none());
        assert!(err.task_error().is_none());
    }
}
