//! Sliding-window dispatch shared by the parallel policies.
//!
//! The coordination loop owns all run state. Dispatched callbacks never touch it;
//! each one reports back with a single [`Completion`] message carrying the index
//! captured when it was dispatched. Those messages are handled one at a time, so
//! the loop is the only critical section.

use flume::Sender;
use tracing::{debug, error, warn};

use crate::core::{Callback, EventKind, RunContext, ScheduleError, Spawn};

/// Outcome report sent from a dispatched callback to the coordination loop.
enum Completion<T, E> {
    /// The callback produced an outcome.
    Finished { index: usize, outcome: Result<T, E> },
    /// The callback's future panicked or was dropped before producing one.
    Lost { index: usize },
}

/// Delivers exactly one [`Completion`] per dispatched callback, even if its
/// future unwinds or is dropped unpolled.
struct CompletionGuard<T, E> {
    index: usize,
    tx: Option<Sender<Completion<T, E>>>,
}

impl<T, E> CompletionGuard<T, E> {
    fn new(index: usize, tx: Sender<Completion<T, E>>) -> Self {
        Self { index, tx: Some(tx) }
    }

    fn finish(mut self, outcome: Result<T, E>) {
        if let Some(tx) = self.tx.take() {
            // The receiver is gone once a fail-fast run has returned.
            let _ = tx.send(Completion::Finished {
                index: self.index,
                outcome,
            });
        }
    }
}

impl<T, E> Drop for CompletionGuard<T, E> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Completion::Lost { index: self.index });
        }
    }
}

/// What to do when a callback fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureMode {
    /// Stop dispatching and return the first failure.
    FailFast,
    /// Keep going and return every outcome.
    Settle,
}

/// Bookkeeping for one window run.
struct RunState<T, E> {
    /// Index of the next callback to dispatch.
    next: usize,
    /// Callbacks whose outcome has been observed.
    completed: usize,
    in_flight: usize,
    slots: Vec<Option<Result<T, E>>>,
}

impl<T, E> RunState<T, E> {
    fn new(total: usize) -> Self {
        Self {
            next: 0,
            completed: 0,
            in_flight: 0,
            slots: std::iter::repeat_with(|| None).take(total).collect(),
        }
    }

    fn total(&self) -> usize {
        self.slots.len()
    }

    fn has_pending(&self) -> bool {
        self.next < self.total()
    }

    fn is_done(&self) -> bool {
        self.completed == self.total()
    }

    fn into_outcomes(self, offset: usize) -> Result<Vec<Result<T, E>>, ScheduleError<E>> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| slot.ok_or(ScheduleError::TaskPanicked { index: offset + i }))
            .collect()
    }
}

/// Run `tasks` with at most `limit` in flight, refilling a slot on every completion.
///
/// `offset` is added to every index reported in events and errors, so batches can
/// report positions in the caller's full list. `limit` must already be validated
/// as non-zero.
pub(crate) async fn drive<S, C, T, E>(
    spawner: &S,
    run: &RunContext,
    tasks: Vec<C>,
    offset: usize,
    limit: usize,
    mode: FailureMode,
) -> Result<Vec<Result<T, E>>, ScheduleError<E>>
where
    S: Spawn,
    C: Callback<T, E>,
    T: Send + 'static,
    E: Send + 'static,
{
    let mut state = RunState::new(tasks.len());
    if state.is_done() {
        return Ok(Vec::new());
    }

    let (tx, rx) = flume::unbounded();
    let mut tx = Some(tx);
    let mut pending = tasks.into_iter();

    let prime = limit.min(state.total());
    for _ in 0..prime {
        dispatch(spawner, run, &mut state, &mut pending, &mut tx, offset);
    }

    while !state.is_done() {
        // Every guard reports before dropping its sender, so a disconnect can only
        // follow the final completion.
        let Ok(completion) = rx.recv_async().await else {
            break;
        };

        let (index, outcome) = match completion {
            Completion::Finished { index, outcome } => (index, outcome),
            Completion::Lost { index } => {
                error!(
                    run = %run.id,
                    index = offset + index,
                    "task panicked or was dropped before completing"
                );
                return Err(ScheduleError::TaskPanicked {
                    index: offset + index,
                });
            }
        };

        state.completed += 1;
        state.in_flight -= 1;

        let outcome = match (outcome, mode) {
            (Err(error), FailureMode::FailFast) => {
                run.emit(offset + index, EventKind::Failed);
                warn!(
                    run = %run.id,
                    index = offset + index,
                    in_flight = state.in_flight,
                    "task failed, abandoning remaining dispatch"
                );
                return Err(ScheduleError::Task {
                    index: offset + index,
                    error,
                });
            }
            (outcome, _) => outcome,
        };

        let kind = if outcome.is_ok() {
            EventKind::Completed
        } else {
            EventKind::Failed
        };
        run.emit(offset + index, kind);
        debug!(run = %run.id, index = offset + index, completed = state.completed, "task completed");
        state.slots[index] = Some(outcome);

        if state.has_pending() {
            dispatch(spawner, run, &mut state, &mut pending, &mut tx, offset);
        }
    }

    state.into_outcomes(offset)
}

fn dispatch<S, C, T, E>(
    spawner: &S,
    run: &RunContext,
    state: &mut RunState<T, E>,
    pending: &mut std::vec::IntoIter<C>,
    tx: &mut Option<Sender<Completion<T, E>>>,
    offset: usize,
) where
    S: Spawn,
    C: Callback<T, E>,
    T: Send + 'static,
    E: Send + 'static,
{
    let (Some(callback), Some(sender)) = (pending.next(), tx.as_ref()) else {
        return;
    };

    let index = state.next;
    state.next += 1;
    state.in_flight += 1;
    let guard = CompletionGuard::new(index, sender.clone());
    if !state.has_pending() {
        // Last dispatch: only the guards keep the channel open from here on.
        *tx = None;
    }

    run.emit(offset + index, EventKind::Dispatched);
    debug!(run = %run.id, index = offset + index, in_flight = state.in_flight, "dispatching task");

    spawner.spawn(async move {
        let outcome = callback.invoke().await;
        guard.finish(outcome);
    });
}
