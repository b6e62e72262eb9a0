//! Simulated callbacks for tests and benchmarks.
//!
//! A [`SimulatedTask`] sleeps for a configured latency and then yields a configured
//! outcome. Every task reports to a shared [`TaskProbe`], which tracks how many are
//! running at once and when each one started and finished.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::Callback;

/// Start and finish instants of one simulated task.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpan {
    /// Position of the task in its list.
    pub index: usize,
    /// When the task body began running.
    pub started: Instant,
    /// When the task body finished, if it has.
    pub finished: Option<Instant>,
}

impl TaskSpan {
    /// Whether this span overlaps `other` in time.
    pub fn overlaps(&self, other: &Self) -> bool {
        match (self.finished, other.finished) {
            (Some(a_end), Some(b_end)) => self.started < b_end && other.started < a_end,
            _ => true,
        }
    }
}

/// Shared observer for a set of simulated tasks.
#[derive(Debug, Default)]
pub struct TaskProbe {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    spans: Mutex<Vec<TaskSpan>>,
}

impl TaskProbe {
    /// Create a probe behind an `Arc`, ready to share between tasks.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn enter(&self, index: usize) {
        let now = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(now, Ordering::AcqRel);
        self.spans.lock().push(TaskSpan {
            index,
            started: Instant::now(),
            finished: None,
        });
    }

    fn exit(&self, index: usize) {
        if let Some(span) = self
            .spans
            .lock()
            .iter_mut()
            .find(|s| s.index == index && s.finished.is_none())
        {
            span.finished = Some(Instant::now());
        }
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }

    /// Tasks currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Most tasks ever running at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }

    /// Spans in the order the tasks started.
    pub fn spans(&self) -> Vec<TaskSpan> {
        self.spans.lock().clone()
    }

    /// Task indices in the order they started.
    pub fn start_order(&self) -> Vec<usize> {
        self.spans.lock().iter().map(|s| s.index).collect()
    }

    /// Number of times a task body started.
    pub fn started_count(&self) -> usize {
        self.spans.lock().len()
    }

    /// Whether the task at `index` ever started.
    pub fn was_started(&self, index: usize) -> bool {
        self.spans.lock().iter().any(|s| s.index == index)
    }
}

/// A callback that sleeps for `latency` and then yields `outcome`.
#[derive(Debug)]
pub struct SimulatedTask<T, E> {
    probe: Arc<TaskProbe>,
    index: usize,
    latency: Duration,
    outcome: Result<T, E>,
}

impl<T, E> SimulatedTask<T, E> {
    /// A task that succeeds with `value` after `latency`.
    pub fn succeed(probe: &Arc<TaskProbe>, index: usize, value: T, latency: Duration) -> Self {
        Self::with_outcome(probe, index, Ok(value), latency)
    }

    /// A task that fails with `error` after `latency`.
    pub fn fail(probe: &Arc<TaskProbe>, index: usize, error: E, latency: Duration) -> Self {
        Self::with_outcome(probe, index, Err(error), latency)
    }

    /// A task that yields `outcome` after `latency`.
    pub fn with_outcome(
        probe: &Arc<TaskProbe>,
        index: usize,
        outcome: Result<T, E>,
        latency: Duration,
    ) -> Self {
        Self {
            probe: Arc::clone(probe),
            index,
            latency,
            outcome,
        }
    }
}

#[async_trait]
impl<T, E> Callback<T, E> for SimulatedTask<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    async fn invoke(self) -> Result<T, E> {
        self.probe.enter(self.index);
        tokio::time::sleep(self.latency).await;
        self.probe.exit(self.index);
        self.outcome
    }
}

/// Build one simulated task per `(latency, outcome)` pair, indexed in order.
pub fn tasks<T, E, I>(probe: &Arc<TaskProbe>, specs: I) -> Vec<SimulatedTask<T, E>>
where
    I: IntoIterator<Item = (Duration, Result<T, E>)>,
{
    specs
        .into_iter()
        .enumerate()
        .map(|(index, (latency, outcome))| {
            SimulatedTask::with_outcome(probe, index, outcome, latency)
        })
        .collect()
}
