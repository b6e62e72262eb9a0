//! The scheduler: four interchangeable strategies over one callback-list contract.
//!
//! Every strategy takes the callbacks in order and resolves to their values in the
//! same order, whatever order they finished in. Only the dispatch policy differs.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PolicyConfig;
use crate::core::window::{self, FailureMode};
use crate::core::{
    Callback, EventKind, EventSink, Policy, PolicyKind, ScheduleError, ScheduleEvent,
    ScheduleResult, Spawn,
};

/// Per-call context: run identifier, policy and event sink.
pub(crate) struct RunContext {
    pub(crate) id: Uuid,
    pub(crate) policy: PolicyKind,
    events: Option<Arc<dyn EventSink>>,
}

impl RunContext {
    fn new(policy: PolicyKind, events: Option<Arc<dyn EventSink>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            policy,
            events,
        }
    }

    pub(crate) fn emit(&self, index: usize, kind: EventKind) {
        if let Some(sink) = &self.events {
            sink.record(ScheduleEvent::now(self.id, self.policy, index, kind));
        }
    }
}

/// Ordered callback scheduler.
///
/// The scheduler holds no per-call state; one instance can serve any number of
/// concurrent calls. Parallel policies hand callbacks to the spawner, so they run
/// on the runtime's worker threads rather than on the caller's future.
///
/// # Example
///
/// ```rust,ignore
/// use prometheus_control_flow::core::Scheduler;
/// use prometheus_control_flow::runtime::TokioSpawner;
///
/// let scheduler = Scheduler::new(TokioSpawner::current());
/// let tasks: Vec<_> = (1..=5u32).map(|n| move || async move { Ok::<_, String>(n * 10) }).collect();
/// let values = scheduler.continuous_concurrency(tasks, 2).await?;
/// assert_eq!(values, vec![10, 20, 30, 40, 50]);
/// ```
pub struct Scheduler<S> {
    spawner: S,
    events: Option<Arc<dyn EventSink>>,
}

impl<S> Scheduler<S> {
    /// Create a scheduler dispatching through `spawner`.
    pub const fn new(spawner: S) -> Self {
        Self {
            spawner,
            events: None,
        }
    }

    /// Attach an event sink that observes every dispatch and completion.
    #[must_use]
    pub fn with_events(mut self, sink: impl EventSink + 'static) -> Self {
        self.events = Some(Arc::new(sink));
        self
    }

    /// The spawner callbacks are dispatched through.
    pub const fn spawner(&self) -> &S {
        &self.spawner
    }

    fn context(&self, policy: PolicyKind) -> RunContext {
        RunContext::new(policy, self.events.clone())
    }
}

fn check_concurrency<E>(policy: PolicyKind, concurrency: usize) -> Result<(), ScheduleError<E>> {
    if concurrency == 0 {
        return Err(ScheduleError::InvalidConfiguration(format!(
            "{policy} concurrency must be greater than 0"
        )));
    }
    Ok(())
}

fn fail_fast_values<T, E>(
    outcomes: Vec<Result<T, E>>,
    offset: usize,
) -> Result<Vec<T>, ScheduleError<E>> {
    outcomes
        .into_iter()
        .enumerate()
        .map(|(i, outcome)| {
            outcome.map_err(|error| ScheduleError::Task {
                index: offset + i,
                error,
            })
        })
        .collect()
}

impl<S> Scheduler<S>
where
    S: Spawn + Sync,
{
    /// Run callbacks strictly one after another.
    ///
    /// Callback `n` is invoked only after callback `n - 1` completed. The first
    /// failure is returned immediately and no later callback is invoked.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::Task`] carrying the first failing callback's error.
    pub async fn serial<C, T, E>(&self, tasks: Vec<C>) -> ScheduleResult<T, E>
    where
        C: Callback<T, E>,
        T: Send + 'static,
        E: Send + 'static,
    {
        let run = self.context(PolicyKind::Serial);
        let total = tasks.len();
        info!(run = %run.id, policy = %run.policy, tasks = total, "schedule started");

        let mut results = Vec::with_capacity(total);
        for (index, callback) in tasks.into_iter().enumerate() {
            run.emit(index, EventKind::Dispatched);
            debug!(run = %run.id, index, "invoking task");
            match callback.invoke().await {
                Ok(value) => {
                    run.emit(index, EventKind::Completed);
                    results.push(value);
                }
                Err(error) => {
                    run.emit(index, EventKind::Failed);
                    warn!(run = %run.id, index, skipped = total - index - 1, "task failed");
                    return Err(ScheduleError::Task { index, error });
                }
            }
        }

        info!(run = %run.id, policy = %run.policy, "schedule finished");
        Ok(results)
    }

    /// Dispatch every callback immediately.
    ///
    /// Suitable when the number of callbacks and their resource cost are both small.
    /// On failure the first failure observed is returned; callbacks already running
    /// are not cancelled and keep running in the background.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::Task`] for the first failure observed, or
    /// [`ScheduleError::TaskPanicked`] if a callback unwound.
    pub async fn all_at_once<C, T, E>(&self, tasks: Vec<C>) -> ScheduleResult<T, E>
    where
        C: Callback<T, E>,
        T: Send + 'static,
        E: Send + 'static,
    {
        let run = self.context(PolicyKind::AllAtOnce);
        let total = tasks.len();
        info!(run = %run.id, policy = %run.policy, tasks = total, "schedule started");

        // A window as wide as the list primes every callback up front.
        let outcomes = window::drive::<S, C, T, E>(
            &self.spawner,
            &run,
            tasks,
            0,
            total.max(1),
            FailureMode::FailFast,
        )
        .await?;

        info!(run = %run.id, policy = %run.policy, "schedule finished");
        fail_fast_values(outcomes, 0)
    }

    /// Run consecutive batches of `concurrency` callbacks.
    ///
    /// Batch `i + 1` is dispatched only after every callback of batch `i` completed,
    /// even if some slots freed up earlier. The final batch may be smaller. A failure
    /// inside a batch is returned before the next batch starts.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::InvalidConfiguration`] if `concurrency` is zero, before
    /// anything is dispatched; otherwise as [`Scheduler::all_at_once`], per batch.
    pub async fn batch_concurrency<C, T, E>(
        &self,
        tasks: Vec<C>,
        concurrency: usize,
    ) -> ScheduleResult<T, E>
    where
        C: Callback<T, E>,
        T: Send + 'static,
        E: Send + 'static,
    {
        check_concurrency::<E>(PolicyKind::Batch, concurrency)?;

        let run = self.context(PolicyKind::Batch);
        let total = tasks.len();
        info!(run = %run.id, policy = %run.policy, tasks = total, concurrency, "schedule started");

        let mut results = Vec::with_capacity(total);
        let mut remaining = tasks.into_iter();
        loop {
            let batch: Vec<C> = remaining.by_ref().take(concurrency).collect();
            if batch.is_empty() {
                break;
            }
            let offset = results.len();
            debug!(run = %run.id, offset, size = batch.len(), "starting batch");
            let outcomes = window::drive::<S, C, T, E>(
                &self.spawner,
                &run,
                batch,
                offset,
                concurrency,
                FailureMode::FailFast,
            )
            .await?;
            results.extend(fail_fast_values::<T, E>(outcomes, offset)?);
        }

        info!(run = %run.id, policy = %run.policy, "schedule finished");
        Ok(results)
    }

    /// Keep up to `concurrency` callbacks in flight, refilling a slot the moment any
    /// of them completes.
    ///
    /// The first `min(concurrency, n)` callbacks are dispatched together; after that
    /// each completion dispatches the next not-yet-started callback. Values are
    /// stored at the index captured at dispatch, so the result is in input order.
    ///
    /// Fail-fast: the first failure ends the call and nothing further is dispatched.
    /// Callbacks already in flight keep running in the background.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::InvalidConfiguration`] if `concurrency` is zero, before
    /// anything is dispatched; [`ScheduleError::Task`] for the first failure;
    /// [`ScheduleError::TaskPanicked`] if a callback unwound.
    pub async fn continuous_concurrency<C, T, E>(
        &self,
        tasks: Vec<C>,
        concurrency: usize,
    ) -> ScheduleResult<T, E>
    where
        C: Callback<T, E>,
        T: Send + 'static,
        E: Send + 'static,
    {
        let outcomes = self
            .continuous(tasks, concurrency, FailureMode::FailFast)
            .await?;
        fail_fast_values(outcomes, 0)
    }

    /// Same sliding window as [`Scheduler::continuous_concurrency`], but a failure
    /// does not stop the run: every callback is dispatched and every outcome is
    /// returned, in input order.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::InvalidConfiguration`] if `concurrency` is zero;
    /// [`ScheduleError::TaskPanicked`] if a callback unwound. Callback failures are
    /// reported in the returned outcomes, never as an error.
    pub async fn continuous_concurrency_settled<C, T, E>(
        &self,
        tasks: Vec<C>,
        concurrency: usize,
    ) -> Result<Vec<Result<T, E>>, ScheduleError<E>>
    where
        C: Callback<T, E>,
        T: Send + 'static,
        E: Send + 'static,
    {
        self.continuous(tasks, concurrency, FailureMode::Settle).await
    }

    async fn continuous<C, T, E>(
        &self,
        tasks: Vec<C>,
        concurrency: usize,
        mode: FailureMode,
    ) -> Result<Vec<Result<T, E>>, ScheduleError<E>>
    where
        C: Callback<T, E>,
        T: Send + 'static,
        E: Send + 'static,
    {
        check_concurrency::<E>(PolicyKind::Continuous, concurrency)?;

        let run = self.context(PolicyKind::Continuous);
        info!(
            run = %run.id,
            policy = %run.policy,
            tasks = tasks.len(),
            concurrency,
            ?mode,
            "schedule started"
        );

        let outcomes =
            window::drive::<S, C, T, E>(&self.spawner, &run, tasks, 0, concurrency, mode).await?;

        info!(run = %run.id, policy = %run.policy, "schedule finished");
        Ok(outcomes)
    }

    /// Run callbacks under `policy`.
    ///
    /// Lets callers pick the policy at runtime without changing the call site.
    ///
    /// # Errors
    ///
    /// Whatever the selected strategy returns.
    pub async fn run<C, T, E>(&self, policy: Policy, tasks: Vec<C>) -> ScheduleResult<T, E>
    where
        C: Callback<T, E>,
        T: Send + 'static,
        E: Send + 'static,
    {
        match policy {
            Policy::Serial => self.serial(tasks).await,
            Policy::AllAtOnce => self.all_at_once(tasks).await,
            Policy::Batch { concurrency } => self.batch_concurrency(tasks, concurrency).await,
            Policy::Continuous { concurrency } => {
                self.continuous_concurrency(tasks, concurrency).await
            }
        }
    }

    /// Run callbacks under the policy described by `config`.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::InvalidConfiguration`] if `config` does not validate,
    /// before anything is dispatched; otherwise whatever the strategy returns.
    pub async fn run_configured<C, T, E>(
        &self,
        config: &PolicyConfig,
        tasks: Vec<C>,
    ) -> ScheduleResult<T, E>
    where
        C: Callback<T, E>,
        T: Send + 'static,
        E: Send + 'static,
    {
        let policy = config
            .to_policy()
            .map_err(ScheduleError::<E>::InvalidConfiguration)?;
        self.run(policy, tasks).await
    }
}
