//! Core scheduling abstractions: callbacks, policies and the scheduler.

pub mod callback;
pub mod error;
pub mod events;
pub mod policy;
pub mod scheduler;
pub mod spawn;
mod window;

pub use callback::{boxed, BoxCallback, BoxFuture, Callback};
pub use error::{ScheduleError, ScheduleResult};
pub use events::{
    dispatch_order, peak_in_flight, EventKind, EventSink, InMemoryEventSink, ScheduleEvent,
};
pub use policy::{Policy, PolicyKind, DEFAULT_CONCURRENCY};
pub(crate) use scheduler::RunContext;
pub use scheduler::Scheduler;
pub use spawn::Spawn;
