//! Runtime seam for dispatching callback futures.

use std::future::Future;

/// Abstraction for spawning task execution on a runtime.
///
/// The scheduler never drives dispatched callbacks itself; it hands each one to a
/// spawner and waits for the completion notice. Spawned futures must keep running
/// even if the scheduling call that dispatched them has already returned.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

impl<S: Spawn + ?Sized> Spawn for &S {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        (**self).spawn(fut);
    }
}
