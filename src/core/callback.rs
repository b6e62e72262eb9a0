//! Callback abstraction: a deferred, zero-argument async operation.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

/// A single deferred unit of asynchronous work.
///
/// Invoking a callback consumes it, so the scheduler can start each one at most once.
/// Any `FnOnce() -> impl Future<Output = Result<T, E>>` that is `Send + 'static` is a
/// callback through the blanket implementation below.
///
/// # Example
///
/// ```rust,ignore
/// use prometheus_control_flow::core::Callback;
///
/// let read = || async { tokio::fs::read_to_string("./test.json").await };
/// let contents = read.invoke().await?;
/// ```
#[async_trait]
pub trait Callback<T, E>: Send + 'static
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Run the callback to its single outcome.
    async fn invoke(self) -> Result<T, E>;
}

#[async_trait]
impl<F, Fut, T, E> Callback<T, E> for F
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send + 'static,
    E: Send + 'static,
{
    async fn invoke(self) -> Result<T, E> {
        self().await
    }
}

/// Boxed future returned by a [`BoxCallback`].
pub type BoxFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// Type-erased callback, for lists mixing differently-typed closures.
pub type BoxCallback<T, E> = Box<dyn FnOnce() -> BoxFuture<T, E> + Send + 'static>;

/// Erase a closure into a [`BoxCallback`].
///
/// ```rust,ignore
/// let tasks = vec![
///     boxed(|| async { load_file("./test.json").await }),
///     boxed(|| async { load_site("https://example.com").await }),
/// ];
/// ```
pub fn boxed<F, Fut, T, E>(f: F) -> BoxCallback<T, E>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: 'static,
    E: 'static,
{
    Box::new(move || Box::pin(f()) as BoxFuture<T, E>)
}
