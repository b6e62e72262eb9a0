//! # Prometheus Control Flow
//!
//! Ordered scheduling of asynchronous callbacks under interchangeable concurrency policies.
//!
//! A caller hands the scheduler a fixed list of zero-argument async operations ("callbacks")
//! and gets back their results in the original order, whatever order they actually finished in.
//! Four policies share the same input/output contract so they can be swapped without touching
//! call sites:
//!
//! - **Serial**: one callback at a time, fail-fast.
//! - **All at once**: every callback dispatched immediately, no throttling.
//! - **Batch concurrency**: fixed-size waves separated by a full barrier.
//! - **Continuous concurrency**: a sliding window of bounded size that refills a slot the
//!   instant any callback in it finishes. This is the policy to reach for when the work is
//!   bounded by a scarce resource (file descriptors, outbound connections, GPU slots) and
//!   latencies are uneven.
//!
//! ## Continuous Concurrency
//!
//! ```rust,ignore
//! use prometheus_control_flow::core::Scheduler;
//! use prometheus_control_flow::runtime::TokioSpawner;
//!
//! let scheduler = Scheduler::new(TokioSpawner::current());
//!
//! let urls = vec!["https://a.example", "https://b.example", "https://c.example"];
//! let tasks: Vec<_> = urls
//!     .into_iter()
//!     .map(|url| move || async move { fetch(url).await })
//!     .collect();
//!
//! // At most 2 fetches in flight; bodies come back in `urls` order.
//! let bodies = scheduler.continuous_concurrency(tasks, 2).await?;
//! ```
//!
//! ## Choosing a Policy at Runtime
//!
//! ```rust,ignore
//! use prometheus_control_flow::config::PolicyConfig;
//!
//! let cfg = PolicyConfig::from_json_str(r#"{ "policy": "batch", "concurrency": 8 }"#)?;
//! let results = scheduler.run(cfg.to_policy()?, tasks).await?;
//! ```
//!
//! Failures are fail-fast for every policy: the first failing callback's own error is returned
//! inside [`crate::core::ScheduleError::Task`]. Callbacks already running are not cancelled. When every
//! outcome is wanted, use [`crate::core::Scheduler::continuous_concurrency_settled`].
//!
//! For complete examples, see:
//! - `tests/scheduler_test.rs` - Policy-level integration tests
//! - `tests/continuous_window_test.rs` - Sliding window properties

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: callbacks, policies and the scheduler.
pub mod core;
/// Configuration models for choosing a policy.
pub mod config;
/// Runtime adapters used to dispatch callbacks.
pub mod runtime;
/// Simulated callbacks with configurable latency for tests and benchmarks.
#[cfg(feature = "tokio-runtime")]
pub mod sim;
/// Shared utilities.
pub mod util;
