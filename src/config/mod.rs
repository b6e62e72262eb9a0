//! Configuration models for choosing a policy.

pub mod policy;

pub use policy::{PolicyConfig, CONCURRENCY_ENV, POLICY_ENV};
