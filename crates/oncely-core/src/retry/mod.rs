//! Retry and backoff policy.
//!
//! This module encapsulates failure classification (include/exclude rules over
//! a catalog of failure kinds), exponential backoff with jitter, and the retry
//! loop itself, so that callers and the task arbiter share one consistent
//! policy.

mod catalog;
mod classify;
mod context;
mod error;
mod event;
mod fluent;
mod policy;
mod run;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{Ancestors, ErrorCatalog};
pub use classify::{Classification, ErrorClassifier};
pub use context::RetryContext;
pub use error::{ConfigError, Failure};
pub use event::{
    AttemptEvent, AttemptOutcome, LogListener, NoopListener, RetryEvent, RetryListener,
    TerminationEvent, TerminationReason,
};
pub use fluent::{CallSpec, RetrySpec, RunSpec};
pub use policy::{Backoff, RetryDecision, RetryPolicy};
pub use run::RetryExecutor;
