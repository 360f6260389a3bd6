//! Helpers shared by unit tests.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::catalog::ErrorCatalog;
use super::classify::ErrorClassifier;
use super::error::Failure;
use super::event::RetryEvent;
use super::policy::{Backoff, RetryPolicy};
use super::run::RetryExecutor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TestError {
    pub kind: &'static str,
    pub message: String,
}

impl TestError {
    pub fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new("runtime", message)
    }

    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::new("illegal_argument", message)
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl Failure for TestError {
    fn kind(&self) -> &str {
        self.kind
    }
}

pub(crate) fn catalog() -> ErrorCatalog {
    ErrorCatalog::new()
        .declare("runtime", None)
        .declare("illegal_argument", Some("runtime"))
        .declare("conflict", Some("runtime"))
}

/// Executor retrying `runtime` but not `illegal_argument`, with no real sleeping.
pub(crate) fn executor(max_attempts: u32) -> (RetryExecutor, Recorded) {
    let classifier = ErrorClassifier::new(catalog(), ["runtime"], ["illegal_argument"])
        .expect("test catalog resolves");
    let backoff = Backoff {
        initial: Duration::from_millis(50),
        multiplier: 2.0,
        max: Duration::from_millis(1000),
        jitter: Duration::from_millis(10),
    };
    let policy = RetryPolicy::new(max_attempts, backoff, classifier).expect("valid policy");
    let recorded = Recorded::default();
    let events = recorded.events.clone();
    let sleeps = recorded.sleeps.clone();
    let exec = RetryExecutor::new(policy)
        .with_seed(99)
        .with_listener(move |e: &RetryEvent| events.lock().unwrap().push(e.clone()))
        .with_sleeper(move |d| sleeps.lock().unwrap().push(d));
    (exec, recorded)
}

#[derive(Clone, Default)]
pub(crate) struct Recorded {
    pub events: Arc<Mutex<Vec<RetryEvent>>>,
    pub sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl Recorded {
    pub fn events(&self) -> Vec<RetryEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn rendered(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}
