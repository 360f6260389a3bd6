//! Staged builder over [`RetryExecutor`].
//!
//! ```text
//! executor.named("op") ─┐
//!                       ├─► RetrySpec ─┬─ call(action) ─► CallSpec ─► execute() | fallback(f)
//! executor.anonymous() ─┘              └─ run(action)  ─► RunSpec  ─► execute() | fallback(f)
//! ```

use super::error::Failure;
use super::run::RetryExecutor;

impl RetryExecutor {
    /// Start a retry specification for a named operation.
    pub fn named(&self, name: impl Into<String>) -> RetrySpec<'_> {
        RetrySpec {
            executor: self,
            name: name.into(),
        }
    }

    /// Start a retry specification with a generated unique name.
    pub fn anonymous(&self) -> RetrySpec<'_> {
        self.named(uuid::Uuid::new_v4().to_string())
    }
}

/// A named operation waiting for its action.
#[derive(Clone)]
pub struct RetrySpec<'a> {
    executor: &'a RetryExecutor,
    name: String,
}

impl<'a> RetrySpec<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Retry an action that produces a value.
    pub fn call<R, E, F>(self, action: F) -> CallSpec<'a, F>
    where
        E: Failure,
        F: FnMut() -> Result<R, E>,
    {
        CallSpec {
            executor: self.executor,
            name: self.name,
            action,
        }
    }

    /// Retry an action run for its side effects.
    pub fn run<E, F>(self, action: F) -> RunSpec<'a, F>
    where
        E: Failure,
        F: FnMut() -> Result<(), E>,
    {
        RunSpec {
            executor: self.executor,
            name: self.name,
            action,
        }
    }
}

pub struct CallSpec<'a, F> {
    executor: &'a RetryExecutor,
    name: String,
    action: F,
}

impl<F> CallSpec<'_, F> {
    /// Run the action; on exhaustion or termination the last failure is returned.
    pub fn execute<R, E>(self) -> Result<R, E>
    where
        E: Failure,
        F: FnMut() -> Result<R, E>,
    {
        self.executor.execute(&self.name, self.action)
    }

    /// Run the action; on exhaustion or termination `recover` supplies the value.
    pub fn fallback<R, E, G>(self, recover: G) -> R
    where
        E: Failure,
        F: FnMut() -> Result<R, E>,
        G: FnOnce(E) -> R,
    {
        self.executor.fallback(&self.name, self.action, recover)
    }
}

pub struct RunSpec<'a, F> {
    executor: &'a RetryExecutor,
    name: String,
    action: F,
}

impl<F> RunSpec<'_, F> {
    pub fn execute<E>(self) -> Result<(), E>
    where
        E: Failure,
        F: FnMut() -> Result<(), E>,
    {
        self.executor.execute(&self.name, self.action)
    }

    /// Run the action; on exhaustion or termination the failure goes to `recover`.
    pub fn fallback<E, G>(self, recover: G)
    where
        E: Failure,
        F: FnMut() -> Result<(), E>,
        G: FnOnce(E),
    {
        self.executor.fallback(&self.name, self.action, recover)
    }
}
