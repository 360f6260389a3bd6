//! At-most-once task execution against externally persisted state.
//!
//! The arbiter runs a check-then-mark step under the caller's retry policy:
//!
//! 1. fetch the current status from the store;
//! 2. if the status says the task is done, stop;
//! 3. otherwise mark completion intent; a failed mark (typically an
//!    optimistic-concurrency conflict) is classified and retried like any
//!    other failure, re-fetching the status on the next attempt.
//!
//! Only after a successful mark does the protected task run, once. The store
//! is the source of truth, so the guarantee holds across process restarts.
//! The arbiter keeps no state of its own between calls.

mod store;


pub use store::{from_fns, CompletionStore, FnStore};

use crate::retry::{Failure, RetrySpec};

/// Outcome of the check-then-mark step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbiterState<S> {
    pub already_done: bool,
    /// Status as fetched, before any mark.
    pub current_status: S,
}

/// Result of [`call`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult<T, S> {
    /// Output of the task; `None` when the task had already been done.
    pub result: Option<T>,
    pub status: S,
}

impl<T, S> TaskResult<T, S> {
    pub fn executed(&self) -> bool {
        self.result.is_some()
    }
}

/// Run `task` unless `store` reports it done, returning its output.
///
/// Check-then-mark is retried under `retry`. Once intent is marked the task
/// runs exactly once; if it fails, the failure is returned without retry and
/// the mark stays in place.
pub fn call<T, E, St, F>(
    retry: RetrySpec<'_>,
    mut store: St,
    task: F,
) -> Result<TaskResult<T, St::Status>, E>
where
    E: Failure,
    St: CompletionStore<E>,
    F: FnOnce() -> Result<T, E>,
{
    let name = retry.name().to_owned();
    let state = retry.call(|| check_and_mark::<E, _>(&mut store)).execute()?;
    if state.already_done {
        tracing::debug!(operation = %name, "task already done, skipping");
        return Ok(TaskResult {
            result: None,
            status: state.current_status,
        });
    }

    tracing::debug!(operation = %name, "intent marked, running task");
    let result = task()?;
    Ok(TaskResult {
        result: Some(result),
        status: state.current_status,
    })
}

/// Side-effecting variant of [`call`]. Returns the status observed by the check.
pub fn run<E, St, F>(retry: RetrySpec<'_>, store: St, task: F) -> Result<St::Status, E>
where
    E: Failure,
    St: CompletionStore<E>,
    F: FnOnce() -> Result<(), E>,
{
    call(retry, store, task).map(|outcome| outcome.status)
}

fn check_and_mark<E, St>(store: &mut St) -> Result<ArbiterState<St::Status>, E>
where
    St: CompletionStore<E>,
{
    let status = store.fetch_status()?;
    if store.is_done(&status) {
        return Ok(ArbiterState {
            already_done: true,
            current_status: status,
        });
    }
    store.mark_intent(&status)?;
    Ok(ArbiterState {
        already_done: false,
        current_status: status,
    })
}
