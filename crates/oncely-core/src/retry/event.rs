//! Events emitted by the retry executor, and listeners that receive them.
//!
//! One [`AttemptEvent`] is emitted per invocation of the action. When a run
//! ends without success, a single [`TerminationEvent`] follows the last
//! attempt event. Listeners run synchronously on the caller's thread and
//! cannot influence the run.

use std::fmt;

/// Result of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Failed,
    Succeeded,
}

/// Why a run stopped without success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Attempts ran out while failures stayed retryable.
    Exhausted,
    /// A non-retryable failure ended the run.
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptEvent {
    pub name: String,
    pub attempt: u32,
    pub max_attempts: u32,
    pub outcome: AttemptOutcome,
    /// Rendered failure, set when the attempt failed.
    pub failure: Option<String>,
    pub failure_kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationEvent {
    pub name: String,
    pub attempt: u32,
    pub max_attempts: u32,
    pub reason: TerminationReason,
    pub failure: String,
    pub failure_kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryEvent {
    Attempt(AttemptEvent),
    Termination(TerminationEvent),
}

impl RetryEvent {
    pub fn name(&self) -> &str {
        match self {
            RetryEvent::Attempt(e) => &e.name,
            RetryEvent::Termination(e) => &e.name,
        }
    }

    pub fn attempt(&self) -> u32 {
        match self {
            RetryEvent::Attempt(e) => e.attempt,
            RetryEvent::Termination(e) => e.attempt,
        }
    }

    pub fn is_termination(&self) -> bool {
        matches!(self, RetryEvent::Termination(_))
    }
}

impl fmt::Display for RetryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryEvent::Attempt(e) => match e.outcome {
                AttemptOutcome::Failed => write!(
                    f,
                    "Try attempt {}/{} failed. Last exception: {} -- {}",
                    e.attempt,
                    e.max_attempts,
                    e.failure.as_deref().unwrap_or("unknown"),
                    e.name
                ),
                AttemptOutcome::Succeeded => write!(
                    f,
                    "Try attempt {}/{} succeeded. -- {}",
                    e.attempt, e.max_attempts, e.name
                ),
            },
            RetryEvent::Termination(e) => match e.reason {
                TerminationReason::Exhausted => write!(
                    f,
                    "Retry policy exhausted after {}/{} max attempts failed. Last exception: {} -- {}",
                    e.attempt, e.max_attempts, e.failure, e.name
                ),
                TerminationReason::Terminated => write!(
                    f,
                    "Retry policy terminated after {}/{} attempts failed. Non-retryable exception encountered: {} -- {}",
                    e.attempt, e.max_attempts, e.failure, e.name
                ),
            },
        }
    }
}

/// Receives retry events.
pub trait RetryListener: Send + Sync {
    fn on_event(&self, event: &RetryEvent);
}

impl<F> RetryListener for F
where
    F: Fn(&RetryEvent) + Send + Sync,
{
    fn on_event(&self, event: &RetryEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl RetryListener for NoopListener {
    fn on_event(&self, _event: &RetryEvent) {}
}

/// Writes each event to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogListener;

impl RetryListener for LogListener {
    fn on_event(&self, event: &RetryEvent) {
        tracing::info!(operation = event.name(), attempt = event.attempt(), "{}", event);
    }
}
