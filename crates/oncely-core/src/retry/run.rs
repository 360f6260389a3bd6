//! Retry loop: run an action until it succeeds or the policy says stop.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::context::RetryContext;
use super::error::Failure;
use super::event::{
    AttemptEvent, AttemptOutcome, RetryEvent, RetryListener, TerminationEvent, TerminationReason,
};
use super::policy::{RetryDecision, RetryPolicy};

type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// Runs actions under a [`RetryPolicy`], reporting each attempt to a listener.
///
/// Everything happens on the caller's thread: the action, the listener and
/// the backoff sleep. There is no cancellation; wrap the whole call if a
/// deadline is needed.
pub struct RetryExecutor {
    policy: RetryPolicy,
    listener: Arc<dyn RetryListener>,
    sleeper: Sleeper,
    rng: Mutex<StdRng>,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            listener: Arc::new(super::event::NoopListener),
            sleeper: Arc::new(std::thread::sleep),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn with_listener(mut self, listener: impl RetryListener + 'static) -> Self {
        self.listener = Arc::new(listener);
        self
    }

    /// Seed the jitter source so delays are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Replace the blocking wait between attempts (default: `std::thread::sleep`).
    pub fn with_sleeper(mut self, sleeper: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `action` until it succeeds, the policy is exhausted, or a
    /// non-retryable failure occurs. On failure the last error is returned as is.
    pub fn execute<T, E, F>(&self, name: &str, mut action: F) -> Result<T, E>
    where
        E: Failure,
        F: FnMut() -> Result<T, E>,
    {
        self.execute_with_context(name, |_| action())
    }

    /// Like [`execute`](Self::execute), but the action sees the attempt context.
    pub fn execute_with_context<T, E, F>(&self, name: &str, mut action: F) -> Result<T, E>
    where
        E: Failure,
        F: FnMut(&RetryContext<E>) -> Result<T, E>,
    {
        let span = tracing::debug_span!("retry", operation = name);
        let _enter = span.enter();

        let mut ctx = RetryContext::new(name, self.policy.max_attempts);
        loop {
            let failure = match action(&ctx) {
                Ok(value) => {
                    self.emit_attempt(&ctx, AttemptOutcome::Succeeded, None);
                    return Ok(value);
                }
                Err(failure) => failure,
            };

            let classification = self.policy.classifier.classify(&failure);
            self.emit_attempt(&ctx, AttemptOutcome::Failed, Some(&failure));

            let decision = {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                self.policy.decide(ctx.attempt(), classification, &mut *rng)
            };
            match decision {
                RetryDecision::NoRetry(reason) => {
                    self.emit_termination(&ctx, reason, &failure);
                    return Err(failure);
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::debug!(
                        attempt = ctx.attempt(),
                        kind = failure.kind(),
                        delay_ms = delay.as_millis() as u64,
                        "retrying after backoff"
                    );
                    ctx.record_failure(failure);
                    (self.sleeper)(delay);
                    ctx.advance();
                }
            }
        }
    }

    /// Run `action` like [`execute`](Self::execute); a terminal failure is
    /// handed to `recover` instead of being returned. `recover` is not retried.
    pub fn fallback<T, E, F, R>(&self, name: &str, action: F, recover: R) -> T
    where
        E: Failure,
        F: FnMut() -> Result<T, E>,
        R: FnOnce(E) -> T,
    {
        match self.execute(name, action) {
            Ok(value) => value,
            Err(failure) => {
                tracing::debug!(operation = name, "invoking fallback");
                recover(failure)
            }
        }
    }

    fn emit_attempt<E: Failure>(
        &self,
        ctx: &RetryContext<E>,
        outcome: AttemptOutcome,
        failure: Option<&E>,
    ) {
        self.listener.on_event(&RetryEvent::Attempt(AttemptEvent {
            name: ctx.name().to_owned(),
            attempt: ctx.attempt(),
            max_attempts: ctx.max_attempts(),
            outcome,
            failure: failure.map(ToString::to_string),
            failure_kind: failure.map(|f| f.kind().to_owned()),
        }));
    }

    fn emit_termination<E: Failure>(
        &self,
        ctx: &RetryContext<E>,
        reason: TerminationReason,
        failure: &E,
    ) {
        self.listener.on_event(&RetryEvent::Termination(TerminationEvent {
            name: ctx.name().to_owned(),
            attempt: ctx.attempt(),
            max_attempts: ctx.max_attempts(),
            reason,
            failure: failure.to_string(),
            failure_kind: failure.kind().to_owned(),
        }));
    }
}
