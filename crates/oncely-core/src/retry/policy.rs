use std::time::Duration;

use rand::Rng;

use super::classify::{Classification, ErrorClassifier};
use super::error::ConfigError;
use super::event::TerminationReason;

/// Decision returned by the retry policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Stop; the run ends with the given reason.
    NoRetry(TerminationReason),
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff with a ceiling and additive jitter.
///
/// The delay after attempt `n` (1-based) is
/// `min(initial * multiplier^(n-1), max)` plus a uniform sample in `[0, jitter]`.
///
/// Jitter is added after the ceiling is applied, so the final delay may exceed
/// `max` by up to `jitter`. Callers that treat `max` as a hard bound must keep
/// `jitter` at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    /// Delay before the second attempt.
    pub initial: Duration,
    /// Growth factor per attempt (`>= 1.0`).
    pub multiplier: f64,
    /// Upper bound on the pre-jitter delay.
    pub max: Duration,
    /// Upper bound on the random amount added to each delay.
    pub jitter: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(100),
            multiplier: 2.0,
            max: Duration::from_millis(5000),
            jitter: Duration::ZERO,
        }
    }
}

impl Backoff {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial.is_zero() {
            return Err(invalid("initial_interval", "must be greater than zero"));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(invalid(
                "multiplier",
                format!("must be at least 1, got {}", self.multiplier),
            ));
        }
        if self.max < self.initial {
            return Err(invalid(
                "max_interval",
                format!(
                    "must not be below initial_interval ({}ms < {}ms)",
                    self.max.as_millis(),
                    self.initial.as_millis()
                ),
            ));
        }
        Ok(())
    }

    /// Delay after attempt `attempt` before jitter is added.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let nanos = self.initial.as_nanos() as f64 * self.multiplier.powi(exp);
        if !nanos.is_finite() || nanos < 0.0 || nanos >= self.max.as_nanos() as f64 {
            return self.max;
        }
        Duration::from_nanos(nanos.round() as u64)
    }

    /// Delay to wait after attempt `attempt` (1-based), jitter included.
    pub fn delay<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        let base = self.base_delay(attempt);
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return base;
        }
        base.saturating_add(Duration::from_millis(rng.random_range(0..=jitter_ms)))
    }
}

/// Attempt limit, backoff and classification rules for one retry executor.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub backoff: Backoff,
    pub classifier: ErrorClassifier,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::default(),
            classifier: ErrorClassifier::retry_all(),
        }
    }
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        backoff: Backoff,
        classifier: ErrorClassifier,
    ) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(invalid("max_attempts", "must be at least 1"));
        }
        backoff.validate()?;
        Ok(Self {
            max_attempts,
            backoff,
            classifier,
        })
    }

    /// Decide what follows a failed attempt.
    ///
    /// `attempt` is 1-based. A non-retryable failure terminates even on the
    /// last attempt; a retryable one on the last attempt exhausts the policy.
    pub fn decide<R: Rng>(
        &self,
        attempt: u32,
        classification: Classification,
        rng: &mut R,
    ) -> RetryDecision {
        match classification {
            Classification::NonRetryable => RetryDecision::NoRetry(TerminationReason::Terminated),
            Classification::Retryable if attempt >= self.max_attempts => {
                RetryDecision::NoRetry(TerminationReason::Exhausted)
            }
            Classification::Retryable => RetryDecision::RetryAfter(self.backoff.delay(attempt, rng)),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidSetting {
        field,
        reason: reason.into(),
    }
}
