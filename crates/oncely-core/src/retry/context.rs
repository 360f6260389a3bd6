//! Per-call attempt bookkeeping.

/// State of one `execute` call. Created when the call starts, dropped when it ends.
#[derive(Debug)]
pub struct RetryContext<E> {
    name: String,
    attempt: u32,
    max_attempts: u32,
    last_failure: Option<E>,
}

impl<E> RetryContext<E> {
    pub(crate) fn new(name: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            name: name.into(),
            attempt: 1,
            max_attempts,
            last_failure: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1-based number of the current (or last) attempt.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn last_failure(&self) -> Option<&E> {
        self.last_failure.as_ref()
    }

    pub(crate) fn record_failure(&mut self, failure: E) {
        self.last_failure = Some(failure);
    }

    pub(crate) fn advance(&mut self) {
        self.attempt += 1;
    }

    pub(crate) fn take_failure(&mut self) -> Option<E> {
        self.last_failure.take()
    }
}
