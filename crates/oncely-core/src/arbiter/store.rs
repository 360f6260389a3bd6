//! The seam between the arbiter and an external completion store.

/// External state consulted by the arbiter.
///
/// The store owns persistence and concurrency control. `mark_intent` must fail
/// when the status it is given is stale (another caller marked first); the
/// caller's retry policy has to classify that failure as retryable so the
/// arbiter re-fetches and observes the completed state.
pub trait CompletionStore<E> {
    type Status;

    fn fetch_status(&mut self) -> Result<Self::Status, E>;

    /// True if `status` records the task as already done.
    fn is_done(&self, status: &Self::Status) -> bool;

    /// Record completion intent for the state observed as `status`.
    fn mark_intent(&mut self, status: &Self::Status) -> Result<(), E>;
}

/// [`CompletionStore`] built from three closures. See [`from_fns`].
pub struct FnStore<Fetch, Check, Mark> {
    fetch: Fetch,
    check: Check,
    mark: Mark,
}

/// Adapt fetch/check/mark closures into a [`CompletionStore`].
pub fn from_fns<S, E, Fetch, Check, Mark>(
    fetch: Fetch,
    check: Check,
    mark: Mark,
) -> FnStore<Fetch, Check, Mark>
where
    Fetch: FnMut() -> Result<S, E>,
    Check: Fn(&S) -> bool,
    Mark: FnMut(&S) -> Result<(), E>,
{
    FnStore { fetch, check, mark }
}

impl<S, E, Fetch, Check, Mark> CompletionStore<E> for FnStore<Fetch, Check, Mark>
where
    Fetch: FnMut() -> Result<S, E>,
    Check: Fn(&S) -> bool,
    Mark: FnMut(&S) -> Result<(), E>,
{
    type Status = S;

    fn fetch_status(&mut self) -> Result<S, E> {
        (self.fetch)()
    }

    fn is_done(&self, status: &S) -> bool {
        (self.check)(status)
    }

    fn mark_intent(&mut self, status: &S) -> Result<(), E> {
        (self.mark)(status)
    }
}

impl<E, T: CompletionStore<E> + ?Sized> CompletionStore<E> for &mut T {
    type Status = T::Status;

    fn fetch_status(&mut self) -> Result<Self::Status, E> {
        (**self).fetch_status()
    }

    fn is_done(&self, status: &Self::Status) -> bool {
        (**self).is_done(status)
    }

    fn mark_intent(&mut self, status: &Self::Status) -> Result<(), E> {
        (**self).mark_intent(status)
    }
}
