// src/debounce.rs

// trailing-edge debouncer

// dependencies
use crate::config::PacerConfig;
use crate::errors::PacerError;
use crate::scheduler::Scheduler;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::trace;

/// Delays an operation until requests have been quiet for `delay`.
///
/// Every `call` cancels the pending timer, if any, and schedules a new one
/// carrying that call's arguments. Only the timer of the most recent request
/// can fire, so a burst of requests closer together than `delay` produces a
/// single call with the last request's arguments, `delay` after that request.
///
/// `A` is the argument value handed to the operation. Multi-argument
/// operations take a tuple; any calling context the operation needs is
/// captured by the closure or travels inside `A`.
///
/// The debouncer lives on one thread. Dropping it cancels its pending timer.
pub struct Debouncer<A, F, S>
where
    S: Scheduler,
{
    delay: Duration,
    scheduler: S,
    shared: Rc<DebounceState<F, S::Handle>>,
    _args: PhantomData<fn(A)>,
}

struct DebounceState<F, H> {
    operation: RefCell<F>,
    pending: RefCell<Option<H>>,
    // identifies the only scheduled callback allowed to fire
    generation: Cell<u64>,
}

impl<F, H> DebounceState<F, H> {
    fn fire<A>(&self, generation: u64, args: A)
    where
        F: FnMut(A),
    {
        if self.generation.get() != generation {
            trace!(generation, "stale debounce timer ignored");
            return;
        }

        // cleared before the call so a panicking operation leaves no ghost timer
        self.pending.borrow_mut().take();
        trace!(generation, "debounce fired");

        let mut operation = self.operation.borrow_mut();
        (&mut *operation)(args);
    }
}

impl<A, F, S> Debouncer<A, F, S>
where
    A: 'static,
    F: FnMut(A) + 'static,
    S: Scheduler,
    S::Handle: 'static,
{
    /// Create a debouncer that runs `operation` on `scheduler`.
    pub fn new(operation: F, delay: Duration, scheduler: S) -> Self {
        Self {
            delay,
            scheduler,
            shared: Rc::new(DebounceState {
                operation: RefCell::new(operation),
                pending: RefCell::new(None),
                generation: Cell::new(0),
            }),
            _args: PhantomData,
        }
    }

    /// Create a debouncer from a config object, rejecting negative delays.
    pub fn with_config(
        config: PacerConfig,
        operation: F,
        scheduler: S,
    ) -> Result<Self, PacerError> {
        let delay = config.delay()?;
        Ok(Self::new(operation, delay, scheduler))
    }

    /// Request a call with `args`, restarting the quiet period.
    pub fn call(&self, args: A) {
        if let Some(handle) = self.shared.pending.borrow_mut().take() {
            self.scheduler.cancel(&handle);
            trace!(generation = self.shared.generation.get(), "debounce timer cancelled");
        }

        let generation = self.shared.generation.get().wrapping_add(1);
        self.shared.generation.set(generation);

        let state: Weak<DebounceState<F, S::Handle>> = Rc::downgrade(&self.shared);
        let handle = self.scheduler.schedule_after(
            self.delay,
            Box::new(move || {
                if let Some(state) = state.upgrade() {
                    state.fire(generation, args);
                }
            }),
        );
        *self.shared.pending.borrow_mut() = Some(handle);
        trace!(generation, delay = ?self.delay, "debounce timer scheduled");
    }
}

impl<A, F, S> Debouncer<A, F, S>
where
    S: Scheduler,
{
    // accessor method to return the quiet period
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a call is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.shared.pending.borrow().is_some()
    }
}

impl<A, F, S> Drop for Debouncer<A, F, S>
where
    S: Scheduler,
{
    fn drop(&mut self) {
        if let Some(handle) = self.shared.pending.borrow_mut().take() {
            self.scheduler.cancel(&handle);
            trace!("debounce timer cancelled on drop");
        }
    }
}

impl<A, F, S> fmt::Debug for Debouncer<A, F, S>
where
    S: Scheduler,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

/// Wrap `operation` in a debouncer with a delay in milliseconds.
///
/// Fails with `PacerError::InvalidArgument` when `delay_ms` is negative.
pub fn debounce<A, F, S>(
    operation: F,
    delay_ms: i64,
    scheduler: S,
) -> Result<Debouncer<A, F, S>, PacerError>
where
    A: 'static,
    F: FnMut(A) + 'static,
    S: Scheduler,
    S::Handle: 'static,
{
    Debouncer::with_config(PacerConfig::new(delay_ms), operation, scheduler)
}
