// src/throttle.rs

// leading-edge throttler

// dependencies
use crate::clock::{Clock, duration_to_nanos};
use crate::config::PacerConfig;
use crate::errors::PacerError;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::trace;

/// Runs an operation at most once per `delay` window.
///
/// The first request of a window fires immediately and opens the window;
/// requests arriving while it is open are dropped for good. No trailing
/// call is ever scheduled for a dropped request.
///
/// `A` is the argument value handed to the operation, as for the debouncer.
/// The operation's return value is discarded.
pub struct Throttler<A, F, C> {
    delay_nanos: u64,
    clock: C,
    last_fire_nanos: Cell<Option<u64>>,
    operation: RefCell<F>,
    _args: PhantomData<fn(A)>,
}

/// Outcome of a throttled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// The operation ran and a new window opened.
    Fired,
    /// The request fell inside an open window and was discarded.
    Dropped {
        /// Time until the window closes and the next request may fire.
        retry_after: Duration,
    },
}

impl ThrottleDecision {
    pub fn fired(&self) -> bool {
        matches!(self, ThrottleDecision::Fired)
    }
}

// Remaining nanoseconds of the open window, or None when a request may fire.
// A window is open while `now - last_fire < delay`; "never fired" is always closed.
pub(crate) fn open_window_remaining(
    now: u64,
    last_fire: Option<u64>,
    delay_nanos: u64,
) -> Option<u64> {
    let elapsed = now.saturating_sub(last_fire?);
    (elapsed < delay_nanos).then(|| delay_nanos - elapsed)
}

impl<A, F, C> Throttler<A, F, C>
where
    F: FnMut(A),
    C: Clock,
{
    /// Create a throttler that reads time from `clock`.
    pub fn new(operation: F, delay: Duration, clock: C) -> Self {
        Self {
            delay_nanos: duration_to_nanos(delay),
            clock,
            last_fire_nanos: Cell::new(None),
            operation: RefCell::new(operation),
            _args: PhantomData,
        }
    }

    /// Create a throttler from a config object, rejecting negative delays.
    pub fn with_config(config: PacerConfig, operation: F, clock: C) -> Result<Self, PacerError> {
        let delay = config.delay()?;
        Ok(Self::new(operation, delay, clock))
    }

    /// Run the operation with `args` unless the current window is still open.
    pub fn call(&self, args: A) -> ThrottleDecision {
        let now = self.clock.now();

        let last_fire = self.last_fire_nanos.get();
        if let Some(remaining) = open_window_remaining(now, last_fire, self.delay_nanos) {
            trace!(remaining_nanos = remaining, "throttle dropped request");
            return ThrottleDecision::Dropped {
                retry_after: Duration::from_nanos(remaining),
            };
        }

        // recorded before the call so a panicking operation still closes the window
        self.last_fire_nanos.set(Some(now));
        trace!(now_nanos = now, "throttle fired");

        let mut operation = self.operation.borrow_mut();
        (&mut *operation)(args);
        ThrottleDecision::Fired
    }
}

impl<A, F, C> Throttler<A, F, C> {
    // accessor method to return the window length
    pub fn delay(&self) -> Duration {
        Duration::from_nanos(self.delay_nanos)
    }

    /// Clock reading of the most recent firing, or None if it never fired.
    pub fn last_fire(&self) -> Option<u64> {
        self.last_fire_nanos.get()
    }
}

impl<A, F, C> fmt::Debug for Throttler<A, F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttler")
            .field("delay_nanos", &self.delay_nanos)
            .field("last_fire_nanos", &self.last_fire_nanos.get())
            .finish_non_exhaustive()
    }
}

/// Wrap `operation` in a throttler with a window in milliseconds.
///
/// Fails with `PacerError::InvalidArgument` when `delay_ms` is negative.
pub fn throttle<A, F, C>(
    operation: F,
    delay_ms: i64,
    clock: C,
) -> Result<Throttler<A, F, C>, PacerError>
where
    F: FnMut(A),
    C: Clock,
{
    Throttler::with_config(PacerConfig::new(delay_ms), operation, clock)
}
