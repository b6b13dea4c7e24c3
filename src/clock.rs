// src/clock.rs

// clock module definition and implementations

// dependencies
use std::time::{Duration, Instant};

/// Clock trait to abstract time retrieval.
/// The `now` method returns the current time in nanoseconds as a u64,
/// measured from an arbitrary origin that never moves backwards.
/// The Throttler and KeyedThrottler read it to decide whether a window is open.
pub trait Clock {
    fn now(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// SystemClock implementation backed by `std::time::Instant`.
/// Readings are nanoseconds since the clock was created, so they are monotonic.
/// Thread-safe and can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        duration_to_nanos(self.origin.elapsed())
    }
}

// saturates instead of truncating for durations past ~584 years
pub(crate) fn duration_to_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
