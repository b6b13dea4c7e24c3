// src/keyed_throttle.rs

// per-key leading-edge throttling over a concurrent map

// dependencies
use crate::clock::{Clock, SystemClock, duration_to_nanos};
use crate::config::PacerConfig;
use crate::errors::PacerError;
use crate::throttle::{ThrottleDecision, open_window_remaining};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::{debug, trace};

/// Throttles an operation independently per key.
/// K is the type used to identify callers (e.g., String, u64, etc.).
/// C is the clock type, defaulting to SystemClock.
/// We use a `DashMap` so the throttler can be shared across threads; the
/// window check and update for a key happen under that key's shard lock.
pub struct KeyedThrottler<K, A, F, C = SystemClock>
where
    K: Hash + Eq + Clone,
{
    delay_nanos: u64,
    last_fire: DashMap<K, u64>,
    operation: F,
    clock: C,
    _args: PhantomData<fn(A)>,
}

impl<K, A, F, C> KeyedThrottler<K, A, F, C>
where
    K: Hash + Eq + Clone,
    F: Fn(&K, A),
    C: Clock,
{
    /// Create a keyed throttler with one `delay` window per key.
    pub fn new(operation: F, delay: Duration, clock: C) -> Self {
        Self {
            delay_nanos: duration_to_nanos(delay),
            last_fire: DashMap::new(),
            operation,
            clock,
            _args: PhantomData,
        }
    }

    // method to create a new keyed throttler from a config object
    pub fn with_config(config: PacerConfig, operation: F, clock: C) -> Result<Self, PacerError> {
        let delay = config.delay()?;
        Ok(Self::new(operation, delay, clock))
    }

    /// Run the operation for `key` unless that key's window is still open.
    pub fn call(&self, key: K, args: A) -> ThrottleDecision {
        let now = self.clock.now();

        let remaining = match self.last_fire.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                let remaining = open_window_remaining(now, Some(*entry.get()), self.delay_nanos);
                if remaining.is_none() {
                    entry.insert(now);
                }
                remaining
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                None
            }
        };

        // the shard lock is released here, before the operation runs
        match remaining {
            Some(remaining) => {
                trace!(remaining_nanos = remaining, "keyed throttle dropped request");
                ThrottleDecision::Dropped {
                    retry_after: Duration::from_nanos(remaining),
                }
            }
            None => {
                trace!(now_nanos = now, "keyed throttle fired");
                (self.operation)(&key, args);
                ThrottleDecision::Fired
            }
        }
    }

    /// Forget keys that have not fired for longer than `max_idle`.
    ///
    /// A forgotten key behaves as never fired. `max_idle` is raised to the
    /// window length so cleanup never reopens a window early. Returns the
    /// number of keys removed.
    pub fn cleanup_stale_keys(&self, max_idle: Duration) -> usize {
        let now = self.clock.now();
        let max_idle_nanos = duration_to_nanos(max_idle).max(self.delay_nanos);

        let before = self.last_fire.len();
        self.last_fire
            .retain(|_, &mut last_fire| now.saturating_sub(last_fire) <= max_idle_nanos);
        let removed = before.saturating_sub(self.last_fire.len());

        debug!(removed, remaining = self.last_fire.len(), "stale throttle keys removed");
        removed
    }
}

impl<K, A, F, C> KeyedThrottler<K, A, F, C>
where
    K: Hash + Eq + Clone,
{
    // accessor method to return the window length
    pub fn delay(&self) -> Duration {
        Duration::from_nanos(self.delay_nanos)
    }

    /// Number of keys with a recorded firing.
    pub fn tracked_keys(&self) -> usize {
        self.last_fire.len()
    }

    /// Clock reading of the most recent firing for `key`, if any.
    pub fn last_fire(&self, key: &K) -> Option<u64> {
        self.last_fire.get(key).map(|entry| *entry.value())
    }
}

impl<K, A, F, C> fmt::Debug for KeyedThrottler<K, A, F, C>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedThrottler")
            .field("delay_nanos", &self.delay_nanos)
            .field("tracked_keys", &self.last_fire.len())
            .finish_non_exhaustive()
    }
}
