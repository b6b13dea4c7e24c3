// src/scheduler/manual.rs

// deterministic virtual-time scheduler

// dependencies
use super::{Scheduler, TimerCallback};
use crate::clock::{Clock, duration_to_nanos};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// A scheduler whose time only moves when the owner calls `advance`.
///
/// Timers are kept ordered by `(deadline, sequence)`, so callbacks with equal
/// deadlines fire in the order they were scheduled. Clones share the same
/// queue and the same notion of "now", which makes it usable both as the
/// debouncer's scheduler and as the throttler's clock in one simulation.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<TimerQueue>>,
}

#[derive(Default)]
struct TimerQueue {
    now_nanos: u64,
    next_sequence: u64,
    timers: BTreeMap<ManualTimer, TimerCallback>,
}

/// Handle to a timer registered on a `ManualScheduler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ManualTimer {
    deadline_nanos: u64,
    sequence: u64,
}

impl ManualTimer {
    /// Virtual time, in nanoseconds, at which the timer is due.
    pub fn deadline_nanos(&self) -> u64 {
        self.deadline_nanos
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move virtual time forward by `by`, firing every timer that comes due.
    ///
    /// "Now" is set to each timer's deadline right before its callback runs,
    /// so callbacks observe the time they were scheduled for. Timers
    /// scheduled by a callback fire in the same pass if they fall due before
    /// the target. The queue is never borrowed while a callback runs, so a
    /// panicking callback leaves it consistent.
    pub fn advance(&self, by: Duration) {
        let target = self
            .inner
            .borrow()
            .now_nanos
            .saturating_add(duration_to_nanos(by));

        while let Some(callback) = self.pop_due(target) {
            callback();
        }

        let mut queue = self.inner.borrow_mut();
        queue.now_nanos = queue.now_nanos.max(target);
    }

    /// Fire timers that are already due without moving time, e.g. those
    /// scheduled with a zero delay.
    pub fn run_pending(&self) {
        self.advance(Duration::ZERO);
    }

    /// Number of timers registered and not yet fired or cancelled.
    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    fn pop_due(&self, target: u64) -> Option<TimerCallback> {
        let mut queue = self.inner.borrow_mut();
        let (&timer, _) = queue.timers.first_key_value()?;
        if timer.deadline_nanos > target {
            return None;
        }
        let (timer, callback) = queue.timers.pop_first()?;
        queue.now_nanos = queue.now_nanos.max(timer.deadline_nanos);
        Some(callback)
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTimer;

    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> ManualTimer {
        let mut queue = self.inner.borrow_mut();
        let timer = ManualTimer {
            deadline_nanos: queue.now_nanos.saturating_add(duration_to_nanos(delay)),
            sequence: queue.next_sequence,
        };
        queue.next_sequence += 1;
        queue.timers.insert(timer, callback);
        timer
    }

    fn cancel(&self, handle: &ManualTimer) {
        self.inner.borrow_mut().timers.remove(handle);
    }
}

impl Clock for ManualScheduler {
    fn now(&self) -> u64 {
        self.inner.borrow().now_nanos
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.inner.borrow();
        f.debug_struct("ManualScheduler")
            .field("now_nanos", &queue.now_nanos)
            .field("pending_timers", &queue.timers.len())
            .finish()
    }
}
