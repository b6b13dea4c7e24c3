// src/scheduler/tokio_impl.rs

// scheduler backed by the tokio timer wheel

// dependencies
use super::{Scheduler, TimerCallback};
use crate::clock::{Clock, duration_to_nanos};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// Runs timers as local tokio tasks.
///
/// Every timer is a `spawn_local` task that sleeps for the delay and then
/// runs its callback, so callbacks stay on the thread driving the
/// `LocalSet`, matching the single-threaded model of the wrappers.
/// Readings from its `Clock` impl follow `tokio::time`, including paused
/// time in tests.
///
/// # Panics
///
/// `schedule_after` panics when called outside of a `tokio::task::LocalSet`.
#[derive(Debug, Clone, Copy)]
pub struct TokioScheduler {
    origin: Instant,
}

/// Handle to a timer task spawned by a `TokioScheduler`.
#[derive(Debug, Clone)]
pub struct TokioTimer {
    abort: AbortHandle,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioTimer;

    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> TokioTimer {
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        TokioTimer {
            abort: task.abort_handle(),
        }
    }

    // The caller runs on the LocalSet thread, so the timer task is parked at
    // an await point here and aborting it guarantees the callback never runs.
    fn cancel(&self, handle: &TokioTimer) {
        handle.abort.abort();
    }
}

impl Clock for TokioScheduler {
    fn now(&self) -> u64 {
        duration_to_nanos(self.origin.elapsed())
    }
}
