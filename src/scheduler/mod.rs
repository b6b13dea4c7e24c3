// src/scheduler/mod.rs

//! Timer facility the debouncer schedules its trailing call on.

// dependencies
use std::time::Duration;

mod manual;
#[cfg(feature = "runtime-tokio")]
mod tokio_impl;

pub use manual::{ManualScheduler, ManualTimer};
#[cfg(feature = "runtime-tokio")]
pub use tokio_impl::{TokioScheduler, TokioTimer};

/// Callback type handed to a scheduler. Runs at most once, on the thread that
/// drives the scheduler.
pub type TimerCallback = Box<dyn FnOnce() + 'static>;

/// Scheduler trait to abstract delayed execution.
///
/// Implementors must uphold three rules:
///
/// - `schedule_after` only registers the callback; it never runs it before
///   returning, not even for a zero delay.
/// - Callbacks run in the order their deadlines expire, first-scheduled
///   first for equal deadlines.
/// - After `cancel` returns, the callback of that handle never runs.
///   Cancelling a handle that already fired or was already cancelled is a
///   no-op.
pub trait Scheduler {
    type Handle;

    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> Self::Handle;

    fn cancel(&self, handle: &Self::Handle);
}

impl<S: Scheduler + ?Sized> Scheduler for &S {
    type Handle = S::Handle;

    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> Self::Handle {
        (**self).schedule_after(delay, callback)
    }

    fn cancel(&self, handle: &Self::Handle) {
        (**self).cancel(handle)
    }
}
