// src/lib.rs

//! # Flux Pacer
//!
//! Debounce and throttle wrappers that turn an unrestricted stream of
//! requests into a rate-controlled stream of calls.
//!
//! - [`Debouncer`]: trailing edge. Fires once requests have been quiet for
//!   the delay, with the last request's arguments.
//! - [`Throttler`]: leading edge. Fires on the first request of a window and
//!   drops the rest of that window.
//! - [`KeyedThrottler`]: a throttler with one window per key, shareable
//!   across threads.
//!
//! Time comes from pluggable collaborators: a [`Scheduler`] for the
//! debouncer's timers and a [`Clock`] for the throttlers.
//!
//! ## Quick Example
//!
//! ```rust
//! use flux_pacer::{Debouncer, ManualScheduler};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let scheduler = ManualScheduler::new();
//! let searches = Rc::new(RefCell::new(Vec::new()));
//! let sink = searches.clone();
//! let search = Debouncer::new(
//!     move |query: String| sink.borrow_mut().push(query),
//!     Duration::from_millis(300),
//!     scheduler.clone(),
//! );
//!
//! for query in ["a", "ap", "app", "apple"] {
//!     search.call(query.to_string());
//! }
//! scheduler.advance(Duration::from_millis(300));
//!
//! assert_eq!(*searches.borrow(), vec!["apple".to_string()]);
//! ```

// private modules
mod clock;
mod config;
mod debounce;
mod errors;
mod keyed_throttle;
mod scheduler;
mod throttle;

// public API exports
pub use clock::{Clock, SystemClock};
pub use config::PacerConfig;
pub use debounce::{Debouncer, debounce};
pub use errors::PacerError;
pub use keyed_throttle::KeyedThrottler;
pub use scheduler::{ManualScheduler, ManualTimer, Scheduler, TimerCallback};
#[cfg(feature = "runtime-tokio")]
pub use scheduler::{TokioScheduler, TokioTimer};
pub use throttle::{ThrottleDecision, Throttler, throttle};
