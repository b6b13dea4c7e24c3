// src/errors.rs

// error handling for the pacer wrappers

// dependencies
use thiserror::Error;

/// Error type for debouncer and throttler configuration issues.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PacerError {
    /// The configured delay was negative. Delays are never clamped to zero.
    #[error("Delay must be non-negative, got {delay_ms}ms")]
    InvalidArgument { delay_ms: i64 },
}
