// src/config.rs

//! Configuration types for the pacer wrappers

// dependencies
use crate::errors::PacerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration shared by the debouncer and the throttlers.
///
/// The delay is kept as signed milliseconds so that values coming from
/// untyped sources (config files, CLI flags, FFI) can be rejected when
/// negative instead of being silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacerConfig {
    pub(crate) delay_ms: i64,
}

impl PacerConfig {
    /// Create a new configuration with the given delay in milliseconds
    pub fn new(delay_ms: i64) -> Self {
        Self { delay_ms }
    }

    /// Builder-style: set the delay in milliseconds
    pub fn delay_ms(mut self, delay_ms: i64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PacerError> {
        if self.delay_ms < 0 {
            return Err(PacerError::InvalidArgument {
                delay_ms: self.delay_ms,
            });
        }
        Ok(())
    }

    /// The validated delay as a `Duration`
    pub fn delay(&self) -> Result<Duration, PacerError> {
        self.validate()?;
        Ok(Duration::from_millis(self.delay_ms.unsigned_abs()))
    }
}

impl From<Duration> for PacerConfig {
    fn from(delay: Duration) -> Self {
        Self::new(i64::try_from(delay.as_millis()).unwrap_or(i64::MAX))
    }
}
