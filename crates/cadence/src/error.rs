//! Error types for the timer substrate.

use thiserror::Error;

/// Errors raised when a timer or clock is given an unusable value.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TimerError {
    /// A repeating timer needs a finite, strictly positive period.
    #[error("invalid timer period {0}: repeating timers need a finite period > 0")]
    InvalidPeriod(f64),
    /// First delays must be finite and non-negative.
    #[error("invalid first delay {0}: must be finite and >= 0")]
    InvalidDelay(f64),
    /// Clock start times must be finite and non-negative.
    #[error("invalid clock time {0}: must be finite and >= 0")]
    InvalidTime(f64),
    /// Clock steps must be finite and non-negative.
    #[error("invalid clock step {0}: game time cannot run backwards")]
    InvalidStep(f64),
}

/// Result alias for timer operations.
pub type Result<T> = std::result::Result<T, TimerError>;
