//! Monotonic game clock.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimerError};

/// Game time in seconds, advanced by the host loop once per frame.
///
/// Time only moves forward. A step of zero is allowed (paused frame) and
/// still counts as a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    time: f64,
    tick: u64,
}

impl GameClock {
    /// Create a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock starting at an arbitrary time.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidTime`] if `time` is negative or not
    /// finite.
    pub fn starting_at(time: f64) -> Result<Self> {
        if !time.is_finite() || time < 0.0 {
            return Err(TimerError::InvalidTime(time));
        }
        Ok(Self { time, tick: 0 })
    }

    /// Current game time in seconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.time
    }

    /// Number of completed steps.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance by `dt` seconds and return the new time.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidStep`] if `dt` is negative or not finite.
    pub fn advance(&mut self, dt: f64) -> Result<f64> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(TimerError::InvalidStep(dt));
        }
        self.time += dt;
        self.tick += 1;
        Ok(self.time)
    }
}
