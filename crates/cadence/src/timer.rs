//! Cancellable one-shot and repeating timers.
//!
//! A [`TimerManager`] owns a [`GameClock`] and a set of armed timers. The host
//! loop advances the clock once per frame and then drains expiries with
//! [`TimerManager::pop_due`] until it returns `None`:
//!
//! ```
//! use cadence::{Scheduler, TimerManager, TimerSpec};
//!
//! let mut timers: TimerManager<u32> = TimerManager::new();
//! let handle = timers.set_timer(TimerSpec::one_shot(0.2), 7).unwrap();
//!
//! timers.advance(0.1).unwrap();
//! assert!(timers.pop_due().is_none());
//!
//! timers.advance(0.1).unwrap();
//! let expiry = timers.pop_due().unwrap();
//! assert_eq!(expiry.payload, 7);
//! assert!(!timers.is_active(handle));
//! ```
//!
//! # Cancellation
//!
//! Expiries are produced one at a time, earliest first. Repeating timers are
//! rescheduled at the moment they are popped, so clearing a timer between two
//! pops removes every tick that had not yet been handed out. No queued but
//! cancelled tick ever reaches the caller.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::clock::GameClock;
use crate::error::{Result, TimerError};

/// Opaque identifier of an armed timer.
///
/// Handles are never reused within a manager, so a stale handle can be
/// compared against the active one safely.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Returns the raw value of this handle.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerHandle({})", self.0)
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer:{}", self.0)
    }
}

/// Timing parameters of a timer: period, first delay and looping flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerSpec {
    /// Seconds between expiries of a repeating timer.
    pub period: f64,
    /// Seconds from arming until the first expiry.
    pub first_delay: f64,
    /// Whether the timer re-arms itself after each expiry.
    pub looping: bool,
}

impl TimerSpec {
    /// A repeating timer with the given period and first delay.
    #[must_use]
    pub fn repeating(period: f64, first_delay: f64) -> Self {
        Self {
            period,
            first_delay,
            looping: true,
        }
    }

    /// A timer that expires once after `delay` seconds.
    #[must_use]
    pub fn one_shot(delay: f64) -> Self {
        Self {
            period: delay,
            first_delay: delay,
            looping: false,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.looping && !(self.period.is_finite() && self.period > 0.0) {
            return Err(TimerError::InvalidPeriod(self.period));
        }
        if !self.first_delay.is_finite() || self.first_delay < 0.0 {
            return Err(TimerError::InvalidDelay(self.first_delay));
        }
        Ok(())
    }
}

/// Due time one period after `due`, or `None` if adding `period` does not
/// move past `due` at this magnitude of game time.
fn next_due(due: f64, period: f64) -> Option<f64> {
    let next = due + period;
    (next > due).then_some(next)
}

/// A single timer expiry handed to the host loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Expiry<T> {
    /// Timer that expired.
    pub handle: TimerHandle,
    /// Game time at which the expiry was scheduled.
    ///
    /// This is the nominal time, not the frame time: a frame that covers
    /// several periods yields several expiries with distinct `due` values.
    pub due: f64,
    /// Payload given when the timer was armed.
    pub payload: T,
}

/// Host-provided scheduling facility.
///
/// Gameplay code arms and cancels timers through this trait; the host loop
/// decides how expiries are delivered back.
pub trait Scheduler<T> {
    /// Current game time in seconds.
    fn now(&self) -> f64;

    /// Arm a timer and return its handle.
    ///
    /// # Errors
    ///
    /// Returns a [`TimerError`] if the period or first delay is unusable.
    fn set_timer(&mut self, spec: TimerSpec, payload: T) -> Result<TimerHandle>;

    /// Cancel a timer. Returns `true` if it was active.
    fn clear_timer(&mut self, handle: TimerHandle) -> bool;

    /// Whether the timer is still armed.
    fn is_active(&self, handle: TimerHandle) -> bool;
}

#[derive(Debug, Clone)]
struct TimerEntry<T> {
    next_due: f64,
    spec: TimerSpec,
    payload: T,
}

/// Tick-driven timer manager owning its game clock.
#[derive(Debug, Clone)]
pub struct TimerManager<T> {
    clock: GameClock,
    timers: BTreeMap<TimerHandle, TimerEntry<T>>,
    next_handle: u64,
}

impl<T> Default for TimerManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerManager<T> {
    /// Create an empty manager with a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(GameClock::new())
    }

    /// Create an empty manager around an existing clock.
    #[must_use]
    pub fn with_clock(clock: GameClock) -> Self {
        Self {
            clock,
            timers: BTreeMap::new(),
            next_handle: 1,
        }
    }

    /// The manager's clock.
    #[must_use]
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Advance the clock by `dt` seconds and return the new time.
    ///
    /// Advancing never fires anything by itself; call [`Self::pop_due`]
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidStep`] if `dt` is negative or not finite.
    pub fn advance(&mut self, dt: f64) -> Result<f64> {
        self.clock.advance(dt)
    }

    /// Number of armed timers.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Seconds until the timer's next expiry, or `None` if it is not armed.
    #[must_use]
    pub fn time_remaining(&self, handle: TimerHandle) -> Option<f64> {
        self.timers
            .get(&handle)
            .map(|entry| (entry.next_due - self.clock.now()).max(0.0))
    }

    /// Cancel every armed timer.
    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    /// Pop the earliest expiry due at or before the current time.
    ///
    /// Ties are broken by handle order, i.e. the timer armed first goes
    /// first. Repeating timers are re-armed one period after their nominal
    /// due time; one-shot timers are removed. A repeating timer whose period
    /// no longer advances game time at its due time is removed after that
    /// expiry, so a drain loop always ends.
    pub fn pop_due(&mut self) -> Option<Expiry<T>>
    where
        T: Clone,
    {
        let now = self.clock.now();
        let (handle, due) = self
            .timers
            .iter()
            .filter(|(_, entry)| entry.next_due <= now)
            .min_by(|(ha, a), (hb, b)| a.next_due.total_cmp(&b.next_due).then(ha.cmp(hb)))
            .map(|(handle, entry)| (*handle, entry.next_due))?;

        let entry = self.timers.get_mut(&handle)?;
        let payload = entry.payload.clone();
        match (entry.spec.looping, next_due(due, entry.spec.period)) {
            (true, Some(next)) => entry.next_due = next,
            (true, None) => {
                // Re-arming at the same instant would yield this tick forever
                warn!(timer = %handle, due, period = entry.spec.period, "period below clock resolution, timer dropped");
                self.timers.remove(&handle);
            }
            (false, _) => {
                self.timers.remove(&handle);
            }
        }

        trace!(timer = %handle, due, now, "timer expired");
        Some(Expiry {
            handle,
            due,
            payload,
        })
    }
}

impl<T> Scheduler<T> for TimerManager<T> {
    fn now(&self) -> f64 {
        self.clock.now()
    }

    fn set_timer(&mut self, spec: TimerSpec, payload: T) -> Result<TimerHandle> {
        spec.validate()?;
        let first_due = self.clock.now() + spec.first_delay;
        if spec.looping && next_due(first_due, spec.period).is_none() {
            return Err(TimerError::InvalidPeriod(spec.period));
        }

        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.insert(
            handle,
            TimerEntry {
                next_due: first_due,
                spec,
                payload,
            },
        );

        trace!(timer = %handle, first_due, period = spec.period, looping = spec.looping, "timer armed");
        Ok(handle)
    }

    fn clear_timer(&mut self, handle: TimerHandle) -> bool {
        let removed = self.timers.remove(&handle).is_some();
        if removed {
            trace!(timer = %handle, "timer cleared");
        }
        removed
    }

    fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }
}
