//! Fire cadence state and timer arming.
//!
//! The [`FireScheduler`] decides when a weapon may shoot. Automatic fire is a
//! single repeating timer armed through the host's [`Scheduler`]; shotgun fire
//! is gated directly against the last shot time.
//!
//! # Cadence continuity
//!
//! Releasing and re-pressing the trigger cannot beat the rate of fire: the
//! first tick of a new burst is delayed until one full interval after the
//! previous shot, and fires immediately if that interval has already passed.
//!
//! # Example
//!
//! ```
//! use cadence::TimerManager;
//! use salvo_core::profile::WeaponProfile;
//! use salvo_core::request::WeaponId;
//! use salvo_core::scheduler::{FireScheduler, StartOutcome};
//!
//! let mut timers: TimerManager<WeaponId> = TimerManager::new();
//! let mut scheduler = FireScheduler::new();
//! scheduler.configure(&WeaponProfile::new("AK", 600.0));
//!
//! assert!(matches!(scheduler.start(&mut timers, WeaponId::new(1)), StartOutcome::Armed(_)));
//! assert!(matches!(scheduler.start(&mut timers, WeaponId::new(1)), StartOutcome::AlreadyArmed(_)));
//! assert!(scheduler.stop(&mut timers));
//! ```

use cadence::{Scheduler, TimerHandle, TimerSpec};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::profile::WeaponProfile;
use crate::request::WeaponId;

/// Timing state of one weapon instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FireState {
    /// Game time of the most recent shot; `None` until the first shot.
    pub last_fire: Option<f64>,
    /// Seconds between automatic shots; `None` when the weapon cannot fire.
    pub time_between_shots: Option<f64>,
    /// The armed repeating timer, if any.
    pub timer: Option<TimerHandle>,
}

/// Result of asking the scheduler to start automatic fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new repeating timer was armed.
    Armed(TimerHandle),
    /// A timer was already armed; nothing changed.
    AlreadyArmed(TimerHandle),
    /// The weapon has no usable rate of fire.
    Disarmed,
    /// The host scheduler refused the timer.
    Rejected,
}

/// Owns cadence timing state and the weapon's single fire timer.
#[derive(Debug, Clone, Default)]
pub struct FireScheduler {
    state: FireState,
    burst_delay: f64,
}

impl FireScheduler {
    /// A scheduler with no profile: it never arms.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute timing from a newly loaded profile.
    ///
    /// The last shot time is kept, so swapping profiles cannot reset the
    /// cadence.
    pub fn configure(&mut self, profile: &WeaponProfile) {
        self.state.time_between_shots = profile.fire_interval();
        self.burst_delay = f64::from(profile.shotgun_burst_delay.max(0.0));
    }

    /// Current timing state.
    #[must_use]
    pub fn state(&self) -> &FireState {
        &self.state
    }

    /// Seconds between automatic shots.
    #[must_use]
    pub fn time_between_shots(&self) -> Option<f64> {
        self.state.time_between_shots
    }

    /// Game time of the most recent shot.
    #[must_use]
    pub fn last_fire(&self) -> Option<f64> {
        self.state.last_fire
    }

    /// Whether a fire timer is currently armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.state.timer.is_some()
    }

    /// Whether `handle` is this weapon's armed timer.
    #[must_use]
    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.state.timer == Some(handle)
    }

    /// Delay before the first automatic shot if fire started at `now`.
    ///
    /// `max(last_fire + time_between_shots - now, 0)`, or zero if the weapon
    /// has never fired. `None` if the weapon cannot fire.
    #[must_use]
    pub fn first_delay(&self, now: f64) -> Option<f64> {
        let interval = self.state.time_between_shots?;
        Some(
            self.state
                .last_fire
                .map_or(0.0, |last| (last + interval - now).max(0.0)),
        )
    }

    /// Arm the repeating fire timer unless one is already armed.
    pub fn start<S>(&mut self, timers: &mut S, weapon: WeaponId) -> StartOutcome
    where
        S: Scheduler<WeaponId> + ?Sized,
    {
        if let Some(handle) = self.state.timer {
            if timers.is_active(handle) {
                return StartOutcome::AlreadyArmed(handle);
            }
            // The host dropped our timer (e.g. cleared all timers on a level change)
            self.state.timer = None;
        }

        let now = timers.now();
        let (Some(interval), Some(first_delay)) =
            (self.state.time_between_shots, self.first_delay(now))
        else {
            debug!(weapon = %weapon, "start fire ignored: weapon cannot fire");
            return StartOutcome::Disarmed;
        };

        match timers.set_timer(TimerSpec::repeating(interval, first_delay), weapon) {
            Ok(handle) => {
                debug!(weapon = %weapon, timer = %handle, interval, first_delay, "fire timer armed");
                self.state.timer = Some(handle);
                StartOutcome::Armed(handle)
            }
            Err(err) => {
                warn!(weapon = %weapon, error = %err, "fire timer rejected");
                StartOutcome::Rejected
            }
        }
    }

    /// Cancel the fire timer. Idempotent; returns `true` if one was armed.
    pub fn stop<S>(&mut self, timers: &mut S) -> bool
    where
        S: Scheduler<WeaponId> + ?Sized,
    {
        match self.state.timer.take() {
            Some(handle) => {
                timers.clear_timer(handle);
                true
            }
            None => false,
        }
    }

    /// Whether a shotgun shot may fire at `now`.
    ///
    /// Always true before the first shot; afterwards only once strictly
    /// more than the burst delay has passed.
    #[must_use]
    pub fn shotgun_ready(&self, now: f64) -> bool {
        self.state
            .last_fire
            .map_or(true, |last| now - last > self.burst_delay)
    }

    /// Record a shot at `now`. The stored time never moves backwards.
    pub fn record_shot(&mut self, now: f64) {
        self.state.last_fire = Some(self.state.last_fire.map_or(now, |last| last.max(now)));
    }
}
