//! Weapon instance orchestration.
//!
//! A [`WeaponController`] is one weapon in an owner's hands. It takes trigger
//! input, arms its fire timer through the host [`Scheduler`], and resolves each
//! shot into requests for the host [`EffectService`].
//!
//! # Lifecycle
//!
//! ```text
//! activate(profile) -> start_fire -> [on_timer -> fire]* -> stop_fire -> deactivate
//!                      shotgun_fire -> fire (gated by burst delay)
//! ```
//!
//! # Host loop
//!
//! The controller never polls timers itself. The host drains expiries one at
//! a time and routes each back by its [`WeaponId`] payload, using the
//! expiry's nominal due time as the shot time:
//!
//! ```
//! use cadence::TimerManager;
//! use glam::Vec3;
//! use salvo_core::aim::{CameraView, Rotator};
//! use salvo_core::config::RigConfig;
//! use salvo_core::controller::WeaponController;
//! use salvo_core::owner::OwnerState;
//! use salvo_core::profile::{WeaponMode, WeaponProfile};
//! use salvo_core::request::{
//!     AudioHandle, EffectService, MeshHandle, Presentation, RequestEnvelope, WeaponId,
//! };
//!
//! #[derive(Default)]
//! struct Log(Vec<RequestEnvelope>);
//!
//! impl EffectService for Log {
//!     fn socket_location(&self, _mesh: MeshHandle, _socket: &str) -> Option<Vec3> {
//!         Some(Vec3::ZERO)
//!     }
//!     fn mesh_rotation(&self, _mesh: MeshHandle) -> Rotator {
//!         Rotator::ZERO
//!     }
//!     fn submit(&mut self, envelope: RequestEnvelope) {
//!         self.0.push(envelope);
//!     }
//! }
//!
//! let presentation = Presentation { mesh: MeshHandle::new(1), audio: AudioHandle::new(2) };
//! let mut weapon = WeaponController::with_seed(WeaponId::new(1), presentation, RigConfig::default(), 7);
//! weapon.activate(WeaponProfile::new("AK", 120.0)).unwrap();
//!
//! let owner = OwnerState::hip_fire(CameraView::new(Vec3::ZERO, Rotator::ZERO), WeaponMode::Primary);
//! let mut timers: TimerManager<WeaponId> = TimerManager::new();
//! let mut effects = Log::default();
//!
//! weapon.start_fire(Some(&owner), &mut timers);
//! timers.advance(1.0).unwrap();
//! while let Some(expiry) = timers.pop_due() {
//!     weapon.on_timer(expiry.handle, expiry.due, Some(&owner), &mut effects);
//! }
//! assert_eq!(weapon.shots_fired(), 3);
//! assert_eq!(weapon.last_fire(), Some(1.0));
//! ```

use cadence::{Scheduler, TimerHandle};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::aim::AimSampler;
use crate::config::RigConfig;
use crate::dispatch::{DispatchSteps, ShotContext, ShotEffectDispatcher};
use crate::error::Result;
use crate::owner::WeaponOwner;
use crate::profile::{WeaponMode, WeaponProfile};
use crate::request::{
    AimRequest, AudioRequest, EffectRequest, EffectService, Presentation, RequestEnvelope, ShotId,
    WeaponId,
};
use crate::scheduler::{FireScheduler, StartOutcome};

/// Trigger state of a weapon.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireMode {
    /// Trigger released
    #[default]
    Idle,
    /// Trigger held and the fire timer armed
    Firing,
}

/// Summary of one resolved shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotReport {
    /// Sequence number of the shot
    pub shot: ShotId,
    /// Eye position the trace started from
    pub origin: Vec3,
    /// Dispersed unit shot direction
    pub direction: Vec3,
    /// End of the aim trace
    pub trace_end: Vec3,
    /// Dispatch steps that issued a request
    pub steps: DispatchSteps,
}

/// One weapon instance held by an owning agent.
#[derive(Debug, Clone)]
pub struct WeaponController {
    id: WeaponId,
    presentation: Presentation,
    config: RigConfig,
    dispatcher: ShotEffectDispatcher,
    profile: Option<WeaponProfile>,
    sampler: AimSampler,
    scheduler: FireScheduler,
    rng: ChaCha8Rng,
    state: FireMode,
    shots_fired: u64,
}

impl WeaponController {
    /// Create an unloaded weapon with an entropy-seeded RNG.
    #[must_use]
    pub fn new(id: WeaponId, presentation: Presentation, config: RigConfig) -> Self {
        Self::with_rng(id, presentation, config, ChaCha8Rng::from_entropy())
    }

    /// Create an unloaded weapon whose dispersion and recoil replay from
    /// `seed`.
    #[must_use]
    pub fn with_seed(id: WeaponId, presentation: Presentation, config: RigConfig, seed: u64) -> Self {
        Self::with_rng(id, presentation, config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(id: WeaponId, presentation: Presentation, config: RigConfig, rng: ChaCha8Rng) -> Self {
        Self {
            id,
            presentation,
            dispatcher: ShotEffectDispatcher::new(&config),
            config,
            profile: None,
            sampler: AimSampler::from_degrees(0.0),
            scheduler: FireScheduler::new(),
            rng,
            state: FireMode::Idle,
            shots_fired: 0,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Load a profile, replacing any previous one.
    ///
    /// The profile is loaded even if it fails validation: a weapon with an
    /// unusable rate of fire stays selected but never arms its timer, and
    /// shotgun fire is still gated by the burst delay.
    ///
    /// # Errors
    ///
    /// Returns the validation error from [`WeaponProfile::validate`].
    pub fn activate(&mut self, profile: WeaponProfile) -> Result<()> {
        let validation = profile.validate();
        if let Err(err) = &validation {
            warn!(weapon = %self.id, profile = %profile.name, error = %err, "weapon loaded with invalid profile");
        }

        self.scheduler.configure(&profile);
        self.sampler = AimSampler::from_degrees(profile.bullet_spread);
        debug!(
            weapon = %self.id,
            profile = %profile.name,
            time_between_shots = ?self.scheduler.time_between_shots(),
            "weapon activated"
        );
        self.profile = Some(profile);
        validation
    }

    /// Cancel any armed timer and unload the profile.
    pub fn deactivate<S>(&mut self, timers: &mut S) -> Option<WeaponProfile>
    where
        S: Scheduler<WeaponId> + ?Sized,
    {
        self.scheduler.stop(timers);
        self.state = FireMode::Idle;
        debug!(weapon = %self.id, "weapon deactivated");
        self.profile.take()
    }

    // =========================================================================
    // Trigger input
    // =========================================================================

    /// Trigger pressed.
    ///
    /// Returns `None` without changing state when there is no owner or no
    /// profile loaded. The weapon only enters [`FireMode::Firing`] once its
    /// fire timer is armed.
    pub fn start_fire<S>(
        &mut self,
        owner: Option<&dyn WeaponOwner>,
        timers: &mut S,
    ) -> Option<StartOutcome>
    where
        S: Scheduler<WeaponId> + ?Sized,
    {
        if owner.is_none() {
            debug!(weapon = %self.id, "start fire ignored: no owner");
            return None;
        }
        if self.profile.is_none() {
            debug!(weapon = %self.id, "start fire ignored: no profile");
            return None;
        }

        let outcome = self.scheduler.start(timers, self.id);
        if matches!(outcome, StartOutcome::Armed(_) | StartOutcome::AlreadyArmed(_)) {
            self.state = FireMode::Firing;
        }
        Some(outcome)
    }

    /// Trigger released.
    ///
    /// Always cancels the fire timer. The looping fire sound is stopped only
    /// for an owner in the Primary weapon mode. Returns `true` if a timer was
    /// armed.
    pub fn stop_fire<S, E>(
        &mut self,
        owner: Option<&dyn WeaponOwner>,
        timers: &mut S,
        effects: &mut E,
    ) -> bool
    where
        S: Scheduler<WeaponId> + ?Sized,
        E: EffectService + ?Sized,
    {
        let was_armed = self.scheduler.stop(timers);
        self.state = FireMode::Idle;

        if owner.is_some_and(|owner| owner.weapon_mode() == WeaponMode::Primary) {
            effects.submit(RequestEnvelope::new(
                AudioRequest::Stop {
                    audio: self.presentation.audio,
                }
                .into(),
                self.id,
                None,
                timers.now(),
            ));
        }
        trace!(weapon = %self.id, was_armed, "fire stopped");
        was_armed
    }

    /// Semi-automatic shot, gated by the profile's burst delay.
    pub fn shotgun_fire<E>(
        &mut self,
        owner: Option<&dyn WeaponOwner>,
        now: f64,
        effects: &mut E,
    ) -> Option<ShotReport>
    where
        E: EffectService + ?Sized,
    {
        if !self.scheduler.shotgun_ready(now) {
            debug!(weapon = %self.id, now, last_fire = ?self.scheduler.last_fire(), "shotgun fire suppressed");
            return None;
        }
        self.fire(owner, now, effects)
    }

    /// Timer expiry entry point.
    ///
    /// Handles that are not this weapon's armed timer are ignored, so an
    /// expiry that was queued before `stop_fire` never produces a shot.
    pub fn on_timer<E>(
        &mut self,
        handle: TimerHandle,
        now: f64,
        owner: Option<&dyn WeaponOwner>,
        effects: &mut E,
    ) -> Option<ShotReport>
    where
        E: EffectService + ?Sized,
    {
        if !self.scheduler.owns(handle) {
            debug!(weapon = %self.id, timer = %handle, "stale timer ignored");
            return None;
        }
        self.fire(owner, now, effects)
    }

    // =========================================================================
    // Shot resolution
    // =========================================================================

    /// Resolve and dispatch one shot at game time `now`.
    ///
    /// Returns `None`, issuing nothing, if the owner, the profile or the
    /// active camera is missing.
    pub fn fire<E>(
        &mut self,
        owner: Option<&dyn WeaponOwner>,
        now: f64,
        effects: &mut E,
    ) -> Option<ShotReport>
    where
        E: EffectService + ?Sized,
    {
        let Some(owner) = owner else {
            debug!(weapon = %self.id, "fire skipped: no owner");
            return None;
        };
        let Some(profile) = self.profile.as_ref() else {
            debug!(weapon = %self.id, "fire skipped: no profile");
            return None;
        };
        let Some(camera) = owner.active_camera() else {
            debug!(weapon = %self.id, aim_mode = ?owner.aim_mode(), "fire skipped: no camera");
            return None;
        };

        let ray = camera.aim_ray();
        let direction = self.sampler.sample(ray.direction, &mut self.rng);
        let trace_end = ray.origin + direction * self.config.trace_distance;
        let shot = ShotId::new(self.shots_fired);

        let envelope = |request: EffectRequest| RequestEnvelope::new(request, self.id, Some(shot), now);

        if owner.has_scoped_rig() {
            let rotation =
                AimSampler::mount_rotation(ray.origin, trace_end, self.config.mount_yaw_offset);
            effects.submit(envelope(AimRequest::OrientCameraMount { rotation }.into()));
        }

        let context = ShotContext {
            weapon: self.id,
            shot,
            time: now,
            trace_end,
            presentation: self.presentation,
        };
        let steps = self
            .dispatcher
            .dispatch(&context, profile, owner, effects, &mut self.rng);

        effects.submit(envelope(
            AudioRequest::Play {
                audio: self.presentation.audio,
            }
            .into(),
        ));

        self.scheduler.record_shot(now);
        self.shots_fired += 1;
        trace!(weapon = %self.id, %shot, now, ?direction, "shot fired");

        Some(ShotReport {
            shot,
            origin: ray.origin,
            direction,
            trace_end,
            steps,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Weapon identifier.
    #[must_use]
    pub fn id(&self) -> WeaponId {
        self.id
    }

    /// Trigger state.
    #[must_use]
    pub fn state(&self) -> FireMode {
        self.state
    }

    /// Game time of the most recent shot.
    #[must_use]
    pub fn last_fire(&self) -> Option<f64> {
        self.scheduler.last_fire()
    }

    /// Seconds between automatic shots for the loaded profile.
    #[must_use]
    pub fn time_between_shots(&self) -> Option<f64> {
        self.scheduler.time_between_shots()
    }

    /// Whether the fire timer is armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// Loaded profile.
    #[must_use]
    pub fn profile(&self) -> Option<&WeaponProfile> {
        self.profile.as_ref()
    }

    /// Aim-down-sights camera offset of the loaded profile.
    #[must_use]
    pub fn aim_offset(&self) -> Option<Vec3> {
        self.profile.as_ref().map(|profile| profile.aim_offset)
    }

    /// Whether the loaded profile shows a scope overlay while aiming.
    #[must_use]
    pub fn uses_aim_texture(&self) -> bool {
        self.profile
            .as_ref()
            .is_some_and(|profile| profile.uses_aim_texture)
    }

    /// Shots resolved since the weapon was created.
    #[must_use]
    pub fn shots_fired(&self) -> u64 {
        self.shots_fired
    }

    /// Rig configuration.
    #[must_use]
    pub fn config(&self) -> &RigConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aim::{CameraView, Rotator};
    use crate::owner::OwnerState;
    use crate::request::{AudioHandle, MeshHandle, RequestKind};
    use crate::tests::helpers::RecordingEffects;
    use cadence::TimerManager;

    fn controller() -> WeaponController {
        let presentation = Presentation {
            mesh: MeshHandle::new(1),
            audio: AudioHandle::new(2),
        };
        WeaponController::with_seed(WeaponId::new(1), presentation, RigConfig::default(), 1)
    }

    fn owner() -> OwnerState {
        OwnerState::hip_fire(CameraView::new(Vec3::ZERO, Rotator::ZERO), WeaponMode::Primary)
    }

    #[test]
    fn activate_configures_timing_and_accessors() {
        let mut weapon = controller();
        let mut profile = WeaponProfile::new("AWP", 40.0);
        profile.aim_offset = Vec3::new(0.0, 5.0, 2.0);
        profile.uses_aim_texture = true;

        weapon.activate(profile).unwrap();

        assert_eq!(weapon.time_between_shots(), Some(1.5));
        assert_eq!(weapon.aim_offset(), Some(Vec3::new(0.0, 5.0, 2.0)));
        assert!(weapon.uses_aim_texture());
        assert_eq!(weapon.profile().map(|p| p.name.as_str()), Some("AWP"));
    }

    #[test]
    fn invalid_rate_loads_but_disarms() {
        let mut weapon = controller();
        let mut timers: TimerManager<WeaponId> = TimerManager::new();
        let owner = owner();

        assert!(weapon.activate(WeaponProfile::new("Jammed", 0.0)).is_err());
        assert!(weapon.profile().is_some());
        assert_eq!(
            weapon.start_fire(Some(&owner), &mut timers),
            Some(StartOutcome::Disarmed)
        );
        assert_eq!(timers.active_count(), 0);
        assert_eq!(weapon.state(), FireMode::Idle);
    }

    #[test]
    fn start_without_owner_or_profile_is_noop() {
        let mut weapon = controller();
        let mut timers: TimerManager<WeaponId> = TimerManager::new();
        let owner = owner();

        assert_eq!(weapon.start_fire(Some(&owner), &mut timers), None);
        weapon.activate(WeaponProfile::new("AK", 600.0)).unwrap();
        assert_eq!(weapon.start_fire(None, &mut timers), None);
        assert_eq!(weapon.state(), FireMode::Idle);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn fire_without_profile_issues_nothing() {
        let mut weapon = controller();
        let mut effects = RecordingEffects::with_default_sockets(MeshHandle::new(1));
        let owner = owner();

        assert!(weapon.fire(Some(&owner), 0.0, &mut effects).is_none());
        assert!(effects.requests().is_empty());
        assert_eq!(weapon.shots_fired(), 0);
        assert_eq!(weapon.last_fire(), None);
    }

    #[test]
    fn fire_plays_sound_and_records_shot() {
        let mut weapon = controller();
        let mut effects = RecordingEffects::with_default_sockets(MeshHandle::new(1));
        weapon.activate(WeaponProfile::new("AK", 600.0)).unwrap();
        let owner = owner();

        let report = weapon.fire(Some(&owner), 2.5, &mut effects).unwrap();

        assert_eq!(report.shot, ShotId::new(0));
        assert_eq!(report.direction, Vec3::X);
        assert!((report.trace_end - Vec3::new(3000.0, 0.0, 0.0)).length() < 1e-3);
        assert_eq!(weapon.last_fire(), Some(2.5));
        assert_eq!(weapon.shots_fired(), 1);

        let audio = effects.of_kind(RequestKind::Audio);
        assert_eq!(audio.len(), 1);
        assert!(matches!(
            audio[0].request().as_audio(),
            Some(AudioRequest::Play { .. })
        ));
    }

    #[test]
    fn trace_end_follows_config_distance() {
        let presentation = Presentation {
            mesh: MeshHandle::new(1),
            audio: AudioHandle::new(2),
        };
        let mut weapon = WeaponController::with_seed(
            WeaponId::new(3),
            presentation,
            RigConfig::with_trace_distance(100.0),
            0,
        );
        weapon.activate(WeaponProfile::new("AK", 600.0)).unwrap();
        let mut effects = RecordingEffects::new();
        let owner = owner();

        let report = weapon.fire(Some(&owner), 0.0, &mut effects).unwrap();
        assert!((report.trace_end - Vec3::new(100.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn deactivate_clears_timer_and_profile() {
        let mut weapon = controller();
        let mut timers: TimerManager<WeaponId> = TimerManager::new();
        weapon.activate(WeaponProfile::new("AK", 600.0)).unwrap();
        let owner = owner();
        weapon.start_fire(Some(&owner), &mut timers);

        let unloaded = weapon.deactivate(&mut timers);

        assert_eq!(unloaded.map(|p| p.name), Some("AK".to_string()));
        assert_eq!(timers.active_count(), 0);
        assert_eq!(weapon.state(), FireMode::Idle);
        assert!(weapon.profile().is_none());
    }

    #[test]
    fn stale_handle_is_ignored() {
        let mut weapon = controller();
        let mut timers: TimerManager<WeaponId> = TimerManager::new();
        let mut effects = RecordingEffects::new();
        weapon.activate(WeaponProfile::new("AK", 600.0)).unwrap();
        let owner = owner();

        let Some(StartOutcome::Armed(handle)) = weapon.start_fire(Some(&owner), &mut timers)
        else {
            panic!("expected armed timer");
        };
        weapon.stop_fire(Some(&owner), &mut timers, &mut effects);

        assert!(weapon
            .on_timer(handle, 0.0, Some(&owner), &mut effects)
            .is_none());
        assert_eq!(weapon.shots_fired(), 0);
    }
}
