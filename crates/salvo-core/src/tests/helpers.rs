//! Test helper functions for setting up weapons, owners and host loops.
//!
//! This module provides a recording effect service, factory functions and a
//! minimal host loop that make writing tests more ergonomic and consistent.

use std::collections::HashMap;

use cadence::TimerManager;
use glam::Vec3;

use crate::aim::{AimMode, CameraView, Rotator};
use crate::config::RigConfig;
use crate::controller::{ShotReport, WeaponController};
use crate::owner::{OwnerState, WeaponOwner};
use crate::profile::{WeaponMode, WeaponProfile};
use crate::request::{
    AudioHandle, AudioRequest, EffectService, MeshHandle, Presentation, RequestEnvelope,
    RequestKind, WeaponId,
};

/// Mesh handle every test weapon uses.
pub const TEST_MESH: MeshHandle = MeshHandle::new(10);

/// Audio handle every test weapon uses.
pub const TEST_AUDIO: AudioHandle = AudioHandle::new(20);

/// Muzzle socket location of the default test mesh.
pub const MUZZLE_LOCATION: Vec3 = Vec3::new(60.0, 0.0, 140.0);

/// Shell-eject socket location of the default test mesh.
pub const SHELL_LOCATION: Vec3 = Vec3::new(30.0, 10.0, 140.0);

/// Eye height of test owners.
pub const EYE: Vec3 = Vec3::new(0.0, 0.0, 170.0);

// =============================================================================
// Recording Effect Service
// =============================================================================

/// Effect service that records every submitted request.
#[derive(Debug, Default)]
pub struct RecordingEffects {
    sockets: HashMap<(MeshHandle, String), Vec3>,
    mesh_rotation: Rotator,
    requests: Vec<RequestEnvelope>,
}

impl RecordingEffects {
    /// Creates a service with no sockets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service where `mesh` has the default muzzle and
    /// shell-eject sockets.
    ///
    /// # Arguments
    ///
    /// * `mesh` - The mesh to register sockets on
    pub fn with_default_sockets(mesh: MeshHandle) -> Self {
        let config = RigConfig::default();
        let mut effects = Self::new();
        effects.set_socket(mesh, &config.muzzle_socket, MUZZLE_LOCATION);
        effects.set_socket(mesh, &config.shell_socket, SHELL_LOCATION);
        effects
    }

    /// Registers a socket location.
    pub fn set_socket(&mut self, mesh: MeshHandle, socket: &str, location: Vec3) {
        self.sockets.insert((mesh, socket.to_string()), location);
    }

    /// Sets the orientation reported for every mesh.
    pub fn set_mesh_rotation(&mut self, rotation: Rotator) {
        self.mesh_rotation = rotation;
    }

    /// All requests in submission order.
    pub fn requests(&self) -> &[RequestEnvelope] {
        &self.requests
    }

    /// Requests of one kind, in submission order.
    pub fn of_kind(&self, kind: RequestKind) -> Vec<&RequestEnvelope> {
        self.requests
            .iter()
            .filter(|envelope| envelope.request().kind() == kind)
            .collect()
    }

    /// Times at which the fire sound was played, one per shot.
    pub fn shot_times(&self) -> Vec<f64> {
        self.requests
            .iter()
            .filter(|envelope| {
                matches!(
                    envelope.request().as_audio(),
                    Some(AudioRequest::Play { .. })
                )
            })
            .map(RequestEnvelope::time)
            .collect()
    }

    /// Forget recorded requests.
    pub fn clear(&mut self) {
        self.requests.clear();
    }
}

impl EffectService for RecordingEffects {
    fn socket_location(&self, mesh: MeshHandle, socket: &str) -> Option<Vec3> {
        self.sockets.get(&(mesh, socket.to_string())).copied()
    }

    fn mesh_rotation(&self, _mesh: MeshHandle) -> Rotator {
        self.mesh_rotation
    }

    fn submit(&mut self, envelope: RequestEnvelope) {
        self.requests.push(envelope);
    }
}

// =============================================================================
// Factory Functions
// =============================================================================

/// Presentation handles matching [`RecordingEffects::with_default_sockets`]
/// on [`TEST_MESH`].
pub fn presentation() -> Presentation {
    Presentation {
        mesh: TEST_MESH,
        audio: TEST_AUDIO,
    }
}

/// Creates a seeded weapon with `profile` loaded.
///
/// # Arguments
///
/// * `id` - Raw weapon identifier
/// * `profile` - Profile to activate (must be valid)
/// * `seed` - RNG seed for dispersion and recoil
///
/// # Returns
///
/// The activated weapon.
pub fn armed_weapon(id: u64, profile: WeaponProfile, seed: u64) -> WeaponController {
    let mut weapon =
        WeaponController::with_seed(WeaponId::new(id), presentation(), RigConfig::default(), seed);
    weapon
        .activate(profile)
        .expect("test profile should be valid");
    weapon
}

/// Creates a player-controlled owner firing from the hip, looking down +X.
pub fn hip_owner(mode: WeaponMode) -> OwnerState {
    OwnerState::hip_fire(CameraView::new(EYE, Rotator::ZERO), mode)
}

/// Creates an owner aiming down a scoped rig.
///
/// # Arguments
///
/// * `rotation` - Orientation of the scoped camera
pub fn scoped_owner(rotation: Rotator) -> OwnerState {
    OwnerState {
        aim_mode: AimMode::Aimed,
        hip_camera: Some(CameraView::new(EYE, Rotator::ZERO)),
        scoped_camera: Some(CameraView::new(EYE, rotation)),
        weapon_mode: WeaponMode::Sniper,
        has_scoped_rig: true,
        has_controller: true,
    }
}

// =============================================================================
// Host Loop
// =============================================================================

/// Delivers every due expiry to `weapon`, one at a time.
///
/// Each expiry fires at its nominal due time, the way a host loop routes
/// timer payloads back to the weapon that armed them.
///
/// # Returns
///
/// The shots resolved, in firing order.
pub fn drain_due(
    timers: &mut TimerManager<WeaponId>,
    weapon: &mut WeaponController,
    owner: &dyn WeaponOwner,
    effects: &mut RecordingEffects,
) -> Vec<ShotReport> {
    let mut shots = Vec::new();
    while let Some(expiry) = timers.pop_due() {
        assert_eq!(expiry.payload, weapon.id(), "expiry routed to wrong weapon");
        if let Some(report) = weapon.on_timer(expiry.handle, expiry.due, Some(owner), effects) {
            shots.push(report);
        }
    }
    shots
}

/// Runs the host loop in fixed frames until the clock reaches `until`.
///
/// Due expiries are drained before the first step and after every step.
///
/// # Arguments
///
/// * `dt` - Frame length; use a binary fraction so the clock lands exactly
///   on `until`
pub fn run_frames(
    timers: &mut TimerManager<WeaponId>,
    weapon: &mut WeaponController,
    owner: &dyn WeaponOwner,
    effects: &mut RecordingEffects,
    dt: f64,
    until: f64,
) -> Vec<ShotReport> {
    let mut shots = drain_due(timers, weapon, owner, effects);
    while timers.clock().now() < until {
        timers.advance(dt).expect("frame step should be valid");
        shots.extend(drain_due(timers, weapon, owner, effects));
    }
    shots
}

/// Installs a fmt subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}
