//! Per-shot side effects.
//!
//! The [`ShotEffectDispatcher`] turns a resolved shot into requests for the
//! host's [`EffectService`]. Each step is independent and best-effort: a
//! profile without a muzzle flash simply skips that step, and a missing
//! socket skips the spawn that needed it. Nothing is rolled back because no
//! step depends on another.
//!
//! # Steps
//!
//! 1. Muzzle flash attached at the muzzle socket
//! 2. Projectile/tracer spawned at the muzzle, facing the trace end
//! 3. Shell casing spawned at the eject socket with the mesh orientation
//! 4. Recoil kick (Primary weapon mode only)
//! 5. Camera shake through the controlling agent

use bitflags::bitflags;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::aim::Rotator;
use crate::config::RigConfig;
use crate::owner::WeaponOwner;
use crate::profile::{WeaponMode, WeaponProfile};
use crate::request::{
    AimRequest, EffectRequest, EffectService, Presentation, RequestEnvelope, ShotId, SpawnRequest,
    VisualRequest, WeaponId,
};

bitflags! {
    /// Dispatch steps that issued a request for a shot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DispatchSteps: u8 {
        /// Muzzle flash requested
        const MUZZLE_FLASH = 1 << 0;
        /// Projectile or tracer spawn requested
        const PROJECTILE = 1 << 1;
        /// Shell casing spawn requested
        const SHELL = 1 << 2;
        /// Recoil kick requested
        const RECOIL = 1 << 3;
        /// Camera shake requested
        const CAMERA_SHAKE = 1 << 4;
    }
}

/// What the dispatcher needs to know about the shot being resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotContext {
    /// Weapon firing
    pub weapon: WeaponId,
    /// Shot sequence number
    pub shot: ShotId,
    /// Game time of the shot
    pub time: f64,
    /// End point of the dispersed aim trace
    pub trace_end: Vec3,
    /// Weapon mesh and audio handles
    pub presentation: Presentation,
}

impl ShotContext {
    fn envelope(&self, request: impl Into<EffectRequest>) -> RequestEnvelope {
        RequestEnvelope::new(request.into(), self.weapon, Some(self.shot), self.time)
    }
}

/// Issues the visual, spawn and aim requests for a shot.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotEffectDispatcher {
    muzzle_socket: String,
    shell_socket: String,
}

impl Default for ShotEffectDispatcher {
    fn default() -> Self {
        Self::new(&RigConfig::default())
    }
}

impl ShotEffectDispatcher {
    /// Dispatcher using the sockets named in `config`.
    #[must_use]
    pub fn new(config: &RigConfig) -> Self {
        Self {
            muzzle_socket: config.muzzle_socket.clone(),
            shell_socket: config.shell_socket.clone(),
        }
    }

    /// Run every dispatch step for one shot and report which ones issued a
    /// request.
    pub fn dispatch<O, E, R>(
        &self,
        shot: &ShotContext,
        profile: &WeaponProfile,
        owner: &O,
        effects: &mut E,
        rng: &mut R,
    ) -> DispatchSteps
    where
        O: WeaponOwner + ?Sized,
        E: EffectService + ?Sized,
        R: Rng + ?Sized,
    {
        let mut steps = DispatchSteps::empty();
        let mesh = shot.presentation.mesh;

        if let Some(effect) = &profile.muzzle_flash {
            effects.submit(shot.envelope(VisualRequest::MuzzleFlash {
                effect: effect.clone(),
                mesh,
                socket: self.muzzle_socket.clone(),
            }));
            steps |= DispatchSteps::MUZZLE_FLASH;
        }

        if let Some(kind) = &profile.projectile {
            match effects.socket_location(mesh, &self.muzzle_socket) {
                Some(location) => {
                    effects.submit(shot.envelope(SpawnRequest::Projectile {
                        kind: kind.clone(),
                        location,
                        rotation: Rotator::look_at(location, shot.trace_end),
                        damage: profile.base_damage,
                        owner: shot.weapon,
                    }));
                    steps |= DispatchSteps::PROJECTILE;
                }
                None => {
                    debug!(weapon = %shot.weapon, socket = %self.muzzle_socket, "projectile skipped: muzzle socket not found");
                }
            }
        }

        if let Some(kind) = &profile.shell {
            match effects.socket_location(mesh, &self.shell_socket) {
                Some(location) => {
                    let rotation = effects.mesh_rotation(mesh);
                    effects.submit(shot.envelope(SpawnRequest::Shell {
                        kind: kind.clone(),
                        location,
                        rotation,
                    }));
                    steps |= DispatchSteps::SHELL;
                }
                None => {
                    debug!(weapon = %shot.weapon, socket = %self.shell_socket, "shell skipped: eject socket not found");
                }
            }
        }

        let recoil = profile.camera_recoil;
        if owner.weapon_mode() == WeaponMode::Primary && recoil.is_finite() && recoil > 0.0 {
            // Kick never raises the view: pitch only goes down
            let yaw = rng.gen_range(-recoil..=recoil);
            let pitch = rng.gen_range(-recoil..=0.0);
            effects.submit(shot.envelope(AimRequest::Kick { yaw, pitch }));
            steps |= DispatchSteps::RECOIL;
        }

        if let Some(shake) = &profile.camera_shake {
            if owner.has_controller() {
                effects.submit(shot.envelope(VisualRequest::CameraShake {
                    shake: shake.clone(),
                }));
                steps |= DispatchSteps::CAMERA_SHAKE;
            }
        }

        trace!(weapon = %shot.weapon, shot = %shot.shot, ?steps, "shot effects dispatched");
        steps
    }
}
