//! The owning agent a weapon aims and fires for.
//!
//! The weapon never mutates its owner directly. Aim kicks and camera-mount
//! orientation go out as requests through the
//! [`EffectService`](crate::request::EffectService); the owner is only read.

use serde::{Deserialize, Serialize};

use crate::aim::{AimMode, CameraView};
use crate::profile::WeaponMode;

/// Read-only view of the character wielding a weapon.
pub trait WeaponOwner {
    /// Whether the owner is aiming down sights or firing from the hip.
    fn aim_mode(&self) -> AimMode;

    /// Camera used for the given aim mode, if the owner has one.
    fn camera(&self, mode: AimMode) -> Option<CameraView>;

    /// Weapon mode the owner currently has selected.
    fn weapon_mode(&self) -> WeaponMode;

    /// Whether the owner carries a scoped rig whose camera mount follows
    /// the shot trace.
    fn has_scoped_rig(&self) -> bool;

    /// Whether a controlling agent exists to play camera shakes on.
    fn has_controller(&self) -> bool;

    /// Camera for the current aim mode.
    fn active_camera(&self) -> Option<CameraView> {
        self.camera(self.aim_mode())
    }
}

/// Plain-data [`WeaponOwner`] for hosts that snapshot their character each
/// frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerState {
    /// Current aim mode
    pub aim_mode: AimMode,
    /// Third-person camera
    pub hip_camera: Option<CameraView>,
    /// Scoped/first-person camera
    pub scoped_camera: Option<CameraView>,
    /// Selected weapon mode
    pub weapon_mode: WeaponMode,
    /// Scoped-rig capability, fixed when the character is built
    pub has_scoped_rig: bool,
    /// Whether a player controller is attached
    pub has_controller: bool,
}

impl OwnerState {
    /// A hip-firing, player-controlled owner with a single camera.
    #[must_use]
    pub fn hip_fire(camera: CameraView, weapon_mode: WeaponMode) -> Self {
        Self {
            aim_mode: AimMode::HipFire,
            hip_camera: Some(camera),
            scoped_camera: None,
            weapon_mode,
            has_scoped_rig: false,
            has_controller: true,
        }
    }
}

impl WeaponOwner for OwnerState {
    fn aim_mode(&self) -> AimMode {
        self.aim_mode
    }

    fn camera(&self, mode: AimMode) -> Option<CameraView> {
        match mode {
            AimMode::Aimed => self.scoped_camera,
            AimMode::HipFire => self.hip_camera,
        }
    }

    fn weapon_mode(&self) -> WeaponMode {
        self.weapon_mode
    }

    fn has_scoped_rig(&self) -> bool {
        self.has_scoped_rig
    }

    fn has_controller(&self) -> bool {
        self.has_controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aim::Rotator;
    use glam::Vec3;

    #[test]
    fn active_camera_follows_aim_mode() {
        let hip = CameraView::new(Vec3::ZERO, Rotator::ZERO);
        let scope = CameraView::new(Vec3::Z, Rotator::new(0.0, 45.0, 0.0));
        let mut owner = OwnerState::hip_fire(hip, WeaponMode::Sniper);
        owner.scoped_camera = Some(scope);

        assert_eq!(owner.active_camera(), Some(hip));
        owner.aim_mode = AimMode::Aimed;
        assert_eq!(owner.active_camera(), Some(scope));
    }

    #[test]
    fn missing_scoped_camera() {
        let mut owner = OwnerState::hip_fire(
            CameraView::new(Vec3::ZERO, Rotator::ZERO),
            WeaponMode::Primary,
        );
        owner.aim_mode = AimMode::Aimed;
        assert!(owner.active_camera().is_none());
    }
}
