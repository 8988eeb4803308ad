//! Aim resolution and shot dispersion.
//!
//! Orientation follows the engine convention the owning agent reports in:
//! Z up, X forward, angles in degrees. A [`Rotator`] with zero pitch and yaw
//! looks down +X; positive pitch looks up, positive yaw turns toward +Y.
//!
//! Dispersion is sampled uniformly over the solid angle of a cone around the
//! aim direction, so wide cones do not bunch shots at the centre.

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Which camera the owner is aiming through.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AimMode {
    /// Aiming down sights through the scoped/first-person camera
    Aimed,
    /// Hip-fire through the third-person camera
    HipFire,
}

/// Engine-style orientation in degrees.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotator {
    /// Rotation about the right axis; positive looks up
    pub pitch: f32,
    /// Rotation about the up axis; positive turns toward +Y
    pub yaw: f32,
    /// Rotation about the forward axis
    pub roll: f32,
}

impl Rotator {
    /// No rotation.
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    /// Creates a rotator from pitch, yaw and roll in degrees.
    #[must_use]
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Rotation whose forward vector points along `direction` (roll is zero).
    #[must_use]
    pub fn from_direction(direction: Vec3) -> Self {
        let horizontal = direction.x.hypot(direction.y);
        Self {
            pitch: direction.z.atan2(horizontal).to_degrees(),
            yaw: direction.y.atan2(direction.x).to_degrees(),
            roll: 0.0,
        }
    }

    /// Rotation looking from `from` toward `to`.
    #[must_use]
    pub fn look_at(from: Vec3, to: Vec3) -> Self {
        Self::from_direction(to - from)
    }

    /// Unit forward vector of this rotation.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        Vec3::new(cp * cy, cp * sy, sp)
    }

    /// Equivalent quaternion (yaw, then pitch, then roll).
    #[must_use]
    pub fn to_quat(&self) -> Quat {
        Quat::from_rotation_z(self.yaw.to_radians())
            * Quat::from_rotation_y(-self.pitch.to_radians())
            * Quat::from_rotation_x(self.roll.to_radians())
    }
}

/// Location and orientation of one of the owner's cameras.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    /// Eye position in world space
    pub location: Vec3,
    /// Camera orientation
    pub rotation: Rotator,
}

impl CameraView {
    /// Creates a camera view.
    #[must_use]
    pub const fn new(location: Vec3, rotation: Rotator) -> Self {
        Self { location, rotation }
    }

    /// The undispersed aim ray through this camera.
    #[must_use]
    pub fn aim_ray(&self) -> AimRay {
        AimRay {
            origin: self.location,
            direction: self.rotation.forward(),
        }
    }
}

/// Transient aim ray resolved once per shot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AimRay {
    /// Eye position
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl AimRay {
    /// Point `distance` units along the ray.
    #[must_use]
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Samples shot directions inside a dispersion cone.
///
/// # Example
///
/// ```
/// use glam::Vec3;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use salvo_core::aim::AimSampler;
///
/// let sampler = AimSampler::from_degrees(5.0);
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
///
/// let direction = sampler.sample(Vec3::X, &mut rng);
/// assert!(direction.angle_between(Vec3::X) <= 5f32.to_radians() + 1e-3);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AimSampler {
    half_angle: f32,
}

impl AimSampler {
    /// Sampler for a cone with the given half-angle in degrees.
    ///
    /// Negative or non-finite spreads collapse to zero; spreads beyond 180°
    /// are clamped to the full sphere.
    #[must_use]
    pub fn from_degrees(spread: f32) -> Self {
        let half_angle = if spread.is_finite() && spread > 0.0 {
            spread.to_radians().min(PI)
        } else {
            0.0
        };
        Self { half_angle }
    }

    /// Cone half-angle in radians.
    #[must_use]
    pub fn half_angle(&self) -> f32 {
        self.half_angle
    }

    /// Sample a direction inside the cone around `forward`.
    ///
    /// With zero spread `forward` is returned unchanged.
    pub fn sample<R: Rng + ?Sized>(&self, forward: Vec3, rng: &mut R) -> Vec3 {
        if self.half_angle <= 0.0 {
            return forward;
        }
        let Some(axis) = forward.try_normalize() else {
            return forward;
        };

        // Uniform in solid angle: cos(theta) uniform in [cos(half), 1]
        let cos_half = self.half_angle.cos();
        let cos_theta = 1.0 - rng.gen::<f32>() * (1.0 - cos_half);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let (sin_phi, cos_phi) = (rng.gen::<f32>() * TAU).sin_cos();

        let (u, v) = axis.any_orthonormal_pair();
        (axis * cos_theta + (u * cos_phi + v * sin_phi) * sin_theta).normalize()
    }

    /// Camera-mount orientation for a scoped rig.
    ///
    /// The mount faces the trace end with its yaw shifted by `yaw_offset`
    /// and the look-at pitch carried, inverted, on its roll axis.
    #[must_use]
    pub fn mount_rotation(eye: Vec3, trace_end: Vec3, yaw_offset: f32) -> Rotator {
        let look = Rotator::look_at(eye, trace_end);
        Rotator::new(0.0, look.yaw + yaw_offset, -look.pitch)
    }
}
