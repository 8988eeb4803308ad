//! Requests the weapon core issues to its presentation collaborators.
//!
//! The core never renders, plays audio or spawns actors itself. Every side
//! effect of a shot is expressed as an [`EffectRequest`] and handed to the
//! host's [`EffectService`], wrapped in a [`RequestEnvelope`] that records
//! which weapon and which shot produced it.
//!
//! # Architecture
//!
//! Requests use a nested enum hierarchy for categorical routing:
//! - [`VisualRequest`]: muzzle flashes and camera shakes
//! - [`SpawnRequest`]: projectiles/tracers and shell casings
//! - [`AimRequest`]: recoil kicks and scoped camera-mount orientation
//! - [`AudioRequest`]: fire sound start/stop
//!
//! # Example
//!
//! ```
//! use salvo_core::request::{
//!     AudioHandle, AudioRequest, EffectRequest, RequestEnvelope, RequestKind, ShotId, WeaponId,
//! };
//!
//! let envelope = RequestEnvelope::new(
//!     AudioRequest::Play { audio: AudioHandle::new(3) }.into(),
//!     WeaponId::new(1),
//!     Some(ShotId::new(0)),
//!     0.5,
//! );
//!
//! assert_eq!(envelope.request().kind(), RequestKind::Audio);
//! assert_eq!(envelope.weapon(), WeaponId::new(1));
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aim::Rotator;
use crate::profile::EffectKind;

// =============================================================================
// Identification Types
// =============================================================================

/// Identifier of a weapon instance.
///
/// Used as the timer payload and as the owner tag on spawned projectiles.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeaponId(u64);

impl WeaponId {
    /// Creates a new `WeaponId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeaponId({})", self.0)
    }
}

impl fmt::Display for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequence number of a shot fired by one weapon.
///
/// Every request produced while resolving a shot carries the same `ShotId`,
/// which lets hosts group a muzzle flash with its tracer and shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShotId(u64);

impl ShotId {
    /// Creates a new shot ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this shot ID.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shot:{}", self.0)
    }
}

/// Opaque handle to the weapon's mesh presentation, owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle(u64);

impl MeshHandle {
    /// Wraps a host-side mesh identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Opaque handle to the weapon's audio emitter, owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioHandle(u64);

impl AudioHandle {
    /// Wraps a host-side audio emitter identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Presentation handles a weapon holds on to for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Presentation {
    /// Weapon mesh (sockets, orientation)
    pub mesh: MeshHandle,
    /// Fire sound emitter
    pub audio: AudioHandle,
}

// =============================================================================
// Request Categories
// =============================================================================

/// Visual effects attached to the weapon or played on the owner's camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VisualRequest {
    /// Attach a muzzle-flash effect at a mesh socket.
    MuzzleFlash {
        /// Effect to spawn
        effect: EffectKind,
        /// Mesh to attach to
        mesh: MeshHandle,
        /// Socket on the mesh
        socket: String,
    },
    /// Play a camera shake through the owner's controlling agent.
    CameraShake {
        /// Shake to play
        shake: EffectKind,
    },
}

/// Actors spawned per shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpawnRequest {
    /// Spawn a projectile or tracer actor.
    Projectile {
        /// Actor kind
        kind: EffectKind,
        /// Spawn location (muzzle socket)
        location: Vec3,
        /// Orientation toward the trace end
        rotation: Rotator,
        /// Damage the projectile carries
        damage: f32,
        /// Weapon the projectile belongs to
        owner: WeaponId,
    },
    /// Spawn a shell casing; the host throws it on spawn.
    Shell {
        /// Actor kind
        kind: EffectKind,
        /// Spawn location (shell-eject socket)
        location: Vec3,
        /// Weapon mesh orientation at the time of the shot
        rotation: Rotator,
    },
}

/// Changes to the owner's aim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AimRequest {
    /// Add recoil to the owner's view (degrees).
    Kick {
        /// Yaw delta
        yaw: f32,
        /// Pitch delta (never positive)
        pitch: f32,
    },
    /// Point a scoped rig's camera mount at the shot trace.
    OrientCameraMount {
        /// World rotation for the mount
        rotation: Rotator,
    },
}

/// Fire sound control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioRequest {
    /// Start the fire sound.
    Play {
        /// Emitter to play on
        audio: AudioHandle,
    },
    /// Stop the looping fire sound.
    Stop {
        /// Emitter to stop
        audio: AudioHandle,
    },
}

// =============================================================================
// Top-Level Request Enum
// =============================================================================

/// Request kind for routing to the right presentation subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// Visual requests
    Visual,
    /// Spawn requests
    Spawn,
    /// Aim requests
    Aim,
    /// Audio requests
    Audio,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visual => write!(f, "Visual"),
            Self::Spawn => write!(f, "Spawn"),
            Self::Aim => write!(f, "Aim"),
            Self::Audio => write!(f, "Audio"),
        }
    }
}

/// A side effect the weapon asks its collaborators to perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectRequest {
    /// A visual request
    Visual(VisualRequest),
    /// A spawn request
    Spawn(SpawnRequest),
    /// An aim request
    Aim(AimRequest),
    /// An audio request
    Audio(AudioRequest),
}

impl EffectRequest {
    /// Returns the kind of this request for routing.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::Visual(_) => RequestKind::Visual,
            Self::Spawn(_) => RequestKind::Spawn,
            Self::Aim(_) => RequestKind::Aim,
            Self::Audio(_) => RequestKind::Audio,
        }
    }

    /// Returns the visual request, if this is one.
    #[must_use]
    pub const fn as_visual(&self) -> Option<&VisualRequest> {
        match self {
            Self::Visual(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the spawn request, if this is one.
    #[must_use]
    pub const fn as_spawn(&self) -> Option<&SpawnRequest> {
        match self {
            Self::Spawn(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the aim request, if this is one.
    #[must_use]
    pub const fn as_aim(&self) -> Option<&AimRequest> {
        match self {
            Self::Aim(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the audio request, if this is one.
    #[must_use]
    pub const fn as_audio(&self) -> Option<&AudioRequest> {
        match self {
            Self::Audio(r) => Some(r),
            _ => None,
        }
    }
}

impl From<VisualRequest> for EffectRequest {
    fn from(r: VisualRequest) -> Self {
        Self::Visual(r)
    }
}

impl From<SpawnRequest> for EffectRequest {
    fn from(r: SpawnRequest) -> Self {
        Self::Spawn(r)
    }
}

impl From<AimRequest> for EffectRequest {
    fn from(r: AimRequest) -> Self {
        Self::Aim(r)
    }
}

impl From<AudioRequest> for EffectRequest {
    fn from(r: AudioRequest) -> Self {
        Self::Audio(r)
    }
}

// =============================================================================
// Request Envelope
// =============================================================================

/// A request plus the weapon, shot and game time that produced it.
///
/// `shot` is `None` for requests issued outside a shot, such as stopping the
/// fire sound when the trigger is released.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    request: EffectRequest,
    weapon: WeaponId,
    shot: Option<ShotId>,
    time: f64,
}

impl RequestEnvelope {
    /// Wraps a request.
    #[must_use]
    pub fn new(request: EffectRequest, weapon: WeaponId, shot: Option<ShotId>, time: f64) -> Self {
        Self {
            request,
            weapon,
            shot,
            time,
        }
    }

    /// The wrapped request.
    #[must_use]
    pub fn request(&self) -> &EffectRequest {
        &self.request
    }

    /// Unwraps the request.
    #[must_use]
    pub fn into_request(self) -> EffectRequest {
        self.request
    }

    /// Weapon that issued the request.
    #[must_use]
    pub const fn weapon(&self) -> WeaponId {
        self.weapon
    }

    /// Shot the request belongs to.
    #[must_use]
    pub const fn shot(&self) -> Option<ShotId> {
        self.shot
    }

    /// Game time at which the request was issued.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }
}

// =============================================================================
// Effect Service
// =============================================================================

/// Host-side effect, spawn and audio service.
///
/// The core queries mesh sockets and orientation to place spawns, then
/// submits requests. Implementations should never block; requests are
/// best-effort and the core does not wait for or check their outcome.
pub trait EffectService {
    /// World location of a named socket on a mesh, if it exists.
    fn socket_location(&self, mesh: MeshHandle, socket: &str) -> Option<Vec3>;

    /// Current world orientation of a mesh.
    fn mesh_rotation(&self, mesh: MeshHandle) -> Rotator;

    /// Accept a request.
    fn submit(&mut self, envelope: RequestEnvelope);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_kinds() {
        let flash: EffectRequest = VisualRequest::CameraShake {
            shake: EffectKind::new("CS"),
        }
        .into();
        let kick: EffectRequest = AimRequest::Kick {
            yaw: 0.5,
            pitch: -0.2,
        }
        .into();
        let stop: EffectRequest = AudioRequest::Stop {
            audio: AudioHandle::new(1),
        }
        .into();

        assert_eq!(flash.kind(), RequestKind::Visual);
        assert_eq!(kick.kind(), RequestKind::Aim);
        assert_eq!(stop.kind(), RequestKind::Audio);
        assert!(kick.as_aim().is_some());
        assert!(kick.as_spawn().is_none());
    }

    #[test]
    fn envelope_accessors() {
        let envelope = RequestEnvelope::new(
            SpawnRequest::Shell {
                kind: EffectKind::new("Shell"),
                location: Vec3::ONE,
                rotation: Rotator::ZERO,
            }
            .into(),
            WeaponId::new(4),
            Some(ShotId::new(9)),
            1.25,
        );

        assert_eq!(envelope.weapon(), WeaponId::new(4));
        assert_eq!(envelope.shot(), Some(ShotId::new(9)));
        assert_eq!(envelope.time(), 1.25);
        assert_eq!(envelope.request().kind(), RequestKind::Spawn);
    }

    #[test]
    fn envelope_serializes() {
        let envelope = RequestEnvelope::new(
            AudioRequest::Play {
                audio: AudioHandle::new(2),
            }
            .into(),
            WeaponId::new(1),
            None,
            0.0,
        );
        let json = serde_json::to_string(&envelope).unwrap();
        let restored: RequestEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, envelope);
    }

    #[test]
    fn ids_display() {
        assert_eq!(WeaponId::new(7).to_string(), "7");
        assert_eq!(ShotId::new(3).to_string(), "shot:3");
        assert_eq!(format!("{:?}", WeaponId::new(7)), "WeaponId(7)");
    }

    #[test]
    fn effect_service_is_object_safe() {
        fn _accepts_dyn(_service: &mut dyn EffectService) {}
    }
}
