//! # Salvo Core
//!
//! Firing scheduler and shot-resolution pipeline for player-wielded ranged
//! weapons.
//!
//! The crate decides *when* a weapon may shoot (rate of fire, shotgun burst
//! gating) and *what* a shot produces (dispersed aim ray, muzzle flash,
//! projectile, shell, recoil, camera shake, fire sound). Rendering, physics
//! and audio stay on the host side: every side effect is a request handed to
//! an [`EffectService`].
//!
//! ## Architecture
//!
//! - **Profiles**: immutable per-weapon tuning ([`WeaponProfile`]), stored per
//!   mode slot in a [`Loadout`]
//! - **Scheduler**: cadence state and the single repeating fire timer
//!   ([`FireScheduler`]), armed through [`cadence::Scheduler`]
//! - **Aim**: cone-uniform dispersion around the owner's camera ray
//!   ([`AimSampler`])
//! - **Dispatch**: best-effort per-shot requests ([`ShotEffectDispatcher`])
//! - **Controller**: trigger state machine tying it together
//!   ([`WeaponController`])
//!
//! Collaborators are traits: [`WeaponOwner`] for the owning agent,
//! [`EffectService`] for presentation, [`ProfileStore`] for persisted
//! loadouts, and [`cadence::Scheduler`] for timers.
//!
//! ## Determinism
//!
//! Dispersion and recoil draw from a `ChaCha8Rng`. Weapons are
//! entropy-seeded by default; [`WeaponController::with_seed`] makes every
//! shot replayable.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

// Re-export the timer substrate
pub use cadence;

pub mod aim;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod loadout;
pub mod owner;
pub mod profile;
pub mod request;
pub mod scheduler;

pub use aim::{AimMode, AimRay, AimSampler, CameraView, Rotator};
pub use config::RigConfig;
pub use controller::{FireMode, ShotReport, WeaponController};
pub use dispatch::{DispatchSteps, ShotContext, ShotEffectDispatcher};
pub use error::{Result, WeaponError};
pub use loadout::{Loadout, LoadoutSlot, ProfileStore};
pub use owner::{OwnerState, WeaponOwner};
pub use profile::{EffectKind, WeaponMode, WeaponProfile};
pub use request::{
    AimRequest, AudioHandle, AudioRequest, EffectRequest, EffectService, MeshHandle,
    Presentation, RequestEnvelope, RequestKind, ShotId, SpawnRequest, VisualRequest, WeaponId,
};
pub use scheduler::{FireScheduler, FireState, StartOutcome};

#[cfg(test)]
mod tests;
