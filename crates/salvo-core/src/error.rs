//! Error taxonomy for the weapon core.
//!
//! Runtime firing paths never surface these: a missing owner or profile makes
//! the operation a logged no-op. The enum exists for configuration-time
//! operations (profile validation, loadout parsing, activation) and for
//! hosts that want to report why a weapon stayed silent.

use thiserror::Error;

use crate::profile::WeaponMode;

/// Errors raised by configuration-time weapon operations.
#[derive(Debug, Error)]
pub enum WeaponError {
    /// The weapon has no owning agent to aim from.
    #[error("weapon has no owner")]
    MissingOwner,

    /// No profile is loaded for the weapon or the requested slot.
    #[error("no weapon profile loaded")]
    MissingProfile,

    /// Rate of fire is not a positive number up to
    /// [`MAX_RATE_OF_FIRE`](crate::profile::MAX_RATE_OF_FIRE); the weapon
    /// cannot fire.
    #[error("invalid rate of fire {rate} for '{name}': must be > 0 and <= 60000 rounds/min")]
    InvalidRateOfFire {
        /// Profile name
        name: String,
        /// Offending value (rounds per minute)
        rate: f32,
    },

    /// A tuning value is negative or not finite.
    #[error("invalid {field} {value} for '{name}': must be a finite value >= 0")]
    InvalidProfile {
        /// Profile name
        name: String,
        /// Field that failed validation
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// A weapon-mode slot exists but holds no profiles.
    #[error("no profiles stored for {0} slot")]
    EmptySlot(WeaponMode),

    /// The selected index points past the end of a slot.
    #[error("selected index {index} out of range for {mode} slot with {len} profiles")]
    SelectionOutOfRange {
        /// Slot that was queried
        mode: WeaponMode,
        /// Selected index
        index: usize,
        /// Number of profiles in the slot
        len: usize,
    },

    /// A loadout or config document could not be decoded.
    #[error("failed to decode weapon data: {0}")]
    Json(#[from] serde_json::Error),

    /// The host scheduler rejected a timer.
    #[error("scheduler rejected fire timer: {0}")]
    Timer(#[from] cadence::TimerError),
}

/// Result alias for weapon operations.
pub type Result<T> = std::result::Result<T, WeaponError>;
