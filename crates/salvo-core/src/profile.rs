//! Weapon tuning data.
//!
//! A [`WeaponProfile`] is the immutable set of tuning values for one weapon,
//! resolved from persisted loadout data when the weapon is activated. The
//! profile never changes while the weapon is active; reselecting a weapon
//! loads a new profile.
//!
//! # Example
//!
//! ```
//! use salvo_core::profile::{EffectKind, WeaponProfile};
//!
//! let rifle = WeaponProfile::new("AK", 600.0)
//!     .with_spread(1.5)
//!     .with_muzzle_flash(EffectKind::new("P_MuzzleFlash"));
//!
//! assert_eq!(rifle.time_between_shots(), Some(0.1));
//! assert!(rifle.validate().is_ok());
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, WeaponError};

/// Seconds per minute, used to turn rounds/minute into a shot interval.
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Highest rate of fire a weapon arms its timer for (rounds per minute),
/// one shot per millisecond.
pub const MAX_RATE_OF_FIRE: f32 = 60_000.0;

/// Firing discipline the owning agent currently has selected.
///
/// Stored per slot in a [`Loadout`](crate::loadout::Loadout); also read
/// from the owner to decide whether recoil and looping audio apply.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponMode {
    /// Automatic primary weapon (rifles, SMGs)
    Primary,
    /// Scoped precision weapon
    Sniper,
    /// Pump/break-action weapon gated by a burst delay
    Shotgun,
}

impl WeaponMode {
    /// All modes in slot order.
    pub const ALL: [Self; 3] = [Self::Primary, Self::Sniper, Self::Shotgun];
}

impl fmt::Display for WeaponMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "Primary"),
            Self::Sniper => write!(f, "Sniper"),
            Self::Shotgun => write!(f, "Shotgun"),
        }
    }
}

/// Identifier of an effect, actor or camera-shake asset known to the host.
///
/// The core never interprets the string; it is handed back to the effect
/// service verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectKind(String);

impl EffectKind {
    /// Creates a new `EffectKind` from a string.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EffectKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Immutable per-weapon tuning values.
///
/// Angles are in degrees, times in seconds, rate of fire in rounds per
/// minute. Optional effect kinds that are `None` make the corresponding
/// dispatch step a silent skip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Display name
    pub name: String,
    /// Damage tagged onto spawned projectiles
    #[serde(default)]
    pub base_damage: f32,
    /// Rounds per minute
    pub rate_of_fire: f32,
    /// Minimum gap between shotgun shots (seconds)
    #[serde(default)]
    pub shotgun_burst_delay: f32,
    /// Half-angle of the dispersion cone (degrees)
    #[serde(default)]
    pub bullet_spread: f32,
    /// Maximum camera kick per shot (degrees)
    #[serde(default)]
    pub camera_recoil: f32,
    /// Camera offset used by the owner while aiming down sights
    #[serde(default)]
    pub aim_offset: Vec3,
    /// Whether the owner shows a scope overlay while aiming
    #[serde(default)]
    pub uses_aim_texture: bool,
    /// Projectile or tracer actor spawned per shot
    #[serde(default)]
    pub projectile: Option<EffectKind>,
    /// Muzzle-flash effect attached at the muzzle socket
    #[serde(default)]
    pub muzzle_flash: Option<EffectKind>,
    /// Shell casing ejected per shot
    #[serde(default)]
    pub shell: Option<EffectKind>,
    /// Camera shake played by the controlling agent per shot
    #[serde(default)]
    pub camera_shake: Option<EffectKind>,
}

impl WeaponProfile {
    /// Creates a profile with the given name and rate of fire and every
    /// other value zeroed or unset.
    #[must_use]
    pub fn new(name: &str, rate_of_fire: f32) -> Self {
        Self {
            name: name.to_string(),
            base_damage: 0.0,
            rate_of_fire,
            shotgun_burst_delay: 0.0,
            bullet_spread: 0.0,
            camera_recoil: 0.0,
            aim_offset: Vec3::ZERO,
            uses_aim_texture: false,
            projectile: None,
            muzzle_flash: None,
            shell: None,
            camera_shake: None,
        }
    }

    /// Sets the projectile damage.
    #[must_use]
    pub fn with_damage(mut self, base_damage: f32) -> Self {
        self.base_damage = base_damage;
        self
    }

    /// Sets the dispersion half-angle in degrees.
    #[must_use]
    pub fn with_spread(mut self, degrees: f32) -> Self {
        self.bullet_spread = degrees;
        self
    }

    /// Sets the camera recoil in degrees.
    #[must_use]
    pub fn with_recoil(mut self, degrees: f32) -> Self {
        self.camera_recoil = degrees;
        self
    }

    /// Sets the shotgun burst delay in seconds.
    #[must_use]
    pub fn with_burst_delay(mut self, seconds: f32) -> Self {
        self.shotgun_burst_delay = seconds;
        self
    }

    /// Sets the projectile kind.
    #[must_use]
    pub fn with_projectile(mut self, kind: EffectKind) -> Self {
        self.projectile = Some(kind);
        self
    }

    /// Sets the muzzle-flash kind.
    #[must_use]
    pub fn with_muzzle_flash(mut self, kind: EffectKind) -> Self {
        self.muzzle_flash = Some(kind);
        self
    }

    /// Sets the shell-eject kind.
    #[must_use]
    pub fn with_shell(mut self, kind: EffectKind) -> Self {
        self.shell = Some(kind);
        self
    }

    /// Sets the camera-shake kind.
    #[must_use]
    pub fn with_camera_shake(mut self, kind: EffectKind) -> Self {
        self.camera_shake = Some(kind);
        self
    }

    /// Seconds between automatic shots, `60 / rate_of_fire`.
    ///
    /// Returns `None` when the rate is zero, negative or not finite: such a
    /// weapon cannot fire.
    #[must_use]
    pub fn time_between_shots(&self) -> Option<f64> {
        let rate = f64::from(self.rate_of_fire);
        (rate.is_finite() && rate > 0.0).then(|| SECONDS_PER_MINUTE / rate)
    }

    /// Interval the fire timer is armed with.
    ///
    /// Same as [`Self::time_between_shots`], but `None` above
    /// [`MAX_RATE_OF_FIRE`].
    #[must_use]
    pub fn fire_interval(&self) -> Option<f64> {
        self.time_between_shots()
            .filter(|_| self.rate_of_fire <= MAX_RATE_OF_FIRE)
    }

    /// Checks every tuning value.
    ///
    /// # Errors
    ///
    /// Returns [`WeaponError::InvalidRateOfFire`] for a rate that is not in
    /// `(0, MAX_RATE_OF_FIRE]` and
    /// [`WeaponError::InvalidProfile`] for the first negative or non-finite
    /// tuning value.
    pub fn validate(&self) -> Result<()> {
        if self.fire_interval().is_none() {
            return Err(WeaponError::InvalidRateOfFire {
                name: self.name.clone(),
                rate: self.rate_of_fire,
            });
        }

        let checks = [
            ("base_damage", self.base_damage),
            ("shotgun_burst_delay", self.shotgun_burst_delay),
            ("bullet_spread", self.bullet_spread),
            ("camera_recoil", self.camera_recoil),
        ];
        for (field, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(WeaponError::InvalidProfile {
                    name: self.name.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}
