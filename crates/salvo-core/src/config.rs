//! Rig configuration shared by every weapon instance.
//!
//! These values describe the weapon mesh and trace setup rather than a
//! particular weapon's tuning, so they live outside [`WeaponProfile`](crate::profile::WeaponProfile).

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for the shot trace and the weapon mesh sockets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Length of the aim trace from the eye (world units)
    pub trace_distance: f32,
    /// Mesh socket the muzzle flash and projectile spawn from
    pub muzzle_socket: String,
    /// Mesh socket shell casings are ejected from
    pub shell_socket: String,
    /// Yaw added to the look-at rotation of a scoped camera mount (degrees)
    pub mount_yaw_offset: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            trace_distance: 3000.0,
            muzzle_socket: "MuzzleSocket".to_string(),
            shell_socket: "ShellEjectSocket".to_string(),
            mount_yaw_offset: -90.0,
        }
    }
}

impl RigConfig {
    /// Create a config with a custom trace distance.
    #[must_use]
    pub fn with_trace_distance(trace_distance: f32) -> Self {
        Self {
            trace_distance,
            ..Default::default()
        }
    }

    /// Decode a config from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WeaponError::Json`](crate::error::WeaponError::Json) if the
    /// document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RigConfig::default();
        assert_eq!(config.trace_distance, 3000.0);
        assert_eq!(config.muzzle_socket, "MuzzleSocket");
        assert_eq!(config.mount_yaw_offset, -90.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RigConfig::from_json_str(r#"{ "muzzle_socket": "Muzzle_01" }"#).unwrap();
        assert_eq!(config.muzzle_socket, "Muzzle_01");
        assert_eq!(config.shell_socket, "ShellEjectSocket");
        assert_eq!(config.trace_distance, 3000.0);
    }

    #[test]
    fn with_trace_distance() {
        let config = RigConfig::with_trace_distance(500.0);
        assert_eq!(config.trace_distance, 500.0);
        assert_eq!(config.muzzle_socket, "MuzzleSocket");
    }
}
