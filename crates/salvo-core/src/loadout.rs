//! Persisted weapon selection.
//!
//! The persistence layer exposes, per [`WeaponMode`] slot, an ordered list of
//! [`WeaponProfile`]s plus the index the player selected. The weapon core only
//! ever reads one profile, at activation time, through [`ProfileStore`].
//! [`Loadout`] is the JSON-backed implementation hosts can use directly.
//!
//! # Example
//!
//! ```
//! use salvo_core::loadout::{Loadout, ProfileStore};
//! use salvo_core::profile::{WeaponMode, WeaponProfile};
//!
//! let mut loadout = Loadout::new();
//! loadout.push(WeaponMode::Primary, WeaponProfile::new("AK", 600.0));
//! loadout.push(WeaponMode::Primary, WeaponProfile::new("M4", 750.0));
//! loadout.select(WeaponMode::Primary, 1).unwrap();
//!
//! assert_eq!(loadout.selected(WeaponMode::Primary).unwrap().name, "M4");
//! assert!(loadout.selected(WeaponMode::Sniper).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, WeaponError};
use crate::profile::{WeaponMode, WeaponProfile};

/// Read access to persisted weapon profiles.
pub trait ProfileStore {
    /// Profiles stored for a slot, in selection order.
    fn profiles(&self, mode: WeaponMode) -> &[WeaponProfile];

    /// Index the player selected for a slot.
    fn selected_index(&self, mode: WeaponMode) -> usize;

    /// The selected profile of a slot.
    ///
    /// # Errors
    ///
    /// Returns [`WeaponError::EmptySlot`] if the slot holds no profiles and
    /// [`WeaponError::SelectionOutOfRange`] if the selection is stale.
    fn selected(&self, mode: WeaponMode) -> Result<&WeaponProfile> {
        let profiles = self.profiles(mode);
        if profiles.is_empty() {
            return Err(WeaponError::EmptySlot(mode));
        }
        let index = self.selected_index(mode);
        profiles
            .get(index)
            .ok_or(WeaponError::SelectionOutOfRange {
                mode,
                index,
                len: profiles.len(),
            })
    }
}

/// One weapon-mode slot: profiles plus the selected index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadoutSlot {
    /// Profiles available in this slot
    pub profiles: Vec<WeaponProfile>,
    /// Index into `profiles`
    #[serde(default)]
    pub selected: usize,
}

/// JSON-backed [`ProfileStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    #[serde(default)]
    slots: BTreeMap<WeaponMode, LoadoutSlot>,
}

impl Loadout {
    /// Creates an empty loadout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a loadout from JSON.
    ///
    /// Profiles are not validated here; an unusable profile is reported
    /// when the weapon is activated, so one bad entry does not lose the
    /// whole loadout.
    ///
    /// # Errors
    ///
    /// Returns [`WeaponError::Json`] if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes the loadout as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`WeaponError::Json`] if encoding fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Appends a profile to a slot and returns its index.
    pub fn push(&mut self, mode: WeaponMode, profile: WeaponProfile) -> usize {
        let slot = self.slots.entry(mode).or_default();
        slot.profiles.push(profile);
        slot.profiles.len() - 1
    }

    /// Selects a profile within a slot.
    ///
    /// # Errors
    ///
    /// Returns [`WeaponError::EmptySlot`] or
    /// [`WeaponError::SelectionOutOfRange`] and leaves the selection as is.
    pub fn select(&mut self, mode: WeaponMode, index: usize) -> Result<()> {
        let slot = self.slots.get_mut(&mode).ok_or(WeaponError::EmptySlot(mode))?;
        if index >= slot.profiles.len() {
            return Err(WeaponError::SelectionOutOfRange {
                mode,
                index,
                len: slot.profiles.len(),
            });
        }
        slot.selected = index;
        Ok(())
    }

    /// The raw slot, if any profile was ever stored for the mode.
    #[must_use]
    pub fn slot(&self, mode: WeaponMode) -> Option<&LoadoutSlot> {
        self.slots.get(&mode)
    }
}

impl ProfileStore for Loadout {
    fn profiles(&self, mode: WeaponMode) -> &[WeaponProfile] {
        self.slots
            .get(&mode)
            .map(|slot| slot.profiles.as_slice())
            .unwrap_or_default()
    }

    fn selected_index(&self, mode: WeaponMode) -> usize {
        self.slots.get(&mode).map_or(0, |slot| slot.selected)
    }
}
