//! Resolved configuration
//!
//! The single immutable value handed to the stepper, limit, spindle and
//! coolant drivers once assembly succeeds.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{BoardId, BoardProfile};
use crate::features::EffectiveFeatures;
use crate::machine::{
    HomingProfile, ModeFlags, ResolvedAxis, ResolvedSpindle, StepperProfile, MAX_NAME_LEN,
};
use crate::pins::{ResolvedGroup, SignalClass};
use crate::{Axis, N_AXIS};

/// Layout version of [`ResolvedConfig`]
pub const CONFIG_VERSION: u8 = 1;

/// Firmware-ready machine configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedConfig {
    pub version: u8,
    pub board: BoardId,
    /// Machine profile name
    pub machine: String<MAX_NAME_LEN>,
    pub features: EffectiveFeatures,
    /// One group per signal class, indexed by [`SignalClass::index`]
    pub groups: [ResolvedGroup; SignalClass::COUNT],
    pub axes: [ResolvedAxis; N_AXIS],
    pub spindle: ResolvedSpindle,
    pub stepper: StepperProfile,
    pub homing: HomingProfile,
    pub status_report_mask: u8,
    pub junction_deviation_mm: f32,
    pub arc_tolerance_mm: f32,
    pub modes: ModeFlags,
}

impl ResolvedConfig {
    /// Pin group of a signal class
    pub fn group(&self, class: SignalClass) -> &ResolvedGroup {
        &self.groups[class.index()]
    }

    /// Port mask of a signal class, 0 when unbound
    pub fn mask(&self, class: SignalClass) -> u8 {
        self.group(class).mask
    }

    pub fn axis(&self, axis: Axis) -> &ResolvedAxis {
        &self.axes[axis.index()]
    }

    /// Board table this configuration was resolved against
    pub fn board_profile(&self) -> &'static BoardProfile {
        self.board.profile()
    }

    /// Bound groups only
    pub fn bound_groups(&self) -> impl Iterator<Item = &ResolvedGroup> {
        self.groups.iter().filter(|g| g.is_bound())
    }
}
