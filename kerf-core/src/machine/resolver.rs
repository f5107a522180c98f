//! Physical parameter resolution
//!
//! Converts axis mechanics into steps per millimeter and brings rates and
//! accelerations into mm/min and mm/min².
//!
//! ```text
//! distance_per_rev = pitch × teeth        (belt)
//!                  = pitch                (leadscrew)
//! steps_per_mm     = microsteps × motor_steps_per_rev × motor / output
//!                    / distance_per_rev
//! ```

use core::fmt;

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{AxisProfile, Drive, MachineProfile, Mechanics};
use crate::{Axis, N_AXIS};

/// Millimeters per inch
pub const MM_PER_INCH: f32 = 25.4;

/// Which mechanical value is unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MechanicalFault {
    /// Travel per revolution is zero, negative or not finite
    DistancePerRev,
    /// A gear ratio term is zero
    GearRatio,
}

impl fmt::Display for MechanicalFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MechanicalFault::DistancePerRev => {
                f.write_str("distance per revolution must be positive")
            }
            MechanicalFault::GearRatio => f.write_str("gear ratio term is zero"),
        }
    }
}

/// Mechanical descriptor that cannot produce steps per mm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InvalidMechanicalParameter {
    pub axis: Axis,
    pub fault: MechanicalFault,
}

/// Firmware-ready constants for one axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedAxis {
    pub steps_per_mm: f32,
    pub max_rate_mm_per_min: f32,
    pub acceleration_mm_per_min2: f32,
    pub max_travel_mm: f32,
}

impl Mechanics {
    /// Linear travel per output revolution in mm
    pub fn distance_per_rev_mm(&self) -> f32 {
        let factor = self.unit.to_mm_factor();
        match self.drive {
            Drive::Belt { pitch, teeth } => pitch * factor * f32::from(teeth),
            Drive::Leadscrew { pitch } => pitch * factor,
            Drive::Direct { distance_per_rev } => distance_per_rev * factor,
        }
    }

    /// Steps per millimeter of travel
    pub fn steps_per_mm(&self) -> Result<f32, MechanicalFault> {
        let distance = self.distance_per_rev_mm();
        if !distance.is_finite() || distance <= 0.0 {
            return Err(MechanicalFault::DistancePerRev);
        }
        if self.gear_ratio.motor == 0 || self.gear_ratio.output == 0 {
            return Err(MechanicalFault::GearRatio);
        }

        let steps_per_rev = f32::from(self.microsteps) * f32::from(self.motor_steps_per_rev);
        if self.gear_ratio.is_direct() {
            Ok(steps_per_rev / distance)
        } else {
            let ratio = f32::from(self.gear_ratio.motor) / f32::from(self.gear_ratio.output);
            Ok(steps_per_rev * ratio / distance)
        }
    }
}

impl ResolvedAxis {
    /// Convert rates and travel, pairing them with a steps/mm value
    fn convert(profile: &AxisProfile, steps_per_mm: f32) -> Self {
        Self {
            steps_per_mm,
            max_rate_mm_per_min: profile.max_rate.to_mm_per_min(),
            acceleration_mm_per_min2: profile.acceleration.to_mm_per_min2(),
            max_travel_mm: profile.max_travel_mm,
        }
    }
}

/// Resolve one axis
///
/// Rates and accelerations are converted but not range checked; the
/// validation layer reports non-positive values.
pub fn resolve_axis(
    axis: Axis,
    profile: &AxisProfile,
) -> Result<ResolvedAxis, InvalidMechanicalParameter> {
    let steps_per_mm = profile
        .mechanics
        .steps_per_mm()
        .map_err(|fault| InvalidMechanicalParameter { axis, fault })?;

    Ok(ResolvedAxis::convert(profile, steps_per_mm))
}

/// Every axis of a machine, with the faults found along the way
#[derive(Debug, Clone, PartialEq)]
pub struct AxisResolution {
    /// Axes in X, Y, Z order. An axis with a fault keeps its converted
    /// rates and travel and has zero steps/mm.
    pub axes: [ResolvedAxis; N_AXIS],
    pub faults: Vec<InvalidMechanicalParameter, N_AXIS>,
}

impl AxisResolution {
    pub fn is_complete(&self) -> bool {
        self.faults.is_empty()
    }

    /// Axes if every descriptor resolved, else the first fault
    pub fn into_result(self) -> Result<[ResolvedAxis; N_AXIS], InvalidMechanicalParameter> {
        match self.faults.first() {
            Some(fault) => Err(*fault),
            None => Ok(self.axes),
        }
    }
}

/// Resolve every axis, recording each unusable descriptor
pub fn resolve_axes(machine: &MachineProfile) -> AxisResolution {
    let mut faults = Vec::new();
    let axes = Axis::ALL.map(|axis| {
        let profile = machine.axis(axis);
        resolve_axis(axis, profile).unwrap_or_else(|fault| {
            // One slot per axis
            let _ = faults.push(fault);
            ResolvedAxis::convert(profile, 0.0)
        })
    });
    AxisResolution { axes, faults }
}
