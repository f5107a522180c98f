//! Machine profiles
//!
//! A [`MachineProfile`] describes one physical machine in engineering units:
//! axis mechanics, motion envelope, spindle range, homing and mode flags.
//! The [`resolver`] turns it into firmware-ready constants.

pub mod presets;
pub mod resolver;
pub mod spindle;

pub use resolver::{
    resolve_axes, resolve_axis, AxisResolution, InvalidMechanicalParameter, MechanicalFault,
    ResolvedAxis, MM_PER_INCH,
};
pub use spindle::{ResolvedSpindle, SpindlePwm};

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Axis, N_AXIS};

/// Maximum machine name length
pub const MAX_NAME_LEN: usize = 24;

/// Unit of a length descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LengthUnit {
    #[default]
    Millimeter,
    Inch,
}

impl LengthUnit {
    /// Multiplier converting this unit to millimeters
    pub const fn to_mm_factor(self) -> f32 {
        match self {
            LengthUnit::Millimeter => 1.0,
            LengthUnit::Inch => MM_PER_INCH,
        }
    }
}

/// Mechanical transmission from motor shaft to linear motion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Drive {
    /// Toothed belt: travel per revolution is pitch times pulley teeth
    Belt { pitch: f32, teeth: u16 },
    /// Leadscrew: travel per revolution is the screw lead
    Leadscrew { pitch: f32 },
    /// Travel per revolution given directly
    Direct { distance_per_rev: f32 },
}

/// Motor to output gear ratio, e.g. 3:1 turns the motor three times per
/// output revolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GearRatio {
    pub motor: u8,
    pub output: u8,
}

impl GearRatio {
    pub const DIRECT: GearRatio = GearRatio {
        motor: 1,
        output: 1,
    };

    pub fn is_direct(&self) -> bool {
        self.motor == self.output
    }
}

impl Default for GearRatio {
    fn default() -> Self {
        Self::DIRECT
    }
}

/// Stepper and transmission descriptor for one axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mechanics {
    /// Driver microsteps per full step
    pub microsteps: u16,
    /// Full steps per motor revolution (200 for 1.8° motors)
    pub motor_steps_per_rev: u16,
    pub drive: Drive,
    /// Unit of the drive's length values
    pub unit: LengthUnit,
    pub gear_ratio: GearRatio,
}

impl Default for Mechanics {
    fn default() -> Self {
        // 250 steps/mm
        Self {
            microsteps: 8,
            motor_steps_per_rev: 200,
            drive: Drive::Direct {
                distance_per_rev: 6.4,
            },
            unit: LengthUnit::Millimeter,
            gear_ratio: GearRatio::DIRECT,
        }
    }
}

/// Unit of a rate value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RateUnit {
    #[default]
    MmPerMin,
    MmPerSec,
}

impl RateUnit {
    /// Unit every resolved rate is expressed in
    pub const FINAL: RateUnit = RateUnit::MmPerMin;

    /// Multiplier converting this unit to mm/min
    pub const fn to_mm_per_min_factor(self) -> f32 {
        match self {
            RateUnit::MmPerMin => 1.0,
            RateUnit::MmPerSec => 60.0,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            RateUnit::MmPerMin => "mm/min",
            RateUnit::MmPerSec => "mm/s",
        }
    }
}

/// Unit of an acceleration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AccelUnit {
    #[default]
    MmPerSec2,
    MmPerMin2,
}

impl AccelUnit {
    /// Unit every resolved acceleration is expressed in
    pub const FINAL: AccelUnit = AccelUnit::MmPerMin2;

    /// Multiplier converting this unit to mm/min²
    pub const fn to_mm_per_min2_factor(self) -> f32 {
        match self {
            AccelUnit::MmPerSec2 => 60.0 * 60.0,
            AccelUnit::MmPerMin2 => 1.0,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            AccelUnit::MmPerSec2 => "mm/s^2",
            AccelUnit::MmPerMin2 => "mm/min^2",
        }
    }
}

/// Rate with its unit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rate {
    pub value: f32,
    pub unit: RateUnit,
}

impl Rate {
    pub const fn mm_per_min(value: f32) -> Self {
        Self {
            value,
            unit: RateUnit::MmPerMin,
        }
    }

    pub fn to_mm_per_min(&self) -> f32 {
        self.value * self.unit.to_mm_per_min_factor()
    }
}

/// Acceleration with its unit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Acceleration {
    pub value: f32,
    pub unit: AccelUnit,
}

impl Acceleration {
    pub const fn mm_per_sec2(value: f32) -> Self {
        Self {
            value,
            unit: AccelUnit::MmPerSec2,
        }
    }

    pub fn to_mm_per_min2(&self) -> f32 {
        self.value * self.unit.to_mm_per_min2_factor()
    }
}

/// Per-axis profile
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisProfile {
    pub mechanics: Mechanics,
    pub max_rate: Rate,
    pub acceleration: Acceleration,
    /// Maximum travel in mm, positive
    pub max_travel_mm: f32,
}

impl Default for AxisProfile {
    fn default() -> Self {
        Self {
            mechanics: Mechanics::default(),
            max_rate: Rate::mm_per_min(500.0),
            acceleration: Acceleration::mm_per_sec2(10.0),
            max_travel_mm: 200.0,
        }
    }
}

/// Spindle speed range
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpindleProfile {
    pub rpm_min: f32,
    pub rpm_max: f32,
}

impl Default for SpindleProfile {
    fn default() -> Self {
        Self {
            rpm_min: 0.0,
            rpm_max: 1000.0,
        }
    }
}

/// Stepper driver signalling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepperProfile {
    /// Step pulse width in microseconds
    pub step_pulse_us: u8,
    /// Axes whose step pulse is inverted
    pub stepping_invert_mask: u8,
    /// Axes whose direction is inverted
    pub direction_invert_mask: u8,
    /// Delay before disabling idle steppers in ms; 255 keeps them enabled
    pub idle_lock_ms: u8,
}

impl Default for StepperProfile {
    fn default() -> Self {
        Self {
            step_pulse_us: 10,
            stepping_invert_mask: 0,
            direction_invert_mask: 0,
            idle_lock_ms: 25,
        }
    }
}

/// Homing cycle parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomingProfile {
    pub enable: bool,
    /// Axes that home towards negative
    pub dir_mask: u8,
    /// Locate feed rate in mm/min
    pub feed_rate: f32,
    /// Search seek rate in mm/min
    pub seek_rate: f32,
    /// Switch debounce in ms
    pub debounce_ms: u16,
    /// Distance to back off the switch in mm
    pub pulloff_mm: f32,
}

impl Default for HomingProfile {
    fn default() -> Self {
        Self {
            enable: false,
            dir_mask: 0,
            feed_rate: 25.0,
            seek_rate: 500.0,
            debounce_ms: 250,
            pulloff_mm: 1.0,
        }
    }
}

/// Boolean mode flags, passed through unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModeFlags {
    pub report_inches: bool,
    pub invert_stepper_enable: bool,
    pub invert_limit_pins: bool,
    pub soft_limit_enable: bool,
    pub hard_limit_enable: bool,
    pub invert_probe_pin: bool,
    pub laser_mode: bool,
}

/// Complete description of one machine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineProfile {
    pub name: String<MAX_NAME_LEN>,
    pub axes: [AxisProfile; N_AXIS],
    pub spindle: SpindleProfile,
    pub stepper: StepperProfile,
    /// Status report fields
    pub status_report_mask: u8,
    pub homing: HomingProfile,
    /// Planner cornering tolerance in mm
    pub junction_deviation_mm: f32,
    /// Arc segmentation tolerance in mm
    pub arc_tolerance_mm: f32,
    pub modes: ModeFlags,
}

impl Default for MachineProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            axes: [AxisProfile::default(); N_AXIS],
            spindle: SpindleProfile::default(),
            stepper: StepperProfile::default(),
            status_report_mask: 1,
            homing: HomingProfile::default(),
            junction_deviation_mm: 0.01,
            arc_tolerance_mm: 0.002,
            modes: ModeFlags::default(),
        }
    }
}

impl MachineProfile {
    /// Create a profile with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis(&self, axis: Axis) -> &AxisProfile {
        &self.axes[axis.index()]
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisProfile {
        &mut self.axes[axis.index()]
    }
}
