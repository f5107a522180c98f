//! Feature selection
//!
//! Turns a requested feature set into one fully disambiguated
//! [`EffectiveFeatures`] value before any pin lookup happens.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::pins::SignalClass;
use crate::Axis;

/// Dual-axis shield layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DualAxisVariant {
    /// Single motor per axis
    #[default]
    None,
    /// Protoneer v3.51 layout: dual step/direction on the coolant pins
    A,
    /// CNC shield clone layout: dual step/direction on the spindle pins
    B,
}

impl DualAxisVariant {
    pub fn is_enabled(self) -> bool {
        self != DualAxisVariant::None
    }
}

/// How the spindle enable signal is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpindleEnable {
    /// On/off enable pin, no speed control
    #[default]
    Fixed,
    /// Spindle speed PWM controlled; enable pin per board table
    Pwm,
    /// PWM output for speed, enable moved to the old direction pin
    DirectionPin,
}

impl SpindleEnable {
    /// True if the spindle speed is PWM controlled
    pub fn has_pwm(self) -> bool {
        self != SpindleEnable::Fixed
    }
}

/// Requested feature set, as written in a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureRequest {
    pub variable_spindle: bool,
    pub spindle_dir_as_enable: bool,
    pub dual_axis: DualAxisVariant,
    /// Axis shadowed by the dual motor
    pub dual_axis_select: Axis,
    pub laser_mode: bool,
    /// Enable the safety door input
    pub safety_door: bool,
}

impl Default for FeatureRequest {
    fn default() -> Self {
        Self {
            variable_spindle: false,
            spindle_dir_as_enable: false,
            dual_axis: DualAxisVariant::None,
            dual_axis_select: Axis::Y,
            laser_mode: false,
            safety_door: false,
        }
    }
}

/// Reason a feature combination was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Incompatibility {
    /// Direction-pin enable needs a PWM spindle
    DirAsEnableWithoutVariableSpindle,
    /// Laser mode needs a PWM spindle
    LaserWithoutVariableSpindle,
    /// Dual motor on Z collides with the shared Z limit pin
    DualAxisOnZ,
    /// The board cannot provide the variable spindle with this dual-axis layout
    VariableSpindleWithDualAxis,
    /// The board has no dual-axis pins
    DualAxisUnsupported,
    /// The board has no pin for direction-as-enable
    DirAsEnableUnsupported,
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Incompatibility::DirAsEnableWithoutVariableSpindle => {
                "spindle_dir_as_enable requires variable_spindle"
            }
            Incompatibility::LaserWithoutVariableSpindle => "laser_mode requires variable_spindle",
            Incompatibility::DualAxisOnZ => "dual axis cannot shadow Z",
            Incompatibility::VariableSpindleWithDualAxis => {
                "variable spindle is not available with this dual axis layout"
            }
            Incompatibility::DualAxisUnsupported => "board has no dual axis pins",
            Incompatibility::DirAsEnableUnsupported => {
                "board cannot use the spindle direction pin as enable"
            }
        })
    }
}

/// Feature set after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EffectiveFeatures {
    pub spindle: SpindleEnable,
    pub dual_axis: DualAxisVariant,
    pub dual_axis_select: Axis,
    pub laser_mode: bool,
    pub safety_door: bool,
    /// Direction-as-enable was requested but dropped by the dual-axis layout
    pub dir_as_enable_dropped: bool,
}

impl EffectiveFeatures {
    /// True if the spindle speed is PWM controlled
    pub fn variable_spindle(&self) -> bool {
        self.spindle.has_pwm()
    }

    /// True if `class` carries a signal under these features
    ///
    /// Dual axis hands the coolant mist and spindle direction pins over to
    /// the dual step/direction classes.
    pub fn is_active(&self, class: SignalClass) -> bool {
        let dual = self.dual_axis.is_enabled();
        match class {
            SignalClass::CoolantMist => !dual,
            SignalClass::SpindleDirection => !dual && self.spindle != SpindleEnable::DirectionPin,
            SignalClass::SpindlePwm => self.spindle.has_pwm(),
            SignalClass::StepDual | SignalClass::DirectionDual => dual,
            _ => true,
        }
    }
}

/// Resolve a requested feature set
///
/// Rejects combinations that would otherwise change behavior silently.
pub fn resolve(request: &FeatureRequest) -> Result<EffectiveFeatures, Incompatibility> {
    if request.spindle_dir_as_enable && !request.variable_spindle {
        return Err(Incompatibility::DirAsEnableWithoutVariableSpindle);
    }
    if request.laser_mode && !request.variable_spindle {
        return Err(Incompatibility::LaserWithoutVariableSpindle);
    }

    let dual = request.dual_axis.is_enabled();
    if dual && request.dual_axis_select == Axis::Z {
        return Err(Incompatibility::DualAxisOnZ);
    }

    // Dual axis takes the direction pin, so direction-as-enable cannot apply
    let dir_as_enable = request.spindle_dir_as_enable && !dual;

    let spindle = match (request.variable_spindle, dir_as_enable) {
        (false, _) => SpindleEnable::Fixed,
        (true, false) => SpindleEnable::Pwm,
        (true, true) => SpindleEnable::DirectionPin,
    };

    Ok(EffectiveFeatures {
        spindle,
        dual_axis: request.dual_axis,
        dual_axis_select: request.dual_axis_select,
        laser_mode: request.laser_mode,
        safety_door: request.safety_door,
        dir_as_enable_dropped: request.spindle_dir_as_enable && dual,
    })
}
