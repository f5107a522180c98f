//! Validation of a resolved configuration
//!
//! Checks pin tables and physical constants against the invariants the
//! drivers rely on:
//!
//! - Single-port groups stay on one port and never repeat a bit
//! - Every mask equals the OR of its group's bits
//! - Interrupt-driven input groups (limit, control) each own their port;
//!   polled inputs may share that port but not its bits
//! - Bound classes agree with the resolved features
//! - Rates, accelerations, travels and steps/mm are positive and finite
//!
//! Validation never stops at the first problem; every violation found is
//! collected so a build report can show them all.

use core::fmt;

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::machine::{InvalidMechanicalParameter, MechanicalFault};
use crate::pins::{mask_of, PinBinding, ResolvedGroup, SignalClass};
use crate::resolved::ResolvedConfig;
use crate::{Axis, AXIS_MASK_ALL};

/// Maximum violations recorded before the list reports overflow
pub const MAX_VIOLATIONS: usize = 32;

/// Minimum step pulse the stepper ISR can generate
pub const MIN_STEP_PULSE_US: u8 = 3;

/// Value that failed a range check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Field {
    StepsPerMm(Axis),
    MaxRate(Axis),
    Acceleration(Axis),
    MaxTravel(Axis),
    SpindleRpm,
    HomingFeedRate,
    HomingSeekRate,
    HomingPulloff,
    JunctionDeviation,
    ArcTolerance,
    StepPulse,
    SteppingInvertMask,
    DirectionInvertMask,
    HomingDirMask,
    /// Bit index above 7 in a group of this class
    PinBit(SignalClass),
}

/// One broken invariant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Violation {
    /// The same physical pin is used twice; `first == second` for a repeat
    /// inside one group
    PinConflict {
        first: SignalClass,
        second: SignalClass,
        pin: PinBinding,
    },
    /// A single-port group spans several ports
    PortSplit(SignalClass),
    /// Stored mask differs from the OR of the group's bits
    MaskMismatch(SignalClass),
    /// A pin's direction disagrees with its class
    DirectionMismatch(SignalClass),
    /// Two interrupt-driven input groups share a port
    PortIsolationViolation {
        first: SignalClass,
        second: SignalClass,
    },
    /// Active class with no pins
    UnresolvedSignal(SignalClass),
    /// Inactive class with pins
    UnexpectedSignal(SignalClass),
    /// Axis mechanics cannot produce steps per mm
    InvalidMechanicalParameter {
        axis: Axis,
        fault: MechanicalFault,
    },
    OutOfRangeValue {
        field: Field,
    },
    SoftLimitsWithoutHoming,
    /// Laser mode flag set without the laser feature
    LaserModeUnavailable,
}

impl From<InvalidMechanicalParameter> for Violation {
    fn from(e: InvalidMechanicalParameter) -> Self {
        Violation::InvalidMechanicalParameter {
            axis: e.axis,
            fault: e.fault,
        }
    }
}

/// Collected violations
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Violations {
    list: Vec<Violation, MAX_VIOLATIONS>,
    overflow: bool,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation, flagging overflow once the list is full
    pub fn push(&mut self, violation: Violation) {
        if self.list.push(violation).is_err() {
            self.overflow = true;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// True if more violations were found than could be stored
    pub fn overflowed(&self) -> bool {
        self.overflow
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.list.iter()
    }

    pub fn contains(&self, violation: &Violation) -> bool {
        self.list.contains(violation)
    }

    pub(crate) fn into_result(self) -> Result<(), Violations> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Check every invariant of a resolved configuration
pub fn validate(config: &ResolvedConfig) -> Result<(), Violations> {
    let mut found = Violations::new();
    validate_into(config, &mut found);
    found.into_result()
}

/// Check every invariant, adding to violations found earlier in assembly
pub(crate) fn validate_into(config: &ResolvedConfig, found: &mut Violations) {
    check_groups(config, found);
    check_pin_conflicts(config, found);
    check_port_isolation(config, found);
    check_features(config, found);
    check_axes(config, found);
    check_settings(config, found);
}

fn check_groups(config: &ResolvedConfig, found: &mut Violations) {
    for group in config.groups.iter() {
        let class = group.class;

        if group.mask != mask_of(group.pins.iter()) {
            found.push(Violation::MaskMismatch(class));
        }
        if group.pins.iter().any(|p| p.binding.bit > 7) {
            found.push(Violation::OutOfRangeValue {
                field: Field::PinBit(class),
            });
        }
        if group
            .pins
            .iter()
            .any(|p| p.binding.direction != class.direction())
        {
            found.push(Violation::DirectionMismatch(class));
        }
        if class.is_single_port() && group.is_bound() && group.port().is_none() {
            found.push(Violation::PortSplit(class));
        }
    }
}

fn shared_pin_allowed(a: SignalClass, b: SignalClass) -> bool {
    // Spindle enable doubles as the PWM output
    matches!(
        (a, b),
        (SignalClass::SpindleEnable, SignalClass::SpindlePwm)
            | (SignalClass::SpindlePwm, SignalClass::SpindleEnable)
    )
}

fn check_pin_conflicts(config: &ResolvedConfig, found: &mut Violations) {
    let groups = &config.groups;

    for (gi, group) in groups.iter().enumerate() {
        for (pi, pin) in group.pins.iter().enumerate() {
            // Same group, later pins
            for other in group.pins.iter().skip(pi + 1) {
                if pin.binding.same_line(&other.binding) {
                    found.push(Violation::PinConflict {
                        first: group.class,
                        second: group.class,
                        pin: pin.binding,
                    });
                }
            }

            // Later groups
            for other_group in groups.iter().skip(gi + 1) {
                if shared_pin_allowed(group.class, other_group.class) {
                    continue;
                }
                for other in other_group.pins.iter() {
                    if pin.binding.same_line(&other.binding) {
                        found.push(Violation::PinConflict {
                            first: group.class,
                            second: other_group.class,
                            pin: pin.binding,
                        });
                    }
                }
            }
        }
    }
}

fn shares_port(a: &ResolvedGroup, b: &ResolvedGroup) -> bool {
    a.pins
        .iter()
        .any(|p| b.pins.iter().any(|q| p.binding.port == q.binding.port))
}

fn check_port_isolation(config: &ResolvedConfig, found: &mut Violations) {
    let isolated = config
        .groups
        .iter()
        .filter(|g| g.class.is_port_isolated() && g.is_bound());

    for (i, group) in isolated.clone().enumerate() {
        for other in isolated.clone().skip(i + 1) {
            if shares_port(group, other) {
                found.push(Violation::PortIsolationViolation {
                    first: group.class,
                    second: other.class,
                });
            }
        }
    }
}

fn check_features(config: &ResolvedConfig, found: &mut Violations) {
    let features = &config.features;

    for group in config.groups.iter() {
        let active = features.is_active(group.class);
        if active && !group.is_bound() {
            found.push(Violation::UnresolvedSignal(group.class));
        } else if !active && group.is_bound() {
            found.push(Violation::UnexpectedSignal(group.class));
        }
    }

    // PWM scaling must follow the spindle strategy
    match (features.variable_spindle(), config.spindle.pwm.is_some()) {
        (true, false) => found.push(Violation::UnresolvedSignal(SignalClass::SpindlePwm)),
        (false, true) => found.push(Violation::UnexpectedSignal(SignalClass::SpindlePwm)),
        _ => {}
    }

    if config.modes.laser_mode && !features.laser_mode {
        found.push(Violation::LaserModeUnavailable);
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn mechanics_reported(found: &Violations, axis: Axis) -> bool {
    found
        .iter()
        .any(|v| matches!(v, Violation::InvalidMechanicalParameter { axis: a, .. } if *a == axis))
}

fn check_axes(config: &ResolvedConfig, found: &mut Violations) {
    for axis in Axis::ALL {
        let resolved = config.axis(axis);
        // Zero steps/mm of an unresolved axis is already reported
        let steps_known = !mechanics_reported(found, axis);
        let checks = [
            (resolved.steps_per_mm, Field::StepsPerMm(axis)),
            (resolved.max_rate_mm_per_min, Field::MaxRate(axis)),
            (resolved.acceleration_mm_per_min2, Field::Acceleration(axis)),
            (resolved.max_travel_mm, Field::MaxTravel(axis)),
        ];
        for (value, field) in checks {
            if matches!(field, Field::StepsPerMm(_)) && !steps_known {
                continue;
            }
            if !positive(value) {
                found.push(Violation::OutOfRangeValue { field });
            }
        }
    }
}

fn check_settings(config: &ResolvedConfig, found: &mut Violations) {
    let spindle = &config.spindle;
    if !spindle.rpm_min.is_finite()
        || !spindle.rpm_max.is_finite()
        || spindle.rpm_min < 0.0
        || spindle.rpm_min > spindle.rpm_max
    {
        found.push(Violation::OutOfRangeValue {
            field: Field::SpindleRpm,
        });
    }

    let homing = &config.homing;
    let positives = [
        (homing.feed_rate, Field::HomingFeedRate),
        (homing.seek_rate, Field::HomingSeekRate),
        (homing.pulloff_mm, Field::HomingPulloff),
        (config.junction_deviation_mm, Field::JunctionDeviation),
        (config.arc_tolerance_mm, Field::ArcTolerance),
    ];
    for (value, field) in positives {
        if !positive(value) {
            found.push(Violation::OutOfRangeValue { field });
        }
    }

    let masks = [
        (config.stepper.stepping_invert_mask, Field::SteppingInvertMask),
        (config.stepper.direction_invert_mask, Field::DirectionInvertMask),
        (homing.dir_mask, Field::HomingDirMask),
    ];
    for (mask, field) in masks {
        if mask & !AXIS_MASK_ALL != 0 {
            found.push(Violation::OutOfRangeValue { field });
        }
    }

    if config.stepper.step_pulse_us < MIN_STEP_PULSE_US {
        found.push(Violation::OutOfRangeValue {
            field: Field::StepPulse,
        });
    }

    if config.modes.soft_limit_enable && !homing.enable {
        found.push(Violation::SoftLimitsWithoutHoming);
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::StepsPerMm(axis) => write!(f, "{:?} steps/mm", axis),
            Field::MaxRate(axis) => write!(f, "{:?} max rate", axis),
            Field::Acceleration(axis) => write!(f, "{:?} acceleration", axis),
            Field::MaxTravel(axis) => write!(f, "{:?} max travel", axis),
            Field::SpindleRpm => f.write_str("spindle rpm range"),
            Field::HomingFeedRate => f.write_str("homing feed rate"),
            Field::HomingSeekRate => f.write_str("homing seek rate"),
            Field::HomingPulloff => f.write_str("homing pulloff"),
            Field::JunctionDeviation => f.write_str("junction deviation"),
            Field::ArcTolerance => f.write_str("arc tolerance"),
            Field::StepPulse => f.write_str("step pulse"),
            Field::SteppingInvertMask => f.write_str("stepping invert mask"),
            Field::DirectionInvertMask => f.write_str("direction invert mask"),
            Field::HomingDirMask => f.write_str("homing direction mask"),
            Field::PinBit(class) => write!(f, "{} pin bit", class.name()),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::PinConflict { first, second, pin } => write!(
                f,
                "pin P{}{} used by {} and {}",
                pin.port.letter(),
                pin.bit,
                first.name(),
                second.name()
            ),
            Violation::PortSplit(class) => write!(f, "{} pins span several ports", class.name()),
            Violation::MaskMismatch(class) => {
                write!(f, "{} mask does not match its pins", class.name())
            }
            Violation::DirectionMismatch(class) => {
                write!(f, "{} pin has the wrong direction", class.name())
            }
            Violation::PortIsolationViolation { first, second } => write!(
                f,
                "{} and {} share an interrupt port",
                first.name(),
                second.name()
            ),
            Violation::UnresolvedSignal(class) => {
                write!(f, "{} is required but unbound", class.name())
            }
            Violation::UnexpectedSignal(class) => {
                write!(f, "{} is bound but not enabled", class.name())
            }
            Violation::InvalidMechanicalParameter { axis, fault } => {
                write!(f, "{:?} axis mechanics: {}", axis, fault)
            }
            Violation::OutOfRangeValue { field } => write!(f, "{} out of range", field),
            Violation::SoftLimitsWithoutHoming => f.write_str("soft limits require homing"),
            Violation::LaserModeUnavailable => {
                f.write_str("laser mode requires the laser_mode feature")
            }
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        if self.overflow {
            f.write_str("; ...")?;
        }
        Ok(())
    }
}
