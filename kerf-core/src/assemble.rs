//! Resolved configuration assembly
//!
//! ```text
//! FeatureRequest ─► features::resolve ─► BoardProfile::check_supported
//!                                              │
//!                         BoardProfile::lookup (13 classes)
//!                                              │
//! MachineProfile ─► resolve_axes / spindle ────┤
//!                                              ▼
//!                                      validate ─► ResolvedConfig
//! ```
//!
//! Assembly is all or nothing: any failure returns a [`ConfigError`] and no
//! partial configuration. Feature and board problems stop assembly at once.
//! Everything after the pin lookup, including unusable axis mechanics, is
//! gathered into one [`Violations`] list.

use core::fmt;

use crate::board::{self, BoardError, BoardProfile};
use crate::features::{self, FeatureRequest, Incompatibility};
use crate::machine::{resolve_axes, MachineProfile, ResolvedSpindle};
use crate::pins::{PinGroup, ResolvedGroup, SignalClass};
use crate::resolved::{ResolvedConfig, CONFIG_VERSION};
use crate::validate::{validate_into, Violations};

/// Assembly failure
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Board identifier not in the table
    UnknownBoard,
    /// Feature request rejected by the selector or the board
    IncompatibleFeatureCombination(Incompatibility),
    /// Board table has overlapping overrides for a class
    AmbiguousBinding(SignalClass),
    /// Resolved configuration breaks one or more invariants
    Invalid(Violations),
}

impl From<Incompatibility> for ConfigError {
    fn from(e: Incompatibility) -> Self {
        ConfigError::IncompatibleFeatureCombination(e)
    }
}

impl From<BoardError> for ConfigError {
    fn from(e: BoardError) -> Self {
        match e {
            BoardError::UnknownBoard => ConfigError::UnknownBoard,
            BoardError::AmbiguousBinding(class) => ConfigError::AmbiguousBinding(class),
        }
    }
}

impl From<Violations> for ConfigError {
    fn from(v: Violations) -> Self {
        ConfigError::Invalid(v)
    }
}

/// Assemble a configuration for a board table
pub fn assemble(
    board: &BoardProfile,
    machine: &MachineProfile,
    request: &FeatureRequest,
) -> Result<ResolvedConfig, ConfigError> {
    let features = features::resolve(request)?;
    board.check_supported(&features)?;

    let mut tables = [PinGroup::unbound(SignalClass::Step); SignalClass::COUNT];
    for class in SignalClass::ALL {
        tables[class.index()] = board.lookup(class, &features)?;
    }
    let groups = core::array::from_fn(|i| ResolvedGroup::from_group(&tables[i]));

    let mut found = Violations::new();
    let resolution = resolve_axes(machine);
    for fault in resolution.faults.iter() {
        found.push((*fault).into());
    }
    let axes = resolution.axes;
    let spindle = ResolvedSpindle::resolve(&machine.spindle, &features, board);

    let config = ResolvedConfig {
        version: CONFIG_VERSION,
        board: board.id,
        machine: machine.name.clone(),
        features,
        groups,
        axes,
        spindle,
        stepper: machine.stepper,
        homing: machine.homing,
        status_report_mask: machine.status_report_mask,
        junction_deviation_mm: machine.junction_deviation_mm,
        arc_tolerance_mm: machine.arc_tolerance_mm,
        modes: machine.modes,
    };

    validate_into(&config, &mut found);
    found.into_result()?;
    Ok(config)
}

/// Assemble a configuration for a board identifier
pub fn assemble_named(
    board_name: &str,
    machine: &MachineProfile,
    request: &FeatureRequest,
) -> Result<ResolvedConfig, ConfigError> {
    let board = board::find(board_name)?;
    assemble(board, machine, request)
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownBoard => f.write_str("unknown board"),
            ConfigError::IncompatibleFeatureCombination(reason) => {
                write!(f, "incompatible features: {}", reason)
            }
            ConfigError::AmbiguousBinding(class) => {
                write!(f, "overlapping board overrides for {}", class.name())
            }
            ConfigError::Invalid(violations) => write!(f, "invalid configuration: {}", violations),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ARDUINO_ATMEGA328P, ARDUINO_MEGA2560};
    use crate::features::DualAxisVariant;
    use crate::machine::{presets, Acceleration, Drive, MechanicalFault, Rate};
    use crate::pins::mask_of;
    use crate::validate::{Field, Violation};
    use crate::Axis;

    fn request(variable: bool, dir_as_enable: bool, dual: DualAxisVariant) -> FeatureRequest {
        FeatureRequest {
            variable_spindle: variable,
            spindle_dir_as_enable: dir_as_enable,
            dual_axis: dual,
            ..FeatureRequest::default()
        }
    }

    #[test]
    fn test_end_to_end_shapeoko() {
        let mut machine = presets::shapeoko();
        for axis in [Axis::X, Axis::Y] {
            let profile = machine.axis_mut(axis);
            profile.max_rate = Rate::mm_per_min(1000.0);
            profile.acceleration = Acceleration::mm_per_sec2(15.0);
        }

        let config = assemble(&ARDUINO_ATMEGA328P, &machine, &FeatureRequest::default()).unwrap();
        let x = config.axis(Axis::X);
        assert_eq!(x.acceleration_mm_per_min2, 54_000.0);
        assert_eq!(x.max_rate_mm_per_min, 1000.0);
        assert_eq!(x.steps_per_mm, 3200.0 / (0.08f32 * 25.4 * 18.0));
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.machine.as_str(), "shapeoko");
        assert_eq!(config.mask(SignalClass::Step), 0b0001_1100);
        assert_eq!(config.mask(SignalClass::Limit), 0b0000_1110);
        assert!(config.spindle.pwm.is_none());
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let machine = presets::x_carve_500mm();
        let req = request(true, false, DualAxisVariant::A);
        let first = assemble(&ARDUINO_ATMEGA328P, &machine, &req).unwrap();
        let second = assemble(&ARDUINO_ATMEGA328P, &machine, &req).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_dual_axis_a_keeps_spindle_pwm() {
        let machine = presets::shapeoko();
        let single = assemble(
            &ARDUINO_ATMEGA328P,
            &machine,
            &request(true, false, DualAxisVariant::None),
        )
        .unwrap();
        let dual = assemble(
            &ARDUINO_ATMEGA328P,
            &machine,
            &request(true, false, DualAxisVariant::A),
        )
        .unwrap();
        assert_eq!(
            single.group(SignalClass::SpindlePwm),
            dual.group(SignalClass::SpindlePwm)
        );
        assert_eq!(single.spindle, dual.spindle);
        assert!(dual.group(SignalClass::StepDual).is_bound());
        assert_eq!(dual.mask(SignalClass::Limit), single.mask(SignalClass::Limit));
    }

    #[test]
    fn test_dual_axis_b_rejects_variable_spindle() {
        let result = assemble(
            &ARDUINO_ATMEGA328P,
            &presets::shapeoko(),
            &request(true, false, DualAxisVariant::B),
        );
        assert_eq!(
            result,
            Err(ConfigError::IncompatibleFeatureCombination(
                Incompatibility::VariableSpindleWithDualAxis
            ))
        );
    }

    #[test]
    fn test_dual_axis_drops_dir_as_enable() {
        let config = assemble(
            &ARDUINO_ATMEGA328P,
            &presets::shapeoko(),
            &request(true, true, DualAxisVariant::A),
        )
        .unwrap();
        assert!(config.features.dir_as_enable_dropped);
        assert!(!config.group(SignalClass::SpindleDirection).is_bound());
    }

    #[test]
    fn test_rpm_min_above_max_rejected() {
        let mut machine = presets::shapeoko();
        machine.spindle.rpm_min = 12_000.0;
        let err = assemble(&ARDUINO_ATMEGA328P, &machine, &FeatureRequest::default()).unwrap_err();
        match err {
            ConfigError::Invalid(violations) => {
                assert!(violations.contains(&Violation::OutOfRangeValue {
                    field: Field::SpindleRpm,
                }));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_bad_mechanics_rejected() {
        let mut machine = presets::sherline_5400();
        machine.axis_mut(Axis::Y).mechanics.drive = Drive::Leadscrew { pitch: 0.0 };
        match assemble(&ARDUINO_ATMEGA328P, &machine, &FeatureRequest::default()) {
            Err(ConfigError::Invalid(violations)) => {
                assert!(violations.contains(&Violation::InvalidMechanicalParameter {
                    axis: Axis::Y,
                    fault: MechanicalFault::DistancePerRev,
                }));
                assert_eq!(violations.len(), 1);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_every_problem_reported_together() {
        let mut machine = presets::shapeoko();
        machine.axis_mut(Axis::X).mechanics.drive = Drive::Leadscrew { pitch: 0.0 };
        machine.axis_mut(Axis::Y).mechanics.drive = Drive::Leadscrew { pitch: -1.0 };
        machine.axis_mut(Axis::Z).max_travel_mm = -5.0;
        machine.spindle.rpm_min = 20_000.0;
        machine.spindle.rpm_max = 10_000.0;

        let violations =
            match assemble(&ARDUINO_ATMEGA328P, &machine, &FeatureRequest::default()) {
                Err(ConfigError::Invalid(violations)) => violations,
                other => panic!("unexpected result {:?}", other),
            };
        let expected = [
            Violation::InvalidMechanicalParameter {
                axis: Axis::X,
                fault: MechanicalFault::DistancePerRev,
            },
            Violation::InvalidMechanicalParameter {
                axis: Axis::Y,
                fault: MechanicalFault::DistancePerRev,
            },
            Violation::OutOfRangeValue {
                field: Field::MaxTravel(Axis::Z),
            },
            Violation::OutOfRangeValue {
                field: Field::SpindleRpm,
            },
        ];
        for violation in expected.iter() {
            assert!(violations.contains(violation), "missing {:?}", violation);
        }
        assert_eq!(violations.len(), expected.len());
    }

    #[test]
    fn test_assemble_named() {
        let machine = presets::sherline_5400();
        let config = assemble_named("mega", &machine, &request(true, false, DualAxisVariant::None))
            .unwrap();
        assert_eq!(config.board, board::BoardId::ArduinoMega2560);
        assert_eq!(config.spindle.pwm.unwrap().frequency_hz, 1951);

        assert_eq!(
            assemble_named("due", &machine, &FeatureRequest::default()),
            Err(ConfigError::UnknownBoard)
        );
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::from(Incompatibility::DualAxisOnZ);
        assert_eq!(err.to_string(), "incompatible features: dual axis cannot shadow Z");
    }

    fn all_requests() -> impl Iterator<Item = FeatureRequest> {
        let duals = [DualAxisVariant::None, DualAxisVariant::A, DualAxisVariant::B];
        (0..1u8 << 4).flat_map(move |flags| {
            duals.into_iter().flat_map(move |dual_axis| {
                Axis::ALL.into_iter().map(move |dual_axis_select| FeatureRequest {
                    variable_spindle: flags & 1 != 0,
                    spindle_dir_as_enable: flags & 2 != 0,
                    dual_axis,
                    dual_axis_select,
                    laser_mode: flags & 4 != 0,
                    safety_door: flags & 8 != 0,
                })
            })
        })
    }

    #[test]
    fn test_every_board_and_feature_set() {
        let machine = presets::shapeoko();
        assert_eq!(all_requests().count(), 144);

        for board in [&ARDUINO_ATMEGA328P, &ARDUINO_MEGA2560] {
            let mut assembled = 0;
            for req in all_requests() {
                match assemble(board, &machine, &req) {
                    Ok(config) => {
                        assembled += 1;
                        for group in config.groups.iter() {
                            assert_eq!(group.mask, mask_of(group.pins.iter()), "{:?}", req);
                            if group.class.is_single_port() {
                                assert_eq!(
                                    group.mask.count_ones() as usize,
                                    group.pins.len(),
                                    "{:?}",
                                    req
                                );
                            }
                        }
                        assert_eq!(
                            config.spindle.pwm.is_some(),
                            config.features.variable_spindle()
                        );
                    }
                    // Rejections come from feature rules or the board table,
                    // never from a broken pin map
                    Err(e) => assert!(
                        matches!(e, ConfigError::IncompatibleFeatureCombination(_)),
                        "{:?} on {:?}: {:?}",
                        req,
                        board.id,
                        e
                    ),
                }
            }
            assert!(assembled > 0);
        }
    }
}
