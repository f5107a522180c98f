//! Simple TOML parser for machine declarations
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! Kerf declarations. It does NOT support the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - [section] headers
//! - [section.subsection] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys outside section headers
//!
//! Unknown keys are ignored. Unknown sections and unknown enum words are
//! errors.

use core::fmt;

use heapless::String as HString;

use kerf_core::features::{DualAxisVariant, FeatureRequest};
use kerf_core::machine::{
    presets, AccelUnit, AxisProfile, Drive, GearRatio, LengthUnit, MachineProfile, RateUnit,
    MAX_NAME_LEN,
};
use kerf_core::Axis;

/// Maximum board identifier length
pub const MAX_BOARD_NAME_LEN: usize = 24;

/// Parse error
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Value of the wrong type or an unknown word
    InvalidValue,
    /// Invalid gear ratio string
    InvalidGearRatio,
    /// `preset` names no built-in profile
    UnknownMachine,
    /// No `board` key at the root
    MissingBoard,
    /// Belt drive without a tooth count
    MissingTeeth,
    /// Line is neither a section header nor `key = value`
    InvalidLine,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidSection => f.write_str("invalid or unknown section header"),
            ParseError::InvalidValue => f.write_str("value has the wrong type or is not recognized"),
            ParseError::InvalidGearRatio => f.write_str("gear ratio must look like \"motor:output\""),
            ParseError::UnknownMachine => f.write_str("no built-in machine has that name"),
            ParseError::MissingBoard => f.write_str("`board` is required"),
            ParseError::MissingTeeth => f.write_str("belt drive needs a tooth count"),
            ParseError::InvalidLine => f.write_str("expected `key = value`"),
        }
    }
}

/// Parsed declaration, before assembly
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Board identifier as written
    pub board: HString<MAX_BOARD_NAME_LEN>,
    pub features: FeatureRequest,
    pub machine: MachineProfile,
}

/// Axes an `[axis.*]` section applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisTarget {
    One(Axis),
    /// `[axis.xy]`, shared by X and Y
    Xy,
}

impl AxisTarget {
    fn first(self) -> Axis {
        match self {
            AxisTarget::One(axis) => axis,
            AxisTarget::Xy => Axis::X,
        }
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Features,
    Machine,
    Homing,
    Axis(AxisTarget),
}

/// Drive kind as written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriveKind {
    Belt,
    Leadscrew,
    Direct,
}

/// Axis being built; drive keys may come in any order
#[derive(Debug, Clone, Copy)]
struct AxisDraft {
    target: AxisTarget,
    profile: AxisProfile,
    kind: DriveKind,
    /// Belt or screw pitch, or direct distance per revolution
    length: f32,
    teeth: Option<u16>,
}

impl AxisDraft {
    fn new(target: AxisTarget, profile: AxisProfile) -> Self {
        let (kind, length, teeth) = match profile.mechanics.drive {
            Drive::Belt { pitch, teeth } => (DriveKind::Belt, pitch, Some(teeth)),
            Drive::Leadscrew { pitch } => (DriveKind::Leadscrew, pitch, None),
            Drive::Direct { distance_per_rev } => (DriveKind::Direct, distance_per_rev, None),
        };
        Self {
            target,
            profile,
            kind,
            length,
            teeth,
        }
    }

    fn finish(mut self) -> Result<AxisProfile, ParseError> {
        self.profile.mechanics.drive = match self.kind {
            DriveKind::Belt => Drive::Belt {
                pitch: self.length,
                teeth: self.teeth.ok_or(ParseError::MissingTeeth)?,
            },
            DriveKind::Leadscrew => Drive::Leadscrew { pitch: self.length },
            DriveKind::Direct => Drive::Direct {
                distance_per_rev: self.length,
            },
        };
        Ok(self.profile)
    }
}

/// Parse a declaration
pub fn parse_declaration(input: &str) -> Result<Declaration, ParseError> {
    let mut board: Option<HString<MAX_BOARD_NAME_LEN>> = None;
    let mut features = FeatureRequest::default();
    let mut machine = MachineProfile::new();
    let mut section = Section::Root;

    // Axis section being built
    let mut current_axis: Option<AxisDraft> = None;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Check for section header
        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ParseError::InvalidSection);
            }

            // Save previous section
            save_section(&mut machine, &mut current_axis)?;

            // Parse new section
            section = parse_section_header(&header[1..header.len() - 1])?;

            // Initialize new section
            if let Section::Axis(target) = section {
                current_axis = Some(AxisDraft::new(target, *machine.axis(target.first())));
            }
            continue;
        }

        // Parse key = value
        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        match section {
            Section::Root => match key {
                "board" => {
                    let name = parse_string(value)?;
                    let name = HString::try_from(name).map_err(|_| ParseError::InvalidValue)?;
                    board = Some(name);
                }
                "preset" => {
                    let name = parse_string(value)?;
                    machine = presets::find(name).ok_or(ParseError::UnknownMachine)?;
                }
                _ => {} // Ignore unknown keys
            },
            Section::Features => apply_feature(&mut features, key, value)?,
            Section::Machine => apply_machine(&mut machine, key, value)?,
            Section::Homing => apply_homing(&mut machine, key, value)?,
            Section::Axis(_) => {
                let draft = current_axis.as_mut().ok_or(ParseError::InvalidSection)?;
                apply_axis(draft, key, value)?;
            }
        }
    }

    // Save final section
    save_section(&mut machine, &mut current_axis)?;

    Ok(Declaration {
        board: board.ok_or(ParseError::MissingBoard)?,
        features,
        machine,
    })
}

/// Parse section header like "features" or "axis.xy"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    let header = header.trim();

    if let Some((kind, name)) = header.split_once('.') {
        if kind.trim() != "axis" {
            return Err(ParseError::InvalidSection);
        }
        let name = name.trim();
        let target = if name.eq_ignore_ascii_case("xy") {
            AxisTarget::Xy
        } else {
            AxisTarget::One(Axis::from_name(name).ok_or(ParseError::InvalidSection)?)
        };
        return Ok(Section::Axis(target));
    }

    match header {
        "features" => Ok(Section::Features),
        "machine" => Ok(Section::Machine),
        "homing" => Ok(Section::Homing),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(hash_pos) if text[..hash_pos].matches('"').count() % 2 == 0 => {
            text[..hash_pos].trim()
        }
        _ => text,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

/// Copy a number without its `_` digit separators
fn strip_separators(value: &str) -> Result<HString<32>, ParseError> {
    let mut digits = HString::new();
    for c in value.chars().filter(|c| *c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    Ok(digits)
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    strip_separators(value)?
        .parse()
        .map_err(|_| ParseError::InvalidValue)
}

/// Parse a float value; integers are accepted
fn parse_float(value: &str) -> Result<f32, ParseError> {
    let parsed: f32 = strip_separators(value)?
        .parse()
        .map_err(|_| ParseError::InvalidValue)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse gear ratio string like "3:1"
fn parse_gear_ratio(value: &str) -> Result<GearRatio, ParseError> {
    let value = parse_string(value)?;
    let (motor, output) = value.split_once(':').ok_or(ParseError::InvalidGearRatio)?;
    let motor: u8 = motor.trim().parse().map_err(|_| ParseError::InvalidGearRatio)?;
    let output: u8 = output.trim().parse().map_err(|_| ParseError::InvalidGearRatio)?;
    Ok(GearRatio { motor, output })
}

/// Parse dual axis layout
fn parse_dual_axis(value: &str) -> Result<DualAxisVariant, ParseError> {
    match parse_string(value)? {
        "none" | "off" => Ok(DualAxisVariant::None),
        "a" | "A" | "protoneer_v3_51" => Ok(DualAxisVariant::A),
        "b" | "B" | "cnc_shield_clone" => Ok(DualAxisVariant::B),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_axis(value: &str) -> Result<Axis, ParseError> {
    Axis::from_name(parse_string(value)?).ok_or(ParseError::InvalidValue)
}

fn parse_drive(value: &str) -> Result<DriveKind, ParseError> {
    match parse_string(value)? {
        "belt" => Ok(DriveKind::Belt),
        "leadscrew" | "screw" => Ok(DriveKind::Leadscrew),
        "direct" => Ok(DriveKind::Direct),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_length_unit(value: &str) -> Result<LengthUnit, ParseError> {
    match parse_string(value)? {
        "mm" => Ok(LengthUnit::Millimeter),
        "in" | "inch" => Ok(LengthUnit::Inch),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_rate_unit(value: &str) -> Result<RateUnit, ParseError> {
    match parse_string(value)? {
        "mm/min" => Ok(RateUnit::MmPerMin),
        "mm/s" | "mm/sec" => Ok(RateUnit::MmPerSec),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_accel_unit(value: &str) -> Result<AccelUnit, ParseError> {
    match parse_string(value)? {
        "mm/s2" | "mm/s^2" => Ok(AccelUnit::MmPerSec2),
        "mm/min2" | "mm/min^2" => Ok(AccelUnit::MmPerMin2),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Apply a `[features]` value
fn apply_feature(features: &mut FeatureRequest, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "variable_spindle" => features.variable_spindle = parse_bool(value)?,
        "spindle_dir_as_enable" => features.spindle_dir_as_enable = parse_bool(value)?,
        "dual_axis" => features.dual_axis = parse_dual_axis(value)?,
        "dual_axis_select" => features.dual_axis_select = parse_axis(value)?,
        "laser_mode" => features.laser_mode = parse_bool(value)?,
        "safety_door" => features.safety_door = parse_bool(value)?,
        _ => {} // Ignore unknown keys
    }
    Ok(())
}

/// Apply a `[machine]` value
fn apply_machine(machine: &mut MachineProfile, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "name" => {
            machine.name = HString::<MAX_NAME_LEN>::try_from(parse_string(value)?)
                .map_err(|_| ParseError::InvalidValue)?;
        }
        "spindle_rpm_min" => machine.spindle.rpm_min = parse_float(value)?,
        "spindle_rpm_max" => machine.spindle.rpm_max = parse_float(value)?,
        "step_pulse_us" => machine.stepper.step_pulse_us = parse_int(value)?,
        "stepping_invert_mask" => machine.stepper.stepping_invert_mask = parse_int(value)?,
        "direction_invert_mask" => machine.stepper.direction_invert_mask = parse_int(value)?,
        "stepper_idle_lock_ms" => machine.stepper.idle_lock_ms = parse_int(value)?,
        "status_report_mask" => machine.status_report_mask = parse_int(value)?,
        "junction_deviation" => machine.junction_deviation_mm = parse_float(value)?,
        "arc_tolerance" => machine.arc_tolerance_mm = parse_float(value)?,
        "report_inches" => machine.modes.report_inches = parse_bool(value)?,
        "invert_stepper_enable" => machine.modes.invert_stepper_enable = parse_bool(value)?,
        "invert_limit_pins" => machine.modes.invert_limit_pins = parse_bool(value)?,
        "soft_limit_enable" => machine.modes.soft_limit_enable = parse_bool(value)?,
        "hard_limit_enable" => machine.modes.hard_limit_enable = parse_bool(value)?,
        "invert_probe_pin" => machine.modes.invert_probe_pin = parse_bool(value)?,
        "laser_mode" => machine.modes.laser_mode = parse_bool(value)?,
        _ => {}
    }
    Ok(())
}

/// Apply a `[homing]` value
fn apply_homing(machine: &mut MachineProfile, key: &str, value: &str) -> Result<(), ParseError> {
    let homing = &mut machine.homing;
    match key {
        "enable" => homing.enable = parse_bool(value)?,
        "dir_mask" => homing.dir_mask = parse_int(value)?,
        "feed_rate" => homing.feed_rate = parse_float(value)?,
        "seek_rate" => homing.seek_rate = parse_float(value)?,
        "debounce_ms" => homing.debounce_ms = parse_int(value)?,
        "pulloff" => homing.pulloff_mm = parse_float(value)?,
        _ => {}
    }
    Ok(())
}

/// Apply an `[axis.*]` value
fn apply_axis(draft: &mut AxisDraft, key: &str, value: &str) -> Result<(), ParseError> {
    let profile = &mut draft.profile;
    match key {
        "microsteps" => profile.mechanics.microsteps = parse_int(value)?,
        "motor_steps_per_rev" => profile.mechanics.motor_steps_per_rev = parse_int(value)?,
        "drive" => draft.kind = parse_drive(value)?,
        "pitch" | "distance_per_rev" => draft.length = parse_float(value)?,
        "teeth" => draft.teeth = Some(parse_int(value)?),
        "unit" => profile.mechanics.unit = parse_length_unit(value)?,
        "gear_ratio" => profile.mechanics.gear_ratio = parse_gear_ratio(value)?,
        "max_rate" => profile.max_rate.value = parse_float(value)?,
        "rate_unit" => profile.max_rate.unit = parse_rate_unit(value)?,
        "acceleration" => profile.acceleration.value = parse_float(value)?,
        "acceleration_unit" => profile.acceleration.unit = parse_accel_unit(value)?,
        "max_travel" => profile.max_travel_mm = parse_float(value)?,
        _ => {}
    }
    Ok(())
}

/// Write a finished axis section back into the machine profile
fn save_section(
    machine: &mut MachineProfile,
    current_axis: &mut Option<AxisDraft>,
) -> Result<(), ParseError> {
    if let Some(draft) = current_axis.take() {
        let target = draft.target;
        let profile = draft.finish()?;
        match target {
            AxisTarget::One(axis) => *machine.axis_mut(axis) = profile,
            AxisTarget::Xy => {
                *machine.axis_mut(Axis::X) = profile;
                *machine.axis_mut(Axis::Y) = profile;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("features").unwrap(), Section::Features);
        assert_eq!(
            parse_section_header("axis.z").unwrap(),
            Section::Axis(AxisTarget::One(Axis::Z))
        );
        assert_eq!(
            parse_section_header("axis.xy").unwrap(),
            Section::Axis(AxisTarget::Xy)
        );
        for spelling in ["axis.XY", "axis.Xy", "axis.xY"] {
            assert_eq!(
                parse_section_header(spelling).unwrap(),
                Section::Axis(AxisTarget::Xy)
            );
        }
        assert_eq!(
            parse_section_header("axis.X").unwrap(),
            Section::Axis(AxisTarget::One(Axis::X))
        );
        assert_eq!(parse_section_header("axis.a"), Err(ParseError::InvalidSection));
        assert_eq!(parse_section_header("display"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_parse_gear_ratio() {
        let ratio = parse_gear_ratio("\"3:1\"").unwrap();
        assert_eq!(ratio.motor, 3);
        assert_eq!(ratio.output, 1);

        let ratio = parse_gear_ratio("5:2").unwrap();
        assert_eq!((ratio.motor, ratio.output), (5, 2));

        assert_eq!(parse_gear_ratio("3"), Err(ParseError::InvalidGearRatio));
    }

    #[test]
    fn test_parse_key_value_comments() {
        assert_eq!(
            parse_key_value("dual_axis = \"a\" # shield"),
            Some(("dual_axis", "\"a\""))
        );
        assert_eq!(
            parse_key_value("name = \"mill #2\""),
            Some(("name", "\"mill #2\""))
        );
        assert_eq!(parse_key_value("pitch ="), None);
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_float("1000"), Ok(1000.0));
        assert_eq!(parse_float("0.002"), Ok(0.002));
        assert_eq!(parse_float("10_000.0"), Ok(10_000.0));
        assert_eq!(parse_float("fast"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u8>("256"), Err(ParseError::InvalidValue));
        assert_eq!(parse_bool("yes"), Err(ParseError::InvalidValue));
        assert_eq!(parse_dual_axis("\"cnc_shield_clone\""), Ok(DualAxisVariant::B));
        assert_eq!(parse_accel_unit("mm/s^2"), Ok(AccelUnit::MmPerSec2));
    }

    #[test]
    fn test_parse_minimal_declaration() {
        let decl = parse_declaration(
            r#"
board = "uno"

[features]
variable_spindle = true
dual_axis = "protoneer_v3_51"
"#,
        )
        .unwrap();
        assert_eq!(decl.board.as_str(), "uno");
        assert!(decl.features.variable_spindle);
        assert_eq!(decl.features.dual_axis, DualAxisVariant::A);
        assert_eq!(decl.machine, MachineProfile::new());
    }

    #[test]
    fn test_preset_then_overrides() {
        let decl = parse_declaration(
            r#"
board = "arduino-atmega328p"
preset = "shapeoko"

[machine]
name = "shapeoko-custom"
spindle_rpm_max = 12000

[axis.z]
max_travel = 80.0
"#,
        )
        .unwrap();
        assert_eq!(decl.machine.name.as_str(), "shapeoko-custom");
        assert_eq!(decl.machine.spindle.rpm_max, 12_000.0);
        // Untouched keys keep the preset values
        assert_eq!(decl.machine.axis(Axis::Z).max_travel_mm, 80.0);
        assert_eq!(
            decl.machine.axis(Axis::Z).mechanics.drive,
            Drive::Leadscrew { pitch: 1.25 }
        );
        assert_eq!(
            decl.machine.axis(Axis::X),
            presets::shapeoko().axis(Axis::X)
        );
    }

    #[test]
    fn test_axis_xy_applies_to_both() {
        let decl = parse_declaration(
            r#"
board = "uno"

[axis.xy]
teeth = 20
pitch = 2.0
drive = "belt"
max_rate = 50
rate_unit = "mm/s"
"#,
        )
        .unwrap();
        for axis in [Axis::X, Axis::Y] {
            let profile = decl.machine.axis(axis);
            assert_eq!(
                profile.mechanics.drive,
                Drive::Belt {
                    pitch: 2.0,
                    teeth: 20
                }
            );
            assert_eq!(profile.max_rate.to_mm_per_min(), 3000.0);
        }
        assert_eq!(decl.machine.axis(Axis::Z), &AxisProfile::default());
    }

    #[test]
    fn test_belt_without_teeth() {
        let result = parse_declaration(
            r#"
board = "uno"
[axis.x]
drive = "belt"
pitch = 2.0
"#,
        );
        assert_eq!(result, Err(ParseError::MissingTeeth));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_declaration("[features]\nlaser_mode = true\n"),
            Err(ParseError::MissingBoard)
        );
        assert_eq!(
            parse_declaration("board = \"uno\"\npreset = \"bridgeport\"\n"),
            Err(ParseError::UnknownMachine)
        );
        assert_eq!(
            parse_declaration("board = \"uno\"\n[spindle]\n"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(
            parse_declaration("board = \"uno\"\n[features]\ndual_axis = \"c\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_declaration("board = \"uno\"\n[axis.x]\nunit = \"furlong\"\n"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_malformed_lines_rejected() {
        // Missing `=`
        assert_eq!(
            parse_declaration("board = \"uno\"\npreset = \"shapeoko\"\n[axis.x]\nmicrosteps 16\n"),
            Err(ParseError::InvalidLine)
        );
        // Empty value, even after a comment is stripped
        assert_eq!(
            parse_declaration("board = \"uno\"\n[axis.x]\nmax_rate =\n"),
            Err(ParseError::InvalidLine)
        );
        assert_eq!(
            parse_declaration("board = \"uno\"\n[homing]\nfeed_rate = # later\n"),
            Err(ParseError::InvalidLine)
        );
        // Empty key
        assert_eq!(
            parse_declaration("board = \"uno\"\n= 3\n"),
            Err(ParseError::InvalidLine)
        );
        // Stray word at the root
        assert_eq!(
            parse_declaration("board = \"uno\"\nshapeoko\n"),
            Err(ParseError::InvalidLine)
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let decl = parse_declaration(
            "board = \"mega\"\ncolour = \"red\"\n[homing]\nbeeps = 3\nenable = true\n",
        )
        .unwrap();
        assert!(decl.machine.homing.enable);
    }

    proptest! {
        #[test]
        fn prop_feature_section_round_trips(
            variable_spindle in any::<bool>(),
            dir_as_enable in any::<bool>(),
            dual in prop::sample::select(vec![
                ("none", DualAxisVariant::None),
                ("a", DualAxisVariant::A),
                ("cnc_shield_clone", DualAxisVariant::B),
            ]),
            select in prop::sample::select(vec![("x", Axis::X), ("Y", Axis::Y), ("z", Axis::Z)]),
            laser in any::<bool>(),
            door in any::<bool>(),
        ) {
            let text = format!(
                "board = \"uno\"\n\n[features]\nvariable_spindle = {}\nspindle_dir_as_enable = {}\n\
                 dual_axis = \"{}\"   # shield\ndual_axis_select = \"{}\"\nlaser_mode = {}\nsafety_door = {}\n",
                variable_spindle, dir_as_enable, dual.0, select.0, laser, door
            );
            let decl = parse_declaration(&text).unwrap();
            prop_assert_eq!(
                decl.features,
                FeatureRequest {
                    variable_spindle,
                    spindle_dir_as_enable: dir_as_enable,
                    dual_axis: dual.1,
                    dual_axis_select: select.1,
                    laser_mode: laser,
                    safety_door: door,
                }
            );
        }
    }
}
