//! Build-time validation for Kerf machine declarations
//!
//! Meant to be called from a firmware `build.rs`. A declaration is checked
//! in three passes:
//!
//! 1. TOML syntax, using the full `toml` crate
//! 2. Structure: required keys, known sections, value types
//! 3. Semantics: the same parse and assembly the firmware runs
//!
//! Any failure aborts the build with a boxed report listing every problem
//! found, so a broken declaration never reaches the flash image.
//!
//! ```no_run
//! // build.rs
//! fn main() {
//!     kerf_build::emit_blob("../machines/shapeoko.toml", "machine.bin");
//! }
//! ```

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use kerf_config::{load_declaration, parse_declaration, LoadError};
use kerf_core::machine::presets;
use kerf_core::{BoardId, ConfigError, ResolvedConfig};
use toml::Value;

/// Width of the text area inside a report box
const REPORT_WIDTH: usize = 62;

/// A failed check, ready to be printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub errors: Vec<String>,
}

impl Report {
    fn new(title: &str, errors: Vec<String>) -> Self {
        Self {
            title: title.to_string(),
            errors,
        }
    }

    /// Render as a box-drawn block for the build log
    pub fn render(&self) -> String {
        let rule = "═".repeat(REPORT_WIDTH + 4);
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "╔{}╗", rule);
        push_row(&mut out, &format!("ERROR: {}", self.title));
        let _ = writeln!(out, "╠{}╣", rule);
        for line in format_error_lines(&self.errors) {
            push_row(&mut out, &line);
        }
        let _ = writeln!(out, "╚{}╝", rule);
        out
    }
}

fn push_row(out: &mut String, text: &str) {
    let _ = writeln!(out, "║  {:<width$}  ║", text, width = REPORT_WIDTH);
}

/// Format errors as bullet lines that fit the report box
fn format_error_lines(errors: &[String]) -> Vec<String> {
    errors
        .iter()
        .map(|e| {
            let line = format!("• {}", e);
            if line.chars().count() > REPORT_WIDTH {
                let cut: String = line.chars().take(REPORT_WIDTH - 3).collect();
                format!("{}...", cut)
            } else {
                line
            }
        })
        .collect()
}

/// Expected TOML type of a known key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Bool,
    Int,
    Float,
    Str,
}

impl Kind {
    fn matches(self, value: &Value) -> bool {
        match self {
            Kind::Bool => value.is_bool(),
            Kind::Int => value.is_integer(),
            Kind::Float => value.is_float() || value.is_integer(),
            Kind::Str => value.is_str(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::Bool => "a boolean",
            Kind::Int => "an integer",
            Kind::Float => "a number",
            Kind::Str => "a string",
        }
    }
}

const FEATURE_KEYS: &[(&str, Kind)] = &[
    ("variable_spindle", Kind::Bool),
    ("spindle_dir_as_enable", Kind::Bool),
    ("dual_axis", Kind::Str),
    ("dual_axis_select", Kind::Str),
    ("laser_mode", Kind::Bool),
    ("safety_door", Kind::Bool),
];

const MACHINE_KEYS: &[(&str, Kind)] = &[
    ("name", Kind::Str),
    ("spindle_rpm_min", Kind::Float),
    ("spindle_rpm_max", Kind::Float),
    ("step_pulse_us", Kind::Int),
    ("stepping_invert_mask", Kind::Int),
    ("direction_invert_mask", Kind::Int),
    ("stepper_idle_lock_ms", Kind::Int),
    ("status_report_mask", Kind::Int),
    ("junction_deviation", Kind::Float),
    ("arc_tolerance", Kind::Float),
    ("report_inches", Kind::Bool),
    ("invert_stepper_enable", Kind::Bool),
    ("invert_limit_pins", Kind::Bool),
    ("soft_limit_enable", Kind::Bool),
    ("hard_limit_enable", Kind::Bool),
    ("invert_probe_pin", Kind::Bool),
    ("laser_mode", Kind::Bool),
];

const HOMING_KEYS: &[(&str, Kind)] = &[
    ("enable", Kind::Bool),
    ("dir_mask", Kind::Int),
    ("feed_rate", Kind::Float),
    ("seek_rate", Kind::Float),
    ("debounce_ms", Kind::Int),
    ("pulloff", Kind::Float),
];

const AXIS_KEYS: &[(&str, Kind)] = &[
    ("microsteps", Kind::Int),
    ("motor_steps_per_rev", Kind::Int),
    ("drive", Kind::Str),
    ("pitch", Kind::Float),
    ("distance_per_rev", Kind::Float),
    ("teeth", Kind::Int),
    ("unit", Kind::Str),
    ("gear_ratio", Kind::Str),
    ("max_rate", Kind::Float),
    ("rate_unit", Kind::Str),
    ("acceleration", Kind::Float),
    ("acceleration_unit", Kind::Str),
    ("max_travel", Kind::Float),
];

const AXIS_SECTIONS: [&str; 4] = ["x", "y", "z", "xy"];

/// Check declaration text, returning the resolved configuration
pub fn check_str(text: &str) -> Result<ResolvedConfig, Report> {
    // Pass 1: syntax
    let value: Value = toml::from_str(text).map_err(|e| {
        let lines = e
            .to_string()
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();
        Report::new("Invalid TOML syntax", lines)
    })?;

    // Pass 2: structure
    let errors = check_structure(&value);
    if !errors.is_empty() {
        return Err(Report::new("Invalid machine declaration", errors));
    }

    // Pass 3: semantics
    let declaration = parse_declaration(text)
        .map_err(|e| Report::new("Invalid machine declaration", vec![e.to_string()]))?;
    load_declaration(&declaration).map_err(load_report)
}

/// Read and check a declaration file
pub fn check_file(path: &Path) -> Result<ResolvedConfig, Report> {
    let text = fs::read_to_string(path).map_err(|e| {
        Report::new(
            "Cannot read machine declaration",
            vec![path.display().to_string(), e.to_string()],
        )
    })?;
    check_str(&text)
}

fn load_report(error: LoadError) -> Report {
    match error {
        LoadError::Config(ConfigError::Invalid(violations)) => {
            let mut lines: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
            if violations.overflowed() {
                lines.push("further violations not shown".to_string());
            }
            Report::new("Invalid machine configuration", lines)
        }
        other => Report::new("Invalid machine configuration", vec![other.to_string()]),
    }
}

fn check_structure(value: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(root) = value.as_table() else {
        errors.push("Declaration must be a table".to_string());
        return errors;
    };

    match root.get("board") {
        None => errors.push("Missing required key 'board'".to_string()),
        Some(Value::String(name)) => {
            if BoardId::from_name(name).is_none() {
                errors.push(format!("Unknown board '{}'", name));
            }
        }
        Some(_) => errors.push("'board' must be a string".to_string()),
    }

    match root.get("preset") {
        None => {}
        Some(Value::String(name)) => {
            if presets::find(name).is_none() {
                errors.push(format!(
                    "Unknown preset '{}' (built-in: {})",
                    name,
                    presets::NAMES.join(", ")
                ));
            }
        }
        Some(_) => errors.push("'preset' must be a string".to_string()),
    }

    for (key, item) in root {
        let Value::Table(table) = item else {
            continue;
        };
        match key.as_str() {
            "machine" => check_keys(table, "machine", MACHINE_KEYS, &mut errors),
            "features" => check_keys(table, "features", FEATURE_KEYS, &mut errors),
            "homing" => check_keys(table, "homing", HOMING_KEYS, &mut errors),
            "axis" => check_axis_sections(table, &mut errors),
            other => errors.push(format!("Unknown section [{}]", other)),
        }
    }

    errors
}

fn check_axis_sections(table: &toml::Table, errors: &mut Vec<String>) {
    for (name, item) in table {
        let lower = name.to_ascii_lowercase();
        if !AXIS_SECTIONS.contains(&lower.as_str()) {
            errors.push(format!("Unknown section [axis.{}]", name));
            continue;
        }
        match item {
            Value::Table(axis) => {
                check_keys(axis, &format!("axis.{}", name), AXIS_KEYS, errors)
            }
            _ => errors.push(format!("[axis.{}] must be a section", name)),
        }
    }
}

fn check_keys(table: &toml::Table, section: &str, known: &[(&str, Kind)], errors: &mut Vec<String>) {
    for (key, expected) in known {
        if let Some(value) = table.get(*key) {
            if !expected.matches(value) {
                errors.push(format!(
                    "[{}] '{}' must be {}",
                    section,
                    key,
                    expected.name()
                ));
            }
        }
    }
}

/// Validate a declaration file, aborting the build on failure
pub fn validate_declaration(path: impl AsRef<Path>) -> ResolvedConfig {
    let path = path.as_ref();
    println!("cargo:rerun-if-changed={}", path.display());

    match check_file(path) {
        Ok(config) => config,
        Err(report) => panic!("{}", report.render()),
    }
}

/// Validate a declaration and write its blob into `OUT_DIR`
pub fn emit_blob(path: impl AsRef<Path>, file_name: &str) -> PathBuf {
    let Some(out_dir) = env::var_os("OUT_DIR") else {
        panic!(
            "{}",
            Report::new("OUT_DIR not set", vec!["emit_blob must run from a build script".to_string()])
                .render()
        );
    };
    emit_blob_to(path, Path::new(&out_dir), file_name)
}

/// Validate a declaration and write its blob into `out_dir`
pub fn emit_blob_to(path: impl AsRef<Path>, out_dir: &Path, file_name: &str) -> PathBuf {
    let path = path.as_ref();
    let config = validate_declaration(path);

    let bytes = match kerf_config::encode(&config) {
        Ok(bytes) => bytes,
        Err(e) => panic!(
            "{}",
            Report::new("Cannot encode configuration", vec![format!("{:?}", e)]).render()
        ),
    };

    let target = out_dir.join(file_name);
    if let Err(e) = fs::write(&target, &bytes) {
        panic!(
            "{}",
            Report::new(
                "Cannot write configuration blob",
                vec![target.display().to_string(), e.to_string()]
            )
            .render()
        );
    }

    println!(
        "cargo:warning={} validated successfully ({} on {}, {} bytes)",
        path.display(),
        config.machine.as_str(),
        config.board.name(),
        bytes.len()
    );
    target
}
