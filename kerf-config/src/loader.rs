//! Declaration loading
//!
//! Parses a declaration and assembles it into a [`ResolvedConfig`],
//! logging a summary of the result.

use core::fmt;

use kerf_core::assemble::{assemble_named, ConfigError};
use kerf_core::pins::SignalClass;
use kerf_core::{Axis, ResolvedConfig};

use crate::toml::{parse_declaration, Declaration, ParseError};

/// Declaration loading errors
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Declaration text could not be parsed
    Parse(ParseError),
    /// Parsed declaration could not be assembled
    Config(ConfigError),
}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        LoadError::Parse(e)
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Config(e)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Parse(e) => write!(f, "parse error: {}", e),
            LoadError::Config(e) => write!(f, "{}", e),
        }
    }
}

/// Parse and assemble a declaration
pub fn load(text: &str) -> Result<ResolvedConfig, LoadError> {
    info!("Loading machine declaration...");
    debug!("Read {} bytes of declaration", text.len());

    let declaration = parse_declaration(text).map_err(|e| {
        warn!("Declaration parse error: {:?}", e);
        LoadError::Parse(e)
    })?;

    load_declaration(&declaration)
}

/// Assemble an already parsed declaration
pub fn load_declaration(declaration: &Declaration) -> Result<ResolvedConfig, LoadError> {
    let config = assemble_named(
        declaration.board.as_str(),
        &declaration.machine,
        &declaration.features,
    )
    .map_err(|e| {
        warn!("Declaration rejected: {:?}", e);
        LoadError::Config(e)
    })?;

    if config.features.dir_as_enable_dropped {
        warn!("spindle_dir_as_enable ignored: dual axis uses the spindle direction pin");
    }

    log_config_summary(&config);
    Ok(config)
}

/// Log a summary of the resolved configuration
fn log_config_summary(config: &ResolvedConfig) {
    info!(
        "Configuration resolved for {} on {}",
        config.machine.as_str(),
        config.board.name()
    );
    debug!("  spindle strategy {:?}", config.features.spindle);
    debug!("  dual axis {:?}", config.features.dual_axis);
    for axis in Axis::ALL {
        let resolved = config.axis(axis);
        debug!(
            "  {:?}: {} steps/mm, {} mm/min, {} mm/min^2",
            axis,
            resolved.steps_per_mm,
            resolved.max_rate_mm_per_min,
            resolved.acceleration_mm_per_min2
        );
    }
    for class in [SignalClass::Step, SignalClass::Direction, SignalClass::Limit] {
        debug!("  {} mask {:#x}", class.name(), config.mask(class));
    }
    if let Some(pwm) = config.spindle.pwm {
        debug!("  spindle pwm {} Hz", pwm.frequency_hz);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_core::features::{DualAxisVariant, Incompatibility, SpindleEnable};

    #[test]
    fn test_load_preset() {
        let config = load("board = \"uno\"\npreset = \"x-carve-500mm\"\n").unwrap();
        assert_eq!(config.machine.as_str(), "x-carve-500mm");
        assert_eq!(config.axis(Axis::X).steps_per_mm, 40.0);
        assert_eq!(config.features.spindle, SpindleEnable::Fixed);
    }

    #[test]
    fn test_load_dual_axis_drops_dir_as_enable() {
        let config = load(
            r#"
board = "uno"
preset = "shapeoko"

[features]
variable_spindle = true
spindle_dir_as_enable = true
dual_axis = "a"
"#,
        )
        .unwrap();
        assert!(config.features.dir_as_enable_dropped);
        assert_eq!(config.features.dual_axis, DualAxisVariant::A);
        assert_eq!(config.features.spindle, SpindleEnable::Pwm);
    }

    #[test]
    fn test_load_errors() {
        assert_eq!(
            load("board = \"teensy\"\n"),
            Err(LoadError::Config(ConfigError::UnknownBoard))
        );
        assert_eq!(
            load("board = \"mega\"\n[features]\ndual_axis = \"b\"\n"),
            Err(LoadError::Config(ConfigError::IncompatibleFeatureCombination(
                Incompatibility::DualAxisUnsupported
            )))
        );
        assert_eq!(
            load("board = \"uno\"\n[axis.x]\nmicrosteps = many\n"),
            Err(LoadError::Parse(ParseError::InvalidValue))
        );
        assert_eq!(
            load("board=\"uno\"\npreset=\"shapeoko\"\n[axis.x]\nmicrosteps 16\nmax_rate =\n"),
            Err(LoadError::Parse(ParseError::InvalidLine))
        );
    }

    #[test]
    fn test_soft_limits_need_homing() {
        let text = "board = \"uno\"\npreset = \"sherline-5400\"\n[machine]\nsoft_limit_enable = true\n";
        match load(text) {
            Err(LoadError::Config(ConfigError::Invalid(violations))) => {
                assert!(violations.contains(&kerf_core::Violation::SoftLimitsWithoutHoming));
            }
            other => panic!("unexpected result {:?}", other),
        }

        let text = "board = \"uno\"\npreset = \"sherline-5400\"\n[machine]\nsoft_limit_enable = true\n[homing]\nenable = true\n";
        assert!(load(text).is_ok());
    }
}
