//! Board capability tables
//!
//! Each supported controller board is a static [`BoardProfile`]: a default
//! [`PinGroup`] per signal class plus feature-conditioned overrides. Lookup
//! picks the override that matches the resolved features, or the default.

mod atmega328p;
mod mega2560;

pub use atmega328p::ARDUINO_ATMEGA328P;
pub use mega2560::ARDUINO_MEGA2560;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::features::{DualAxisVariant, EffectiveFeatures, Incompatibility, SpindleEnable};
use crate::pins::{PinGroup, SignalClass};

/// Supported boards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoardId {
    /// Arduino Uno and clones (ATmega328p)
    ArduinoAtmega328p,
    /// Arduino Mega 2560 with a RAMPS-style pinout
    ArduinoMega2560,
}

impl BoardId {
    /// Parse a board identifier or one of its aliases
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "arduino-atmega328p" | "atmega328p" | "uno" => Some(BoardId::ArduinoAtmega328p),
            "arduino-mega2560" | "mega2560" | "mega" => Some(BoardId::ArduinoMega2560),
            _ => None,
        }
    }

    /// Canonical identifier
    pub const fn name(self) -> &'static str {
        match self {
            BoardId::ArduinoAtmega328p => "arduino-atmega328p",
            BoardId::ArduinoMega2560 => "arduino-mega2560",
        }
    }

    /// Capability table for this board
    pub fn profile(self) -> &'static BoardProfile {
        match self {
            BoardId::ArduinoAtmega328p => &ARDUINO_ATMEGA328P,
            BoardId::ArduinoMega2560 => &ARDUINO_MEGA2560,
        }
    }
}

/// Board table errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// No board with the requested identifier
    UnknownBoard,
    /// More than one override matches a signal class
    AmbiguousBinding(SignalClass),
}

/// Find a board by identifier
pub fn find(name: &str) -> Result<&'static BoardProfile, BoardError> {
    BoardId::from_name(name)
        .map(BoardId::profile)
        .ok_or(BoardError::UnknownBoard)
}

/// Feature value matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match<T: 'static> {
    Any,
    Is(T),
    In(&'static [T]),
}

impl<T: PartialEq + Copy> Match<T> {
    pub fn matches(&self, value: T) -> bool {
        match self {
            Match::Any => true,
            Match::Is(v) => *v == value,
            Match::In(values) => values.contains(&value),
        }
    }
}

/// Feature condition attached to an override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub dual_axis: Match<DualAxisVariant>,
    pub spindle: Match<SpindleEnable>,
    pub safety_door: Match<bool>,
}

impl Condition {
    /// Matches every feature set
    pub const ANY: Condition = Condition {
        dual_axis: Match::Any,
        spindle: Match::Any,
        safety_door: Match::Any,
    };

    pub const fn dual(self, dual_axis: Match<DualAxisVariant>) -> Self {
        Self {
            dual_axis,
            spindle: self.spindle,
            safety_door: self.safety_door,
        }
    }

    pub const fn spindle(self, spindle: Match<SpindleEnable>) -> Self {
        Self {
            dual_axis: self.dual_axis,
            spindle,
            safety_door: self.safety_door,
        }
    }

    pub const fn safety_door(self, safety_door: bool) -> Self {
        Self {
            dual_axis: self.dual_axis,
            spindle: self.spindle,
            safety_door: Match::Is(safety_door),
        }
    }

    pub fn matches(&self, features: &EffectiveFeatures) -> bool {
        self.dual_axis.matches(features.dual_axis)
            && self.spindle.matches(features.spindle)
            && self.safety_door.matches(features.safety_door)
    }
}

/// Pin group that replaces the default when its condition matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Override {
    pub when: Condition,
    pub group: PinGroup,
}

impl Override {
    pub const fn new(when: Condition, group: PinGroup) -> Self {
        Self { when, group }
    }
}

/// Feature combination a board cannot provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported {
    pub when: Condition,
    pub reason: Incompatibility,
}

/// Spindle PWM timer constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpindlePwmTimer {
    /// Compare output driving the PWM pin
    pub output: TimerOutput,
    /// Counter top; full duty
    pub max_value: u16,
    /// Lowest duty while running, must be greater than zero
    pub min_value: u16,
    /// Duty while stopped
    pub off_value: u16,
    /// Clock prescaler
    pub prescaler: u16,
}

/// Timer compare outputs used for spindle PWM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimerOutput {
    /// 8-bit Timer2, compare A
    Oc2A,
    /// 16-bit Timer4, compare B
    Oc4B,
}

impl SpindlePwmTimer {
    /// Usable duty range between min and max
    pub const fn range(&self) -> u16 {
        self.max_value - self.min_value
    }

    /// Fast PWM output frequency for a CPU clock
    pub fn frequency_hz(&self, cpu_hz: u32) -> u32 {
        let period = u32::from(self.prescaler) * (u32::from(self.max_value) + 1);
        if period == 0 {
            0
        } else {
            cpu_hz / period
        }
    }
}

/// Static description of one controller board
#[derive(Debug)]
pub struct BoardProfile {
    pub id: BoardId,
    pub description: &'static str,
    /// CPU clock in Hz
    pub cpu_hz: u32,
    /// Default group per class; missing classes are unbound
    pub defaults: &'static [PinGroup],
    pub overrides: &'static [Override],
    pub unsupported: &'static [Unsupported],
    pub spindle_pwm: SpindlePwmTimer,
}

impl BoardProfile {
    /// Pin group for `class` under `features`
    ///
    /// Overrides for a class must be mutually exclusive; two matches are a
    /// table defect reported as [`BoardError::AmbiguousBinding`].
    pub fn lookup(
        &self,
        class: SignalClass,
        features: &EffectiveFeatures,
    ) -> Result<PinGroup, BoardError> {
        let mut matched = self
            .overrides
            .iter()
            .filter(|o| o.group.class == class && o.when.matches(features));

        if let Some(first) = matched.next() {
            if matched.next().is_some() {
                return Err(BoardError::AmbiguousBinding(class));
            }
            return Ok(first.group);
        }

        Ok(self.default_group(class))
    }

    /// Default group for `class`, ignoring overrides
    pub fn default_group(&self, class: SignalClass) -> PinGroup {
        self.defaults
            .iter()
            .find(|g| g.class == class)
            .copied()
            .unwrap_or(PinGroup::unbound(class))
    }

    /// Reject feature combinations this board cannot wire
    pub fn check_supported(&self, features: &EffectiveFeatures) -> Result<(), Incompatibility> {
        match self.unsupported.iter().find(|u| u.when.matches(features)) {
            Some(u) => Err(u.reason),
            None => Ok(()),
        }
    }

    /// Spindle PWM frequency on this board
    pub fn spindle_pwm_hz(&self) -> u32 {
        self.spindle_pwm.frequency_hz(self.cpu_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{resolve, FeatureRequest};
    use crate::pins::{Pin, Port};
    use crate::Axis;

    static DEFAULT_FLOOD: [Pin; 1] = [Pin::single_out(Port::C, 3)];
    static DUAL_FLOOD: [Pin; 1] = [Pin::single_out(Port::B, 5)];
    static OTHER_FLOOD: [Pin; 1] = [Pin::single_out(Port::C, 4)];

    static AMBIGUOUS: BoardProfile = BoardProfile {
        id: BoardId::ArduinoAtmega328p,
        description: "overlapping overrides",
        cpu_hz: 16_000_000,
        defaults: &[PinGroup::new(SignalClass::CoolantFlood, &DEFAULT_FLOOD)],
        overrides: &[
            Override::new(
                Condition::ANY.dual(Match::Is(DualAxisVariant::A)),
                PinGroup::new(SignalClass::CoolantFlood, &DUAL_FLOOD),
            ),
            Override::new(
                Condition::ANY.spindle(Match::Is(SpindleEnable::Pwm)),
                PinGroup::new(SignalClass::CoolantFlood, &OTHER_FLOOD),
            ),
        ],
        unsupported: &[],
        spindle_pwm: SpindlePwmTimer {
            output: TimerOutput::Oc2A,
            max_value: 255,
            min_value: 1,
            off_value: 0,
            prescaler: 64,
        },
    };

    fn features(variable: bool, dual: DualAxisVariant) -> EffectiveFeatures {
        resolve(&FeatureRequest {
            variable_spindle: variable,
            dual_axis: dual,
            ..FeatureRequest::default()
        })
        .unwrap()
    }

    #[test]
    fn test_find_board() {
        assert_eq!(find("uno").unwrap().id, BoardId::ArduinoAtmega328p);
        assert_eq!(
            find("arduino-mega2560").unwrap().id,
            BoardId::ArduinoMega2560
        );
        assert_eq!(find("teensy").unwrap_err(), BoardError::UnknownBoard);
    }

    #[test]
    fn test_lookup_default_and_override() {
        let f = features(false, DualAxisVariant::None);
        let group = AMBIGUOUS.lookup(SignalClass::CoolantFlood, &f).unwrap();
        assert_eq!(group.pins, &DEFAULT_FLOOD);

        let f = features(false, DualAxisVariant::A);
        let group = AMBIGUOUS.lookup(SignalClass::CoolantFlood, &f).unwrap();
        assert_eq!(group.pins, &DUAL_FLOOD);
    }

    #[test]
    fn test_lookup_missing_class_is_unbound() {
        let f = features(false, DualAxisVariant::None);
        let group = AMBIGUOUS.lookup(SignalClass::Probe, &f).unwrap();
        assert!(!group.is_bound());
    }

    #[test]
    fn test_overlapping_overrides_rejected() {
        let f = features(true, DualAxisVariant::A);
        assert_eq!(
            AMBIGUOUS.lookup(SignalClass::CoolantFlood, &f),
            Err(BoardError::AmbiguousBinding(SignalClass::CoolantFlood))
        );
    }

    #[test]
    fn test_match_variants() {
        assert!(Match::<bool>::Any.matches(true));
        assert!(Match::Is(Axis::X).matches(Axis::X));
        assert!(!Match::Is(Axis::X).matches(Axis::Y));
        assert!(Match::In(&[Axis::X, Axis::Y]).matches(Axis::Y));
        assert!(!Match::In(&[Axis::X, Axis::Y]).matches(Axis::Z));
    }

    #[test]
    fn test_pwm_frequency() {
        // 16 MHz / (64 * 256)
        assert_eq!(AMBIGUOUS.spindle_pwm_hz(), 976);
        assert_eq!(AMBIGUOUS.spindle_pwm.range(), 254);
    }
}
