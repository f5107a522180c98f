//! Pin binding types
//!
//! A [`PinBinding`] is one GPIO line; a [`PinGroup`] is the set of lines
//! implementing one logical signal class on a board.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Axis;

/// Maximum pins in one group (control inputs on boards with a dedicated
/// safety door pin)
pub const MAX_GROUP_PINS: usize = 4;

/// GPIO port identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    J,
    K,
    L,
}

impl Port {
    /// Parse a port letter ("B", "d", ...)
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Port::A),
            'B' => Some(Port::B),
            'C' => Some(Port::C),
            'D' => Some(Port::D),
            'E' => Some(Port::E),
            'F' => Some(Port::F),
            'G' => Some(Port::G),
            'H' => Some(Port::H),
            'J' => Some(Port::J),
            'K' => Some(Port::K),
            'L' => Some(Port::L),
            _ => None,
        }
    }

    /// Port letter
    pub const fn letter(self) -> char {
        match self {
            Port::A => 'A',
            Port::B => 'B',
            Port::C => 'C',
            Port::D => 'D',
            Port::E => 'E',
            Port::F => 'F',
            Port::G => 'G',
            Port::H => 'H',
            Port::J => 'J',
            Port::K => 'K',
            Port::L => 'L',
        }
    }
}

/// Data direction of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PinDirection {
    Input,
    Output,
}

/// One physical GPIO line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinBinding {
    /// Port the pin lives on
    pub port: Port,
    /// Bit index in the port registers (0-7)
    pub bit: u8,
    /// Data direction
    pub direction: PinDirection,
}

impl PinBinding {
    /// Create an output binding
    pub const fn output(port: Port, bit: u8) -> Self {
        Self {
            port,
            bit,
            direction: PinDirection::Output,
        }
    }

    /// Create an input binding
    pub const fn input(port: Port, bit: u8) -> Self {
        Self {
            port,
            bit,
            direction: PinDirection::Input,
        }
    }

    /// Single-bit mask for this pin
    ///
    /// Bits outside 0-7 produce an empty mask; validation reports them.
    pub const fn mask(&self) -> u8 {
        if self.bit < 8 {
            1 << self.bit
        } else {
            0
        }
    }

    /// True if both bindings refer to the same physical line
    pub fn same_line(&self, other: &PinBinding) -> bool {
        self.port == other.port && self.bit == other.bit
    }
}

/// Meaning of a pin inside its group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PinRole {
    /// Per-axis member of step, direction or limit groups
    Axis(Axis),
    /// Soft reset input
    Reset,
    /// Feed hold input
    FeedHold,
    /// Cycle start input
    CycleStart,
    /// Safety door input
    SafetyDoor,
    /// Stand-alone signal (probe, coolant, spindle, dual axis)
    Single,
}

/// A pin together with its role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pin {
    pub role: PinRole,
    pub binding: PinBinding,
}

impl Pin {
    pub const fn new(role: PinRole, binding: PinBinding) -> Self {
        Self { role, binding }
    }

    /// Axis output pin
    pub const fn axis_out(axis: Axis, port: Port, bit: u8) -> Self {
        Self::new(PinRole::Axis(axis), PinBinding::output(port, bit))
    }

    /// Axis input pin
    pub const fn axis_in(axis: Axis, port: Port, bit: u8) -> Self {
        Self::new(PinRole::Axis(axis), PinBinding::input(port, bit))
    }

    /// Stand-alone output pin
    pub const fn single_out(port: Port, bit: u8) -> Self {
        Self::new(PinRole::Single, PinBinding::output(port, bit))
    }

    /// Stand-alone input pin
    pub const fn single_in(port: Port, bit: u8) -> Self {
        Self::new(PinRole::Single, PinBinding::input(port, bit))
    }
}

/// Logical signal classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SignalClass {
    Step,
    Direction,
    StepperDisable,
    Limit,
    Control,
    Probe,
    CoolantFlood,
    CoolantMist,
    SpindleEnable,
    SpindleDirection,
    SpindlePwm,
    StepDual,
    DirectionDual,
}

impl SignalClass {
    /// Number of signal classes
    pub const COUNT: usize = 13;

    /// Every class, in table order
    pub const ALL: [SignalClass; Self::COUNT] = [
        SignalClass::Step,
        SignalClass::Direction,
        SignalClass::StepperDisable,
        SignalClass::Limit,
        SignalClass::Control,
        SignalClass::Probe,
        SignalClass::CoolantFlood,
        SignalClass::CoolantMist,
        SignalClass::SpindleEnable,
        SignalClass::SpindleDirection,
        SignalClass::SpindlePwm,
        SignalClass::StepDual,
        SignalClass::DirectionDual,
    ];

    /// Position of this class in [`SignalClass::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction every pin of this class must have
    pub const fn direction(self) -> PinDirection {
        match self {
            SignalClass::Limit | SignalClass::Control | SignalClass::Probe => PinDirection::Input,
            _ => PinDirection::Output,
        }
    }

    /// Groups accessed atomically through one port register
    pub const fn is_single_port(self) -> bool {
        matches!(
            self,
            SignalClass::Step | SignalClass::Direction | SignalClass::Limit | SignalClass::Control
        )
    }

    /// Interrupt-driven inputs that need a port of their own
    pub const fn is_port_isolated(self) -> bool {
        matches!(self, SignalClass::Limit | SignalClass::Control)
    }

    /// Short name used in declarations and reports
    pub const fn name(self) -> &'static str {
        match self {
            SignalClass::Step => "step",
            SignalClass::Direction => "direction",
            SignalClass::StepperDisable => "stepper_disable",
            SignalClass::Limit => "limit",
            SignalClass::Control => "control",
            SignalClass::Probe => "probe",
            SignalClass::CoolantFlood => "coolant_flood",
            SignalClass::CoolantMist => "coolant_mist",
            SignalClass::SpindleEnable => "spindle_enable",
            SignalClass::SpindleDirection => "spindle_direction",
            SignalClass::SpindlePwm => "spindle_pwm",
            SignalClass::StepDual => "step_dual",
            SignalClass::DirectionDual => "direction_dual",
        }
    }
}

/// Board table entry: the pins of one class
///
/// An empty pin list means the class is unbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinGroup {
    pub class: SignalClass,
    pub pins: &'static [Pin],
}

impl PinGroup {
    pub const fn new(class: SignalClass, pins: &'static [Pin]) -> Self {
        Self { class, pins }
    }

    /// Group with no pins
    pub const fn unbound(class: SignalClass) -> Self {
        Self { class, pins: &[] }
    }

    pub fn is_bound(&self) -> bool {
        !self.pins.is_empty()
    }

    /// Bitwise OR of the member bits
    pub fn mask(&self) -> u8 {
        mask_of(self.pins.iter())
    }
}

/// Bitwise OR of the bits of `pins`
pub fn mask_of<'a>(pins: impl Iterator<Item = &'a Pin>) -> u8 {
    pins.fold(0u8, |mask, pin| mask | pin.binding.mask())
}

/// A group after feature resolution, owned by the resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedGroup {
    pub class: SignalClass,
    pub pins: Vec<Pin, MAX_GROUP_PINS>,
    /// Bitwise OR of the member bits
    pub mask: u8,
}

impl ResolvedGroup {
    /// Copy a board table group, computing its mask from the table
    ///
    /// Pins beyond [`MAX_GROUP_PINS`] are not copied, which leaves the mask
    /// disagreeing with the pins for validation to report.
    pub fn from_group(group: &PinGroup) -> Self {
        let pins = group.pins.iter().take(MAX_GROUP_PINS).copied().collect();
        Self {
            class: group.class,
            mask: group.mask(),
            pins,
        }
    }

    /// Unbound group
    pub fn unbound(class: SignalClass) -> Self {
        Self {
            class,
            pins: Vec::new(),
            mask: 0,
        }
    }

    pub fn is_bound(&self) -> bool {
        !self.pins.is_empty()
    }

    /// Port shared by the group, if all pins are on one port
    pub fn port(&self) -> Option<Port> {
        let first = self.pins.first()?.binding.port;
        self.pins
            .iter()
            .all(|p| p.binding.port == first)
            .then_some(first)
    }

    /// First pin with the given role
    pub fn pin(&self, role: PinRole) -> Option<&PinBinding> {
        self.pins
            .iter()
            .find(|p| p.role == role)
            .map(|p| &p.binding)
    }

    /// The only pin of a stand-alone signal
    pub fn single(&self) -> Option<&PinBinding> {
        self.pins.first().map(|p| &p.binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static STEP: [Pin; 3] = [
        Pin::axis_out(Axis::X, Port::D, 2),
        Pin::axis_out(Axis::Y, Port::D, 3),
        Pin::axis_out(Axis::Z, Port::D, 4),
    ];

    #[test]
    fn test_group_mask() {
        let group = PinGroup::new(SignalClass::Step, &STEP);
        assert_eq!(group.mask(), 0b0001_1100);
        assert!(group.is_bound());
        assert!(!PinGroup::unbound(SignalClass::Probe).is_bound());
    }

    #[test]
    fn test_resolved_group_accessors() {
        let group = ResolvedGroup::from_group(&PinGroup::new(SignalClass::Step, &STEP));
        assert_eq!(group.port(), Some(Port::D));
        assert_eq!(group.mask, 0b0001_1100);
        assert_eq!(group.pin(PinRole::Axis(Axis::Y)).unwrap().bit, 3);
        assert!(group.pin(PinRole::Reset).is_none());
    }

    #[test]
    fn test_port_letters() {
        assert_eq!(Port::from_letter('b'), Some(Port::B));
        assert_eq!(Port::from_letter('I'), None);
        assert_eq!(Port::K.letter(), 'K');
    }

    #[test]
    fn test_class_properties() {
        assert_eq!(SignalClass::ALL.len(), SignalClass::COUNT);
        for (i, class) in SignalClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), i);
        }
        assert_eq!(SignalClass::Probe.direction(), PinDirection::Input);
        assert!(!SignalClass::Probe.is_port_isolated());
        assert!(SignalClass::Control.is_single_port());
        assert!(!SignalClass::SpindlePwm.is_single_port());
    }

    #[test]
    fn test_out_of_range_bit_has_empty_mask() {
        assert_eq!(PinBinding::output(Port::B, 9).mask(), 0);
    }
}
