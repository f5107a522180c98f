//! Arduino Uno (ATmega328p) pin map
//!
//! Variable spindle swaps Z limit and spindle enable so the spindle can use
//! the hardware PWM on Uno digital pin 11. The dual-axis shields take over
//! the coolant mist and spindle direction pins; the dual motor's limit switch
//! shares the Z limit pin, so the limit mask keeps its three bits.

use super::{
    BoardId, BoardProfile, Condition, Match, Override, SpindlePwmTimer, TimerOutput, Unsupported,
};
use crate::features::{DualAxisVariant, Incompatibility, SpindleEnable};
use crate::pins::{Pin, PinBinding, PinGroup, PinRole, Port, SignalClass};
use crate::Axis;

const PWM_STRATEGIES: &[SpindleEnable] = &[SpindleEnable::Pwm, SpindleEnable::DirectionPin];
const DUAL_VARIANTS: &[DualAxisVariant] = &[DualAxisVariant::A, DualAxisVariant::B];

// Digital pins 2-4
static STEP: [Pin; 3] = [
    Pin::axis_out(Axis::X, Port::D, 2),
    Pin::axis_out(Axis::Y, Port::D, 3),
    Pin::axis_out(Axis::Z, Port::D, 4),
];

// Digital pins 5-7
static DIRECTION: [Pin; 3] = [
    Pin::axis_out(Axis::X, Port::D, 5),
    Pin::axis_out(Axis::Y, Port::D, 6),
    Pin::axis_out(Axis::Z, Port::D, 7),
];

// Digital pin 8
static STEPPER_DISABLE: [Pin; 1] = [Pin::single_out(Port::B, 0)];

// Digital pins 9, 10, 11
static LIMIT: [Pin; 3] = [
    Pin::axis_in(Axis::X, Port::B, 1),
    Pin::axis_in(Axis::Y, Port::B, 2),
    Pin::axis_in(Axis::Z, Port::B, 3),
];

// Z limit moved to digital pin 12
static LIMIT_PWM_SPINDLE: [Pin; 3] = [
    Pin::axis_in(Axis::X, Port::B, 1),
    Pin::axis_in(Axis::Y, Port::B, 2),
    Pin::axis_in(Axis::Z, Port::B, 4),
];

// Analog pins 0-2
static CONTROL: [Pin; 3] = [
    Pin::new(PinRole::Reset, PinBinding::input(Port::C, 0)),
    Pin::new(PinRole::FeedHold, PinBinding::input(Port::C, 1)),
    Pin::new(PinRole::CycleStart, PinBinding::input(Port::C, 2)),
];

// Safety door shares analog pin 1 with feed hold
static CONTROL_SAFETY_DOOR: [Pin; 3] = [
    Pin::new(PinRole::Reset, PinBinding::input(Port::C, 0)),
    Pin::new(PinRole::SafetyDoor, PinBinding::input(Port::C, 1)),
    Pin::new(PinRole::CycleStart, PinBinding::input(Port::C, 2)),
];

// Analog pin 5
static PROBE: [Pin; 1] = [Pin::single_in(Port::C, 5)];

// Analog pin 3
static COOLANT_FLOOD: [Pin; 1] = [Pin::single_out(Port::C, 3)];
// Digital pin 13
static COOLANT_FLOOD_DUAL_A: [Pin; 1] = [Pin::single_out(Port::B, 5)];
// Analog pin 4
static COOLANT_FLOOD_DUAL_B: [Pin; 1] = [Pin::single_out(Port::C, 4)];

// Analog pin 4
static COOLANT_MIST: [Pin; 1] = [Pin::single_out(Port::C, 4)];

// Digital pin 12
static SPINDLE_ENABLE: [Pin; 1] = [Pin::single_out(Port::B, 4)];
// Digital pin 11, shared with the PWM output
static SPINDLE_ENABLE_PWM: [Pin; 1] = [Pin::single_out(Port::B, 3)];
// Digital pin 13, the old spindle direction pin
static SPINDLE_ENABLE_DIR_PIN: [Pin; 1] = [Pin::single_out(Port::B, 5)];
// Analog pin 3, the old coolant flood pin
static SPINDLE_ENABLE_DUAL_B: [Pin; 1] = [Pin::single_out(Port::C, 3)];

// Digital pin 13 (no pull-up input because of the LED)
static SPINDLE_DIRECTION: [Pin; 1] = [Pin::single_out(Port::B, 5)];

// Digital pin 11, OC2A
static SPINDLE_PWM: [Pin; 1] = [Pin::single_out(Port::B, 3)];

// Analog pins 4 and 3
static STEP_DUAL_A: [Pin; 1] = [Pin::single_out(Port::C, 4)];
static DIRECTION_DUAL_A: [Pin; 1] = [Pin::single_out(Port::C, 3)];

// Digital pins 12 and 13
static STEP_DUAL_B: [Pin; 1] = [Pin::single_out(Port::B, 4)];
static DIRECTION_DUAL_B: [Pin; 1] = [Pin::single_out(Port::B, 5)];

/// Arduino Uno capability table
pub static ARDUINO_ATMEGA328P: BoardProfile = BoardProfile {
    id: BoardId::ArduinoAtmega328p,
    description: "Arduino Uno (ATmega328p)",
    cpu_hz: 16_000_000,
    defaults: &[
        PinGroup::new(SignalClass::Step, &STEP),
        PinGroup::new(SignalClass::Direction, &DIRECTION),
        PinGroup::new(SignalClass::StepperDisable, &STEPPER_DISABLE),
        PinGroup::new(SignalClass::Limit, &LIMIT),
        PinGroup::new(SignalClass::Control, &CONTROL),
        PinGroup::new(SignalClass::Probe, &PROBE),
        PinGroup::new(SignalClass::CoolantFlood, &COOLANT_FLOOD),
        PinGroup::new(SignalClass::CoolantMist, &COOLANT_MIST),
        PinGroup::new(SignalClass::SpindleEnable, &SPINDLE_ENABLE),
        PinGroup::new(SignalClass::SpindleDirection, &SPINDLE_DIRECTION),
    ],
    overrides: &[
        // Limits
        Override::new(
            Condition::ANY.spindle(Match::In(PWM_STRATEGIES)),
            PinGroup::new(SignalClass::Limit, &LIMIT_PWM_SPINDLE),
        ),
        // Control inputs
        Override::new(
            Condition::ANY.safety_door(true),
            PinGroup::new(SignalClass::Control, &CONTROL_SAFETY_DOOR),
        ),
        // Coolant
        Override::new(
            Condition::ANY.dual(Match::Is(DualAxisVariant::A)),
            PinGroup::new(SignalClass::CoolantFlood, &COOLANT_FLOOD_DUAL_A),
        ),
        Override::new(
            Condition::ANY.dual(Match::Is(DualAxisVariant::B)),
            PinGroup::new(SignalClass::CoolantFlood, &COOLANT_FLOOD_DUAL_B),
        ),
        Override::new(
            Condition::ANY.dual(Match::In(DUAL_VARIANTS)),
            PinGroup::unbound(SignalClass::CoolantMist),
        ),
        // Spindle enable
        Override::new(
            Condition::ANY
                .dual(Match::In(&[DualAxisVariant::None, DualAxisVariant::A]))
                .spindle(Match::Is(SpindleEnable::Pwm)),
            PinGroup::new(SignalClass::SpindleEnable, &SPINDLE_ENABLE_PWM),
        ),
        Override::new(
            Condition::ANY
                .dual(Match::Is(DualAxisVariant::None))
                .spindle(Match::Is(SpindleEnable::DirectionPin)),
            PinGroup::new(SignalClass::SpindleEnable, &SPINDLE_ENABLE_DIR_PIN),
        ),
        Override::new(
            Condition::ANY
                .dual(Match::Is(DualAxisVariant::B))
                .spindle(Match::Is(SpindleEnable::Fixed)),
            PinGroup::new(SignalClass::SpindleEnable, &SPINDLE_ENABLE_DUAL_B),
        ),
        // Spindle direction
        Override::new(
            Condition::ANY
                .dual(Match::Is(DualAxisVariant::None))
                .spindle(Match::Is(SpindleEnable::DirectionPin)),
            PinGroup::unbound(SignalClass::SpindleDirection),
        ),
        Override::new(
            Condition::ANY.dual(Match::In(DUAL_VARIANTS)),
            PinGroup::unbound(SignalClass::SpindleDirection),
        ),
        // Spindle PWM
        Override::new(
            Condition::ANY
                .dual(Match::In(&[DualAxisVariant::None, DualAxisVariant::A]))
                .spindle(Match::In(PWM_STRATEGIES)),
            PinGroup::new(SignalClass::SpindlePwm, &SPINDLE_PWM),
        ),
        // Dual axis
        Override::new(
            Condition::ANY.dual(Match::Is(DualAxisVariant::A)),
            PinGroup::new(SignalClass::StepDual, &STEP_DUAL_A),
        ),
        Override::new(
            Condition::ANY.dual(Match::Is(DualAxisVariant::A)),
            PinGroup::new(SignalClass::DirectionDual, &DIRECTION_DUAL_A),
        ),
        Override::new(
            Condition::ANY.dual(Match::Is(DualAxisVariant::B)),
            PinGroup::new(SignalClass::StepDual, &STEP_DUAL_B),
        ),
        Override::new(
            Condition::ANY.dual(Match::Is(DualAxisVariant::B)),
            PinGroup::new(SignalClass::DirectionDual, &DIRECTION_DUAL_B),
        ),
    ],
    unsupported: &[Unsupported {
        // The clone shield puts the dual step pin on digital pin 12
        when: Condition::ANY
            .dual(Match::Is(DualAxisVariant::B))
            .spindle(Match::In(PWM_STRATEGIES)),
        reason: Incompatibility::VariableSpindleWithDualAxis,
    }],
    // Timer2 fast PWM, 1/64 prescaler: 0.98 kHz
    spindle_pwm: SpindlePwmTimer {
        output: TimerOutput::Oc2A,
        max_value: 255,
        min_value: 1,
        off_value: 0,
        prescaler: 64,
    },
};
