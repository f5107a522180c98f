//! Arduino Mega 2560 pin map
//!
//! Spindle PWM runs on 16-bit Timer4, so the spindle enable keeps its own
//! pin in every mode. No dual-axis layout exists for this board.

use super::{
    BoardId, BoardProfile, Condition, Match, Override, SpindlePwmTimer, TimerOutput, Unsupported,
};
use crate::features::{DualAxisVariant, Incompatibility, SpindleEnable};
use crate::pins::{Pin, PinBinding, PinGroup, PinRole, Port, SignalClass};
use crate::Axis;

// Digital pins 24-26
static STEP: [Pin; 3] = [
    Pin::axis_out(Axis::X, Port::A, 2),
    Pin::axis_out(Axis::Y, Port::A, 3),
    Pin::axis_out(Axis::Z, Port::A, 4),
];

// Digital pins 30-32
static DIRECTION: [Pin; 3] = [
    Pin::axis_out(Axis::X, Port::C, 7),
    Pin::axis_out(Axis::Y, Port::C, 6),
    Pin::axis_out(Axis::Z, Port::C, 5),
];

// Digital pin 13
static STEPPER_DISABLE: [Pin; 1] = [Pin::single_out(Port::B, 7)];

// Digital pins 10-12
static LIMIT: [Pin; 3] = [
    Pin::axis_in(Axis::X, Port::B, 4),
    Pin::axis_in(Axis::Y, Port::B, 5),
    Pin::axis_in(Axis::Z, Port::B, 6),
];

// Analog pins 8-10
static CONTROL: [Pin; 3] = [
    Pin::new(PinRole::Reset, PinBinding::input(Port::K, 0)),
    Pin::new(PinRole::FeedHold, PinBinding::input(Port::K, 1)),
    Pin::new(PinRole::CycleStart, PinBinding::input(Port::K, 2)),
];

// Safety door on analog pin 11
static CONTROL_SAFETY_DOOR: [Pin; 4] = [
    Pin::new(PinRole::Reset, PinBinding::input(Port::K, 0)),
    Pin::new(PinRole::FeedHold, PinBinding::input(Port::K, 1)),
    Pin::new(PinRole::CycleStart, PinBinding::input(Port::K, 2)),
    Pin::new(PinRole::SafetyDoor, PinBinding::input(Port::K, 3)),
];

// Analog pin 15
static PROBE: [Pin; 1] = [Pin::single_in(Port::K, 7)];

// Digital pins 8 and 9
static COOLANT_FLOOD: [Pin; 1] = [Pin::single_out(Port::H, 5)];
static COOLANT_MIST: [Pin; 1] = [Pin::single_out(Port::H, 6)];

// Digital pin 6
static SPINDLE_ENABLE: [Pin; 1] = [Pin::single_out(Port::H, 3)];

// Digital pin 5
static SPINDLE_DIRECTION: [Pin; 1] = [Pin::single_out(Port::E, 3)];

// Digital pin 7, OC4B
static SPINDLE_PWM: [Pin; 1] = [Pin::single_out(Port::H, 4)];

/// Arduino Mega 2560 capability table
pub static ARDUINO_MEGA2560: BoardProfile = BoardProfile {
    id: BoardId::ArduinoMega2560,
    description: "Arduino Mega 2560",
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
        Override::new(
            Condition::ANY.safety_door(true),
            PinGroup::new(SignalClass::Control, &CONTROL_SAFETY_DOOR),
        ),
        Override::new(
            Condition::ANY.spindle(Match::Is(SpindleEnable::Pwm)),
            PinGroup::new(SignalClass::SpindlePwm, &SPINDLE_PWM),
        ),
    ],
    unsupported: &[
        Unsupported {
            when: Condition::ANY.dual(Match::In(&[DualAxisVariant::A, DualAxisVariant::B])),
            reason: Incompatibility::DualAxisUnsupported,
        },
        Unsupported {
            when: Condition::ANY.spindle(Match::Is(SpindleEnable::DirectionPin)),
            reason: Incompatibility::DirAsEnableUnsupported,
        },
    ],
    // Timer4 fast PWM with OCR4A as top, 1/8 prescaler: 1.95 kHz
    spindle_pwm: SpindlePwmTimer {
        output: TimerOutput::Oc4B,
        max_value: 1024,
        min_value: 1,
        off_value: 0,
        prescaler: 8,
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{resolve, FeatureRequest};

    #[test]
    fn test_pwm_on_timer4() {
        let f = resolve(&FeatureRequest {
            variable_spindle: true,
            ..FeatureRequest::default()
        })
        .unwrap();
        assert_eq!(f.spindle, SpindleEnable::Pwm);
        let pwm = ARDUINO_MEGA2560.lookup(SignalClass::SpindlePwm, &f).unwrap();
        assert_eq!(pwm.pins[0].binding, PinBinding::output(Port::H, 4));
        let enable = ARDUINO_MEGA2560
            .lookup(SignalClass::SpindleEnable, &f)
            .unwrap();
        assert_eq!(enable.pins[0].binding, PinBinding::output(Port::H, 3));
        assert_eq!(ARDUINO_MEGA2560.spindle_pwm_hz(), 1951);
    }

    #[test]
    fn test_safety_door_has_own_pin() {
        let f = resolve(&FeatureRequest {
            safety_door: true,
            ..FeatureRequest::default()
        })
        .unwrap();
        let control = ARDUINO_MEGA2560.lookup(SignalClass::Control, &f).unwrap();
        assert_eq!(control.pins.len(), 4);
        assert_eq!(control.mask(), 0b0000_1111);
    }

    #[test]
    fn test_dual_axis_unsupported() {
        let f = resolve(&FeatureRequest {
            dual_axis: DualAxisVariant::A,
            ..FeatureRequest::default()
        })
        .unwrap();
        assert_eq!(
            ARDUINO_MEGA2560.check_supported(&f),
            Err(Incompatibility::DualAxisUnsupported)
        );
    }

    #[test]
    fn test_dir_as_enable_unsupported() {
        let f = resolve(&FeatureRequest {
            variable_spindle: true,
            spindle_dir_as_enable: true,
            ..FeatureRequest::default()
        })
        .unwrap();
        assert_eq!(
            ARDUINO_MEGA2560.check_supported(&f),
            Err(Incompatibility::DirAsEnableUnsupported)
        );
    }
}
