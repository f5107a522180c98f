//! Built-in machine profiles

use super::{
    Acceleration, AxisProfile, Drive, GearRatio, HomingProfile, LengthUnit, MachineProfile,
    Mechanics, Rate, SpindleProfile, StepperProfile,
};
use crate::Axis;

/// Names accepted by [`find`]
pub const NAMES: [&str; 3] = ["shapeoko", "x-carve-500mm", "sherline-5400"];

/// Look up a built-in profile by name
pub fn find(name: &str) -> Option<MachineProfile> {
    match name {
        "shapeoko" => Some(shapeoko()),
        "x-carve-500mm" => Some(x_carve_500mm()),
        "sherline-5400" => Some(sherline_5400()),
        _ => None,
    }
}

fn named(name: &str) -> MachineProfile {
    let mut profile = MachineProfile::new();
    // preset names fit MAX_NAME_LEN
    let _ = profile.name.push_str(name);
    profile
}

fn axis(mechanics: Mechanics, max_rate: f32, accel: f32, max_travel_mm: f32) -> AxisProfile {
    AxisProfile {
        mechanics,
        max_rate: Rate::mm_per_min(max_rate),
        acceleration: Acceleration::mm_per_sec2(accel),
        max_travel_mm,
    }
}

/// Shapeoko with 0.08" belts on 18 tooth pulleys and a 1.25 mm Z screw
pub fn shapeoko() -> MachineProfile {
    let xy = Mechanics {
        microsteps: 8,
        motor_steps_per_rev: 400,
        drive: Drive::Belt {
            pitch: 0.08,
            teeth: 18,
        },
        unit: LengthUnit::Inch,
        gear_ratio: GearRatio::DIRECT,
    };
    let z = Mechanics {
        microsteps: 2,
        motor_steps_per_rev: 400,
        drive: Drive::Leadscrew { pitch: 1.25 },
        unit: LengthUnit::Millimeter,
        gear_ratio: GearRatio::DIRECT,
    };

    let mut profile = named("shapeoko");
    *profile.axis_mut(Axis::X) = axis(xy, 1000.0, 15.0, 200.0);
    *profile.axis_mut(Axis::Y) = axis(xy, 1000.0, 15.0, 200.0);
    *profile.axis_mut(Axis::Z) = axis(z, 1000.0, 15.0, 200.0);
    profile.spindle = SpindleProfile {
        rpm_min: 0.0,
        rpm_max: 10_000.0,
    };
    profile.stepper = StepperProfile {
        direction_invert_mask: Axis::Y.bit() | Axis::Z.bit(),
        idle_lock_ms: 255,
        ..StepperProfile::default()
    };
    profile.junction_deviation_mm = 0.02;
    profile.homing = HomingProfile {
        seek_rate: 250.0,
        ..HomingProfile::default()
    };
    profile
}

/// Inventables X-Carve 500 mm: GT2 belts on 20 tooth pulleys, ACME Z screw
pub fn x_carve_500mm() -> MachineProfile {
    let xy = Mechanics {
        microsteps: 8,
        motor_steps_per_rev: 200,
        drive: Drive::Belt {
            pitch: 2.0,
            teeth: 20,
        },
        unit: LengthUnit::Millimeter,
        gear_ratio: GearRatio::DIRECT,
    };
    // ACME 3/8-12
    let z = Mechanics {
        microsteps: 2,
        motor_steps_per_rev: 200,
        drive: Drive::Leadscrew { pitch: 2.117 },
        unit: LengthUnit::Millimeter,
        gear_ratio: GearRatio::DIRECT,
    };

    let mut profile = named("x-carve-500mm");
    *profile.axis_mut(Axis::X) = axis(xy, 8000.0, 500.0, 290.0);
    *profile.axis_mut(Axis::Y) = axis(xy, 8000.0, 500.0, 290.0);
    *profile.axis_mut(Axis::Z) = axis(z, 500.0, 50.0, 100.0);
    profile.spindle = SpindleProfile {
        rpm_min: 0.0,
        rpm_max: 10_000.0,
    };
    profile.stepper = StepperProfile {
        direction_invert_mask: Axis::X.bit() | Axis::Y.bit(),
        idle_lock_ms: 255,
        ..StepperProfile::default()
    };
    profile.junction_deviation_mm = 0.02;
    profile.homing = HomingProfile {
        dir_mask: Axis::X.bit() | Axis::Y.bit(),
        seek_rate: 750.0,
        ..HomingProfile::default()
    };
    profile
}

/// Sherline 5400 mill with 0.050" leadscrews on every axis
pub fn sherline_5400() -> MachineProfile {
    let screw = Mechanics {
        microsteps: 2,
        motor_steps_per_rev: 200,
        drive: Drive::Leadscrew { pitch: 0.050 },
        unit: LengthUnit::Inch,
        gear_ratio: GearRatio::DIRECT,
    };

    let mut profile = named("sherline-5400");
    *profile.axis_mut(Axis::X) = axis(screw, 635.0, 50.0, 225.0);
    *profile.axis_mut(Axis::Y) = axis(screw, 635.0, 50.0, 125.0);
    *profile.axis_mut(Axis::Z) = axis(screw, 635.0, 50.0, 170.0);
    profile.spindle = SpindleProfile {
        rpm_min: 0.0,
        rpm_max: 2_800.0,
    };
    profile.stepper = StepperProfile {
        direction_invert_mask: Axis::Y.bit() | Axis::Z.bit(),
        idle_lock_ms: 25,
        ..StepperProfile::default()
    };
    profile.homing = HomingProfile {
        feed_rate: 50.0,
        seek_rate: 635.0,
        ..HomingProfile::default()
    };
    profile
}
