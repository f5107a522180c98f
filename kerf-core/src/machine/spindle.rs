//! Spindle speed resolution

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::SpindleProfile;
use crate::board::{BoardProfile, SpindlePwmTimer};
use crate::features::EffectiveFeatures;

/// PWM mapping from RPM to timer compare value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpindlePwm {
    pub timer: SpindlePwmTimer,
    pub frequency_hz: u32,
    pub rpm_min: f32,
    pub rpm_max: f32,
    /// Compare counts per RPM above `rpm_min`
    pub gradient: f32,
}

impl SpindlePwm {
    pub fn new(timer: SpindlePwmTimer, cpu_hz: u32, rpm_min: f32, rpm_max: f32) -> Self {
        let span = rpm_max - rpm_min;
        let gradient = if span > 0.0 {
            f32::from(timer.range()) / span
        } else {
            0.0
        };
        Self {
            timer,
            frequency_hz: timer.frequency_hz(cpu_hz),
            rpm_min,
            rpm_max,
            gradient,
        }
    }

    /// Compare value for a requested speed
    ///
    /// Zero or negative speeds turn the output off. Speeds outside the range
    /// clamp to the min or max compare value. A degenerate range always
    /// runs at max.
    pub fn duty_for_rpm(&self, rpm: f32) -> u16 {
        if rpm <= 0.0 {
            self.timer.off_value
        } else if self.rpm_min >= self.rpm_max || rpm >= self.rpm_max {
            self.timer.max_value
        } else if rpm <= self.rpm_min {
            self.timer.min_value
        } else {
            // truncation toward zero, values are positive here
            ((rpm - self.rpm_min) * self.gradient) as u16 + self.timer.min_value
        }
    }
}

/// Spindle constants
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedSpindle {
    pub rpm_min: f32,
    pub rpm_max: f32,
    /// Present only when variable spindle is active
    pub pwm: Option<SpindlePwm>,
}

impl ResolvedSpindle {
    pub fn resolve(
        profile: &SpindleProfile,
        features: &EffectiveFeatures,
        board: &BoardProfile,
    ) -> Self {
        let pwm = features.variable_spindle().then(|| {
            SpindlePwm::new(
                board.spindle_pwm,
                board.cpu_hz,
                profile.rpm_min,
                profile.rpm_max,
            )
        });
        Self {
            rpm_min: profile.rpm_min,
            rpm_max: profile.rpm_max,
            pwm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ARDUINO_ATMEGA328P, ARDUINO_MEGA2560};
    use crate::features::{resolve, FeatureRequest};

    fn uno_pwm(rpm_min: f32, rpm_max: f32) -> SpindlePwm {
        SpindlePwm::new(
            ARDUINO_ATMEGA328P.spindle_pwm,
            ARDUINO_ATMEGA328P.cpu_hz,
            rpm_min,
            rpm_max,
        )
    }

    #[test]
    fn test_duty_mapping() {
        let pwm = uno_pwm(0.0, 10_000.0);
        assert_eq!(pwm.frequency_hz, 976);
        assert_eq!(pwm.duty_for_rpm(0.0), 0);
        assert_eq!(pwm.duty_for_rpm(-5.0), 0);
        assert_eq!(pwm.duty_for_rpm(10_000.0), 255);
        assert_eq!(pwm.duty_for_rpm(20_000.0), 255);
        // 5100 * 254 / 10000 = 129.54
        assert_eq!(pwm.duty_for_rpm(5_100.0), 130);
    }

    #[test]
    fn test_duty_below_min_clamps() {
        let pwm = uno_pwm(1_000.0, 2_000.0);
        assert_eq!(pwm.duty_for_rpm(500.0), 1);
        assert_eq!(pwm.duty_for_rpm(1_000.0), 1);
    }

    #[test]
    fn test_degenerate_range_runs_full() {
        let pwm = uno_pwm(1_000.0, 1_000.0);
        assert_eq!(pwm.gradient, 0.0);
        assert_eq!(pwm.duty_for_rpm(10.0), 255);
    }

    #[test]
    fn test_pwm_only_with_variable_spindle() {
        let profile = SpindleProfile {
            rpm_min: 0.0,
            rpm_max: 2_800.0,
        };

        let fixed = resolve(&FeatureRequest::default()).unwrap();
        let spindle = ResolvedSpindle::resolve(&profile, &fixed, &ARDUINO_MEGA2560);
        assert!(spindle.pwm.is_none());
        assert_eq!(spindle.rpm_max, 2_800.0);

        let variable = resolve(&FeatureRequest {
            variable_spindle: true,
            ..FeatureRequest::default()
        })
        .unwrap();
        let spindle = ResolvedSpindle::resolve(&profile, &variable, &ARDUINO_MEGA2560);
        let pwm = spindle.pwm.unwrap();
        assert_eq!(pwm.frequency_hz, 1951);
        assert_eq!(pwm.duty_for_rpm(2_800.0), 1024);
    }
}
