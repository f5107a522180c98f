//! Configuration resolution for Kerf CNC firmware
//!
//! Turns a controller board and a machine profile into one immutable
//! [`ResolvedConfig`] the motion drivers read at startup:
//!
//! - Board capability tables (pin groups per signal class)
//! - Feature selection (spindle strategy, dual-axis shields, safety door)
//! - Physical parameter resolution (steps/mm, rates, accelerations)
//! - Validation of pin and range invariants
//! - Built-in machine presets
//!
//! Nothing here touches hardware; the crate is pure data and arithmetic.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod assemble;
pub mod axis;
pub mod board;
pub mod features;
pub mod machine;
pub mod pins;
pub mod resolved;
pub mod validate;

pub use assemble::{assemble, assemble_named, ConfigError};
pub use axis::{Axis, AXIS_MASK_ALL, N_AXIS};
pub use board::{BoardId, BoardProfile};
pub use features::{DualAxisVariant, EffectiveFeatures, FeatureRequest, SpindleEnable};
pub use machine::MachineProfile;
pub use pins::SignalClass;
pub use resolved::{ResolvedConfig, CONFIG_VERSION};
pub use validate::{validate, Violation, Violations};
