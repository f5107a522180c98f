//! Machine axes

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of linear axes
pub const N_AXIS: usize = 3;

/// Axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in index order
    pub const ALL: [Axis; N_AXIS] = [Axis::X, Axis::Y, Axis::Z];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bit of this axis in invert and homing masks
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Parse "x", "Y", ...
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" | "X" => Some(Axis::X),
            "y" | "Y" => Some(Axis::Y),
            "z" | "Z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Mask with every axis bit set
pub const AXIS_MASK_ALL: u8 = (1 << N_AXIS) - 1;
