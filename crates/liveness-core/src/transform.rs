//! Rotation transforms for the head-pose indicator bars.
//!
//! The three bars are visual debugging aids. Their formulas are fixed linear
//! combinations of pitch, roll and yaw and do not come from a camera model;
//! bar B scales yaw by 3 and inverts pitch. Keep them literal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detection::Rotation;

/// A rotateX / rotateY / rotateZ sequence, angles in degrees, applied in that order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub rotate_z: f64,
}

impl Transform {
    /// Bar A (and its vertical twin, bar C): rotateX(p), rotateY(r), rotateZ(90 - y).
    pub fn primary(rotation: &Rotation) -> Self {
        Self {
            rotate_x: rotation.pitch,
            rotate_y: rotation.roll,
            rotate_z: 90.0 - rotation.yaw,
        }
    }

    /// Bar B: rotateX(90 - p), rotateY((y + 90) * 3), rotateZ(r - 90).
    pub fn secondary(rotation: &Rotation) -> Self {
        Self {
            rotate_x: 90.0 - rotation.pitch,
            rotate_y: (rotation.yaw + 90.0) * 3.0,
            rotate_z: rotation.roll - 90.0,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rotateX({}deg), rotateY({}deg), rotateZ({}deg)",
            self.rotate_x, self.rotate_y, self.rotate_z
        )
    }
}
