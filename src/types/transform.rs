//! Transform types for model and element rotations.

use super::Axis;
use crate::error::{RenderError, Result};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Whole-model rotation from a blockstate variant.
///
/// Applied around the block center, x first, then y, then z. The x and z
/// angles turn clockwise and the y angle counter-clockwise, exactly as the
/// blockstate files supply them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelRotation {
    /// X rotation in degrees.
    pub x: i32,
    /// Y rotation in degrees.
    pub y: i32,
    /// Z rotation in degrees.
    pub z: i32,
}

impl ModelRotation {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The per-axis angles in application order.
    pub fn steps(&self) -> [(Axis, i32); 3] {
        [(Axis::X, self.x), (Axis::Y, self.y), (Axis::Z, self.z)]
    }

    /// Reject angles other than 0, 90, 180 and 270.
    pub fn validate(&self) -> Result<()> {
        for (axis, angle) in self.steps() {
            if !matches!(angle, 0 | 90 | 180 | 270) {
                return Err(RenderError::InvalidFaceRotation(format!(
                    "model rotation {} around {} is not one of 0, 90, 180, 270",
                    angle, axis
                )));
            }
        }
        Ok(())
    }
}

/// Element-level rotation from a model element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementRotation {
    /// Origin point for rotation (in 0-16 model coordinates).
    #[serde(default = "default_origin")]
    pub origin: [f64; 3],
    /// Axis to rotate around.
    pub axis: Axis,
    /// Rotation angle in degrees.
    pub angle: f64,
    /// Whether to scale the rotated element back to full block width.
    #[serde(default)]
    pub rescale: bool,
}

fn default_origin() -> [f64; 3] {
    [8.0, 8.0, 8.0]
}

impl ElementRotation {
    pub fn new(origin: [f64; 3], axis: Axis, angle: f64, rescale: bool) -> Self {
        Self {
            origin,
            axis,
            angle,
            rescale,
        }
    }

    pub fn origin_vec(&self) -> DVec3 {
        DVec3::from_array(self.origin)
    }
}
