//! Cuboid face construction and in-place rotation.

use crate::types::{Axis, ElementRotation, ModelRotation};
use glam::DVec3;

/// Four corners of one face, in model units (0-16).
pub type Quad = [DVec3; 4];

/// The six faces of a cuboid, indexed like [`crate::types::Direction::ALL`].
pub type CuboidFaces = [Quad; 6];

/// Point around which whole-model rotations turn.
const BLOCK_CENTER: DVec3 = DVec3::splat(8.0);

/// Per-face corner selectors; 0 takes the component from `from`, 1 from `to`.
///
/// The winding is chosen so that, after projection, a front-facing quad has
/// a positive signed area. The face names follow the renderer's own axes and
/// do not match the in-game compass exactly.
const FACE_TEMPLATE: [[[u8; 3]; 4]; 6] = [
    [[1, 1, 1], [1, 0, 1], [1, 0, 0], [1, 1, 0]], // east
    [[0, 1, 0], [0, 0, 0], [0, 0, 1], [0, 1, 1]], // west
    [[0, 0, 1], [0, 0, 0], [1, 0, 0], [1, 0, 1]], // down
    [[0, 1, 0], [0, 1, 1], [1, 1, 1], [1, 1, 0]], // up
    [[1, 1, 0], [1, 0, 0], [0, 0, 0], [0, 1, 0]], // north
    [[0, 1, 1], [0, 0, 1], [1, 0, 1], [1, 1, 1]], // south
];

/// Build the six faces of the cuboid spanned by two opposite corners.
pub fn build_faces(from: [f64; 3], to: [f64; 3]) -> CuboidFaces {
    let pick = |selector: u8, axis: usize| if selector == 0 { from[axis] } else { to[axis] };

    FACE_TEMPLATE.map(|quad| {
        quad.map(|corner| DVec3::new(pick(corner[0], 0), pick(corner[1], 1), pick(corner[2], 2)))
    })
}

/// Sine and cosine of an angle in degrees, exact for multiples of 90.
fn sin_cos_degrees(angle: f64) -> (f64, f64) {
    if angle % 90.0 == 0.0 {
        match ((angle / 90.0) as i64).rem_euclid(4) {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        }
    } else {
        angle.to_radians().sin_cos()
    }
}

/// Rotate every corner of `faces` in place about `origin`, in the plane
/// perpendicular to `axis`.
///
/// With `rescale`, in-plane offsets are stretched by `1 / max(|sin|, |cos|)`
/// first, which brings a 45 degree rotated box back to full width.
pub fn rotate_faces(faces: &mut [Quad], origin: DVec3, axis: Axis, angle: f64, rescale: bool) {
    let (a1, a2) = axis.plane();
    let (sin, cos) = sin_cos_degrees(angle);
    let scale = if rescale {
        1.0 / sin.abs().max(cos.abs())
    } else {
        1.0
    };

    for quad in faces.iter_mut() {
        for point in quad.iter_mut() {
            let x = (point[a1] - origin[a1]) * scale;
            let y = (point[a2] - origin[a2]) * scale;
            point[a1] = x * cos - y * sin + origin[a1];
            point[a2] = x * sin + y * cos + origin[a2];
        }
    }
}

/// Apply the element's own rotation, then the model rotation around the
/// block center (x, then y, then z; zero angles are skipped).
pub fn transform_element(
    faces: &mut CuboidFaces,
    element_rotation: Option<&ElementRotation>,
    model_rotation: ModelRotation,
) {
    if let Some(rotation) = element_rotation {
        rotate_faces(
            faces,
            rotation.origin_vec(),
            rotation.axis,
            rotation.angle,
            rotation.rescale,
        );
    }

    for (axis, angle) in model_rotation.steps() {
        if angle != 0 {
            rotate_faces(faces, BLOCK_CENTER, axis, angle as f64, false);
        }
    }
}

/// Which geometry implicit UVs are inferred from.
#[derive(Debug, Clone)]
pub enum UvReference {
    /// UV lock: infer from the rotated faces that are also rendered.
    Transformed,
    /// Infer from a copy of the faces taken before any rotation.
    Original(CuboidFaces),
}

impl UvReference {
    /// Capture the reference for freshly built faces, before rotating them.
    pub fn capture(faces: &CuboidFaces, uv_lock: bool) -> Self {
        if uv_lock {
            UvReference::Transformed
        } else {
            UvReference::Original(*faces)
        }
    }

    /// The faces to infer UVs from, given the rotated faces.
    pub fn faces<'a>(&'a self, transformed: &'a CuboidFaces) -> &'a CuboidFaces {
        match self {
            UvReference::Transformed => transformed,
            UvReference::Original(original) => original,
        }
    }
}
