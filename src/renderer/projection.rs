//! Oblique projection, back-face culling and UV resolution.
//!
//! Every element face is flattened onto the canvas with `x' = x`,
//! `y' = y - z / 2`, then turned into a [`ProjectedFace`] carrying everything
//! the rasterizer needs per pixel.

use super::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};
use super::geometry::{CuboidFaces, Quad};
use super::texture_cache::{TextureCache, TextureHandle};
use crate::error::{RenderError, Result};
use crate::resource_pack::{ModelElement, ModelFace};
use crate::types::{Axis, Direction};
use glam::{DVec2, DVec3};

/// Model units per block edge, and texture pixels per UV unit range.
pub const TEXTURE_SIZE: f64 = 16.0;

/// Quarter-turn rotation of a face's texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceRotation {
    R0,
    R90,
    R180,
    R270,
}

impl TryFrom<i32> for FaceRotation {
    type Error = RenderError;

    fn try_from(degrees: i32) -> Result<Self> {
        match degrees {
            0 => Ok(FaceRotation::R0),
            90 => Ok(FaceRotation::R90),
            180 => Ok(FaceRotation::R180),
            270 => Ok(FaceRotation::R270),
            other => Err(RenderError::InvalidFaceRotation(format!(
                "texture rotation {} not in 0, 90, 180, 270",
                other
            ))),
        }
    }
}

impl FaceRotation {
    /// Rotate face coordinates into texture coordinates. The flags record
    /// whether each texture axis is walked backwards.
    pub fn apply(self, u: f64, v: f64, u_inverted: bool, v_inverted: bool) -> (f64, f64, bool, bool) {
        match self {
            FaceRotation::R0 => (u, v, u_inverted, v_inverted),
            FaceRotation::R90 => (v, 1.0 - u, u_inverted, !v_inverted),
            FaceRotation::R180 => (1.0 - u, 1.0 - v, !u_inverted, !v_inverted),
            FaceRotation::R270 => (1.0 - v, u, !u_inverted, v_inverted),
        }
    }
}

/// A family of parallel lines through a quad, parallel to one pair of its
/// opposite edges.
///
/// A point's position across the family is where its own line's intercept
/// falls between the intercepts of the two edges. Vertical families use the
/// x-intercept instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuttingLines {
    slope: Option<f64>,
    near: f64,
    far: f64,
}

impl CuttingLines {
    /// Lines parallel to `a -> b`, from the one through `near` (position 0)
    /// to the one through `far` (position 1). `None` if both coincide.
    fn new(a: DVec2, b: DVec2, near: DVec2, far: DVec2) -> Option<Self> {
        let lines = if a.x != b.x {
            let slope = (a.y - b.y) / (a.x - b.x);
            CuttingLines {
                slope: Some(slope),
                near: near.y - slope * near.x,
                far: far.y - slope * far.x,
            }
        } else {
            CuttingLines {
                slope: None,
                near: near.x,
                far: far.x,
            }
        };

        if lines.near == lines.far {
            None
        } else {
            Some(lines)
        }
    }

    /// Fractional position of `point` between the near and far lines.
    pub fn position(&self, point: DVec2) -> f64 {
        let intercept = match self.slope {
            Some(slope) => point.y - slope * point.x,
            None => point.x,
        };
        (intercept - self.near) / (self.far - self.near)
    }

    /// Whether positions grow towards smaller intercepts.
    pub fn inverted(&self) -> bool {
        self.near > self.far
    }
}

/// One visible face of an element, ready for rasterization.
#[derive(Debug, Clone)]
pub struct ProjectedFace {
    pub direction: Direction,
    /// Screen-space corners.
    pub screen: [DVec2; 4],
    /// Depth (normalized z) of each corner; larger is closer to the viewer.
    pub depth: [f64; 4],
    /// Lines parallel to corner 0 -> 1; position is the texture u.
    pub across_u: CuttingLines,
    /// Lines parallel to corner 1 -> 2; position is the texture v.
    pub across_v: CuttingLines,
    /// UV rectangle [u1, v1, u2, v2] in texture pixels of a 16-wide texture.
    pub uv: [f64; 4],
    pub rotation: FaceRotation,
    pub tint: bool,
    pub texture: TextureHandle,
}

impl ProjectedFace {
    /// Depth at face coordinates (u, v): along v on both u-edges, then along u.
    pub fn depth_at(&self, u: f64, v: f64) -> f64 {
        let z1 = lerp(self.depth[0], self.depth[1], v);
        let z2 = lerp(self.depth[3], self.depth[2], v);
        lerp(z1, z2, u)
    }
}

pub fn lerp(a: f64, b: f64, alpha: f64) -> f64 {
    a + (b - a) * alpha
}

/// Map a point in block units (0-1) onto the canvas.
pub fn project_point(point: DVec3) -> DVec2 {
    let scale = DVec2::new(CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64 * 2.0 / 3.0);
    DVec2::new(point.x, 1.0 - (point.y - 0.5 * point.z)) * scale
}

/// Shoelace sum without halving; positive means the quad faces the viewer.
pub fn signed_area(quad: &[DVec2; 4]) -> f64 {
    (0..4)
        .map(|i| {
            let prev = quad[(i + 3) % 4];
            quad[i].x * prev.y - quad[i].y * prev.x
        })
        .sum()
}

/// Infer a UV rectangle from a face's geometry, as if the texture were
/// projected straight onto its axis plane.
///
/// Returns the rectangle and how far the corners had to be rotated so that
/// the minimal corner comes first; the rendered corners must be rotated the
/// same way.
pub fn infer_uv(quad: &Quad) -> Result<([f64; 4], usize)> {
    let not_aligned = || {
        RenderError::InvalidUvLockGeometry(
            "face without uv must be parallel to an axis plane (rotation not a multiple of 90 degrees)"
                .to_string(),
        )
    };

    // Flip y so that every face's top-left corner has its lowest coordinates
    let mut flipped = quad.map(|p| DVec3::new(p.x, TEXTURE_SIZE - p.y, p.z));
    let min = flipped.iter().fold(DVec3::INFINITY, |acc, p| acc.min(*p));
    let start = flipped.iter().position(|p| *p == min).ok_or_else(not_aligned)?;
    flipped.rotate_left(start);

    let axis = [Axis::X, Axis::Y, Axis::Z]
        .into_iter()
        .find(|axis| {
            let i = axis.index();
            flipped.iter().all(|p| p[i] == flipped[0][i])
        })
        .ok_or_else(not_aligned)?;

    let (mut first, mut second) = axis.plane();
    if axis == Axis::X {
        std::mem::swap(&mut first, &mut second);
    }

    Ok((
        [
            flipped[0][first],
            flipped[0][second],
            flipped[2][first],
            flipped[2][second],
        ],
        start,
    ))
}

/// Project one face. `Ok(None)` means the face is culled or has no area.
pub fn project_face(
    direction: Direction,
    face: &ModelFace,
    quad: &Quad,
    uv_quad: &Quad,
    textures: &mut TextureCache<'_>,
) -> Result<Option<ProjectedFace>> {
    let mut corners = quad.map(|p| p / TEXTURE_SIZE);
    let mut screen = corners.map(project_point);

    if signed_area(&screen) <= 0.0 {
        return Ok(None);
    }

    let uv = match face.uv {
        Some(uv) => uv,
        None => {
            let (uv, start) = infer_uv(uv_quad)?;
            corners.rotate_left(start);
            screen.rotate_left(start);
            uv
        }
    };

    let rotation = FaceRotation::try_from(face.rotation)?;
    let texture = textures.load(&face.texture)?;

    let across_u = CuttingLines::new(screen[0], screen[1], screen[1], screen[2]);
    let across_v = CuttingLines::new(screen[1], screen[2], screen[0], screen[1]);
    let (Some(across_u), Some(across_v)) = (across_u, across_v) else {
        return Ok(None);
    };

    Ok(Some(ProjectedFace {
        direction,
        screen,
        depth: corners.map(|p| p.z),
        across_u,
        across_v,
        uv,
        rotation,
        tint: face.has_tint(),
        texture,
    }))
}

/// Project the declared faces of an element, in declaration order.
pub fn project_element(
    element: &ModelElement,
    faces: &CuboidFaces,
    uv_faces: &CuboidFaces,
    textures: &mut TextureCache<'_>,
) -> Result<Vec<ProjectedFace>> {
    let mut projected = Vec::with_capacity(element.faces.len());

    for (direction, face) in element.faces.iter() {
        let i = direction.index();
        if let Some(face) = project_face(direction, face, &faces[i], &uv_faces[i], textures)? {
            projected.push(face);
        }
    }

    Ok(projected)
}
