//! Per-pixel compositing of projected faces into a canvas.

use super::canvas::{Canvas, CANVAS_HEIGHT, CANVAS_WIDTH};
use super::projection::{lerp, ProjectedFace, TEXTURE_SIZE};
use super::texture_cache::TextureCache;
use super::tint::Tint;
use glam::DVec2;

/// Offset from a pixel's corner to where it is sampled. Slightly past the
/// center so that points never sit exactly on a shared face edge.
const SAMPLE_OFFSET: f64 = 0.5001;

/// Texel bias when a texture axis is walked backwards, so that mirrored
/// faces land on the same texel boundaries as unmirrored ones.
const MIRROR_BIAS: f64 = 1e-4;

/// Draw `faces` onto the canvas, honoring and updating its depth buffer.
///
/// Faces are evaluated in slice order for every pixel; on equal depth the
/// face drawn first keeps the pixel.
pub fn rasterize(
    canvas: &mut Canvas,
    faces: &[ProjectedFace],
    textures: &TextureCache<'_>,
    tint: Option<Tint>,
) {
    if faces.is_empty() {
        return;
    }

    for y in 0..CANVAS_HEIGHT {
        for x in 0..CANVAS_WIDTH {
            let point = DVec2::new(x as f64 + SAMPLE_OFFSET, y as f64 + SAMPLE_OFFSET);
            for face in faces {
                draw_pixel(canvas, x, y, point, face, textures, tint);
            }
        }
    }
}

fn draw_pixel(
    canvas: &mut Canvas,
    x: u32,
    y: u32,
    point: DVec2,
    face: &ProjectedFace,
    textures: &TextureCache<'_>,
    tint: Option<Tint>,
) {
    let u = face.across_u.position(point);
    if !(0.0..1.0).contains(&u) {
        return;
    }
    let v = face.across_v.position(point);
    if !(0.0..1.0).contains(&v) {
        return;
    }

    let depth = face.depth_at(u, v);
    if depth <= canvas.depth(x, y) {
        return;
    }

    let (u, v, u_inverted, v_inverted) = face.rotation.apply(
        u,
        v,
        face.across_u.inverted(),
        face.across_v.inverted(),
    );

    let texture = textures.get(face.texture);
    let [u1, v1, u2, v2] = face.uv;
    let tx = texel(lerp(u1, u2, u), texture.width(), texture.width(), u_inverted);
    let ty = texel(lerp(v1, v2, v), texture.width(), texture.frame_height(), v_inverted);

    let color = texture.get_pixel(tx, ty);
    if color[3] == 0 {
        return;
    }
    if color[3] == 255 {
        canvas.set_depth(x, y, depth);
    }

    let color = match tint {
        Some(tint) if face.tint => tint.apply(color),
        _ => color,
    };
    canvas.put_pixel(x, y, color);
}

/// Texel index for a UV coordinate, clamped to `0..limit`.
fn texel(coordinate: f64, width: u32, limit: u32, inverted: bool) -> u32 {
    let mut scaled = coordinate / TEXTURE_SIZE * width as f64;
    if inverted {
        scaled -= MIRROR_BIAS;
    }
    scaled.floor().clamp(0.0, limit.saturating_sub(1) as f64) as u32
}
