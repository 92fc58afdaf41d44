//! Software rasterizer that draws block models onto a fixed-size icon canvas.
//!
//! A render call builds every element's cuboid, rotates it, projects the
//! visible faces with a fixed oblique projection and composites them pixel
//! by pixel through a depth buffer. Several calls may target the same
//! [`Canvas`] to layer the parts of a multipart block.

pub mod canvas;
pub mod geometry;
pub mod projection;
pub mod raster;
pub mod texture_cache;
pub mod tint;

pub use canvas::{Canvas, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use texture_cache::{TextureCache, TextureHandle};
pub use tint::{Tint, TintSource};

use crate::error::{RenderError, Result};
use crate::resolver::ResolvedPart;
use crate::resource_pack::{ModelElement, ModelVariant, TextureSource};
use crate::types::ModelRotation;
use geometry::{build_faces, transform_element, UvReference};
use projection::{project_element, FaceRotation};
use tracing::debug;

/// Per-call render settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Whole-model rotation around the block center.
    pub rotation: ModelRotation,
    /// Color multiplier for faces that carry a tint index.
    pub tint: Option<Tint>,
    /// Infer missing UVs from the rotated geometry instead of the original.
    pub uv_lock: bool,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rotation(mut self, x: i32, y: i32, z: i32) -> Self {
        self.rotation = ModelRotation::new(x, y, z);
        self
    }

    pub fn with_tint(mut self, tint: Tint) -> Self {
        self.tint = Some(tint);
        self
    }

    pub fn with_uv_lock(mut self, uv_lock: bool) -> Self {
        self.uv_lock = uv_lock;
        self
    }

    /// Options for a blockstate variant, without a tint.
    pub fn from_variant(variant: &ModelVariant) -> Self {
        Self::new()
            .with_rotation(variant.x, variant.y, variant.z)
            .with_uv_lock(variant.uvlock)
    }

    /// Options for a resolved block part.
    pub fn for_part(part: &ResolvedPart, tint: Option<Tint>) -> Self {
        Self {
            rotation: part.rotation,
            tint,
            uv_lock: part.uv_lock,
        }
    }
}

/// Draws models onto canvases, pulling textures from a [`TextureSource`].
pub struct Renderer<'a> {
    textures: &'a dyn TextureSource,
}

impl<'a> Renderer<'a> {
    pub fn new(textures: &'a dyn TextureSource) -> Self {
        Self { textures }
    }

    /// Draw a list of elements onto `canvas`.
    ///
    /// Every face texture must already be a literal identifier. Textures are
    /// loaded only for faces that end up visible, once each per call.
    pub fn render(
        &self,
        canvas: &mut Canvas,
        elements: &[ModelElement],
        options: &RenderOptions,
    ) -> Result<()> {
        options.rotation.validate()?;
        check_faces(elements)?;

        let mut textures = TextureCache::new(self.textures);
        let mut faces = Vec::new();

        for element in elements {
            let mut cuboid = build_faces(element.from, element.to);
            let uv_reference = UvReference::capture(&cuboid, options.uv_lock);
            transform_element(&mut cuboid, element.rotation.as_ref(), options.rotation);

            let uv_faces = uv_reference.faces(&cuboid);
            faces.extend(project_element(element, &cuboid, uv_faces, &mut textures)?);
        }

        debug!(
            elements = elements.len(),
            visible_faces = faces.len(),
            textures = textures.len(),
            "rendering model"
        );

        raster::rasterize(canvas, &faces, &textures, options.tint);
        Ok(())
    }

    /// Draw one resolved part of a block.
    pub fn render_part(
        &self,
        canvas: &mut Canvas,
        part: &ResolvedPart,
        tint: Option<Tint>,
    ) -> Result<()> {
        self.render(canvas, &part.model.elements, &RenderOptions::for_part(part, tint))
    }
}

/// Reject unresolved texture references and bad texture rotations before
/// anything is drawn.
fn check_faces(elements: &[ModelElement]) -> Result<()> {
    for (direction, face) in elements.iter().flat_map(|e| e.faces.iter()) {
        if face.texture.starts_with('#') {
            return Err(RenderError::UnresolvedTextureReference(format!(
                "{} face still refers to {}",
                direction, face.texture
            )));
        }
        FaceRotation::try_from(face.rotation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::{ModelFace, TextureData};
    use crate::types::{Axis, Direction, ElementRotation};
    use std::collections::HashMap;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const GLASS: [u8; 4] = [255, 0, 0, 128];

    const CHECKER: [[u8; 4]; 4] = [
        [255, 0, 0, 255],
        [0, 255, 0, 255],
        [0, 0, 255, 255],
        [255, 255, 255, 255],
    ];

    fn textures() -> HashMap<String, TextureData> {
        let mut map = HashMap::new();
        map.insert("block/red".to_string(), TextureData::solid(16, 16, RED));
        map.insert("block/blue".to_string(), TextureData::solid(16, 16, BLUE));
        map.insert("block/glass".to_string(), TextureData::solid(16, 16, GLASS));
        map.insert("block/clear".to_string(), TextureData::solid(16, 16, [0, 0, 0, 0]));
        map.insert(
            "block/grass".to_string(),
            TextureData::solid(16, 16, [200, 100, 50, 255]),
        );
        map.insert(
            "block/checker".to_string(),
            TextureData::new(2, 2, CHECKER.concat()).unwrap(),
        );
        map
    }

    fn cube(faces: &[Direction], face: ModelFace) -> ModelElement {
        faces.iter().fold(
            ModelElement::new([0.0; 3], [16.0; 3]),
            |element, d| element.with_face(*d, face.clone()),
        )
    }

    /// A full-size square facing the viewer at depth `z`.
    fn plate(z: f64, texture: &str) -> ModelElement {
        ModelElement::new([0.0, 0.0, z], [16.0, 16.0, z])
            .with_face(Direction::South, ModelFace::new(texture))
    }

    fn render(elements: &[ModelElement], options: &RenderOptions) -> Result<Canvas> {
        let textures = textures();
        let mut canvas = Canvas::new();
        Renderer::new(&textures).render(&mut canvas, elements, options)?;
        Ok(canvas)
    }

    #[test]
    fn test_full_cube_solid_red() {
        let element = cube(&Direction::ALL, ModelFace::new("block/red"));
        let canvas = render(&[element], &RenderOptions::default()).unwrap();

        // Top face fills rows 0-31, front face rows 32-95
        assert_eq!(canvas.covered_pixels(), 72 * 96);
        assert!(canvas.pixels().chunks_exact(4).all(|p| p == RED));
        assert!(canvas.depth(36, 10) > 0.0 && canvas.depth(36, 10) < 1.0);
        assert_eq!(canvas.depth(36, 60), 1.0);
    }

    #[test]
    fn test_hidden_faces_draw_nothing() {
        let hidden = [Direction::North, Direction::Down, Direction::East, Direction::West];
        // Textures of culled faces are never loaded
        let element = cube(&hidden, ModelFace::new("block/not_in_pack"));
        let canvas = render(&[element], &RenderOptions::default()).unwrap();
        assert_eq!(canvas.covered_pixels(), 0);
    }

    #[test]
    fn test_missing_texture_on_visible_face() {
        let element = cube(&[Direction::Up], ModelFace::new("block/not_in_pack"));
        let err = render(&[element], &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::ResourceNotFound(_)));
    }

    #[test]
    fn test_degenerate_cuboid_is_skipped() {
        let element = Direction::ALL.iter().fold(
            ModelElement::new([8.0, 0.0, 0.0], [8.0, 16.0, 16.0]),
            |e, d| e.with_face(*d, ModelFace::new("block/red")),
        );

        let canvas = render(&[element.clone()], &RenderOptions::default()).unwrap();
        assert_eq!(canvas.covered_pixels(), 0);

        // Turned to face the viewer, the flat side covers a 72x64 band
        for uv_lock in [false, true] {
            let options = RenderOptions::new().with_rotation(0, 90, 0).with_uv_lock(uv_lock);
            let canvas = render(&[element.clone()], &options).unwrap();
            assert_eq!(canvas.covered_pixels(), 72 * 64);
            assert_eq!(canvas.pixel(0, 16), RED);
            assert_eq!(canvas.pixel(71, 79), RED);
            assert_eq!(canvas.pixel(36, 15)[3], 0);
            assert_eq!(canvas.pixel(36, 80)[3], 0);
        }
    }

    #[test]
    fn test_nearer_face_wins_in_either_order() {
        let far = plate(0.0, "block/blue");
        let near = plate(16.0, "block/red");

        for elements in [[far.clone(), near.clone()], [near.clone(), far.clone()]] {
            let canvas = render(&elements, &RenderOptions::default()).unwrap();
            assert_eq!(canvas.pixel(36, 48), RED);
            assert_eq!(canvas.pixel(36, 10), BLUE);
            assert_eq!(canvas.pixel(36, 80), RED);
        }
    }

    #[test]
    fn test_depth_persists_across_calls() {
        let textures = textures();
        let renderer = Renderer::new(&textures);
        let options = RenderOptions::default();

        let mut canvas = Canvas::new();
        renderer.render(&mut canvas, &[plate(16.0, "block/red")], &options).unwrap();
        renderer.render(&mut canvas, &[plate(0.0, "block/blue")], &options).unwrap();

        assert_eq!(canvas.pixel(36, 48), RED);
        assert_eq!(canvas.pixel(36, 10), BLUE);
    }

    #[test]
    fn test_equal_depth_keeps_first_face() {
        let elements = [plate(8.0, "block/red"), plate(8.0, "block/blue")];
        let canvas = render(&elements, &RenderOptions::default()).unwrap();
        assert_eq!(canvas.pixel(36, 40), RED);
    }

    #[test]
    fn test_translucent_pixels_do_not_claim_depth() {
        let far = plate(0.0, "block/blue");
        let middle = plate(8.0, "block/glass");
        let near = plate(16.0, "block/clear");

        // The translucent face draws first, then the farther opaque face
        // still passes the depth test and replaces it
        let canvas =
            render(&[middle.clone(), far.clone(), near.clone()], &RenderOptions::default()).unwrap();
        assert_eq!(canvas.pixel(36, 40), BLUE);
        assert_eq!(canvas.depth(36, 40), 0.0);

        // Drawn over the far face, the translucent color stays on top but
        // the depth buffer keeps the far face's depth
        let canvas = render(&[far, middle, near], &RenderOptions::default()).unwrap();
        assert_eq!(canvas.pixel(36, 40), GLASS);
        assert_eq!(canvas.depth(36, 40), 0.0);
        assert_eq!(canvas.pixel(36, 90)[3], 0);
    }

    #[test]
    fn test_explicit_and_inferred_uv_match() {
        let faces = [Direction::Up, Direction::South];
        let explicit = cube(&faces, ModelFace::new("block/checker").with_uv([0.0, 0.0, 16.0, 16.0]));
        let inferred = cube(&faces, ModelFace::new("block/checker"));

        let a = render(&[explicit], &RenderOptions::default()).unwrap();
        let b = render(&[inferred], &RenderOptions::default()).unwrap();
        assert_eq!(a.pixels(), b.pixels());

        // Front face quadrants
        assert_eq!(a.pixel(10, 40), CHECKER[0]);
        assert_eq!(a.pixel(60, 40), CHECKER[1]);
        assert_eq!(a.pixel(10, 80), CHECKER[2]);
        assert_eq!(a.pixel(60, 80), CHECKER[3]);

        // Top face quadrants
        assert_eq!(a.pixel(10, 5), CHECKER[0]);
        assert_eq!(a.pixel(60, 5), CHECKER[1]);
        assert_eq!(a.pixel(10, 25), CHECKER[2]);
        assert_eq!(a.pixel(60, 25), CHECKER[3]);
    }

    #[test]
    fn test_partial_uv_rectangle() {
        // Only the right half of the checker: columns read green/white
        let element = cube(
            &[Direction::South],
            ModelFace::new("block/checker").with_uv([8.0, 0.0, 16.0, 16.0]),
        );
        let canvas = render(&[element], &RenderOptions::default()).unwrap();
        assert_eq!(canvas.pixel(10, 40), CHECKER[1]);
        assert_eq!(canvas.pixel(60, 80), CHECKER[3]);
    }

    #[test]
    fn test_face_rotation_turns_texture() {
        let element = cube(&[Direction::Up], ModelFace::new("block/checker").with_rotation(90));
        let canvas = render(&[element], &RenderOptions::default()).unwrap();

        assert_eq!(canvas.pixel(5, 5), CHECKER[2]);
        assert_eq!(canvas.pixel(60, 5), CHECKER[0]);
        assert_eq!(canvas.pixel(5, 25), CHECKER[3]);
    }

    #[test]
    fn test_uv_lock_keeps_texture_in_place() {
        let element = cube(&[Direction::Up], ModelFace::new("block/checker"));
        let rotated = RenderOptions::new().with_rotation(0, 90, 0);

        let unlocked = render(&[element.clone()], &rotated).unwrap();
        assert_eq!(unlocked.pixel(5, 5), CHECKER[2]);

        let locked = render(&[element], &rotated.with_uv_lock(true)).unwrap();
        assert_eq!(locked.pixel(5, 5), CHECKER[0]);
    }

    #[test]
    fn test_rotated_cube_covers_canvas() {
        let element = cube(&Direction::ALL, ModelFace::new("block/red"));
        for uv_lock in [false, true] {
            let options = RenderOptions::new().with_rotation(0, 90, 0).with_uv_lock(uv_lock);
            let canvas = render(&[element.clone()], &options).unwrap();
            assert_eq!(canvas.covered_pixels(), 72 * 96);
        }
    }

    #[test]
    fn test_tint_applies_to_tinted_faces_only() {
        let tint = Tint([128, 255, 0, 255]);
        let tinted = ModelElement::new([0.0, 0.0, 16.0], [16.0, 16.0, 16.0])
            .with_face(Direction::South, ModelFace::new("block/grass").tinted());

        let canvas = render(&[tinted.clone()], &RenderOptions::new().with_tint(tint)).unwrap();
        assert_eq!(canvas.pixel(36, 60), [100, 100, 0, 255]);

        let canvas = render(&[tinted], &RenderOptions::default()).unwrap();
        assert_eq!(canvas.pixel(36, 60), [200, 100, 50, 255]);

        let plain = plate(16.0, "block/grass");
        let canvas = render(&[plain], &RenderOptions::new().with_tint(tint)).unwrap();
        assert_eq!(canvas.pixel(36, 60), [200, 100, 50, 255]);
    }

    #[test]
    fn test_uv_lock_needs_right_angles() {
        let element = cube(&[Direction::South], ModelFace::new("block/red"))
            .with_rotation(ElementRotation::new([8.0, 8.0, 8.0], Axis::Y, 45.0, false));

        let err = render(&[element.clone()], &RenderOptions::new().with_uv_lock(true)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidUvLockGeometry(_)));

        let canvas = render(&[element], &RenderOptions::default()).unwrap();
        assert!(canvas.covered_pixels() > 0);
    }

    #[test]
    fn test_invalid_rotations() {
        let element = cube(&[Direction::Up], ModelFace::new("block/red"));
        let err = render(&[element.clone()], &RenderOptions::new().with_rotation(0, 45, 0)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidFaceRotation(_)));

        // Checked even for faces that would be culled
        let element = cube(&[Direction::Down], ModelFace::new("block/red").with_rotation(45));
        let err = render(&[element], &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidFaceRotation(_)));
    }

    #[test]
    fn test_unresolved_reference_rejected() {
        let element = cube(&[Direction::North], ModelFace::new("#side"));
        let err = render(&[element], &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::UnresolvedTextureReference(_)));
    }

    #[test]
    fn test_options_from_variant() {
        let variant: ModelVariant =
            serde_json::from_str(r#"{ "model": "block/furnace", "y": 270, "uvlock": true }"#).unwrap();
        let options = RenderOptions::from_variant(&variant);

        assert_eq!(options.rotation, ModelRotation::new(0, 270, 0));
        assert!(options.uv_lock);
        assert_eq!(options.tint, None);
    }
}
