//! # Block Icon Renderer
//!
//! A Rust library for rendering Minecraft block models into small flat icons.
//!
//! ## Overview
//!
//! This library takes a resource pack and a block state as input, and
//! produces a 72x96 RGBA icon drawn with a fixed oblique projection. Icons
//! can be tiled into a PNG atlas.
//!
//! ## Quick Start
//!
//! ```ignore
//! use block_icon_renderer::{load_resource_pack, render_block, InputBlock};
//!
//! // Load a resource pack
//! let pack = load_resource_pack("path/to/pack.zip")?;
//!
//! // Render one block state
//! let block = InputBlock::new("minecraft:oak_stairs")
//!     .with_property("facing", "east")
//!     .with_property("half", "bottom")
//!     .with_property("shape", "straight");
//! let canvas = render_block(&pack, &block, None)?;
//!
//! canvas.save("oak_stairs.png")?;
//! ```
//!
//! ## Drawing elements directly
//!
//! The [`Renderer`] works on already resolved elements and any
//! [`TextureSource`], so models do not have to come from a pack:
//!
//! ```ignore
//! use block_icon_renderer::{Canvas, Renderer, RenderOptions};
//!
//! let mut canvas = Canvas::new();
//! Renderer::new(&my_textures).render(&mut canvas, &elements, &RenderOptions::default())?;
//! ```

pub mod error;
pub mod types;
pub mod resource_pack;
pub mod resolver;
pub mod renderer;
pub mod atlas;

// Re-export main types for convenience
pub use error::{RenderError, Result};
pub use types::{Axis, Direction, ElementRotation, InputBlock, ModelRotation};
pub use resource_pack::{
    BlockModel, BlockstateDefinition, ModelElement, ModelFace, ResourcePack, TextureData,
    TextureSource,
};
pub use resolver::{resolve_block, ResolvedPart};
pub use renderer::{
    Canvas, RenderOptions, Renderer, Tint, TintSource, CANVAS_HEIGHT, CANVAS_WIDTH,
};
pub use atlas::{AtlasBuilder, SheetLayout, SheetPlan, StateFilter};

/// Load a resource pack from a file path (ZIP or directory).
pub fn load_resource_pack<P: AsRef<std::path::Path>>(path: P) -> Result<ResourcePack> {
    resource_pack::loader::load_from_path(path)
}

/// Load a resource pack from ZIP bytes.
pub fn load_resource_pack_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    resource_pack::loader::load_from_bytes(data)
}

/// Render every model a block state selects onto a fresh canvas.
///
/// Multipart blocks are composited in declaration order on the same canvas.
pub fn render_block(pack: &ResourcePack, block: &InputBlock, tint: Option<Tint>) -> Result<Canvas> {
    let parts = resolve_block(pack, block)?;
    let renderer = Renderer::new(pack);

    let mut canvas = Canvas::new();
    for part in &parts {
        renderer.render_part(&mut canvas, part, tint)?;
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_pack() -> ResourcePack {
        let mut pack = ResourcePack::new();

        let cube_all: BlockModel = serde_json::from_str(
            r##"{
                "textures": { "particle": "#all" },
                "elements": [{
                    "from": [0, 0, 0],
                    "to": [16, 16, 16],
                    "faces": {
                        "down":  { "texture": "#all" },
                        "up":    { "texture": "#all", "tintindex": 0 },
                        "north": { "texture": "#all" },
                        "south": { "texture": "#all" },
                        "west":  { "texture": "#all" },
                        "east":  { "texture": "#all" }
                    }
                }]
            }"##,
        )
        .unwrap();
        pack.insert_model("block/cube_all", cube_all);

        let stone: BlockModel = serde_json::from_str(
            r#"{ "parent": "block/cube_all", "textures": { "all": "block/stone" } }"#,
        )
        .unwrap();
        pack.insert_model("block/stone", stone);

        let post: BlockModel = serde_json::from_str(
            r##"{
                "textures": { "post": "block/stone" },
                "elements": [{
                    "from": [6, 0, 6], "to": [10, 16, 10],
                    "faces": { "up": { "texture": "#post" }, "south": { "texture": "#post" } }
                }]
            }"##,
        )
        .unwrap();
        pack.insert_model("block/post", post);

        let side: BlockModel = serde_json::from_str(
            r##"{
                "textures": { "side": "block/planks" },
                "elements": [{
                    "from": [7, 12, 0], "to": [9, 15, 9],
                    "faces": { "up": { "texture": "#side" } }
                }]
            }"##,
        )
        .unwrap();
        pack.insert_model("block/side", side);

        let stone_state: BlockstateDefinition =
            serde_json::from_str(r#"{ "variants": { "": { "model": "block/stone" } } }"#).unwrap();
        pack.insert_blockstate("stone", stone_state);

        let fence: BlockstateDefinition = serde_json::from_str(
            r#"{
                "multipart": [
                    { "apply": { "model": "block/post" } },
                    { "when": { "north": "true" }, "apply": { "model": "block/side", "uvlock": true } }
                ]
            }"#,
        )
        .unwrap();
        pack.insert_blockstate("fence", fence);

        pack.insert_texture("block/stone", TextureData::solid(16, 16, [128, 128, 128, 255]));
        pack.insert_texture("block/planks", TextureData::solid(16, 16, [160, 120, 60, 255]));

        pack
    }

    #[test]
    fn test_render_simple_block() {
        let pack = create_test_pack();
        let canvas = render_block(&pack, &InputBlock::new("minecraft:stone"), None).unwrap();

        assert_eq!(canvas.covered_pixels(), (CANVAS_WIDTH * CANVAS_HEIGHT) as usize);
        assert_eq!(canvas.pixel(36, 60), [128, 128, 128, 255]);
    }

    #[test]
    fn test_render_block_with_tint() {
        let pack = create_test_pack();
        let tint = Tint::rgb(255, 0, 255);
        let canvas = render_block(&pack, &InputBlock::new("stone"), Some(tint)).unwrap();

        // Only the top face carries a tint index
        assert_eq!(canvas.pixel(36, 10), [128, 0, 128, 255]);
        assert_eq!(canvas.pixel(36, 60), [128, 128, 128, 255]);
    }

    #[test]
    fn test_multipart_layers_share_canvas() {
        let pack = create_test_pack();

        let bare = render_block(&pack, &InputBlock::new("fence"), None).unwrap();
        let connected = render_block(
            &pack,
            &InputBlock::new("fence").with_property("north", "true"),
            None,
        )
        .unwrap();

        assert!(connected.covered_pixels() > bare.covered_pixels());
        assert!(connected
            .pixels()
            .chunks_exact(4)
            .any(|p| p == [160, 120, 60, 255]));
    }

    #[test]
    fn test_unknown_block() {
        let pack = create_test_pack();
        let err = render_block(&pack, &InputBlock::new("minecraft:nope"), None).unwrap_err();
        assert!(matches!(err, RenderError::ResourceNotFound(_)));
    }

    #[test]
    fn test_render_planned_sheet() {
        let pack = create_test_pack();
        let fence = pack.blockstate("fence").unwrap();
        let plan = SheetLayout::new(vec!["north".to_string()])
            .with_values("north", vec!["false".to_string(), "true".to_string()])
            .plan(&[("minecraft:fence".to_string(), fence)])
            .unwrap();
        assert_eq!(plan.columns, 2);

        let mut atlas = AtlasBuilder::new(plan.columns);
        for cell in plan.cells.into_iter().flatten() {
            let block = InputBlock {
                name: cell.block,
                properties: cell.state,
            };
            atlas.push(render_block(&pack, &block, None).unwrap());
        }

        let image = atlas.build();
        assert_eq!(image.dimensions(), (2 * CANVAS_WIDTH, CANVAS_HEIGHT));
        // Only the connected state shows the plank side
        let planks = |x0: u32| {
            (x0..x0 + CANVAS_WIDTH)
                .flat_map(|x| (0..CANVAS_HEIGHT).map(move |y| (x, y)))
                .any(|(x, y)| image.get_pixel(x, y).0 == [160, 120, 60, 255])
        };
        assert!(!planks(0));
        assert!(planks(CANVAS_WIDTH));
    }
}
