//! Resource pack assets: blockstates, block models and textures.
//!
//! Assets are keyed by namespaced identifier (`minecraft:block/stone`).
//! Identifiers without a namespace mean `minecraft`, both when inserting
//! and when looking up.

pub mod loader;
pub mod blockstate;
pub mod model;
pub mod texture;

pub use blockstate::{BlockstateDefinition, ModelVariant, MultipartCase};
pub use model::{BlockModel, ElementFaces, ModelElement, ModelFace};
pub use texture::{TextureData, TextureSource};

use crate::error::{RenderError, Result};
use crate::types::with_namespace;
use std::collections::{BTreeSet, HashMap};

/// Every asset the renderer reads, by namespaced identifier.
#[derive(Debug, Default, Clone)]
pub struct ResourcePack {
    blockstates: HashMap<String, BlockstateDefinition>,
    models: HashMap<String, BlockModel>,
    textures: HashMap<String, TextureData>,
}

/// Asset counts of a pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSummary {
    pub namespaces: Vec<String>,
    pub blockstates: usize,
    pub models: usize,
    pub textures: usize,
}

impl ResourcePack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blockstate of a block, e.g. `oak_stairs` or `custom:bell`.
    pub fn blockstate(&self, block: &str) -> Option<&BlockstateDefinition> {
        self.blockstates.get(&with_namespace(block))
    }

    /// Model by identifier, e.g. `block/stone`.
    pub fn model(&self, id: &str) -> Option<&BlockModel> {
        self.models.get(&with_namespace(id))
    }

    /// Texture by identifier, e.g. `block/stone`.
    pub fn texture(&self, id: &str) -> Option<&TextureData> {
        self.textures.get(&with_namespace(id))
    }

    pub fn insert_blockstate(&mut self, block: &str, definition: BlockstateDefinition) {
        self.blockstates.insert(with_namespace(block), definition);
    }

    pub fn insert_model(&mut self, id: &str, model: BlockModel) {
        self.models.insert(with_namespace(id), model);
    }

    pub fn insert_texture(&mut self, id: &str, texture: TextureData) {
        self.textures.insert(with_namespace(id), texture);
    }

    pub fn summary(&self) -> PackSummary {
        let namespaces: BTreeSet<&str> = self
            .blockstates
            .keys()
            .chain(self.models.keys())
            .chain(self.textures.keys())
            .filter_map(|id| id.split_once(':').map(|(namespace, _)| namespace))
            .collect();

        PackSummary {
            namespaces: namespaces.into_iter().map(String::from).collect(),
            blockstates: self.blockstates.len(),
            models: self.models.len(),
            textures: self.textures.len(),
        }
    }
}

impl TextureSource for ResourcePack {
    fn load_texture(&self, identifier: &str) -> Result<TextureData> {
        self.texture(identifier)
            .cloned()
            .ok_or_else(|| RenderError::ResourceNotFound(format!("texture {}", identifier)))
    }
}
