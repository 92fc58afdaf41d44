//! Per-render texture cache.

use crate::error::Result;
use crate::resource_pack::{TextureData, TextureSource};
use std::collections::HashMap;
use tracing::trace;

/// Index of a texture loaded into a [`TextureCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(usize);

/// Loads each texture identifier at most once for the lifetime of the cache.
pub struct TextureCache<'a> {
    source: &'a dyn TextureSource,
    textures: Vec<TextureData>,
    lookup: HashMap<String, TextureHandle>,
}

impl<'a> TextureCache<'a> {
    pub fn new(source: &'a dyn TextureSource) -> Self {
        Self {
            source,
            textures: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Load a texture, or return the handle of the earlier load.
    pub fn load(&mut self, identifier: &str) -> Result<TextureHandle> {
        if let Some(handle) = self.lookup.get(identifier) {
            return Ok(*handle);
        }

        let texture = self.source.load_texture(identifier)?;
        trace!(
            texture = identifier,
            width = texture.width(),
            height = texture.height(),
            animated = texture.is_animated(),
            "loaded texture"
        );
        let handle = TextureHandle(self.textures.len());
        self.textures.push(texture);
        self.lookup.insert(identifier.to_string(), handle);

        Ok(handle)
    }

    pub fn get(&self, handle: TextureHandle) -> &TextureData {
        &self.textures[handle.0]
    }

    /// Number of distinct textures loaded.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
