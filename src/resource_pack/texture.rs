//! Texture loading and handling.

use crate::error::{RenderError, Result};
use image::{Rgba, RgbaImage};
use std::collections::HashMap;

/// A decoded RGBA8 texture, at least one pixel in each direction.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    image: RgbaImage,
}

impl TextureData {
    /// Wrap row-major RGBA8 data holding exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RenderError::InvalidTexture(format!(
                "{}x{} texture needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }

        RgbaImage::from_raw(width, height, pixels)
            .ok_or_else(|| RenderError::InvalidTexture(format!("{}x{} buffer", width, height)))
            .and_then(Self::from_image)
    }

    pub fn from_image(image: RgbaImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(RenderError::InvalidTexture(format!(
                "empty {}x{} texture",
                image.width(),
                image.height()
            )));
        }
        Ok(Self { image })
    }

    /// Create a texture filled with one color. Zero sizes are raised to one.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), Rgba(color)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Height of the first animation frame.
    ///
    /// Animated textures are vertical strips of square frames; only the top
    /// frame is ever sampled.
    pub fn frame_height(&self) -> u32 {
        self.height().min(self.width())
    }

    /// Check if this texture is an animation strip.
    pub fn is_animated(&self) -> bool {
        self.height() > self.width() && self.height() % self.width() == 0
    }

    /// Pixel at (x, y). Panics outside the texture.
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }
}

/// Load a texture from PNG bytes.
pub fn load_texture_from_bytes(data: &[u8]) -> Result<TextureData> {
    let img = image::load_from_memory(data)?;
    TextureData::from_image(img.to_rgba8())
}

/// Anything that can hand out decoded textures by resolved identifier.
///
/// Identifiers are literal texture locations such as `block/stone` or
/// `custom:block/bell`; `#` references must already be resolved.
pub trait TextureSource {
    fn load_texture(&self, identifier: &str) -> Result<TextureData>;
}

impl TextureSource for HashMap<String, TextureData> {
    fn load_texture(&self, identifier: &str) -> Result<TextureData> {
        self.get(identifier)
            .cloned()
            .ok_or_else(|| RenderError::ResourceNotFound(format!("texture {}", identifier)))
    }
}
