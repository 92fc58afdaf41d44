//! Fixed-size RGBA drawing surface with a depth buffer.

use crate::error::Result;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Icon width in pixels.
pub const CANVAS_WIDTH: u32 = 72;
/// Icon height in pixels.
pub const CANVAS_HEIGHT: u32 = 96;

/// Depth of a pixel nothing opaque has been drawn to.
pub const EMPTY_DEPTH: f64 = -1.0;

/// The icon being drawn, one byte per channel, plus one depth value per pixel.
///
/// Larger depth values are closer to the viewer. Canvases are reused across
/// render calls to composite several models into one icon.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Vec<u8>,
    depth: Vec<f64>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// A fully transparent canvas.
    pub fn new() -> Self {
        let len = (CANVAS_WIDTH * CANVAS_HEIGHT) as usize;
        Self {
            pixels: vec![0; len * 4],
            depth: vec![EMPTY_DEPTH; len],
        }
    }

    pub fn width(&self) -> u32 {
        CANVAS_WIDTH
    }

    pub fn height(&self) -> u32 {
        CANVAS_HEIGHT
    }

    fn index(x: u32, y: u32) -> usize {
        (y * CANVAS_WIDTH + x) as usize
    }

    /// Color at (x, y). Panics outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = Self::index(x, y) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Depth at (x, y). Panics outside the canvas.
    pub fn depth(&self, x: u32, y: u32) -> f64 {
        self.depth[Self::index(x, y)]
    }

    pub(crate) fn put_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let i = Self::index(x, y) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color);
    }

    pub(crate) fn set_depth(&mut self, x: u32, y: u32, depth: f64) {
        self.depth[Self::index(x, y)] = depth;
    }

    /// Raw RGBA bytes, row-major from the top-left corner.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of pixels with any opacity.
    pub fn covered_pixels(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|p| p[3] > 0).count()
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(CANVAS_WIDTH, CANVAS_HEIGHT, |x, y| Rgba(self.pixel(x, y)))
    }

    /// Encode the canvas as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.to_image()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Write the canvas to a PNG file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_image()
            .save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}
