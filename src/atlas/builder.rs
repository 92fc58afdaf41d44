//! Grid atlas builder.

use crate::error::Result;
use crate::renderer::{Canvas, CANVAS_HEIGHT, CANVAS_WIDTH};
use image::{ImageEncoder, RgbaImage};
use std::path::Path;

/// Pixel offset of one cell within the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub x: u32,
    pub y: u32,
}

/// Builder that lays canvases out left to right, wrapping after `columns`.
///
/// Skipped cells stay transparent.
pub struct AtlasBuilder {
    columns: u32,
    cells: Vec<Option<Canvas>>,
}

impl AtlasBuilder {
    /// Create a builder with a fixed number of columns (at least one).
    pub fn new(columns: u32) -> Self {
        Self {
            columns: columns.max(1),
            cells: Vec::new(),
        }
    }

    /// Append a canvas in the next free cell.
    pub fn push(&mut self, canvas: Canvas) {
        self.cells.push(Some(canvas));
    }

    /// Leave the next cell empty.
    pub fn skip(&mut self) {
        self.cells.push(None);
    }

    /// Number of cells used so far, including skipped ones.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows needed for the cells pushed so far.
    pub fn rows(&self) -> u32 {
        (self.cells.len() as u32).div_ceil(self.columns)
    }

    /// Where the cell at `index` lands.
    pub fn cell_position(&self, index: usize) -> CellPosition {
        let index = index as u32;
        CellPosition {
            x: (index % self.columns) * CANVAS_WIDTH,
            y: (index / self.columns) * CANVAS_HEIGHT,
        }
    }

    /// Paint every cell into one image.
    pub fn build(&self) -> RgbaImage {
        let mut atlas = RgbaImage::new(self.columns * CANVAS_WIDTH, self.rows() * CANVAS_HEIGHT);

        for (index, cell) in self.cells.iter().enumerate() {
            let Some(canvas) = cell else { continue };
            let origin = self.cell_position(index);
            image::imageops::replace(
                &mut atlas,
                &canvas.to_image(),
                origin.x as i64,
                origin.y as i64,
            );
        }

        atlas
    }

    /// Encode the atlas as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let atlas = self.build();
        let mut bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(std::io::Cursor::new(&mut bytes));

        encoder.write_image(
            atlas.as_raw(),
            atlas.width(),
            atlas.height(),
            image::ExtendedColorType::Rgba8,
        )?;

        Ok(bytes)
    }

    /// Write the atlas to a PNG file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_png()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(color: [u8; 4]) -> Canvas {
        let mut canvas = Canvas::new();
        for y in 0..CANVAS_HEIGHT {
            for x in 0..CANVAS_WIDTH {
                canvas.put_pixel(x, y, color);
            }
        }
        canvas
    }

    #[test]
    fn test_at_least_one_column() {
        assert_eq!(AtlasBuilder::new(0).columns(), 1);
    }

    #[test]
    fn test_empty_atlas() {
        let builder = AtlasBuilder::new(4);
        assert!(builder.is_empty());
        assert_eq!(builder.rows(), 0);
        assert_eq!(builder.build().dimensions(), (4 * 72, 0));
    }

    #[test]
    fn test_grid_layout() {
        let mut builder = AtlasBuilder::new(2);
        builder.push(filled([255, 0, 0, 255]));
        builder.skip();
        builder.push(filled([0, 0, 255, 255]));

        assert_eq!(builder.len(), 3);
        assert_eq!(builder.rows(), 2);
        assert_eq!(builder.cell_position(2), CellPosition { x: 0, y: 96 });

        let atlas = builder.build();
        assert_eq!(atlas.dimensions(), (144, 192));
        assert_eq!(atlas.get_pixel(10, 10).0, [255, 0, 0, 255]);
        assert_eq!(atlas.get_pixel(100, 10).0, [0, 0, 0, 0]);
        assert_eq!(atlas.get_pixel(71, 191).0, [0, 0, 255, 255]);
        assert_eq!(atlas.get_pixel(72, 191).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_save_png() {
        let mut builder = AtlasBuilder::new(3);
        builder.push(filled([1, 2, 3, 255]));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.png");
        builder.save(&path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (216, 96));
        assert_eq!(decoded.get_pixel(0, 0).0, [1, 2, 3, 255]);
    }
}
