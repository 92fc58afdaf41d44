//! Icon atlas building.
//!
//! This module decides which block state lands in which cell and tiles
//! rendered canvases into one grid image, row by row.

mod builder;
mod layout;

pub use builder::{AtlasBuilder, CellPosition};
pub use layout::{SheetCell, SheetLayout, SheetPlan, StateFilter};
