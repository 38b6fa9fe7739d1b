//! Plain grid cut: axis-aligned cells with a drawn border, no tabs.

use image::RgbaImage;
use jigsaw_cutter_core::GridSpec;

use crate::mask::crop_region;
use crate::overview::{OverviewAccumulator, SEAM_COLOR};

/// Width of the grid lines in the rectangular overviews.
pub const GRID_LINE_WIDTH: u32 = 2;

pub fn render_cell(
    source: &RgbaImage,
    grid: &GridSpec,
    row: u32,
    col: u32,
    border: u32,
) -> RgbaImage {
    let mut piece = crop_region(source, &grid.cell_rect(row, col));
    stroke_border(&mut piece, border);
    piece
}

/// Paints a `border` pixel frame along the inside of the image edges.
pub fn stroke_border(piece: &mut RgbaImage, border: u32) {
    if border == 0 {
        return;
    }
    let (width, height) = piece.dimensions();
    for (x, y, pixel) in piece.enumerate_pixels_mut() {
        if x < border || y < border || x + border >= width || y + border >= height {
            *pixel = SEAM_COLOR;
        }
    }
}

/// Marks every cell boundary, outer frame included.
pub fn mark_grid_lines(accumulator: &mut OverviewAccumulator, grid: &GridSpec) {
    let (rows, cols) = grid.boundary_lines();
    for y in rows {
        accumulator.mark_row(y, GRID_LINE_WIDTH);
    }
    for x in cols {
        accumulator.mark_column(x, GRID_LINE_WIDTH);
    }
}
