use image::{GrayImage, Luma, Rgba, RgbaImage};
use jigsaw_cutter_core::{CropRect, PieceOutline, PieceSlot, Point};
use tiny_skia::{FillRule, Mask, PathBuilder, Transform};

use crate::PipelineError;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Copies `crop` out of `source`; pixels outside the image are transparent.
pub fn crop_region(source: &RgbaImage, crop: &CropRect) -> RgbaImage {
    RgbaImage::from_fn(crop.width(), crop.height(), |x, y| {
        let sx = crop.left + x as i32;
        let sy = crop.top + y as i32;
        if sx < 0 || sy < 0 {
            return TRANSPARENT;
        }
        source
            .get_pixel_checked(sx as u32, sy as u32)
            .copied()
            .unwrap_or(TRANSPARENT)
    })
}

/// Rasterises a closed polygon into a binary mask.
///
/// Filled without anti-aliasing so coverage is either 0 or 255.
pub fn polygon_mask<I>(width: u32, height: u32, points: I) -> Result<GrayImage, PipelineError>
where
    I: IntoIterator<Item = Point>,
{
    let mut mask = Mask::new(width, height).ok_or(PipelineError::Dimensions)?;
    let mut points = points.into_iter();
    if let Some((x, y)) = points.next() {
        let mut builder = PathBuilder::new();
        builder.move_to(x as f32, y as f32);
        for (x, y) in points {
            builder.line_to(x as f32, y as f32);
        }
        builder.close();
        // degenerate polygons produce no path and stay empty
        if let Some(path) = builder.finish() {
            mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
        }
    }
    GrayImage::from_raw(width, height, mask.data().to_vec()).ok_or(PipelineError::Dimensions)
}

/// Replaces the alpha channel of `image` with the mask coverage.
pub fn apply_mask(image: &mut RgbaImage, mask: &GrayImage) -> Result<(), PipelineError> {
    if image.dimensions() != mask.dimensions() {
        return Err(PipelineError::Dimensions);
    }
    for (pixel, Luma([coverage])) in image.pixels_mut().zip(mask.pixels()) {
        pixel[3] = *coverage;
    }
    Ok(())
}

pub fn mask_coverage(mask: &GrayImage) -> u64 {
    mask.pixels().filter(|Luma([value])| *value > 0).count() as u64
}

/// Crops and masks one interlocking piece.
pub fn render_piece(
    source: &RgbaImage,
    slot: &PieceSlot,
    outline: &PieceOutline,
) -> Result<RgbaImage, PipelineError> {
    let mut piece = crop_region(source, &slot.crop);
    let (dx, dy) = slot.center_offset;
    let mask = polygon_mask(piece.width(), piece.height(), outline.translated(dx, dy))?;
    if mask_coverage(&mask) == 0 {
        log::warn!("piece {}_{} has an empty mask", slot.row, slot.col);
    }
    apply_mask(&mut piece, &mask)?;
    Ok(piece)
}
