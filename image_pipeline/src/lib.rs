//! Raster side of the jigsaw cutter.
//!
//! Turns a source image plus a grid into masked piece images and the two
//! seam overviews, streaming every finished image into a [`PieceSink`].
//!
//! ```no_run
//! use jigsaw_cutter_pipeline::{generate_interlocking_pieces, load_image};
//!
//! let image = load_image("horse.jpg")?;
//! let preview = generate_interlocking_pieces(&image, 4, 6, "puzzle_pieces/piece_", 0.07, 0.3)?;
//! assert_eq!(preview.dimensions(), image.dimensions());
//! # Ok::<(), jigsaw_cutter_pipeline::PipelineError>(())
//! ```

pub mod cutter;
pub mod mask;
pub mod overview;
pub mod rect;
pub mod sink;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader, RgbaImage};

pub use cutter::{
    generate_interlocking_pieces, generate_rectangular_pieces, CutMode, CutProgress, PieceCutter,
};
pub use jigsaw_cutter_core::{CutSettings, GridError};
pub use overview::{OverviewAccumulator, OverviewImages};
pub use sink::{
    piece_name, ExportFormat, FileSink, MemorySink, PieceSink, OUTLINE_ONLY_NAME,
    OUTLINE_WITH_IMAGE_NAME,
};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid grid: {0}")]
    InvalidGrid(#[from] GridError),
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image encode failed: {0}")]
    Encode(String),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cut cancelled after {done} of {total} pieces")]
    Cancelled { done: usize, total: usize },
    #[error("invalid image dimensions")]
    Dimensions,
}

/// Decodes an image file to RGBA8, applying its EXIF orientation.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbaImage, PipelineError> {
    let path = path.as_ref();
    let reader = ImageReader::open(path)
        .map_err(|err| PipelineError::Decode(format!("{}: {err}", path.display())))?
        .with_guessed_format()
        .map_err(|err| PipelineError::Decode(format!("{}: {err}", path.display())))?;
    decode_reader(reader)
}

pub fn load_image_from_memory(bytes: &[u8]) -> Result<RgbaImage, PipelineError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| PipelineError::Decode(err.to_string()))?;
    decode_reader(reader)
}

fn decode_reader<R>(reader: ImageReader<R>) -> Result<RgbaImage, PipelineError>
where
    R: std::io::BufRead + std::io::Seek,
{
    let mut decoder = reader
        .into_decoder()
        .map_err(|err| PipelineError::Decode(err.to_string()))?;
    let orientation = decoder
        .orientation()
        .map_err(|err| PipelineError::Decode(err.to_string()))?;
    let mut image =
        DynamicImage::from_decoder(decoder).map_err(|err| PipelineError::Decode(err.to_string()))?;
    image.apply_orientation(orientation);
    let rgba = image.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(PipelineError::Dimensions);
    }
    Ok(rgba)
}

/// Downscales so the longer side is at most `max_dim`; `None` or `0` keeps
/// the image as is.
pub fn resize_to_max_dim(rgba: RgbaImage, max_dim: Option<u32>) -> RgbaImage {
    let Some(max_dim) = max_dim else {
        return rgba;
    };
    if max_dim == 0 {
        return rgba;
    }
    let (width, height) = rgba.dimensions();
    let max_axis = width.max(height);
    if max_axis <= max_dim {
        return rgba;
    }
    let scale = max_dim as f32 / max_axis as f32;
    let next_width = ((width as f32) * scale).round().max(1.0) as u32;
    let next_height = ((height as f32) * scale).round().max(1.0) as u32;
    log::info!("downscaling {width}x{height} to {next_width}x{next_height}");
    image::imageops::resize(&rgba, next_width, next_height, FilterType::Lanczos3)
}
