use std::collections::BTreeMap;
use std::path::PathBuf;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::PipelineError;

pub const OUTLINE_ONLY_NAME: &str = "outline_only";
pub const OUTLINE_WITH_IMAGE_NAME: &str = "outline_with_image";
pub const JPEG_QUALITY_DEFAULT: u8 = 95;

/// Sink name of the piece at `row`, `col`.
pub fn piece_name(row: u32, col: u32) -> String {
    format!("{row}_{col}")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Lossless, keeps the piece alpha.
    #[default]
    Png,
    /// Alpha is flattened onto white.
    Jpeg { quality: u8 },
}

impl ExportFormat {
    pub fn jpeg() -> Self {
        ExportFormat::Jpeg {
            quality: JPEG_QUALITY_DEFAULT,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg { .. } => "jpg",
        }
    }

    pub fn encode(self, image: &RgbaImage) -> Result<Vec<u8>, PipelineError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PipelineError::Dimensions);
        }
        let mut out = Vec::new();
        match self {
            ExportFormat::Png => {
                PngEncoder::new(&mut out)
                    .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
                    .map_err(|err| PipelineError::Encode(err.to_string()))?;
            }
            ExportFormat::Jpeg { quality } => {
                let rgb = flatten_on_white(image);
                JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
                    .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
                    .map_err(|err| PipelineError::Encode(err.to_string()))?;
            }
        }
        Ok(out)
    }
}

fn flatten_on_white(image: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(image.width() as usize * image.height() as usize * 3);
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        for channel in [r, g, b] {
            let blended = (channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

/// Destination for finished piece and overview images.
///
/// Images arrive one at a time as soon as they are cut, so a sink never has
/// to hold the whole puzzle unless it wants to.
pub trait PieceSink {
    fn write_image(&mut self, name: &str, image: &RgbaImage) -> Result<(), PipelineError>;
}

/// Writes `{prefix}{name}.{ext}` files. The prefix may contain directories,
/// which must already exist.
#[derive(Clone, Debug)]
pub struct FileSink {
    prefix: String,
    format: ExportFormat,
    written: Vec<PathBuf>,
}

impl FileSink {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            format: ExportFormat::Png,
            written: Vec::new(),
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{}.{}", self.prefix, name, self.format.extension()))
    }

    /// Paths written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PieceSink for FileSink {
    fn write_image(&mut self, name: &str, image: &RgbaImage) -> Result<(), PipelineError> {
        let bytes = self.format.encode(image)?;
        let path = self.path_for(name);
        std::fs::write(&path, bytes).map_err(|source| PipelineError::Io {
            path: path.clone(),
            source,
        })?;
        log::trace!("wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Keeps every image in memory, keyed by sink name.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    images: BTreeMap<String, RgbaImage>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&RgbaImage> {
        self.images.get(name)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn into_images(self) -> BTreeMap<String, RgbaImage> {
        self.images
    }
}

impl PieceSink for MemorySink {
    fn write_image(&mut self, name: &str, image: &RgbaImage) -> Result<(), PipelineError> {
        self.images.insert(name.to_string(), image.clone());
        Ok(())
    }
}
