use image::{GrayImage, Luma, Rgba, RgbaImage};
use jigsaw_cutter_core::Point;

pub const SEAM_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Background of the outline-only overview: white, fully transparent.
pub const OVERVIEW_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// The two whole-image seam renderings written after every cut.
#[derive(Clone, Debug, PartialEq)]
pub struct OverviewImages {
    pub outline_only: RgbaImage,
    pub outline_with_image: RgbaImage,
}

/// Collects seam pixels for the whole image while pieces are being cut.
///
/// Only a one-byte-per-pixel coverage map is kept; the two overview images
/// are produced once at the end by [`OverviewAccumulator::render`].
#[derive(Clone, Debug)]
pub struct OverviewAccumulator {
    coverage: GrayImage,
    radius: f64,
}

impl OverviewAccumulator {
    pub fn new(width: u32, height: u32, radius: u32) -> Self {
        Self {
            coverage: GrayImage::new(width, height),
            radius: radius.max(1) as f64,
        }
    }

    /// Stamps a filled dot at every point, in whole-image coordinates.
    pub fn stamp_points<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Point>,
    {
        for point in points {
            self.stamp(point);
        }
    }

    pub fn stamp(&mut self, (cx, cy): Point) {
        let (width, height) = self.coverage.dimensions();
        let r = self.radius;
        let x0 = (cx - r).floor().max(0.0);
        let y0 = (cy - r).floor().max(0.0);
        let x1 = (cx + r).ceil().min(width as f64 - 1.0);
        let y1 = (cy + r).ceil().min(height as f64 - 1.0);
        if x0 > x1 || y0 > y1 {
            return;
        }
        let r2 = r * r;
        for y in y0 as u32..=y1 as u32 {
            let dy = y as f64 + 0.5 - cy;
            for x in x0 as u32..=x1 as u32 {
                let dx = x as f64 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    self.coverage.put_pixel(x, y, Luma([255]));
                }
            }
        }
    }

    /// Marks a `line_width` band of rows ending at `y`.
    pub fn mark_row(&mut self, y: i32, line_width: u32) {
        let (width, height) = self.coverage.dimensions();
        for row in band(y, line_width, height) {
            for x in 0..width {
                self.coverage.put_pixel(x, row, Luma([255]));
            }
        }
    }

    /// Marks a `line_width` band of columns ending at `x`.
    pub fn mark_column(&mut self, x: i32, line_width: u32) {
        let (width, height) = self.coverage.dimensions();
        for col in band(x, line_width, width) {
            for y in 0..height {
                self.coverage.put_pixel(col, y, Luma([255]));
            }
        }
    }

    pub fn marked_pixels(&self) -> u64 {
        self.coverage.pixels().filter(|Luma([v])| *v > 0).count() as u64
    }

    /// Paints the collected seams over a transparent canvas and over `source`.
    pub fn render(&self, source: &RgbaImage) -> OverviewImages {
        let (width, height) = self.coverage.dimensions();
        let mut outline_only = RgbaImage::from_pixel(width, height, OVERVIEW_BACKGROUND);
        let mut outline_with_image = source.clone();
        for (x, y, Luma([v])) in self.coverage.enumerate_pixels() {
            if *v == 0 {
                continue;
            }
            outline_only.put_pixel(x, y, SEAM_COLOR);
            if x < outline_with_image.width() && y < outline_with_image.height() {
                outline_with_image.put_pixel(x, y, SEAM_COLOR);
            }
        }
        OverviewImages {
            outline_only,
            outline_with_image,
        }
    }
}

/// Pixel indices `end - line_width + 1 ..= end`, clipped to `0..limit`.
fn band(end: i32, line_width: u32, limit: u32) -> impl Iterator<Item = u32> {
    let line_width = line_width.max(1) as i32;
    let start = (end - line_width + 1).max(0);
    let end = end.min(limit as i32 - 1);
    (start..=end).map(|value| value as u32)
}
