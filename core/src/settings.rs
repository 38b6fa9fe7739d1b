use serde::{Deserialize, Serialize};

pub const ARC_RATIO_DEFAULT: f64 = 0.07;
pub const CONNECT_RATIO_DEFAULT: f64 = 0.3;

pub const CURVE_POINTS_DEFAULT: usize = 300;
pub const CURVE_POINTS_MIN: usize = 4;
pub const CURVE_POINTS_MAX: usize = 4096;

pub const CURVE_OFFSET_RATIO_DEFAULT: f64 = 0.02;
pub const CURVE_OFFSET_RATIO_MAX: f64 = 0.2;

pub const MAX_GRID_DEFAULT: u32 = 50;

pub const MARKER_RADIUS_MIN: u32 = 2;
pub const MARKER_RADIUS_DIVISOR: u32 = 500;

pub const BORDER_WIDTH_DEFAULT: u32 = 2;
pub const BORDER_WIDTH_MAX: u32 = 64;

/// Tunable parameters for a single cut.
///
/// Every field has a serde default so partial config files stay valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CutSettings {
    /// Neck offset of a tab as a fraction of the cell dimension.
    #[serde(default = "default_arc_ratio")]
    pub arc_ratio: f64,
    /// Total tab reach as a fraction of the cell dimension.
    #[serde(default = "default_connect_ratio")]
    pub connect_ratio: f64,
    /// Samples taken from each cubic segment.
    #[serde(default = "default_curve_points")]
    pub curve_points: usize,
    /// Bias applied to arc control points, relative to `min(cell_w, cell_h)`.
    #[serde(default = "default_curve_offset_ratio")]
    pub curve_offset_ratio: f64,
    /// Largest accepted row or column count.
    #[serde(default = "default_max_grid")]
    pub max_grid: u32,
    /// Stroke width of the border drawn around rectangular pieces.
    #[serde(default = "default_border_width")]
    pub border_width: u32,
}

impl Default for CutSettings {
    fn default() -> Self {
        Self {
            arc_ratio: ARC_RATIO_DEFAULT,
            connect_ratio: CONNECT_RATIO_DEFAULT,
            curve_points: CURVE_POINTS_DEFAULT,
            curve_offset_ratio: CURVE_OFFSET_RATIO_DEFAULT,
            max_grid: MAX_GRID_DEFAULT,
            border_width: BORDER_WIDTH_DEFAULT,
        }
    }
}

impl CutSettings {
    pub fn with_ratios(arc_ratio: f64, connect_ratio: f64) -> Self {
        Self {
            arc_ratio,
            connect_ratio,
            ..Self::default()
        }
    }

    /// Clamps the cosmetic parameters into their supported ranges.
    ///
    /// The ratios are left alone: out-of-range ratios are a caller error and
    /// get rejected by [`crate::GridSpec::new`].
    pub fn sanitized(&self) -> Self {
        Self {
            arc_ratio: self.arc_ratio,
            connect_ratio: self.connect_ratio,
            curve_points: self.curve_points.clamp(CURVE_POINTS_MIN, CURVE_POINTS_MAX),
            curve_offset_ratio: if self.curve_offset_ratio.is_finite() {
                self.curve_offset_ratio.clamp(0.0, CURVE_OFFSET_RATIO_MAX)
            } else {
                CURVE_OFFSET_RATIO_DEFAULT
            },
            max_grid: self.max_grid.max(1),
            border_width: self.border_width.min(BORDER_WIDTH_MAX),
        }
    }
}

/// Radius of the seam dots drawn into the overview images.
pub fn marker_radius(image_width: u32, image_height: u32) -> u32 {
    (image_width.min(image_height) / MARKER_RADIUS_DIVISOR).max(MARKER_RADIUS_MIN)
}

fn default_arc_ratio() -> f64 {
    ARC_RATIO_DEFAULT
}

fn default_connect_ratio() -> f64 {
    CONNECT_RATIO_DEFAULT
}

fn default_curve_points() -> usize {
    CURVE_POINTS_DEFAULT
}

fn default_curve_offset_ratio() -> f64 {
    CURVE_OFFSET_RATIO_DEFAULT
}

fn default_max_grid() -> u32 {
    MAX_GRID_DEFAULT
}

fn default_border_width() -> u32 {
    BORDER_WIDTH_DEFAULT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: CutSettings = toml::from_str("arc_ratio = 0.05\n").expect("parse");
        assert_eq!(settings.arc_ratio, 0.05);
        assert_eq!(settings.connect_ratio, CONNECT_RATIO_DEFAULT);
        assert_eq!(settings.curve_points, CURVE_POINTS_DEFAULT);
        assert_eq!(settings.max_grid, MAX_GRID_DEFAULT);
    }

    #[test]
    fn sanitized_clamps_cosmetics_only() {
        let settings = CutSettings {
            arc_ratio: 2.0,
            curve_points: 1,
            curve_offset_ratio: f64::NAN,
            max_grid: 0,
            border_width: 1000,
            ..CutSettings::default()
        }
        .sanitized();
        assert_eq!(settings.arc_ratio, 2.0);
        assert_eq!(settings.curve_points, CURVE_POINTS_MIN);
        assert_eq!(settings.curve_offset_ratio, CURVE_OFFSET_RATIO_DEFAULT);
        assert_eq!(settings.max_grid, 1);
        assert_eq!(settings.border_width, BORDER_WIDTH_MAX);
    }

    #[test]
    fn marker_radius_scales_with_image() {
        assert_eq!(marker_radius(640, 480), 2);
        assert_eq!(marker_radius(4000, 3000), 6);
    }
}
