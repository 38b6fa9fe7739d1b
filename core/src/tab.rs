use serde::{Deserialize, Serialize};

use crate::bezier::{CubicBezier, Point};
use crate::settings::CutSettings;

/// Shape of a single piece edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Tab protruding out of the cell.
    Male,
    /// Socket cut into the cell.
    Female,
    /// Flat edge on the outer boundary of the grid.
    Line,
}

impl EdgeType {
    /// The edge type the neighbouring cell needs on the shared edge.
    pub fn complement(self) -> Self {
        match self {
            EdgeType::Male => EdgeType::Female,
            EdgeType::Female => EdgeType::Male,
            EdgeType::Line => EdgeType::Line,
        }
    }

    pub fn is_curved(self) -> bool {
        !matches!(self, EdgeType::Line)
    }

    pub fn label(self) -> &'static str {
        match self {
            EdgeType::Male => "male",
            EdgeType::Female => "female",
            EdgeType::Line => "line",
        }
    }
}

/// Edge position, in the order the outline visits them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeSide {
    Bottom,
    Left,
    Top,
    Right,
}

impl EdgeSide {
    pub const ORDER: [EdgeSide; 4] = [
        EdgeSide::Bottom,
        EdgeSide::Left,
        EdgeSide::Top,
        EdgeSide::Right,
    ];

    pub fn index(self) -> usize {
        match self {
            EdgeSide::Bottom => 0,
            EdgeSide::Left => 1,
            EdgeSide::Top => 2,
            EdgeSide::Right => 3,
        }
    }
}

/// Curve generator for the edges of one cell size.
///
/// Coordinates are piece-local with the origin at the nominal cell centre and
/// `y` growing downwards. Only the bottom and right edges are built from
/// Bezier segments; top and left are the neighbour's bottom and right edges
/// with the opposite polarity, shifted into this cell and walked backwards, so
/// two touching pieces always share the exact same seam.
#[derive(Clone, Debug, PartialEq)]
pub struct TabShape {
    width: f64,
    height: f64,
    arc_ratio: f64,
    connect_ratio: f64,
    curve_points: usize,
    curve_offset: f64,
}

impl TabShape {
    pub fn new(width: f64, height: f64, settings: &CutSettings) -> Self {
        let settings = settings.sanitized();
        Self {
            width,
            height,
            arc_ratio: settings.arc_ratio,
            connect_ratio: settings.connect_ratio,
            curve_points: settings.curve_points,
            curve_offset: width.min(height) * settings.curve_offset_ratio,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Points of one edge, walked in outline order
    /// (bottom right-to-left, left upwards, top left-to-right, right downwards).
    pub fn edge(&self, side: EdgeSide, kind: EdgeType) -> Vec<Point> {
        if kind == EdgeType::Line {
            return vec![self.end_corner(side)];
        }
        match side {
            EdgeSide::Bottom => self.bottom(kind),
            EdgeSide::Right => self.right(kind),
            EdgeSide::Top => {
                let mut points = self.bottom(kind.complement());
                for point in &mut points {
                    point.1 -= self.height;
                }
                points.reverse();
                points
            }
            EdgeSide::Left => {
                let mut points = self.right(kind.complement());
                for point in &mut points {
                    point.0 -= self.width;
                }
                points.reverse();
                points
            }
        }
    }

    /// Corner at which an edge ends when walking the outline.
    pub fn end_corner(&self, side: EdgeSide) -> Point {
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        match side {
            EdgeSide::Bottom => (-half_w, half_h),
            EdgeSide::Left => (-half_w, -half_h),
            EdgeSide::Top => (half_w, -half_h),
            EdgeSide::Right => (half_w, half_h),
        }
    }

    fn bottom(&self, kind: EdgeType) -> Vec<Point> {
        let half_h = self.height * 0.5;
        let profile = self.female_profile(
            self.width * 0.5,
            self.height * self.arc_ratio,
            self.width * self.connect_ratio,
        );
        let sign = depth_sign(kind);
        profile
            .into_iter()
            .map(|(s, d)| (-s, half_h + sign * d))
            .collect()
    }

    fn right(&self, kind: EdgeType) -> Vec<Point> {
        let half_w = self.width * 0.5;
        let profile = self.female_profile(
            self.height * 0.5,
            self.width * self.arc_ratio,
            self.height * self.connect_ratio,
        );
        let sign = depth_sign(kind);
        profile
            .into_iter()
            .map(|(s, d)| (half_w + sign * d, s))
            .collect()
    }

    /// Socket profile in edge space: `s` runs along the edge from `-half_len`
    /// to `half_len`, `d` points away from the cell. Four stitched segments:
    /// arc into the mouth, connect to the socket floor, then both mirrored.
    fn female_profile(&self, half_len: f64, arc_depth: f64, reach: f64) -> Vec<Point> {
        let offset = self.curve_offset;

        let arc_start = (-half_len, 0.0);
        let arc_end = (-reach * 0.5, arc_depth);
        let ds = arc_end.0 - arc_start.0;
        let dd = arc_end.1 - arc_start.1;
        let arc = [
            arc_start,
            (arc_start.0 + ds / 3.0, arc_start.1 + dd / 3.0 + offset),
            (arc_start.0 + 2.0 * ds / 3.0, arc_start.1 + dd * 2.0 / 3.0 + offset),
            arc_end,
        ];

        let start = arc_end;
        let floor = (0.0, start.1 - reach);
        let connect = [
            start,
            (-start.0 * 2.0 / 3.0, floor.1 + (start.1 - floor.1) * 3.0 / 5.0),
            (2.0 * start.0, floor.1),
            floor,
        ];

        let n = self.curve_points;
        let mut points = Vec::with_capacity(n * 4);
        points.extend(CubicBezier::from_points(arc).samples(n));
        points.extend(CubicBezier::from_points(connect).samples(n));
        points.extend(CubicBezier::from_points(mirror_segment(connect)).samples(n));
        points.extend(CubicBezier::from_points(mirror_segment(arc)).samples(n));
        points
    }
}

fn depth_sign(kind: EdgeType) -> f64 {
    match kind {
        EdgeType::Male => -1.0,
        _ => 1.0,
    }
}

/// Reverses a segment and flips it across the edge midpoint.
fn mirror_segment(points: [Point; 4]) -> [Point; 4] {
    let [a, b, c, d] = points;
    [(-d.0, d.1), (-c.0, c.1), (-b.0, b.1), (-a.0, a.1)]
}
