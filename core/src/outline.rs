use crate::bezier::Point;
use crate::tab::{EdgeSide, EdgeType, TabShape};

/// Closed piece boundary in piece-local coordinates.
///
/// Starts on the bottom-right corner and walks bottom, left, top, right; the
/// polygon closes back onto the first point.
#[derive(Clone, Debug, PartialEq)]
pub struct PieceOutline {
    points: Vec<Point>,
}

impl PieceOutline {
    pub fn compose(edges: &[EdgeType; 4], shape: &TabShape) -> Self {
        let mut points = vec![shape.end_corner(EdgeSide::Right)];
        for side in EdgeSide::ORDER {
            points.extend(shape.edge(side, edges[side.index()]));
        }
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn translated(&self, dx: f64, dy: f64) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().map(move |&(x, y)| (x + dx, y + dy))
    }

    /// `(min_x, min_y, max_x, max_y)`, or `None` for an empty outline.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let (&first, rest) = self.points.split_first()?;
        let init = (first.0, first.1, first.0, first.1);
        Some(rest.iter().fold(init, |(x0, y0, x1, y1), &(x, y)| {
            (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
        }))
    }
}
