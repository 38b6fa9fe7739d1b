use crate::outline::PieceOutline;
use crate::settings::CutSettings;
use crate::tab::{EdgeSide, EdgeType, TabShape};

/// Slack for float noise when snapping outline bounds outward to pixels.
const SNAP_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("grid needs at least one row")]
    ZeroRows,
    #[error("grid needs at least one column")]
    ZeroCols,
    #[error("grid {rows}x{cols} exceeds the maximum of {max} rows/columns")]
    TooLarge { rows: u32, cols: u32, max: u32 },
    #[error("{name} must be inside (0, 1), got {value}")]
    InvalidRatio { name: &'static str, value: f64 },
    #[error("image {width}x{height} is too small for a {rows}x{cols} grid")]
    CellTooSmall {
        width: u32,
        height: u32,
        rows: u32,
        cols: u32,
    },
}

/// Integer pixel box; `right` and `bottom` are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CropRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl CropRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn as_tuple(&self) -> (i32, i32, i32, i32) {
        (self.left, self.top, self.right, self.bottom)
    }
}

/// Everything needed to cut one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieceSlot {
    pub row: u32,
    pub col: u32,
    /// Bottom, left, top, right.
    pub edges: [EdgeType; 4],
    pub crop: CropRect,
    /// Nominal cell centre in crop-local pixel coordinates.
    pub center_offset: (f64, f64),
}

impl PieceSlot {
    pub fn edge(&self, side: EdgeSide) -> EdgeType {
        self.edges[side.index()]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridSpec {
    rows: u32,
    cols: u32,
    image_width: u32,
    image_height: u32,
    shape: TabShape,
}

impl GridSpec {
    pub fn new(
        rows: u32,
        cols: u32,
        image_width: u32,
        image_height: u32,
        settings: &CutSettings,
    ) -> Result<Self, GridError> {
        if rows == 0 {
            return Err(GridError::ZeroRows);
        }
        if cols == 0 {
            return Err(GridError::ZeroCols);
        }
        let max = settings.max_grid.max(1);
        if rows > max || cols > max {
            return Err(GridError::TooLarge { rows, cols, max });
        }
        check_ratio("arc_ratio", settings.arc_ratio)?;
        check_ratio("connect_ratio", settings.connect_ratio)?;
        if image_width < cols || image_height < rows {
            return Err(GridError::CellTooSmall {
                width: image_width,
                height: image_height,
                rows,
                cols,
            });
        }
        let shape = TabShape::new(
            image_width as f64 / cols as f64,
            image_height as f64 / rows as f64,
            settings,
        );
        Ok(Self {
            rows,
            cols,
            image_width,
            image_height,
            shape,
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn piece_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn cell_width(&self) -> f64 {
        self.image_width as f64 / self.cols as f64
    }

    pub fn cell_height(&self) -> f64 {
        self.image_height as f64 / self.rows as f64
    }

    /// Nominal cell centre in whole-image coordinates.
    pub fn cell_center(&self, row: u32, col: u32) -> (f64, f64) {
        let w = self.cell_width();
        let h = self.cell_height();
        (w * col as f64 + w * 0.5, h * row as f64 + h * 0.5)
    }

    /// Edge types in bottom, left, top, right order.
    ///
    /// Cells alternate polarity like a checkerboard, so the two cells sharing
    /// an interior edge always get a male/female pair. Edges on the outer
    /// boundary are flat.
    pub fn edge_types(&self, row: u32, col: u32) -> [EdgeType; 4] {
        let mut edges = if (row + col) % 2 == 0 {
            [EdgeType::Female, EdgeType::Male, EdgeType::Female, EdgeType::Male]
        } else {
            [EdgeType::Male, EdgeType::Female, EdgeType::Male, EdgeType::Female]
        };
        if row + 1 == self.rows {
            edges[EdgeSide::Bottom.index()] = EdgeType::Line;
        }
        if col == 0 {
            edges[EdgeSide::Left.index()] = EdgeType::Line;
        }
        if row == 0 {
            edges[EdgeSide::Top.index()] = EdgeType::Line;
        }
        if col + 1 == self.cols {
            edges[EdgeSide::Right.index()] = EdgeType::Line;
        }
        edges
    }

    /// Edge curves shared by every cell of this grid.
    pub fn tab_shape(&self) -> &TabShape {
        &self.shape
    }

    /// Slot and outline of one cell.
    ///
    /// The crop is the outline's bounding box in image coordinates, snapped
    /// outward to whole pixels, so the piece is never clipped.
    pub fn piece(&self, row: u32, col: u32) -> (PieceSlot, PieceOutline) {
        let edges = self.edge_types(row, col);
        let outline = PieceOutline::compose(&edges, &self.shape);
        let (cx, cy) = self.cell_center(row, col);
        let half_w = self.cell_width() * 0.5;
        let half_h = self.cell_height() * 0.5;
        let (min_x, min_y, max_x, max_y) = match outline.bounds() {
            Some((x0, y0, x1, y1)) => (
                x0.min(-half_w),
                y0.min(-half_h),
                x1.max(half_w),
                y1.max(half_h),
            ),
            None => (-half_w, -half_h, half_w, half_h),
        };

        let crop = CropRect::new(
            snap_down(cx + min_x),
            snap_down(cy + min_y),
            snap_up(cx + max_x),
            snap_up(cy + max_y),
        );
        let slot = PieceSlot {
            row,
            col,
            edges,
            crop,
            center_offset: (cx - crop.left as f64, cy - crop.top as f64),
        };
        (slot, outline)
    }

    pub fn slot(&self, row: u32, col: u32) -> PieceSlot {
        self.piece(row, col).0
    }

    /// `(row, col)` of every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    /// All slots in row-major order.
    pub fn slots(&self) -> impl Iterator<Item = PieceSlot> + '_ {
        self.cells().map(move |(row, col)| self.slot(row, col))
    }

    /// Slots with their outlines in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceSlot, PieceOutline)> + '_ {
        self.cells().map(move |(row, col)| self.piece(row, col))
    }

    /// Plain grid-aligned cell rectangle, used by the rectangular cut.
    pub fn cell_rect(&self, row: u32, col: u32) -> CropRect {
        let w = self.cell_width();
        let h = self.cell_height();
        CropRect::new(
            (w * col as f64).round() as i32,
            (h * row as f64).round() as i32,
            (w * (col + 1) as f64).round() as i32,
            (h * (row + 1) as f64).round() as i32,
        )
    }

    /// Pixel offsets of the `rows + 1` horizontal and `cols + 1` vertical
    /// cell boundaries.
    pub fn boundary_lines(&self) -> (Vec<i32>, Vec<i32>) {
        let h = self.cell_height();
        let w = self.cell_width();
        let horizontal = (0..=self.rows)
            .map(|row| (h * row as f64).round() as i32)
            .collect();
        let vertical = (0..=self.cols)
            .map(|col| (w * col as f64).round() as i32)
            .collect();
        (horizontal, vertical)
    }
}

fn snap_down(value: f64) -> i32 {
    (value + SNAP_EPSILON).floor() as i32
}

fn snap_up(value: f64) -> i32 {
    (value - SNAP_EPSILON).ceil() as i32
}

fn check_ratio(name: &'static str, value: f64) -> Result<(), GridError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(GridError::InvalidRatio { name, value })
    }
}
