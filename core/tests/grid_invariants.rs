use jigsaw_cutter_core::{CutSettings, EdgeSide, EdgeType, GridSpec};
use proptest::prelude::*;

fn settings() -> CutSettings {
    CutSettings {
        curve_points: 24,
        ..CutSettings::default()
    }
}

fn sized_grid(
    rows: u32,
    cols: u32,
    cell: u32,
    aspect: f64,
    settings: &CutSettings,
) -> GridSpec {
    let cell_height = ((cell as f64) * aspect).round().max(1.0) as u32;
    GridSpec::new(rows, cols, cols * cell, rows * cell_height, settings).expect("valid grid")
}

/// Default tab ratios, cells from very wide to very tall.
fn grid_strategy() -> impl Strategy<Value = GridSpec> {
    (1u32..=10, 1u32..=10, 20u32..=120, 0.1f64..10.0).prop_map(|(rows, cols, cell, aspect)| {
        sized_grid(rows, cols, cell, aspect, &settings())
    })
}

/// Any tab ratios inside (0, 1).
fn tuned_grid_strategy() -> impl Strategy<Value = GridSpec> {
    (
        1u32..=6,
        1u32..=6,
        20u32..=120,
        0.1f64..10.0,
        0.005f64..0.995,
        0.005f64..0.995,
    )
        .prop_map(|(rows, cols, cell, aspect, arc_ratio, connect_ratio)| {
            let settings = CutSettings {
                arc_ratio,
                connect_ratio,
                ..settings()
            };
            sized_grid(rows, cols, cell, aspect, &settings)
        })
}

proptest! {
    #[test]
    fn interior_edges_are_complementary(grid in tuned_grid_strategy()) {
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let here = grid.edge_types(row, col);
                if col + 1 < grid.cols() {
                    let right = here[EdgeSide::Right.index()];
                    let neighbor = grid.edge_types(row, col + 1)[EdgeSide::Left.index()];
                    prop_assert!(right.is_curved());
                    prop_assert_eq!(neighbor, right.complement());
                }
                if row + 1 < grid.rows() {
                    let bottom = here[EdgeSide::Bottom.index()];
                    let neighbor = grid.edge_types(row + 1, col)[EdgeSide::Top.index()];
                    prop_assert!(bottom.is_curved());
                    prop_assert_eq!(neighbor, bottom.complement());
                }
            }
        }
    }

    #[test]
    fn outer_ring_is_flat(grid in grid_strategy()) {
        for slot in grid.slots() {
            if slot.row == 0 {
                prop_assert_eq!(slot.edge(EdgeSide::Top), EdgeType::Line);
            }
            if slot.row + 1 == grid.rows() {
                prop_assert_eq!(slot.edge(EdgeSide::Bottom), EdgeType::Line);
            }
            if slot.col == 0 {
                prop_assert_eq!(slot.edge(EdgeSide::Left), EdgeType::Line);
            }
            if slot.col + 1 == grid.cols() {
                prop_assert_eq!(slot.edge(EdgeSide::Right), EdgeType::Line);
            }
        }
    }

    #[test]
    fn crop_contains_outline(grid in tuned_grid_strategy()) {
        for (slot, outline) in grid.pieces() {
            let (dx, dy) = slot.center_offset;
            let width = slot.crop.width() as f64;
            let height = slot.crop.height() as f64;
            for (x, y) in outline.translated(dx, dy) {
                prop_assert!(x >= -1e-6 && x <= width + 1e-6, "x {} outside 0..{}", x, width);
                prop_assert!(y >= -1e-6 && y <= height + 1e-6, "y {} outside 0..{}", y, height);
            }
        }
    }

    #[test]
    fn crop_contains_nominal_cell(grid in tuned_grid_strategy()) {
        for slot in grid.slots() {
            let (cx, cy) = grid.cell_center(slot.row, slot.col);
            let half_w = grid.cell_width() * 0.5;
            let half_h = grid.cell_height() * 0.5;
            prop_assert!(slot.crop.left as f64 <= cx - half_w + 1e-6);
            prop_assert!(slot.crop.top as f64 <= cy - half_h + 1e-6);
            prop_assert!(slot.crop.right as f64 >= cx + half_w - 1e-6);
            prop_assert!(slot.crop.bottom as f64 >= cy + half_h - 1e-6);
        }
    }

    #[test]
    fn crops_stay_inside_the_image(grid in grid_strategy()) {
        let (width, height) = grid.image_size();
        for slot in grid.slots() {
            prop_assert!(slot.crop.left >= 0 && slot.crop.top >= 0);
            prop_assert!(slot.crop.right <= width as i32 && slot.crop.bottom <= height as i32);
        }
    }
}

#[test]
fn neighbouring_pieces_share_the_seam() {
    let settings = settings();
    let grid = GridSpec::new(2, 2, 400, 300, &settings).expect("grid");
    let shape = grid.tab_shape();

    let left = grid.slot(0, 0);
    let right = grid.slot(0, 1);
    let (lx, ly) = grid.cell_center(0, 0);
    let (rx, ry) = grid.cell_center(0, 1);
    let seam: Vec<(f64, f64)> = shape
        .edge(EdgeSide::Right, left.edge(EdgeSide::Right))
        .into_iter()
        .map(|(x, y)| (x + lx, y + ly))
        .collect();
    let mut other: Vec<(f64, f64)> = shape
        .edge(EdgeSide::Left, right.edge(EdgeSide::Left))
        .into_iter()
        .map(|(x, y)| (x + rx, y + ry))
        .collect();
    other.reverse();
    assert_eq!(seam.len(), other.len());
    for (a, b) in seam.iter().zip(&other) {
        assert!((a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9);
    }
}
