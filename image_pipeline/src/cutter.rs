use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;
use jigsaw_cutter_core::{marker_radius, CutSettings, GridSpec};

use crate::mask::render_piece;
use crate::overview::{OverviewAccumulator, OverviewImages};
use crate::rect::{mark_grid_lines, render_cell};
use crate::sink::{piece_name, FileSink, PieceSink, OUTLINE_ONLY_NAME, OUTLINE_WITH_IMAGE_NAME};
use crate::PipelineError;

const MIN_COMFORTABLE_CELL: f64 = 16.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CutMode {
    /// Tabbed pieces with curved seams.
    #[default]
    Classic,
    /// Straight grid cells.
    Rectangular,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CutProgress {
    pub done: usize,
    pub total: usize,
}

/// Cuts an image into pieces and streams them into a [`PieceSink`].
///
/// The grid is validated before anything is written, so a rejected request
/// leaves the sink untouched. Pieces are emitted in row-major order followed
/// by the two overviews.
pub struct PieceCutter<'a> {
    settings: CutSettings,
    cancel: Option<Arc<AtomicBool>>,
    progress: Option<Box<dyn FnMut(CutProgress) + 'a>>,
}

impl<'a> PieceCutter<'a> {
    pub fn new(settings: CutSettings) -> Self {
        Self {
            settings,
            cancel: None,
            progress: None,
        }
    }

    /// Checked between pieces; once set the cut stops with
    /// [`PipelineError::Cancelled`].
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn with_progress(mut self, progress: impl FnMut(CutProgress) + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn cut<S>(
        &mut self,
        mode: CutMode,
        image: &RgbaImage,
        rows: u32,
        cols: u32,
        sink: &mut S,
    ) -> Result<RgbaImage, PipelineError>
    where
        S: PieceSink + ?Sized,
    {
        match mode {
            CutMode::Classic => self.cut_interlocking(image, rows, cols, sink),
            CutMode::Rectangular => self.cut_rectangular(image, rows, cols, sink),
        }
    }

    /// Returns the outline-with-image overview.
    pub fn cut_interlocking<S>(
        &mut self,
        image: &RgbaImage,
        rows: u32,
        cols: u32,
        sink: &mut S,
    ) -> Result<RgbaImage, PipelineError>
    where
        S: PieceSink + ?Sized,
    {
        let grid = self.grid(image, rows, cols)?;
        let (width, height) = image.dimensions();
        let mut overview = OverviewAccumulator::new(width, height, marker_radius(width, height));
        let total = grid.piece_count();
        let started = Instant::now();
        log::info!(
            "cutting {width}x{height} image into {rows}x{cols} interlocking pieces \
             (arc {}, connect {})",
            self.settings.arc_ratio,
            self.settings.connect_ratio
        );

        for (index, (slot, outline)) in grid.pieces().enumerate() {
            self.check_cancelled(index, total)?;
            let piece = render_piece(image, &slot, &outline)?;
            log::debug!(
                "piece {}_{}: edges [{}, {}, {}, {}], crop {:?}",
                slot.row,
                slot.col,
                slot.edges[0].label(),
                slot.edges[1].label(),
                slot.edges[2].label(),
                slot.edges[3].label(),
                slot.crop.as_tuple()
            );
            sink.write_image(&piece_name(slot.row, slot.col), &piece)?;
            let (cx, cy) = grid.cell_center(slot.row, slot.col);
            overview.stamp_points(outline.translated(cx, cy));
            self.report(index + 1, total);
        }

        let overviews = finish(&overview, image, sink)?;
        log::info!("cut {total} pieces in {:.2?}", started.elapsed());
        Ok(overviews.outline_with_image)
    }

    /// Returns the outline-with-image overview.
    pub fn cut_rectangular<S>(
        &mut self,
        image: &RgbaImage,
        rows: u32,
        cols: u32,
        sink: &mut S,
    ) -> Result<RgbaImage, PipelineError>
    where
        S: PieceSink + ?Sized,
    {
        let grid = self.grid(image, rows, cols)?;
        let (width, height) = image.dimensions();
        let border = self.settings.sanitized().border_width;
        let total = grid.piece_count();
        let started = Instant::now();
        log::info!("cutting {width}x{height} image into {rows}x{cols} rectangular pieces");

        for (index, (row, col)) in grid.cells().enumerate() {
            self.check_cancelled(index, total)?;
            let piece = render_cell(image, &grid, row, col, border);
            log::debug!(
                "piece {row}_{col}: cell {:?}",
                grid.cell_rect(row, col).as_tuple()
            );
            sink.write_image(&piece_name(row, col), &piece)?;
            self.report(index + 1, total);
        }

        let mut overview = OverviewAccumulator::new(width, height, 1);
        mark_grid_lines(&mut overview, &grid);
        let overviews = finish(&overview, image, sink)?;
        log::info!("cut {total} pieces in {:.2?}", started.elapsed());
        Ok(overviews.outline_with_image)
    }

    fn grid(&self, image: &RgbaImage, rows: u32, cols: u32) -> Result<GridSpec, PipelineError> {
        let (width, height) = image.dimensions();
        let grid = GridSpec::new(rows, cols, width, height, &self.settings)?;
        if grid.cell_width().min(grid.cell_height()) < MIN_COMFORTABLE_CELL {
            log::warn!(
                "cells are only {:.1}x{:.1} px, tabs will be hard to see",
                grid.cell_width(),
                grid.cell_height()
            );
        }
        Ok(grid)
    }

    fn check_cancelled(&self, done: usize, total: usize) -> Result<(), PipelineError> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => {
                log::warn!("cut cancelled after {done} of {total} pieces");
                Err(PipelineError::Cancelled { done, total })
            }
            _ => Ok(()),
        }
    }

    fn report(&mut self, done: usize, total: usize) {
        if let Some(progress) = self.progress.as_mut() {
            progress(CutProgress { done, total });
        }
    }
}

fn finish<S>(
    overview: &OverviewAccumulator,
    image: &RgbaImage,
    sink: &mut S,
) -> Result<OverviewImages, PipelineError>
where
    S: PieceSink + ?Sized,
{
    log::debug!("overview marks {} seam pixels", overview.marked_pixels());
    let overviews = overview.render(image);
    sink.write_image(OUTLINE_ONLY_NAME, &overviews.outline_only)?;
    sink.write_image(OUTLINE_WITH_IMAGE_NAME, &overviews.outline_with_image)?;
    Ok(overviews)
}

/// Cuts interlocking pieces into PNG files named `{output_prefix}{row}_{col}.png`
/// plus the two overviews, returning the outline-with-image overview.
pub fn generate_interlocking_pieces(
    image: &RgbaImage,
    rows: u32,
    cols: u32,
    output_prefix: &str,
    arc_ratio: f64,
    connect_ratio: f64,
) -> Result<RgbaImage, PipelineError> {
    let mut sink = FileSink::new(output_prefix);
    PieceCutter::new(CutSettings::with_ratios(arc_ratio, connect_ratio))
        .cut_interlocking(image, rows, cols, &mut sink)
}

pub fn generate_rectangular_pieces(
    image: &RgbaImage,
    rows: u32,
    cols: u32,
    output_prefix: &str,
) -> Result<RgbaImage, PipelineError> {
    let mut sink = FileSink::new(output_prefix);
    PieceCutter::new(CutSettings::default()).cut_rectangular(image, rows, cols, &mut sink)
}
