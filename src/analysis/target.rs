//! Per-cell colour profiles of the target image

use crate::algorithm::scheduler::JobScheduler;
use crate::analysis::profile::{ColorProfile, ColorProfiler};
use crate::io::error::{Result, computation_error};
use crate::io::image::Raster;
use crate::spatial::grid::GridLayout;
use indicatif::ProgressBar;
use ndarray::Array2;
use std::sync::Arc;

/// One [`ColorProfile`] per output tile, indexed `[y, x]`
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGrid {
    layout: GridLayout,
    profiles: Array2<ColorProfile>,
}

impl TargetGrid {
    /// Assemble a grid from row-major profiles
    ///
    /// # Errors
    ///
    /// Returns an error if the profile count does not match the layout
    pub fn from_profiles(layout: GridLayout, profiles: Vec<ColorProfile>) -> Result<Self> {
        let count = profiles.len();
        let profiles = Array2::from_shape_vec(layout.shape(), profiles).map_err(|shape_error| {
            computation_error(
                "target grid",
                &format!(
                    "{count} profiles cannot fill a {}x{} grid: {shape_error}",
                    layout.x_tiles, layout.y_tiles
                ),
            )
        })?;
        Ok(Self { layout, profiles })
    }

    /// Geometry the grid was computed for
    pub const fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Profile of cell `(x, y)`
    pub fn profile(&self, x: usize, y: usize) -> Option<&ColorProfile> {
        self.profiles.get([y, x])
    }

    /// All profiles, `[y, x]`
    pub const fn profiles(&self) -> &Array2<ColorProfile> {
        &self.profiles
    }
}

/// Splits the target into cells and profiles each one in parallel
#[derive(Debug, Clone, Copy)]
pub struct TargetAnalyzer {
    profiler: ColorProfiler,
    tile_size: u32,
}

impl TargetAnalyzer {
    /// Create an analyzer for the given cell size
    pub const fn new(profiler: ColorProfiler, tile_size: u32) -> Self {
        Self {
            profiler,
            tile_size,
        }
    }

    /// Layout this analyzer would use for `target`
    ///
    /// # Errors
    ///
    /// Returns an error if the target is smaller than one tile
    pub fn layout_for(&self, target: &Raster) -> Result<GridLayout> {
        GridLayout::for_image(target.width(), target.height(), self.tile_size)
    }

    /// Profile every cell of `target`, one scheduler job per cell
    ///
    /// # Errors
    ///
    /// Returns an error if the target is smaller than one tile or a cell job
    /// produced no profile
    pub fn analyze(
        &self,
        scheduler: &JobScheduler,
        target: &Arc<Raster>,
        progress: &ProgressBar,
    ) -> Result<TargetGrid> {
        let layout = self.layout_for(target)?;
        log::info!(
            "Target {}x{} needs {} tiles ({}x{}), skipping a {}x{} pixel leading border",
            target.width(),
            target.height(),
            layout.tile_count(),
            layout.x_tiles,
            layout.y_tiles,
            layout.x_offset,
            layout.y_offset
        );

        progress.set_length(layout.tile_count() as u64);
        let profiler = self.profiler;
        let raster = Arc::clone(target);
        let bar = progress.clone();

        let slots = scheduler.map_indexed(layout.tile_count(), move |index| {
            let (x, y) = layout.cell_at(index);
            let profile = profiler.profile(&raster, layout.cell_rect(x, y));
            bar.inc(1);
            Some(profile)
        })?;

        let profiles = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    let (x, y) = layout.cell_at(index);
                    computation_error("target analysis", &format!("cell ({x}, {y}) failed"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        TargetGrid::from_profiles(layout, profiles)
    }
}
