//! Run configuration, defaults and pre-run validation

use crate::algorithm::repulsion::RepulsionSettings;
use crate::algorithm::scoring::ScoreWeights;
use crate::analysis::candidates::SourceDirectory;
use crate::io::error::{Result, configuration_error, invalid_parameter};
use std::path::PathBuf;

// Default values for configurable parameters
/// Colour samples per side of every profile grid
pub const DEFAULT_SUB_SAMPLES: usize = 1;
/// Weight of each HSV error term
pub const DEFAULT_WEIGHT: f64 = 1.0;
/// Repulsion disabled unless requested
pub const DEFAULT_REPULSION_SCALE: f64 = 0.0;
/// Smallest cluster of identical choices worth penalising
pub const DEFAULT_MIN_CLUSTER: usize = 2;
/// Fixed seed for reproducible tie-breaking
pub const DEFAULT_SEED: u64 = 42;

/// Worker threads started per logical CPU
pub const WORKERS_PER_CPU: usize = 2;

/// Threshold for switching progress bars to a single summary line
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 3;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Everything the pipeline needs, gathered before it starts
#[derive(Debug, Clone, PartialEq)]
// Each boolean mirrors an independent command-line switch
#[allow(clippy::struct_excessive_bools)]
pub struct MosaicConfig {
    /// Candidate photo directories with their crop hints
    pub sources: Vec<SourceDirectory>,
    /// Descend into sub-directories of every source
    pub recursive: bool,
    /// Image to reconstruct
    pub target: PathBuf,
    /// Where the composite is written
    pub output: PathBuf,
    /// Optional directory of pre-computed thumbnails
    pub thumbnail_dir: Option<PathBuf>,
    /// Side of one target cell in target pixels
    pub tile_size: u32,
    /// Side of one thumbnail in output pixels
    pub thumbnail_size: u32,
    /// Colour samples per side of every profile
    pub sub_samples: usize,
    /// HSV error weights
    pub weights: ScoreWeights,
    /// Spatial penalty for clustered repeats
    pub repulsion: RepulsionSettings,
    /// Whether a candidate may fill more than one cell
    pub allow_repeats: bool,
    /// Convert thumbnails and target to greyscale
    pub greyscale: bool,
    /// Match on luma only while keeping colour thumbnails in the output
    pub grey_score: bool,
    /// Seed for tie-breaking randomness
    pub seed: u64,
    /// Worker thread count
    pub workers: usize,
}

impl MosaicConfig {
    /// Check every value that can be checked without touching image data
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(configuration_error(
                &"at least one source directory (center, left or right) must be specified",
            ));
        }
        if self.target.as_os_str().is_empty() {
            return Err(configuration_error(&"target image must be specified"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(configuration_error(&"output file must be specified"));
        }

        if self.tile_size == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &self.tile_size,
                &"must be strictly positive",
            ));
        }
        if self.thumbnail_size == 0 {
            return Err(invalid_parameter(
                "thumbnail_size",
                &self.thumbnail_size,
                &"must be strictly positive",
            ));
        }
        if self.sub_samples == 0 {
            return Err(invalid_parameter(
                "sub_samples",
                &self.sub_samples,
                &"must be strictly positive",
            ));
        }
        let smallest_side = self.tile_size.min(self.thumbnail_size) as usize;
        if self.sub_samples > smallest_side {
            return Err(invalid_parameter(
                "sub_samples",
                &self.sub_samples,
                &format!("must not exceed tile and thumbnail size ({smallest_side})"),
            ));
        }

        for (parameter, weight) in [
            ("hue_weight", self.weights.hue),
            ("saturation_weight", self.weights.saturation),
            ("value_weight", self.weights.value),
            ("repulsion_scale", self.repulsion.scale),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid_parameter(
                    parameter,
                    &weight,
                    &"must be finite and non-negative",
                ));
            }
        }

        if self.workers == 0 {
            return Err(invalid_parameter(
                "workers",
                &self.workers,
                &"must be strictly positive",
            ));
        }

        if let Some(dir) = &self.thumbnail_dir
            && !dir.is_dir()
        {
            return Err(configuration_error(&format!(
                "thumbnail directory '{}' does not exist",
                dir.display()
            )));
        }

        Ok(())
    }

    /// Log a summary of what the run will do
    pub fn report(&self) {
        for crop_hint in crate::spatial::crop::CropHint::ALL {
            for source in self.sources.iter().filter(|s| s.crop_hint == crop_hint) {
                log::info!(
                    "Using {crop_hint}-focused photos from {}",
                    source.path.display()
                );
            }
        }
        if self.recursive {
            log::info!("Source directories are scanned recursively");
        }
        log::info!("Target image is {}", self.target.display());
        log::info!(
            "Thumbnails are {0}x{0} pixels and replace {1}x{1} blocks of the target",
            self.thumbnail_size,
            self.tile_size
        );
        log::info!(
            "Images are colour sampled {} times",
            self.sub_samples * self.sub_samples
        );
        if self.greyscale {
            log::info!("Output image will be greyscale");
        } else if self.grey_score {
            log::info!("Tiles are matched in greyscale but placed in colour");
        }
        if !self.allow_repeats {
            log::info!("Repeated thumbnails are not allowed");
        }
        if let Some(dir) = &self.thumbnail_dir {
            log::info!("Thumbnail directory is '{}'", dir.display());
        }
    }
}
