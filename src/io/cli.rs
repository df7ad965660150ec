//! Command-line interface for building a photomosaic

use crate::algorithm::executor::MosaicBuilder;
use crate::algorithm::repulsion::RepulsionSettings;
use crate::algorithm::scheduler::default_worker_count;
use crate::algorithm::scoring::ScoreWeights;
use crate::analysis::candidates::SourceDirectory;
use crate::io::configuration::{
    DEFAULT_MIN_CLUSTER, DEFAULT_REPULSION_SCALE, DEFAULT_SEED, DEFAULT_SUB_SAMPLES,
    DEFAULT_WEIGHT, MosaicConfig,
};
use crate::io::error::Result;
use crate::io::progress::ProgressManager;
use crate::spatial::crop::CropHint;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "photomosaic")]
#[command(
    author,
    version,
    about = "Rebuild a target image from a collection of photo thumbnails"
)]
/// Command-line arguments for the mosaic builder
// Each boolean is an independent user-facing switch
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Directory of photos to crop around their centre (repeatable)
    #[arg(short, long = "center", value_name = "DIR")]
    pub center: Vec<PathBuf>,

    /// Directory of photos to crop from the left edge (repeatable)
    #[arg(short, long = "left", value_name = "DIR")]
    pub left: Vec<PathBuf>,

    /// Directory of photos to crop from the right edge (repeatable)
    #[arg(short, long = "right", value_name = "DIR")]
    pub right: Vec<PathBuf>,

    /// Image to reconstruct
    #[arg(short, long, value_name = "FILE")]
    pub target: PathBuf,

    /// Output image path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Directory of pre-computed thumbnails, read and updated
    #[arg(long, value_name = "DIR")]
    pub thumbnail_dir: Option<PathBuf>,

    /// Side of one target cell in target pixels
    #[arg(long, value_name = "PIXELS")]
    pub tile_size: u32,

    /// Side of one thumbnail in output pixels
    #[arg(long, value_name = "PIXELS")]
    pub thumbnail_size: u32,

    /// Colour samples per side of every tile and thumbnail
    #[arg(short = 's', long, default_value_t = DEFAULT_SUB_SAMPLES)]
    pub sub_samples: usize,

    /// Scan source directories recursively
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Use every thumbnail at most once
    #[arg(long)]
    pub no_repeats: bool,

    /// Produce a greyscale mosaic
    #[arg(short, long)]
    pub greyscale: bool,

    /// Match tiles on brightness only, keeping colour thumbnails
    #[arg(long)]
    pub grey_score: bool,

    /// Weight of the hue error
    #[arg(long, default_value_t = DEFAULT_WEIGHT)]
    pub hue_weight: f64,

    /// Weight of the saturation error
    #[arg(long, default_value_t = DEFAULT_WEIGHT)]
    pub saturation_weight: f64,

    /// Weight of the value error
    #[arg(long, default_value_t = DEFAULT_WEIGHT)]
    pub value_weight: f64,

    /// Strength of the penalty on clustered repeats, 0 disables it
    #[arg(long, default_value_t = DEFAULT_REPULSION_SCALE)]
    pub repulsion_scale: f64,

    /// Smallest group of identical choices that is penalised
    #[arg(long, default_value_t = DEFAULT_MIN_CLUSTER)]
    pub min_cluster: usize,

    /// Random seed for reproducible tie-breaking
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Worker threads, defaults to twice the logical CPU count
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level used when `RUST_LOG` is unset
    pub const fn default_log_filter(&self) -> &'static str {
        if self.quiet { "warn" } else { "info" }
    }

    /// Source directories in centre, left, right order
    pub fn sources(&self) -> Vec<SourceDirectory> {
        [
            (CropHint::Center, &self.center),
            (CropHint::Left, &self.left),
            (CropHint::Right, &self.right),
        ]
        .into_iter()
        .flat_map(|(hint, dirs)| {
            dirs.iter()
                .map(move |dir| SourceDirectory::new(dir.clone(), hint))
        })
        .collect()
    }

    /// Convert the parsed arguments into a run configuration
    pub fn into_config(self) -> MosaicConfig {
        MosaicConfig {
            sources: self.sources(),
            recursive: self.recursive,
            target: self.target,
            output: self.output,
            thumbnail_dir: self.thumbnail_dir,
            tile_size: self.tile_size,
            thumbnail_size: self.thumbnail_size,
            sub_samples: self.sub_samples,
            weights: ScoreWeights {
                hue: self.hue_weight,
                saturation: self.saturation_weight,
                value: self.value_weight,
            },
            repulsion: RepulsionSettings {
                scale: self.repulsion_scale,
                min_cluster: self.min_cluster,
            },
            allow_repeats: !self.no_repeats,
            greyscale: self.greyscale,
            grey_score: self.grey_score,
            seed: self.seed,
            workers: self.workers.unwrap_or_else(default_worker_count),
        }
    }

    /// Install logging, then validate, build and save the mosaic
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or any stage fails
    pub fn run(self) -> Result<()> {
        let progress = ProgressManager::new(self.should_show_progress());
        progress.init_logging(self.default_log_filter());
        let mut builder = MosaicBuilder::new(self.into_config())?.with_progress(progress);
        builder.run()?;
        Ok(())
    }
}
