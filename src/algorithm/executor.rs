//! End-to-end mosaic construction
//!
//! Target analysis and candidate preparation share one scheduler and run at
//! the same time, each behind its own batch barrier. Scoring starts only once
//! both have finished.

use crate::algorithm::assignment::check_unique_feasibility;
use crate::algorithm::scheduler::JobScheduler;
use crate::algorithm::scoring::ScoreMatrix;
use crate::algorithm::selection::{Selection, TileSelector};
use crate::analysis::candidates::{Candidate, CandidatePreparer};
use crate::analysis::profile::ColorProfiler;
use crate::analysis::report::{ReconstructionError, reconstruction_error};
use crate::analysis::target::{TargetAnalyzer, TargetGrid};
use crate::io::cache::ThumbnailCache;
use crate::io::configuration::MosaicConfig;
use crate::io::error::{MosaicError, Result, computation_error};
use crate::io::image::{Raster, load_raster, save_raster, to_greyscale};
use crate::io::progress::ProgressManager;
use crate::spatial::compositor::compose;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Result of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicOutput {
    /// Composite image, `x_tiles * T` by `y_tiles * T`
    pub image: Raster,
    /// Candidate chosen for every cell
    pub selection: Selection,
    /// Sources of the candidate pool, indexed like the selection
    pub sources: Vec<PathBuf>,
    /// Difference between the rescaled mosaic and the target
    pub report: ReconstructionError,
}

/// Runs the whole pipeline for one validated configuration
pub struct MosaicBuilder {
    config: MosaicConfig,
    progress: ProgressManager,
}

impl MosaicBuilder {
    /// Validate `config` and prepare a builder with hidden progress
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation
    pub fn new(config: MosaicConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            progress: ProgressManager::hidden(),
        })
    }

    /// Report stage progress through `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = progress;
        self
    }

    /// Configuration the builder runs with
    pub const fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// Build the mosaic in memory
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be decoded or is smaller than a
    /// tile, no candidates survive preparation, the pool is too small for a
    /// no-repeat mosaic, or a worker job fails
    pub fn build(&mut self) -> Result<MosaicOutput> {
        let started = Instant::now();
        let config = &self.config;
        config.report();

        let scheduler = JobScheduler::new(config.workers)?;
        let profiler = ColorProfiler::new(config.sub_samples)?;

        let target = load_raster(&config.target)?;
        let target = if config.greyscale {
            to_greyscale(&target)
        } else {
            target
        };
        // Profiles may come from a greyscale copy; the report always uses `target`
        let scored_target = if config.grey_score && !config.greyscale {
            Arc::new(to_greyscale(&target))
        } else {
            Arc::new(target.clone())
        };

        let analyzer = TargetAnalyzer::new(profiler, config.tile_size);
        let layout = analyzer.layout_for(&scored_target)?;

        let preparer = CandidatePreparer::new(profiler, config.thumbnail_size)
            .recursive(config.recursive)
            .greyscale(config.greyscale)
            .grey_score(config.grey_score)
            .with_cache(config.thumbnail_dir.clone().map(ThumbnailCache::new));

        let files = preparer.discover(&config.sources)?;
        if !config.allow_repeats {
            check_unique_feasibility(files.len(), layout.tile_count())?;
        }

        let analysis_bar = self.progress.start_stage("Analysing target");
        let preparation_bar = self.progress.start_stage("Preparing thumbnails");
        let (target_grid, candidates) = thread::scope(|scope| {
            let analysis =
                scope.spawn(|| analyzer.analyze(&scheduler, &scored_target, &analysis_bar));
            let candidates = preparer.prepare_files(&scheduler, files, &preparation_bar);
            let target_grid = analysis.join().map_err(|_panic| {
                computation_error("target analysis", &"analysis thread panicked")
            })?;
            Ok::<_, MosaicError>((target_grid?, candidates?))
        })?;
        analysis_bar.finish();
        preparation_bar.finish();

        self.check_pool(&candidates, &target_grid)?;
        let target_grid: Arc<TargetGrid> = Arc::new(target_grid);
        let candidates: Arc<[Candidate]> = candidates.into();

        let scoring_bar = self.progress.start_stage("Scoring");
        let matrix = ScoreMatrix::compute(
            &scheduler,
            &target_grid,
            &candidates,
            config.weights,
            &scoring_bar,
        )?;
        scoring_bar.finish();

        let selector = TileSelector::new(config.repulsion, config.allow_repeats, config.seed);
        let selection = selector.select(&matrix)?;
        log::info!(
            "Selected {} distinct thumbnails for {} tiles",
            selection.distinct_count(),
            selection.choices().len()
        );

        let image = compose(&selection, &candidates, config.thumbnail_size)?;
        let report = reconstruction_error(&target, &image);
        log::info!("Reconstruction error: {report}");

        self.progress.finish();
        log::info!("Mosaic built in {:.2?}", started.elapsed());

        Ok(MosaicOutput {
            image,
            selection,
            sources: candidates
                .iter()
                .map(|candidate| candidate.source().to_path_buf())
                .collect(),
            report,
        })
    }

    fn check_pool(&self, candidates: &[Candidate], target_grid: &TargetGrid) -> Result<()> {
        if candidates.is_empty() {
            return Err(MosaicError::NoCandidates {
                directories: self.config.sources.len(),
            });
        }
        if !self.config.allow_repeats {
            check_unique_feasibility(candidates.len(), target_grid.layout().tile_count())?;
        }
        Ok(())
    }

    /// Build the mosaic and write it to the configured output path
    ///
    /// # Errors
    ///
    /// Returns an error if building fails or the output cannot be encoded
    pub fn run(&mut self) -> Result<MosaicOutput> {
        let output = self.build()?;
        save_raster(&output.image, &self.config.output)?;
        log::info!(
            "Wrote {}x{} mosaic to {}",
            output.image.width(),
            output.image.height(),
            self.config.output.display()
        );
        Ok(output)
    }
}
