//! Thumbnail preparation for the candidate photo pool

use crate::algorithm::scheduler::JobScheduler;
use crate::analysis::profile::{ColorProfile, ColorProfiler};
use crate::io::cache::ThumbnailCache;
use crate::io::discovery::discover_files;
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::io::image::{Raster, crop, load_raster, resize, to_greyscale};
use crate::spatial::crop::{CropHint, square_crop};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A directory of candidate photos and how to crop them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDirectory {
    /// Directory to scan
    pub path: PathBuf,
    /// Horizontal crop preference for landscape photos
    pub crop_hint: CropHint,
}

impl SourceDirectory {
    /// Pair a directory with its crop hint
    pub fn new(path: impl Into<PathBuf>, crop_hint: CropHint) -> Self {
        Self {
            path: path.into(),
            crop_hint,
        }
    }
}

/// Prepared thumbnail and its colour profile
///
/// Immutable once built; later stages refer to candidates by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    source: PathBuf,
    thumbnail: Raster,
    profile: ColorProfile,
}

impl Candidate {
    /// Bundle a thumbnail with its profile
    pub const fn new(source: PathBuf, thumbnail: Raster, profile: ColorProfile) -> Self {
        Self {
            source,
            thumbnail,
            profile,
        }
    }

    /// File the thumbnail was made from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Square thumbnail raster
    pub const fn thumbnail(&self) -> &Raster {
        &self.thumbnail
    }

    /// Colour profile of the thumbnail
    pub const fn profile(&self) -> &ColorProfile {
        &self.profile
    }
}

/// Turns source photos into [`Candidate`]s, one scheduler job per file
#[derive(Debug, Clone)]
pub struct CandidatePreparer {
    profiler: ColorProfiler,
    thumbnail_size: u32,
    recursive: bool,
    greyscale: bool,
    grey_score: bool,
    cache: Option<ThumbnailCache>,
}

impl CandidatePreparer {
    /// Preparer producing `thumbnail_size` square thumbnails
    pub const fn new(profiler: ColorProfiler, thumbnail_size: u32) -> Self {
        Self {
            profiler,
            thumbnail_size,
            recursive: false,
            greyscale: false,
            grey_score: false,
            cache: None,
        }
    }

    /// Scan source sub-directories too
    #[must_use]
    pub const fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Convert thumbnails to greyscale before profiling
    #[must_use]
    pub const fn greyscale(mut self, greyscale: bool) -> Self {
        self.greyscale = greyscale;
        self
    }

    /// Profile a greyscale copy while keeping the colour thumbnail
    #[must_use]
    pub const fn grey_score(mut self, grey_score: bool) -> Self {
        self.grey_score = grey_score;
        self
    }

    /// Read and write thumbnails through a cache directory
    #[must_use]
    pub fn with_cache(mut self, cache: Option<ThumbnailCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Every candidate file with the crop hint of the directory it came from
    ///
    /// # Errors
    ///
    /// Returns an error if a source directory cannot be listed
    pub fn discover(&self, sources: &[SourceDirectory]) -> Result<Vec<(PathBuf, CropHint)>> {
        let mut files = Vec::new();
        for source in sources {
            let found = discover_files(&source.path, self.recursive)?;
            log::info!(
                "Found {} files in {} ({})",
                found.len(),
                source.path.display(),
                source.crop_hint
            );
            files.extend(found.into_iter().map(|path| (path, source.crop_hint)));
        }
        Ok(files)
    }

    /// Discover and prepare every candidate in `sources`
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be listed or no file yields a
    /// usable candidate
    pub fn prepare(
        &self,
        scheduler: &JobScheduler,
        sources: &[SourceDirectory],
        progress: &ProgressBar,
    ) -> Result<Vec<Candidate>> {
        let files = self.discover(sources)?;
        let candidates = self.prepare_files(scheduler, files, progress)?;
        if candidates.is_empty() {
            return Err(MosaicError::NoCandidates {
                directories: sources.len(),
            });
        }
        Ok(candidates)
    }

    /// Prepare an explicit file list in parallel
    ///
    /// Files that fail to decode are logged and left out; the returned pool
    /// keeps the relative order of `files`.
    ///
    /// # Errors
    ///
    /// Returns an error if the per-file results cannot be collected
    pub fn prepare_files(
        &self,
        scheduler: &JobScheduler,
        files: Vec<(PathBuf, CropHint)>,
        progress: &ProgressBar,
    ) -> Result<Vec<Candidate>> {
        progress.set_length(files.len() as u64);
        let requested = files.len();
        let files = Arc::new(files);
        let preparer = self.clone();
        let bar = progress.clone();

        let slots = scheduler.map_indexed(requested, move |index| {
            let (path, hint) = files.get(index)?;
            let prepared = match preparer.prepare_one(path, *hint) {
                Ok(candidate) => Some(candidate),
                Err(error) => {
                    log::warn!("Skipping candidate: {error}");
                    None
                }
            };
            bar.inc(1);
            prepared
        })?;

        let candidates: Vec<Candidate> = slots.into_iter().flatten().collect();
        log::info!(
            "Prepared {} of {requested} candidate images",
            candidates.len()
        );
        Ok(candidates)
    }

    /// Build one candidate: cached thumbnail or load, crop, rescale; then profile
    ///
    /// The cache always holds colour thumbnails; greyscale modes convert after
    /// the lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded
    pub fn prepare_one(&self, path: &Path, hint: CropHint) -> Result<Candidate> {
        let cached = self
            .cache
            .as_ref()
            .and_then(|cache| cache.lookup(path, self.thumbnail_size));

        let thumbnail = if let Some(thumbnail) = cached {
            thumbnail
        } else {
            let thumbnail = self.thumbnail_from(&load_raster(path)?, hint)?;
            if let Some(cache) = &self.cache
                && let Err(error) = cache.store(path, &thumbnail)
            {
                log::warn!("Failed to write thumbnail to cache: {error}");
            }
            thumbnail
        };

        let thumbnail = if self.greyscale {
            to_greyscale(&thumbnail)
        } else {
            thumbnail
        };

        let profile = if self.grey_score && !self.greyscale {
            self.profiler.profile_raster(&to_greyscale(&thumbnail))
        } else {
            self.profiler.profile_raster(&thumbnail)
        };
        Ok(Candidate::new(path.to_path_buf(), thumbnail, profile))
    }

    /// Crop a photo to its hinted square and rescale it to thumbnail size
    ///
    /// # Errors
    ///
    /// Returns an error if the computed crop window does not fit the photo
    pub fn thumbnail_from(&self, photo: &Raster, hint: CropHint) -> Result<Raster> {
        let window = square_crop(photo.width(), photo.height(), hint);
        if window.width == 0 {
            return Err(invalid_parameter(
                "photo",
                &format!("{}x{}", photo.width(), photo.height()),
                &"image has no pixels",
            ));
        }
        let square = crop(photo, window)?;
        Ok(resize(&square, self.thumbnail_size, self.thumbnail_size))
    }
}
