//! On-disk store of previously computed thumbnails
//!
//! Thumbnails are keyed by the source file name alone, so two sources with
//! the same name in different directories share one cache entry. Entries are
//! written under a hidden staging name and renamed into place, so a reader
//! never sees a partially written thumbnail.

use crate::io::error::{Result, WithPath};
use crate::io::image::{Raster, load_raster, save_raster};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static STAGED_WRITES: AtomicUsize = AtomicUsize::new(0);

/// Directory of `size x size` thumbnails named after their source files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailCache {
    dir: PathBuf,
}

impl ThumbnailCache {
    /// Use `dir` as the cache location
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the thumbnail for `source` lives, if it has a file name
    pub fn entry_path(&self, source: &Path) -> Option<PathBuf> {
        source.file_name().map(|name| self.dir.join(name))
    }

    /// Cached thumbnail for `source`, only if it is exactly `size x size`
    pub fn lookup(&self, source: &Path, size: u32) -> Option<Raster> {
        let path = self.entry_path(source)?;
        if !path.is_file() {
            return None;
        }
        match load_raster(&path) {
            Ok(raster) if raster.width() == size && raster.height() == size => Some(raster),
            Ok(raster) => {
                log::debug!(
                    "Ignoring cached thumbnail '{}' ({}x{}, expected {size}x{size})",
                    path.display(),
                    raster.width(),
                    raster.height()
                );
                None
            }
            Err(error) => {
                log::debug!("Ignoring unreadable cached thumbnail: {error}");
                None
            }
        }
    }

    /// Write a freshly computed thumbnail for `source`
    ///
    /// Concurrent stores to the same entry leave one complete thumbnail.
    ///
    /// # Errors
    ///
    /// Returns an error if the thumbnail cannot be encoded, written or moved
    /// into place
    pub fn store(&self, source: &Path, thumbnail: &Raster) -> Result<()> {
        let Some(path) = self.entry_path(source) else {
            return Ok(());
        };
        let staging = self.staging_path(&path);
        save_raster(thumbnail, &staging)?;

        if let Err(error) = fs::rename(&staging, &path) {
            if let Err(cleanup) = fs::remove_file(&staging) {
                log::debug!(
                    "Could not remove staged thumbnail '{}': {cleanup}",
                    staging.display()
                );
            }
            return Err(error).with_path(&path, "replace cached thumbnail");
        }
        Ok(())
    }

    // Keeps the extension so the encoder is chosen as for the final entry
    fn staging_path(&self, entry: &Path) -> PathBuf {
        let stem = entry
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sequence = STAGED_WRITES.fetch_add(1, Ordering::Relaxed);
        let mut name = format!(".{stem}.{}-{sequence}.partial", std::process::id());
        if let Some(extension) = entry.extension() {
            name.push('.');
            name.push_str(&extension.to_string_lossy());
        }
        self.dir.join(name)
    }
}
