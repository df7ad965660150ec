//! Enumeration of candidate files in source directories

use crate::io::error::{Result, WithPath};
use std::path::{Path, PathBuf};

/// Every regular file under `dir`, sorted by path
///
/// Sub-directories are descended only when `recursive` is set. Symlinks are
/// followed when they point at regular files.
///
/// # Errors
///
/// Returns an error if a directory cannot be listed
pub fn discover_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files(dir, recursive, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir).with_path(dir, "read directory")? {
        let path = entry.with_path(dir, "read directory entry")?.path();
        if path.is_file() {
            files.push(path);
        } else if recursive && path.is_dir() {
            collect_files(&path, recursive, files)?;
        }
    }
    Ok(())
}
