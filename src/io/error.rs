//! Error types and context management for mosaic construction

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Run-level configuration is unusable
    Configuration {
        /// Description of what's wrong with the configuration
        reason: String,
    },

    /// A single configuration parameter failed validation
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Repeats are disallowed and the pool cannot cover every tile
    InsufficientCandidates {
        /// Number of candidates (or candidate files) available
        available: usize,
        /// Number of tiles the mosaic requires
        required: usize,
    },

    /// Candidate preparation produced nothing usable
    NoCandidates {
        /// Number of source directories that were scanned
        directories: usize,
    },

    /// Failed to decode an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to encode or write an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A worker thread could not be started
    WorkerSpawn {
        /// Index of the worker that failed to start
        index: usize,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Candidate index exceeds the prepared pool
    InvalidTileIndex {
        /// The invalid candidate index
        index: usize,
        /// Number of candidates in the pool
        max_tiles: usize,
    },

    /// Numerical or scheduling computation produced an invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

/// Coarse classification of errors for operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal before the pipeline starts
    Configuration,
    /// An image could not be read
    Decode,
    /// The output could not be written
    Encode,
    /// Filesystem, threading or computation failures
    Internal,
}

impl MosaicError {
    /// Classify this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. }
            | Self::InvalidParameter { .. }
            | Self::InsufficientCandidates { .. }
            | Self::NoCandidates { .. } => ErrorKind::Configuration,
            Self::ImageLoad { .. } => ErrorKind::Decode,
            Self::ImageExport { .. } => ErrorKind::Encode,
            Self::FileSystem { .. }
            | Self::WorkerSpawn { .. }
            | Self::InvalidTileIndex { .. }
            | Self::Computation { .. } => ErrorKind::Internal,
        }
    }

    /// Whether this error is a pre-run configuration failure
    pub const fn is_configuration(&self) -> bool {
        matches!(self.kind(), ErrorKind::Configuration)
    }
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { reason } => {
                write!(f, "Invalid configuration: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InsufficientCandidates {
                available,
                required,
            } => {
                write!(
                    f,
                    "Not enough candidate images to avoid repeats ({available} available, {required} tiles required)"
                )
            }
            Self::NoCandidates { directories } => {
                write!(
                    f,
                    "No usable candidate images found in {directories} source directories"
                )
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::WorkerSpawn { index, source } => {
                write!(f, "Failed to start worker {index}: {source}")
            }
            Self::InvalidTileIndex { index, max_tiles } => {
                write!(
                    f,
                    "Candidate index {index} is out of bounds (pool size: {max_tiles})"
                )
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } | Self::WorkerSpawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Attaches a path and operation name to I/O failures
pub trait WithPath<T> {
    /// Convert an I/O error into a [`MosaicError::FileSystem`]
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::io::Result<T> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| MosaicError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

impl From<image::ImageError> for MosaicError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create a configuration error
pub fn configuration_error(reason: &impl ToString) -> MosaicError {
    MosaicError::Configuration {
        reason: reason.to_string(),
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> MosaicError {
    MosaicError::Computation {
        operation,
        reason: reason.to_string(),
    }
}
