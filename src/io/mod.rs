/// On-disk thumbnail cache
pub mod cache;
/// Command-line interface
pub mod cli;
/// Defaults, constants and run configuration
pub mod configuration;
/// Candidate file enumeration
pub mod discovery;
/// Error types
pub mod error;
/// Raster loading, saving and transforms
pub mod image;
/// Stage progress bars
pub mod progress;
