/// Candidate discovery and thumbnail preparation
pub mod candidates;
/// HSV conversion and sub-sampled colour profiles
pub mod profile;
/// Reconstruction error of the finished mosaic
pub mod report;
/// Per-cell profiles of the target image
pub mod target;
