//! Photomosaic construction from a pool of candidate photos
//!
//! A target image is divided into square cells and every cell is replaced by
//! the thumbnail whose colour profile matches it best. Colour is compared in
//! HSV with a circular hue distance, optionally on a grid of sub-samples, and
//! an optional repulsion penalty keeps identical thumbnails from clustering.

#![forbid(unsafe_code)]

/// Cell scoring, tile selection and the job scheduler that runs them
pub mod algorithm;
/// Colour profiling of the target and of candidate thumbnails
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Circular statistics for hue
pub mod math;
/// Grid geometry, crop windows and output compositing
pub mod spatial;

pub use io::error::{MosaicError, Result};
