//! How closely the finished mosaic reproduces the target

use crate::io::image::{Raster, resize};
use std::fmt;

/// Mean absolute per-channel difference, in 8-bit levels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReconstructionError {
    /// Red channel error
    pub red: f64,
    /// Green channel error
    pub green: f64,
    /// Blue channel error
    pub blue: f64,
}

impl ReconstructionError {
    /// Average over the three channels
    pub const fn overall(&self) -> f64 {
        (self.red + self.green + self.blue) / 3.0
    }
}

impl fmt::Display for ReconstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "red {:.2}, green {:.2}, blue {:.2} (overall {:.2})",
            self.red,
            self.green,
            self.blue,
            self.overall()
        )
    }
}

/// Rescale `mosaic` to the target's size and compare pixel by pixel
pub fn reconstruction_error(target: &Raster, mosaic: &Raster) -> ReconstructionError {
    let pixel_count = u64::from(target.width()) * u64::from(target.height());
    if pixel_count == 0 || mosaic.width() == 0 || mosaic.height() == 0 {
        return ReconstructionError::default();
    }

    let rescaled = resize(mosaic, target.width(), target.height());
    let mut sums = [0u64; 3];
    for (original, rebuilt) in target.pixels().zip(rescaled.pixels()) {
        for (sum, (&a, &b)) in sums.iter_mut().zip(original.0.iter().zip(rebuilt.0.iter())) {
            *sum += u64::from(a.abs_diff(b));
        }
    }

    let n = pixel_count as f64;
    let [red, green, blue] = sums.map(|sum| sum as f64 / n);
    ReconstructionError { red, green, blue }
}
