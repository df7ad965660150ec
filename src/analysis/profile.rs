//! Perceptual colour signatures for image regions
//!
//! A region is split into an `S x S` grid of sub-cells and each sub-cell is
//! reduced to one averaged hue/saturation/value triple.

use crate::io::error::{Result, invalid_parameter};
use crate::io::image::Raster;
use crate::math::circular::CircularAccumulator;
use crate::spatial::grid::PixelRect;
use ndarray::Array2;

/// Hue in `[0, 1)`, saturation and value in `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hsv {
    /// Circular hue, 0 and 1 adjacent
    pub hue: f64,
    /// Chroma relative to value
    pub saturation: f64,
    /// Largest channel
    pub value: f64,
}

impl Hsv {
    /// Construct from components
    pub const fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Convert one 8-bit RGB pixel
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| f64::from(c) / 255.0);
        Self::from_unit_rgb(r, g, b)
    }

    /// Convert channels already normalised to `[0, 1]`
    // Exact equality picks which channel is the maximum
    #[allow(clippy::float_cmp)]
    pub const fn from_unit_rgb(r: f64, g: f64, b: f64) -> Self {
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;

        let sector = if chroma == 0.0 {
            0.0
        } else if max == r {
            (g - b) / chroma
        } else if max == g {
            (b - r) / chroma + 2.0
        } else {
            (r - g) / chroma + 4.0
        };

        let saturation = if max == 0.0 { 0.0 } else { chroma / max };

        Self {
            hue: (sector + 1.0) / 6.0,
            saturation,
            value: max,
        }
    }
}

/// Running average of HSV samples, circular in hue
#[derive(Debug, Clone, Copy, Default)]
pub struct HsvAccumulator {
    hue: CircularAccumulator,
    saturation_sum: f64,
    value_sum: f64,
}

impl HsvAccumulator {
    /// Create an empty accumulator
    pub const fn new() -> Self {
        Self {
            hue: CircularAccumulator::new(),
            saturation_sum: 0.0,
            value_sum: 0.0,
        }
    }

    /// Add one sample
    pub fn push(&mut self, sample: Hsv) {
        self.hue.push(sample.hue);
        self.saturation_sum += sample.saturation;
        self.value_sum += sample.value;
    }

    /// Average of everything pushed; all zeros when empty
    pub fn mean(&self) -> Hsv {
        let count = self.hue.count();
        if count == 0 {
            return Hsv::default();
        }
        let n = count as f64;
        Hsv {
            hue: self.hue.mean(),
            saturation: self.saturation_sum / n,
            value: self.value_sum / n,
        }
    }
}

/// Average a slice of samples
pub fn average_hsv(samples: &[Hsv]) -> Hsv {
    let mut accumulator = HsvAccumulator::new();
    for &sample in samples {
        accumulator.push(sample);
    }
    accumulator.mean()
}

/// `S x S` grid of averaged HSV samples, indexed `[row, col]`
#[derive(Debug, Clone, PartialEq)]
pub struct ColorProfile {
    samples: Array2<Hsv>,
}

impl ColorProfile {
    /// Wrap a square sample grid
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is empty or not square
    pub fn from_samples(samples: Array2<Hsv>) -> Result<Self> {
        let (rows, cols) = samples.dim();
        if rows == 0 || rows != cols {
            return Err(invalid_parameter(
                "color_profile",
                &format!("{rows}x{cols}"),
                &"sample grid must be square and non-empty",
            ));
        }
        Ok(Self { samples })
    }

    /// Profile where every sub-cell has the same colour
    pub fn uniform(sub_samples: usize, sample: Hsv) -> Self {
        Self {
            samples: Array2::from_elem((sub_samples.max(1), sub_samples.max(1)), sample),
        }
    }

    /// Side of the sample grid
    pub fn sub_samples(&self) -> usize {
        self.samples.nrows()
    }

    /// Sample at sub-cell `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Option<&Hsv> {
        self.samples.get([row, col])
    }

    /// Mutable sample at sub-cell `(row, col)`
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Hsv> {
        self.samples.get_mut([row, col])
    }

    /// Samples in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &Hsv> {
        self.samples.iter()
    }

    /// Underlying sample grid
    pub const fn samples(&self) -> &Array2<Hsv> {
        &self.samples
    }
}

/// Computes [`ColorProfile`]s with a fixed sub-sample count
///
/// Sharing one profiler between the target and the candidates is what keeps
/// every profile of a run the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorProfiler {
    sub_samples: usize,
}

impl ColorProfiler {
    /// Create a profiler producing `sub_samples x sub_samples` grids
    ///
    /// # Errors
    ///
    /// Returns an error if `sub_samples` is zero
    pub fn new(sub_samples: usize) -> Result<Self> {
        if sub_samples == 0 {
            return Err(invalid_parameter(
                "sub_samples",
                &sub_samples,
                &"must be strictly positive",
            ));
        }
        Ok(Self { sub_samples })
    }

    /// Side of the grids this profiler produces
    pub const fn sub_samples(&self) -> usize {
        self.sub_samples
    }

    /// Profile a whole raster
    pub fn profile_raster(&self, raster: &Raster) -> ColorProfile {
        self.profile(raster, PixelRect::full(raster.width(), raster.height()))
    }

    /// Profile one rectangle of a raster
    ///
    /// Sub-cells are `floor(width / S) x floor(height / S)`; leftover pixels at
    /// the right and bottom are not sampled, nor are pixels outside the raster.
    pub fn profile(&self, raster: &Raster, region: PixelRect) -> ColorProfile {
        let s = self.sub_samples;
        let cell_width = region.width / s as u32;
        let cell_height = region.height / s as u32;

        let samples = Array2::from_shape_fn((s, s), |(row, col)| {
            let left = region.x + col as u32 * cell_width;
            let top = region.y + row as u32 * cell_height;

            let mut accumulator = HsvAccumulator::new();
            for y in top..top + cell_height {
                for x in left..left + cell_width {
                    if let Some(pixel) = raster.get_pixel_checked(x, y) {
                        accumulator.push(Hsv::from_rgb(pixel.0));
                    }
                }
            }
            accumulator.mean()
        });

        ColorProfile { samples }
    }
}
