//! Arithmetic on circular quantities normalised to the unit interval
//!
//! Hue is an angle: 0 and 1 are the same colour. Averages and distances
//! must respect the wrap or colours near red come out as cyan.

use std::f64::consts::TAU;

/// Wrap any value into `[0, 1)`
///
/// Tiny negative inputs can round `rem_euclid` up to exactly `1.0`, which is
/// folded back to `0.0` so the half-open range holds.
pub fn wrap_unit(x: f64) -> f64 {
    let wrapped = x.rem_euclid(1.0);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Shortest distance between two unit-circle positions, in `[0, 0.5]`
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let d = wrap_unit(a - b);
    if d > 0.5 { 1.0 - d } else { d }
}

/// Running sums for a circular mean over unit-interval values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CircularAccumulator {
    sin_sum: f64,
    cos_sum: f64,
    count: usize,
}

impl CircularAccumulator {
    /// Create an empty accumulator
    pub const fn new() -> Self {
        Self {
            sin_sum: 0.0,
            cos_sum: 0.0,
            count: 0,
        }
    }

    /// Add one value in unit-interval turns
    pub fn push(&mut self, value: f64) {
        let (sin, cos) = (value * TAU).sin_cos();
        self.sin_sum += sin;
        self.cos_sum += cos;
        self.count += 1;
    }

    /// Number of values pushed so far
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Circular mean in `[0, 1)`, or `0.0` when empty
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        wrap_unit(self.sin_sum.atan2(self.cos_sum) / TAU)
    }
}

/// Circular mean of a sequence of unit-interval values
pub fn circular_mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut accumulator = CircularAccumulator::new();
    for value in values {
        accumulator.push(value);
    }
    accumulator.mean()
}
