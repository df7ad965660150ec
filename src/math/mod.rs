//! Mathematical utilities for colour comparison

/// Circular mean and distance for hue values
pub mod circular;
