//! Tests for circular arithmetic on hue values

#[cfg(test)]
mod tests {
    use photomosaic::math::circular::{
        CircularAccumulator, circular_distance, circular_mean, wrap_unit,
    };

    // Tests that values are folded into the half-open unit interval
    // Verified by replacing rem_euclid with the % operator
    #[test]
    fn test_wrap_unit_handles_negative_and_large_values() {
        assert!((wrap_unit(1.25) - 0.25).abs() < 1e-12);
        assert!((wrap_unit(-0.25) - 0.75).abs() < 1e-12);
        assert!(wrap_unit(1.0).abs() < 1e-12);
        let tiny = wrap_unit(-1e-18);
        assert!((0.0..1.0).contains(&tiny));
    }

    // Tests that distance takes the short way around the circle
    // Verified by returning the raw wrapped difference
    #[test]
    fn test_circular_distance_is_symmetric_and_bounded() {
        assert!((circular_distance(0.95, 0.05) - 0.1).abs() < 1e-12);
        assert!((circular_distance(0.05, 0.95) - 0.1).abs() < 1e-12);
        assert!((circular_distance(0.0, 0.5) - 0.5).abs() < 1e-12);
        assert!(circular_distance(0.3, 0.3).abs() < 1e-12);
    }

    // Tests that the mean of hues straddling zero stays near zero
    // Verified by averaging hues arithmetically
    #[test]
    fn test_circular_mean_wraps_around_zero() {
        let mean = circular_mean([0.99, 0.01]);
        assert!(
            circular_distance(mean, 0.0) < 1e-6,
            "mean {mean} should be near 0"
        );
        assert!((mean - 0.5).abs() > 0.4);
    }

    // Tests empty accumulator behaviour and counting
    // Verified by dividing by a zero count
    #[test]
    fn test_accumulator_empty_and_count() {
        let mut accumulator = CircularAccumulator::new();
        assert_eq!(accumulator.count(), 0);
        assert!(accumulator.mean().abs() < f64::EPSILON);

        accumulator.push(0.25);
        accumulator.push(0.25);
        assert_eq!(accumulator.count(), 2);
        assert!((accumulator.mean() - 0.25).abs() < 1e-9);
    }
}
