//! Tests for the reconstruction error report

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use photomosaic::analysis::report::{ReconstructionError, reconstruction_error};

    // Tests that an identical mosaic has zero error
    // Verified by adding one to every channel difference
    #[test]
    fn test_identical_images_have_no_error() {
        let image = RgbImage::from_fn(6, 4, |x, y| Rgb([x as u8 * 40, y as u8 * 60, 10]));
        let report = reconstruction_error(&image, &image);
        assert!(report.overall().abs() < 1e-12);
    }

    // Tests per-channel mean absolute difference after rescaling
    // Verified by comparing against the unscaled mosaic
    #[test]
    fn test_error_is_per_channel_mean() {
        let target = RgbImage::from_pixel(4, 4, Rgb([100, 100, 100]));
        let mosaic = RgbImage::from_pixel(8, 8, Rgb([110, 90, 100]));

        let report = reconstruction_error(&target, &mosaic);
        assert!((report.red - 10.0).abs() < 1e-9);
        assert!((report.green - 10.0).abs() < 1e-9);
        assert!(report.blue.abs() < 1e-9);
        assert!((report.overall() - 20.0 / 3.0).abs() < 1e-9);
    }

    // Tests that empty inputs report zero rather than dividing by zero
    // Verified by removing the empty-image guard
    #[test]
    fn test_empty_images_report_zero() {
        let report = reconstruction_error(&RgbImage::new(0, 0), &RgbImage::new(4, 4));
        assert_eq!(report, ReconstructionError::default());
        assert!(report.to_string().contains("overall 0.00"));
    }
}
