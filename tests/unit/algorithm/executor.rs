//! Tests for the end-to-end mosaic builder

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use photomosaic::MosaicError;
    use photomosaic::algorithm::executor::MosaicBuilder;
    use photomosaic::algorithm::repulsion::RepulsionSettings;
    use photomosaic::algorithm::scoring::ScoreWeights;
    use photomosaic::analysis::candidates::SourceDirectory;
    use photomosaic::io::configuration::MosaicConfig;
    use photomosaic::spatial::crop::CropHint;
    use std::fs;
    use std::path::Path;

    const RED: [u8; 3] = [230, 20, 20];
    const BLUE: [u8; 3] = [20, 20, 230];
    const GREEN: [u8; 3] = [20, 230, 20];
    const WHITE: [u8; 3] = [250, 250, 250];

    fn config(root: &Path, allow_repeats: bool) -> MosaicConfig {
        MosaicConfig {
            sources: vec![SourceDirectory::new(root.join("photos"), CropHint::Center)],
            recursive: false,
            target: root.join("target.png"),
            output: root.join("out").join("mosaic.png"),
            thumbnail_dir: None,
            tile_size: 10,
            thumbnail_size: 4,
            sub_samples: 1,
            weights: ScoreWeights::default(),
            repulsion: RepulsionSettings::default(),
            allow_repeats,
            greyscale: false,
            grey_score: false,
            seed: 5,
            workers: 2,
        }
    }

    // 20x20 target: red and blue on top, green and white below
    fn write_fixtures(root: &Path, photos: &[(&str, [u8; 3])]) {
        let target = RgbImage::from_fn(20, 20, |x, y| match (x < 10, y < 10) {
            (true, true) => Rgb(RED),
            (false, true) => Rgb(BLUE),
            (true, false) => Rgb(GREEN),
            (false, false) => Rgb(WHITE),
        });
        target.save(root.join("target.png")).expect("target saves");

        let dir = root.join("photos");
        fs::create_dir_all(&dir).expect("photo dir");
        for (name, color) in photos {
            RgbImage::from_pixel(12, 8, Rgb(*color))
                .save(dir.join(name))
                .expect("photo saves");
        }
    }

    // Tests that every cell picks the photo of its own colour
    // Verified by scoring candidates against a transposed target grid
    #[test]
    fn test_build_matches_cells_to_photos() {
        let root = tempfile::tempdir().expect("temp dir");
        write_fixtures(
            root.path(),
            &[
                ("blue.png", BLUE),
                ("green.png", GREEN),
                ("red.png", RED),
                ("white.png", WHITE),
            ],
        );

        let mut builder =
            MosaicBuilder::new(config(root.path(), true)).expect("config is valid");
        let output = builder.run().expect("build should succeed");

        assert_eq!(output.image.dimensions(), (8, 8));
        let name_at = |x, y| {
            output
                .selection
                .choice(x, y)
                .and_then(|k| output.sources.get(k))
                .and_then(|path| path.file_name())
                .and_then(|name| name.to_str())
                .map(str::to_owned)
        };
        assert_eq!(name_at(0, 0).as_deref(), Some("red.png"));
        assert_eq!(name_at(1, 0).as_deref(), Some("blue.png"));
        assert_eq!(name_at(0, 1).as_deref(), Some("green.png"));
        assert_eq!(name_at(1, 1).as_deref(), Some("white.png"));
        assert!(output.report.overall() < 64.0, "report: {}", output.report);
        assert!(root.path().join("out").join("mosaic.png").is_file());
    }

    // Tests that grey scoring still places colour thumbnails
    // Verified by composing from the greyscale profiling copy
    #[test]
    fn test_grey_score_matches_on_brightness_and_keeps_colour() {
        let root = tempfile::tempdir().expect("temp dir");
        write_fixtures(
            root.path(),
            &[
                ("blue.png", BLUE),
                ("green.png", GREEN),
                ("red.png", RED),
                ("white.png", WHITE),
            ],
        );
        let mut grey_score = config(root.path(), true);
        grey_score.grey_score = true;

        let mut builder = MosaicBuilder::new(grey_score).expect("config is valid");
        let output = builder.build().expect("build should succeed");

        let top_left = output.image.get_pixel(1, 1).0;
        assert!(top_left[0] > top_left[1] && top_left[0] > top_left[2]);
        let bottom_left = output.image.get_pixel(1, 5).0;
        assert!(bottom_left[1] > bottom_left[0] && bottom_left[1] > bottom_left[2]);
        assert_eq!(output.selection.distinct_count(), 4);
    }

    // Tests that too few files for a no-repeat mosaic fail before any decoding
    // Verified by moving the discovered-file check after scoring
    #[test]
    fn test_no_repeats_with_too_few_files_is_configuration_error() {
        let root = tempfile::tempdir().expect("temp dir");
        write_fixtures(root.path(), &[("red.png", RED), ("blue.png", BLUE)]);

        let mut builder =
            MosaicBuilder::new(config(root.path(), false)).expect("config is valid");
        let error = builder.build().expect_err("two photos cannot fill four tiles");

        assert!(error.is_configuration());
        assert!(matches!(
            error,
            MosaicError::InsufficientCandidates {
                available: 2,
                required: 4
            }
        ));
    }

    // Tests that undecodable files do not count towards the no-repeat pool
    // Verified by checking only the discovered file count
    #[test]
    fn test_no_repeats_counts_decoded_candidates() {
        let root = tempfile::tempdir().expect("temp dir");
        write_fixtures(
            root.path(),
            &[("red.png", RED), ("blue.png", BLUE), ("green.png", GREEN)],
        );
        fs::write(root.path().join("photos").join("broken.png"), b"nope")
            .expect("write fixture");

        let mut builder =
            MosaicBuilder::new(config(root.path(), false)).expect("config is valid");
        let error = builder.build().expect_err("three usable photos cannot fill four tiles");

        assert!(matches!(
            error,
            MosaicError::InsufficientCandidates {
                available: 3,
                required: 4
            }
        ));
    }

    // Tests that the builder refuses an invalid configuration
    // Verified by deferring validation to build
    #[test]
    fn test_new_validates_configuration() {
        let root = tempfile::tempdir().expect("temp dir");
        let mut bad = config(root.path(), true);
        bad.sources.clear();
        assert!(MosaicBuilder::new(bad).is_err_and(|error| error.is_configuration()));
    }

    // Tests that an unreadable target is a decode failure
    // Verified by skipping target loading errors
    #[test]
    fn test_missing_target_is_decode_error() {
        let root = tempfile::tempdir().expect("temp dir");
        fs::create_dir_all(root.path().join("photos")).expect("photo dir");

        let mut builder =
            MosaicBuilder::new(config(root.path(), true)).expect("config is valid");
        let result = builder.build();
        assert!(matches!(result, Err(MosaicError::ImageLoad { .. })));
    }
}
