//! Tests for command-line parsing and conversion into a run configuration

#[cfg(test)]
mod tests {
    use clap::Parser;
    use photomosaic::io::cli::Cli;
    use photomosaic::io::configuration::{DEFAULT_SEED, DEFAULT_SUB_SAMPLES};
    use photomosaic::spatial::crop::CropHint;
    use std::path::PathBuf;

    const REQUIRED: [&str; 9] = [
        "photomosaic",
        "--target",
        "in.jpg",
        "--output",
        "out.png",
        "--tile-size",
        "20",
        "--thumbnail-size",
        "40",
    ];

    // Tests CLI parsing with only required arguments
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(REQUIRED);

        assert_eq!(cli.target, PathBuf::from("in.jpg"));
        assert_eq!(cli.output, PathBuf::from("out.png"));
        assert_eq!(cli.seed, DEFAULT_SEED);
        assert_eq!(cli.sub_samples, DEFAULT_SUB_SAMPLES);
        assert!(cli.center.is_empty());
        assert!(cli.should_show_progress());
        assert_eq!(cli.default_log_filter(), "info");
        assert!(!cli.no_repeats);
    }

    // Tests that repeated source flags keep their crop hints in order
    // Verified by collecting left directories as centred
    #[test]
    fn test_repeated_sources_carry_hints() {
        let mut args = REQUIRED.to_vec();
        args.extend([
            "--right", "r1", "--center", "c1", "--left", "l1", "--center", "c2",
        ]);
        let cli = Cli::try_parse_from(args).expect("arguments should parse");

        let sources = cli.sources();
        let summary: Vec<_> = sources
            .iter()
            .map(|s| (s.path.to_string_lossy().into_owned(), s.crop_hint))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("c1".to_owned(), CropHint::Center),
                ("c2".to_owned(), CropHint::Center),
                ("l1".to_owned(), CropHint::Left),
                ("r1".to_owned(), CropHint::Right),
            ]
        );
    }

    // Tests conversion of every switch into the configuration
    // Verified by copying no_repeats into allow_repeats unchanged
    #[test]
    fn test_into_config_maps_options() {
        let mut args = REQUIRED.to_vec();
        args.extend([
            "--center",
            "photos",
            "--no-repeats",
            "--greyscale",
            "--grey-score",
            "--recursive",
            "--hue-weight",
            "2.5",
            "--repulsion-scale",
            "0.3",
            "--min-cluster",
            "4",
            "--workers",
            "3",
            "--sub-samples",
            "2",
            "--thumbnail-dir",
            "thumbs",
            "--quiet",
        ]);
        let cli = Cli::try_parse_from(args).expect("arguments should parse");
        assert!(!cli.should_show_progress());
        assert_eq!(cli.default_log_filter(), "warn");

        let config = cli.into_config();
        assert!(!config.allow_repeats);
        assert!(config.greyscale);
        assert!(config.grey_score);
        assert!(config.recursive);
        assert!((config.weights.hue - 2.5).abs() < f64::EPSILON);
        assert!((config.weights.saturation - 1.0).abs() < f64::EPSILON);
        assert!((config.repulsion.scale - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.repulsion.min_cluster, 4);
        assert_eq!(config.workers, 3);
        assert_eq!(config.sub_samples, 2);
        assert_eq!(config.thumbnail_dir, Some(PathBuf::from("thumbs")));
        assert_eq!(config.tile_size, 20);
        assert_eq!(config.thumbnail_size, 40);
    }

    // Tests that an omitted worker count falls back to the hardware default
    // Verified by defaulting workers to zero
    #[test]
    fn test_default_workers_positive() {
        let config = Cli::parse_from(REQUIRED).into_config();
        assert!(config.workers >= 1);
    }

    // Tests that required arguments are enforced
    // Verified by giving tile size a default
    #[test]
    fn test_missing_tile_size_is_rejected() {
        let args = ["photomosaic", "--target", "a", "--output", "b", "--thumbnail-size", "4"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
