//! Tests for weighted HSV costs and the parallel score matrix

#[cfg(test)]
mod tests {
    use indicatif::ProgressBar;
    use ndarray::Array2;
    use photomosaic::algorithm::scheduler::JobScheduler;
    use photomosaic::algorithm::scoring::{
        ScoreMatrix, ScoreWeights, profile_cost, sample_cost, score_candidate,
    };
    use photomosaic::analysis::candidates::Candidate;
    use photomosaic::analysis::profile::{ColorProfile, Hsv};
    use photomosaic::analysis::target::TargetGrid;
    use photomosaic::spatial::grid::GridLayout;
    use std::path::PathBuf;
    use std::sync::Arc;

    const WEIGHTS: ScoreWeights = ScoreWeights {
        hue: 2.0,
        saturation: 3.0,
        value: 5.0,
    };

    fn candidate(sample: Hsv) -> Candidate {
        Candidate::new(
            PathBuf::from("c.png"),
            image::RgbImage::new(1, 1),
            ColorProfile::uniform(1, sample),
        )
    }

    // Tests that an identical sample costs nothing and each perturbation adds its weighted term
    // Verified by dropping the saturation weight
    #[test]
    fn test_cost_is_zero_for_identical_and_grows_by_weighted_term() {
        let base = Hsv::new(0.3, 0.5, 0.6);
        assert!(sample_cost(&base, &base, &WEIGHTS).abs() < 1e-12);

        let hue_shift = Hsv::new(0.35, 0.5, 0.6);
        let saturation_shift = Hsv::new(0.3, 0.4, 0.6);
        let value_shift = Hsv::new(0.3, 0.5, 0.9);

        assert!((sample_cost(&base, &hue_shift, &WEIGHTS) - 0.05 * 2.0).abs() < 1e-9);
        assert!((sample_cost(&base, &saturation_shift, &WEIGHTS) - 0.1 * 3.0).abs() < 1e-9);
        assert!((sample_cost(&base, &value_shift, &WEIGHTS) - 0.3 * 5.0).abs() < 1e-9);
    }

    // Tests that hue cost uses the short way around the circle
    // Verified by using the absolute hue difference
    #[test]
    fn test_hue_cost_wraps() {
        let weights = ScoreWeights::default();
        let near_one = Hsv::new(0.98, 0.0, 0.0);
        let near_zero = Hsv::new(0.02, 0.0, 0.0);
        assert!((sample_cost(&near_one, &near_zero, &weights) - 0.04).abs() < 1e-9);
    }

    // Tests that profile cost sums over sub-samples
    // Verified by averaging instead of summing
    #[test]
    fn test_profile_cost_sums_samples() {
        let weights = ScoreWeights::default();
        let target = ColorProfile::uniform(2, Hsv::new(0.0, 0.5, 0.5));
        let candidate = ColorProfile::uniform(2, Hsv::new(0.0, 0.5, 0.75));
        assert!((profile_cost(&target, &candidate, &weights) - 1.0).abs() < 1e-9);
    }

    // Tests that the matching candidate scores zero at its own cell
    // Verified by transposing the per-candidate cost grid
    #[test]
    fn test_score_matrix_finds_exact_match() {
        let layout = GridLayout::for_image(30, 20, 10).expect("layout should fit");
        let cells: Vec<Hsv> = (0..6)
            .map(|i| Hsv::new(f64::from(i) / 6.0, 0.5, 0.5))
            .collect();
        let target = TargetGrid::from_profiles(
            layout,
            cells
                .iter()
                .map(|&sample| ColorProfile::uniform(1, sample))
                .collect(),
        )
        .expect("six cells");

        let fifth = cells.get(4).copied().expect("five cells exist");
        let single = score_candidate(&target, &ColorProfile::uniform(1, fifth), &WEIGHTS);
        assert_eq!(single.dim(), (2, 3));
        assert!(single.get([1, 1]).is_some_and(|cost| cost.abs() < 1e-12));

        let candidates: Arc<[Candidate]> = cells.iter().copied().map(candidate).collect();
        let scheduler = JobScheduler::new(2).expect("scheduler should start");
        let progress = ProgressBar::hidden();
        let matrix = ScoreMatrix::compute(
            &scheduler,
            &Arc::new(target),
            &candidates,
            WEIGHTS,
            &progress,
        )
        .expect("scoring should succeed");

        assert_eq!(matrix.candidate_count(), 6);
        assert_eq!(progress.position(), 6);
        assert_eq!(progress.length(), Some(6));
        for k in 0..6 {
            let (x, y) = layout.cell_at(k);
            let own = matrix.cost(k, x, y).expect("cost exists");
            assert!(own.abs() < 1e-12);
            for other in (0..6).filter(|&other| other != k) {
                let cost = matrix.cost(other, x, y).expect("cost exists");
                assert!(cost > own, "candidate {other} beats exact match at ({x}, {y})");
            }
        }
    }

    // Tests shape validation of pre-computed grids
    // Verified by skipping the shape check
    #[test]
    fn test_score_matrix_rejects_mismatched_grid() {
        let grids = vec![Array2::zeros((2, 2)), Array2::zeros((2, 3))];
        assert!(ScoreMatrix::new(grids, (2, 2)).is_err());
        let empty = ScoreMatrix::new(vec![], (1, 1)).expect("no grids is valid");
        assert_eq!(empty.candidate_count(), 0);
    }
}
