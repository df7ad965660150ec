//! Tests for sorted score rows and per-cell selection

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};
    use photomosaic::algorithm::repulsion::RepulsionSettings;
    use photomosaic::algorithm::scoring::ScoreMatrix;
    use photomosaic::algorithm::selection::{ScoreGrid, Selection, TileSelector};

    fn matrix(costs: Vec<Array2<f64>>) -> ScoreMatrix {
        let shape = costs.first().map_or((0, 0), Array2::dim);
        ScoreMatrix::new(costs, shape).expect("grids share a shape")
    }

    // Tests that rows are sorted ascending with ties in candidate order
    // Verified by using an unstable sort
    #[test]
    fn test_build_sorts_rows_stably() {
        let grid = ScoreGrid::build(&matrix(vec![
            array![[0.5, 0.1]],
            array![[0.2, 0.1]],
            array![[0.2, 0.3]],
        ]));

        let first: Vec<_> = grid
            .row(0, 0)
            .expect("cell exists")
            .iter()
            .map(|entry| entry.candidate)
            .collect();
        assert_eq!(first, [1, 2, 0]);
        assert_eq!(grid.front(1, 0).map(|entry| entry.candidate), Some(0));
        assert_eq!(grid.shape(), (1, 2));
    }

    // Tests that penalised fronts are re-seated and ties stay in front
    // Verified by appending the penalised entry to the end of its row
    #[test]
    fn test_penalize_front_reseats_entry() {
        let mut grid = ScoreGrid::build(&matrix(vec![
            array![[0.0]],
            array![[0.5]],
            array![[0.7]],
        ]));

        assert_eq!(grid.penalize_front(0, 0, 0.5), Some(0));
        assert_eq!(grid.penalize_front(0, 0, 0.1), Some(1));
        let order: Vec<_> = grid
            .row(0, 0)
            .expect("cell exists")
            .iter()
            .map(|entry| entry.candidate)
            .collect();
        assert_eq!(order, [1, 0, 2]);
        assert_eq!(grid.penalize_front(3, 3, 1.0), None);
    }

    // Tests grouping of cells by front candidate in row-major order
    // Verified by grouping on the last entry instead of the first
    #[test]
    fn test_clusters_group_front_candidates() {
        let grid = ScoreGrid::build(&matrix(vec![
            array![[0.0, 1.0], [0.0, 1.0]],
            array![[1.0, 0.0], [1.0, 1.0]],
        ]));
        let clusters = grid.clusters();
        assert_eq!(clusters.get(&0), Some(&vec![(0, 0), (0, 1), (1, 1)]));
        assert_eq!(clusters.get(&1), Some(&vec![(1, 0)]));
    }

    // Tests selection bookkeeping helpers
    // Verified by counting distinct candidates without deduplication
    #[test]
    fn test_selection_counts() {
        let selection = Selection::from_choices(array![[2, 2, 0], [1, 2, 0]]);
        assert_eq!(selection.x_tiles(), 3);
        assert_eq!(selection.y_tiles(), 2);
        assert_eq!(selection.choice(0, 1), Some(1));
        assert_eq!(selection.choice(3, 0), None);
        assert_eq!(selection.occurrences(2), 3);
        assert_eq!(selection.distinct_count(), 3);
    }

    // Tests that without repulsion each cell takes its cheapest candidate
    // Verified by taking the second entry of every row
    #[test]
    fn test_selector_takes_argmin_with_repeats() {
        let scores = matrix(vec![array![[0.1, 0.9]], array![[0.4, 0.2]]]);
        let selector = TileSelector::new(RepulsionSettings::default(), true, 7);
        let selection = selector.select(&scores).expect("selection should succeed");
        assert_eq!(selection.choices(), &array![[0, 1]]);
    }

    // Tests that a cell with no candidates cannot be selected
    // Verified by defaulting empty cells to candidate zero
    #[test]
    fn test_from_fronts_requires_candidates() {
        let empty = ScoreMatrix::new(Vec::new(), (1, 1)).expect("no grids is valid");
        assert!(Selection::from_fronts(&ScoreGrid::build(&empty)).is_err());
    }
}
