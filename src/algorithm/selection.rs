//! Turning the score matrix into one chosen candidate per cell

use crate::algorithm::assignment::assign_unique;
use crate::algorithm::repulsion::{RepulsionSettings, apply_repulsion};
use crate::algorithm::scoring::ScoreMatrix;
use crate::io::error::{Result, computation_error};
use ndarray::Array2;
use std::collections::BTreeMap;

/// One candidate's cost at one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEntry {
    /// Index into the candidate pool
    pub candidate: usize,
    /// Cost, lower is better
    pub score: f64,
}

/// Every candidate's cost at every cell, each row sorted best first
///
/// Rows are indexed `[y, x]`. Only [`Self::penalize_front`] mutates a row
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreGrid {
    rows: Array2<Vec<ScoreEntry>>,
}

impl ScoreGrid {
    /// Collect and sort the costs of every candidate at every cell
    ///
    /// Equal costs keep candidate-index order.
    pub fn build(matrix: &ScoreMatrix) -> Self {
        let rows = Array2::from_shape_fn(matrix.shape(), |(y, x)| {
            let mut row: Vec<ScoreEntry> = (0..matrix.candidate_count())
                .filter_map(|candidate| {
                    matrix
                        .cost(candidate, x, y)
                        .map(|score| ScoreEntry { candidate, score })
                })
                .collect();
            row.sort_by(|a, b| a.score.total_cmp(&b.score));
            row
        });
        Self { rows }
    }

    /// Grid shape `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.rows.dim()
    }

    /// Cells across
    pub fn x_tiles(&self) -> usize {
        self.rows.ncols()
    }

    /// Cells down
    pub fn y_tiles(&self) -> usize {
        self.rows.nrows()
    }

    /// Sorted entries at cell `(x, y)`
    pub fn row(&self, x: usize, y: usize) -> Option<&[ScoreEntry]> {
        self.rows.get([y, x]).map(Vec::as_slice)
    }

    /// Current best entry at cell `(x, y)`
    pub fn front(&self, x: usize, y: usize) -> Option<&ScoreEntry> {
        self.rows.get([y, x]).and_then(|row| row.first())
    }

    /// Cells grouped by the candidate currently at their front
    ///
    /// Cells within a group are in row-major order.
    pub fn clusters(&self) -> BTreeMap<usize, Vec<(usize, usize)>> {
        let mut clusters: BTreeMap<usize, Vec<(usize, usize)>> = BTreeMap::new();
        for ((y, x), row) in self.rows.indexed_iter() {
            if let Some(front) = row.first() {
                clusters.entry(front.candidate).or_default().push((x, y));
            }
        }
        clusters
    }

    /// Add `penalty` to the front entry at `(x, y)` and re-seat it
    ///
    /// The penalised entry moves back past every entry that is now strictly
    /// cheaper; ties keep it in front. Returns the candidate now at the front.
    pub fn penalize_front(&mut self, x: usize, y: usize, penalty: f64) -> Option<usize> {
        let row = self.rows.get_mut([y, x])?;
        if row.is_empty() {
            return None;
        }
        let mut entry = row.remove(0);
        entry.score += penalty;
        let position = row.partition_point(|other| other.score < entry.score);
        row.insert(position, entry);
        row.first().map(|front| front.candidate)
    }
}

/// Chosen candidate per cell, indexed `[y, x]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    choices: Array2<usize>,
}

impl Selection {
    /// Wrap a grid of candidate indices
    pub const fn from_choices(choices: Array2<usize>) -> Self {
        Self { choices }
    }

    /// Take the front entry of every row
    ///
    /// # Errors
    ///
    /// Returns an error if any cell has no scored candidates
    pub fn from_fronts(grid: &ScoreGrid) -> Result<Self> {
        let mut choices = Array2::<usize>::zeros(grid.shape());
        for ((y, x), choice) in choices.indexed_iter_mut() {
            *choice = grid
                .front(x, y)
                .ok_or_else(|| {
                    computation_error("selection", &format!("cell ({x}, {y}) has no candidates"))
                })?
                .candidate;
        }
        Ok(Self { choices })
    }

    /// Candidate chosen for cell `(x, y)`
    pub fn choice(&self, x: usize, y: usize) -> Option<usize> {
        self.choices.get([y, x]).copied()
    }

    /// Cells across
    pub fn x_tiles(&self) -> usize {
        self.choices.ncols()
    }

    /// Cells down
    pub fn y_tiles(&self) -> usize {
        self.choices.nrows()
    }

    /// Underlying `[y, x]` grid
    pub const fn choices(&self) -> &Array2<usize> {
        &self.choices
    }

    /// How many cells chose `candidate`
    pub fn occurrences(&self, candidate: usize) -> usize {
        self.choices.iter().filter(|&&c| c == candidate).count()
    }

    /// Number of different candidates used
    pub fn distinct_count(&self) -> usize {
        let mut used: Vec<usize> = self.choices.iter().copied().collect();
        used.sort_unstable();
        used.dedup();
        used.len()
    }
}

/// Picks tiles from a score matrix, with repulsion or without repeats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSelector {
    repulsion: RepulsionSettings,
    allow_repeats: bool,
    seed: u64,
}

impl TileSelector {
    /// Create a selector
    pub const fn new(repulsion: RepulsionSettings, allow_repeats: bool, seed: u64) -> Self {
        Self {
            repulsion,
            allow_repeats,
            seed,
        }
    }

    /// Choose one candidate per cell
    ///
    /// With repeats allowed the rows are built, penalised and their fronts
    /// taken. Without repeats every candidate is placed at most once.
    ///
    /// # Errors
    ///
    /// Returns an error if a cell cannot be filled
    pub fn select(&self, matrix: &ScoreMatrix) -> Result<Selection> {
        if !self.allow_repeats {
            return assign_unique(matrix, self.seed);
        }

        let mut grid = ScoreGrid::build(matrix);
        let summary = apply_repulsion(&mut grid, &self.repulsion);
        if summary.penalized_cells > 0 {
            log::info!(
                "Repulsion penalised {} cells across {} clusters; {} changed candidate",
                summary.penalized_cells,
                summary.penalized_clusters,
                summary.reassigned_cells
            );
        }
        Selection::from_fronts(&grid)
    }
}
