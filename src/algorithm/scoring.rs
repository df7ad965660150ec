//! Colour distance between target cells and candidate thumbnails
//!
//! Lower cost means a better visual match. Hue distance is circular, the
//! saturation and value terms are plain absolute differences.

use crate::algorithm::scheduler::JobScheduler;
use crate::analysis::candidates::Candidate;
use crate::analysis::profile::{ColorProfile, Hsv};
use crate::analysis::target::TargetGrid;
use crate::io::configuration::DEFAULT_WEIGHT;
use crate::io::error::{Result, computation_error};
use crate::math::circular::circular_distance;
use indicatif::ProgressBar;
use ndarray::Array2;
use std::sync::Arc;

/// Relative importance of each HSV component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Weight of the circular hue distance
    pub hue: f64,
    /// Weight of the saturation difference
    pub saturation: f64,
    /// Weight of the value difference
    pub value: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            hue: DEFAULT_WEIGHT,
            saturation: DEFAULT_WEIGHT,
            value: DEFAULT_WEIGHT,
        }
    }
}

/// Weighted error between two samples
pub fn sample_cost(target: &Hsv, candidate: &Hsv, weights: &ScoreWeights) -> f64 {
    let hue = circular_distance(target.hue, candidate.hue) * weights.hue;
    let saturation = (target.saturation - candidate.saturation).abs() * weights.saturation;
    let value = (target.value - candidate.value).abs() * weights.value;
    hue + saturation + value
}

/// Sum of [`sample_cost`] over every sub-sample position
pub fn profile_cost(target: &ColorProfile, candidate: &ColorProfile, weights: &ScoreWeights) -> f64 {
    target
        .iter()
        .zip(candidate.iter())
        .map(|(t, c)| sample_cost(t, c, weights))
        .sum()
}

/// Cost of one candidate at every target cell, shaped like the grid
pub fn score_candidate(
    target_grid: &TargetGrid,
    candidate: &ColorProfile,
    weights: &ScoreWeights,
) -> Array2<f64> {
    target_grid
        .profiles()
        .map(|cell| profile_cost(cell, candidate, weights))
}

/// Per-candidate cost grids, indexed by candidate then `[y, x]`
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    costs: Vec<Array2<f64>>,
    shape: (usize, usize),
}

impl ScoreMatrix {
    /// Wrap pre-computed cost grids
    ///
    /// # Errors
    ///
    /// Returns an error if any grid differs from `shape`
    pub fn new(costs: Vec<Array2<f64>>, shape: (usize, usize)) -> Result<Self> {
        if let Some(bad) = costs.iter().position(|c| c.dim() != shape) {
            return Err(computation_error(
                "score matrix",
                &format!("candidate {bad} cost grid does not match grid shape {shape:?}"),
            ));
        }
        Ok(Self { costs, shape })
    }

    /// Score every candidate against the target grid on the scheduler
    ///
    /// # Errors
    ///
    /// Returns an error if a scoring job fails to produce its grid
    pub fn compute(
        scheduler: &JobScheduler,
        target_grid: &Arc<TargetGrid>,
        candidates: &Arc<[Candidate]>,
        weights: ScoreWeights,
        progress: &ProgressBar,
    ) -> Result<Self> {
        let shape = target_grid.layout().shape();
        progress.set_length(candidates.len() as u64);
        let grid = Arc::clone(target_grid);
        let pool = Arc::clone(candidates);
        let bar = progress.clone();

        let slots = scheduler.map_indexed(candidates.len(), move |index| {
            let costs = pool
                .get(index)
                .map(|candidate| score_candidate(&grid, candidate.profile(), &weights));
            bar.inc(1);
            costs
        })?;

        let costs = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    computation_error("scoring", &format!("candidate {index} was not scored"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(costs, shape)
    }

    /// Number of candidates
    pub const fn candidate_count(&self) -> usize {
        self.costs.len()
    }

    /// Grid shape `(rows, cols)`
    pub const fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Cost grid of one candidate
    pub fn candidate_costs(&self, candidate: usize) -> Option<&Array2<f64>> {
        self.costs.get(candidate)
    }

    /// Cost of `candidate` at cell `(x, y)`
    pub fn cost(&self, candidate: usize, x: usize, y: usize) -> Option<f64> {
        self.costs
            .get(candidate)
            .and_then(|grid| grid.get([y, x]))
            .copied()
    }
}
