//! Spatial repulsion between identical tile choices
//!
//! Cells that pick the same candidate push on each other like charges of the
//! same sign: the closer and more numerous the neighbours, the larger the cost
//! added to that choice.

use crate::algorithm::selection::ScoreGrid;
use crate::io::configuration::{DEFAULT_MIN_CLUSTER, DEFAULT_REPULSION_SCALE};
use crate::spatial::grid::normalized_squared_distance;

/// Strength and trigger size of the repulsion penalty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepulsionSettings {
    /// Multiplier on the summed inverse distances; `0` disables repulsion
    pub scale: f64,
    /// Clusters smaller than this are left alone
    pub min_cluster: usize,
}

impl Default for RepulsionSettings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_REPULSION_SCALE,
            min_cluster: DEFAULT_MIN_CLUSTER,
        }
    }
}

impl RepulsionSettings {
    /// Whether the penalty step runs at all
    pub const fn is_enabled(&self) -> bool {
        self.scale > 0.0
    }
}

/// What one penalty pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepulsionSummary {
    /// Candidates whose cluster was large enough to penalise
    pub penalized_clusters: usize,
    /// Cells whose front entry received a penalty
    pub penalized_cells: usize,
    /// Penalised cells whose front candidate changed
    pub reassigned_cells: usize,
}

/// Penalty for each cell of a cluster sharing one candidate
///
/// `penalty(c) = scale * sum over c' != c of 1 / (d²(c, c') / normalization)`,
/// returned in the order of `cells`. Coincident cells contribute nothing.
pub fn cluster_penalties(cells: &[(usize, usize)], scale: f64, normalization: f64) -> Vec<f64> {
    cells
        .iter()
        .enumerate()
        .map(|(i, &cell)| {
            let force: f64 = cells
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &other)| normalized_squared_distance(cell, other, normalization))
                .filter(|&distance| distance > 0.0)
                .map(f64::recip)
                .sum();
            scale * force
        })
        .collect()
}

/// Apply one repulsion pass to `grid`
///
/// Clusters are taken from the fronts as they stand before any penalty, so
/// a candidate that reaches the front through re-seating is not penalised in
/// the same pass.
pub fn apply_repulsion(grid: &mut ScoreGrid, settings: &RepulsionSettings) -> RepulsionSummary {
    let mut summary = RepulsionSummary::default();
    if !settings.is_enabled() {
        return summary;
    }

    let x = grid.x_tiles() as f64;
    let y = grid.y_tiles() as f64;
    let normalization = x.mul_add(x, y * y);

    for (candidate, cells) in grid.clusters() {
        if cells.len() < settings.min_cluster {
            continue;
        }
        summary.penalized_clusters += 1;

        let penalties = cluster_penalties(&cells, settings.scale, normalization);
        for (&(cx, cy), penalty) in cells.iter().zip(penalties) {
            summary.penalized_cells += 1;
            if grid
                .penalize_front(cx, cy, penalty)
                .is_some_and(|front| front != candidate)
            {
                summary.reassigned_cells += 1;
            }
        }
    }

    log::debug!("{summary:?}");
    summary
}
