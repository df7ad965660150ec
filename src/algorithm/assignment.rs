//! One-to-one placement when a candidate may be used only once
//!
//! Cells are visited in row-major order. For an empty cell the best unused
//! candidate is found, then that candidate is placed wherever *it* fits best
//! among the empty cells, which may be elsewhere. The visited cell is retried
//! until something lands on it.

use crate::algorithm::scoring::ScoreMatrix;
use crate::algorithm::selection::{ScoreGrid, Selection};
use crate::io::error::{MosaicError, Result, computation_error};
use bitvec::prelude::{BitVec, bitvec};
use ndarray::Array2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::cmp::Ordering;

/// Fail unless the pool can cover every tile without repeats
///
/// # Errors
///
/// Returns [`MosaicError::InsufficientCandidates`] if `available < required`
pub const fn check_unique_feasibility(available: usize, required: usize) -> Result<()> {
    if available < required {
        return Err(MosaicError::InsufficientCandidates {
            available,
            required,
        });
    }
    Ok(())
}

/// Assign every cell a distinct candidate
///
/// Ties between equally good empty cells are broken with an RNG seeded from
/// `seed`, so one seed always yields the same mosaic.
///
/// # Errors
///
/// Returns an error if there are fewer candidates than cells or a cell has
/// no finite cost for any unused candidate
pub fn assign_unique(matrix: &ScoreMatrix, seed: u64) -> Result<Selection> {
    let shape = matrix.shape();
    let (rows, cols) = shape;
    check_unique_feasibility(matrix.candidate_count(), rows * cols)?;

    let grid = ScoreGrid::build(matrix);
    let mut used = bitvec![0; matrix.candidate_count()];
    let mut assigned: Array2<Option<usize>> = Array2::from_elem(shape, None);
    let mut rng = StdRng::seed_from_u64(seed);

    for y in 0..rows {
        for x in 0..cols {
            while assigned.get([y, x]).is_some_and(Option::is_none) {
                let candidate = best_unused(&grid, x, y, &used).ok_or_else(|| {
                    computation_error(
                        "unique assignment",
                        &format!("no unused candidate left for cell ({x}, {y})"),
                    )
                })?;

                let (bx, by) = best_free_cell(matrix, candidate, &assigned, &mut rng)
                    .ok_or_else(|| {
                        computation_error(
                            "unique assignment",
                            &format!("candidate {candidate} has no comparable cost"),
                        )
                    })?;

                if let Some(slot) = assigned.get_mut([by, bx]) {
                    *slot = Some(candidate);
                }
                used.set(candidate, true);
            }
        }
    }

    let mut choices = Array2::<usize>::zeros(shape);
    for ((y, x), choice) in choices.indexed_iter_mut() {
        *choice = assigned
            .get([y, x])
            .copied()
            .flatten()
            .ok_or_else(|| computation_error("unique assignment", &"cell left unassigned"))?;
    }
    Ok(Selection::from_choices(choices))
}

/// Cheapest candidate for `(x, y)` not yet placed anywhere
fn best_unused(grid: &ScoreGrid, x: usize, y: usize, used: &BitVec) -> Option<usize> {
    grid.row(x, y)?
        .iter()
        .find(|entry| used.get(entry.candidate).as_deref() != Some(&true))
        .map(|entry| entry.candidate)
}

/// Empty cell where `candidate` costs least, ties chosen at random
fn best_free_cell<R: Rng>(
    matrix: &ScoreMatrix,
    candidate: usize,
    assigned: &Array2<Option<usize>>,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let costs = matrix.candidate_costs(candidate)?;
    let mut best = f64::INFINITY;
    let mut ties = Vec::new();

    for ((y, x), &cost) in costs.indexed_iter() {
        if assigned.get([y, x]).is_some_and(Option::is_some) {
            continue;
        }
        match cost.total_cmp(&best) {
            Ordering::Less => {
                best = cost;
                ties.clear();
                ties.push((x, y));
            }
            Ordering::Equal => ties.push((x, y)),
            Ordering::Greater => {}
        }
    }

    ties.choose(rng).copied()
}
