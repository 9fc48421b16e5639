// Maximum-weight capacitated bipartite assignment.
//
// Items (players) on one side, slot kinds with a capacity on the other. Each
// item goes to at most one eligible slot kind, each kind takes at most its
// capacity, and the sum of assigned item weights is maximized. Weights are
// integers so optimal objectives compare exactly.

use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;

use crate::error::{CoreError, Result};

/// One instance of the assignment problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentProblem {
    /// Weight of each item.
    pub weights: Vec<i64>,
    /// Slot-kind indexes each item may be assigned to.
    pub eligible: Vec<Vec<usize>>,
    /// Capacity of each slot kind.
    pub capacities: Vec<usize>,
}

/// A solution: `(item, slot_kind)` pairs and their total weight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    pub pairs: Vec<(usize, usize)>,
    pub objective: i64,
}

/// Exact solver for [`AssignmentProblem`]. Implementations must return a
/// globally optimal assignment or an error, never a heuristic answer.
pub trait AssignmentSolver: Send + Sync {
    fn solve(&self, problem: &AssignmentProblem) -> Result<Assignment>;
}

impl AssignmentProblem {
    /// Check that `assignment` satisfies every constraint and that its
    /// reported objective is the sum of its pair weights.
    pub fn certify(&self, assignment: &Assignment) -> Result<()> {
        let mut used_items = vec![false; self.weights.len()];
        let mut used_slots = vec![0usize; self.capacities.len()];
        let mut objective = 0i64;

        for &(item, slot) in &assignment.pairs {
            let Some(eligible) = self.eligible.get(item) else {
                return Err(CoreError::Solver(format!("item {item} does not exist")));
            };
            if slot >= self.capacities.len() || !eligible.contains(&slot) {
                return Err(CoreError::Solver(format!(
                    "item {item} placed in ineligible slot {slot}"
                )));
            }
            if std::mem::replace(&mut used_items[item], true) {
                return Err(CoreError::Solver(format!("item {item} assigned twice")));
            }
            used_slots[slot] += 1;
            if used_slots[slot] > self.capacities[slot] {
                return Err(CoreError::Solver(format!(
                    "slot {slot} over capacity {}",
                    self.capacities[slot]
                )));
            }
            objective += self.weights[item];
        }

        if objective != assignment.objective {
            return Err(CoreError::Solver(format!(
                "reported objective {} but pairs sum to {objective}",
                assignment.objective
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Hungarian (Kuhn-Munkres) reduction
// ---------------------------------------------------------------------------

/// Solves the capacitated problem as a rectangular Kuhn-Munkres assignment.
///
/// Each slot kind is expanded into `capacity` unit rows. Columns are the
/// items followed by one zero-weight "leave empty" column per row, so every
/// row always has a legal choice. Ineligible (row, item) cells carry a
/// penalty larger than the sum of all item weights, which keeps them out of
/// any optimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl AssignmentSolver for HungarianSolver {
    fn solve(&self, problem: &AssignmentProblem) -> Result<Assignment> {
        let unit_slots: Vec<usize> = problem
            .capacities
            .iter()
            .enumerate()
            .flat_map(|(slot, &cap)| std::iter::repeat(slot).take(cap))
            .collect();
        if unit_slots.is_empty() {
            return Ok(Assignment::default());
        }

        let items = problem.weights.len();
        let mut allowed = vec![vec![false; problem.capacities.len()]; items];
        for (item, slots) in problem.eligible.iter().enumerate() {
            for &slot in slots {
                allowed[item][slot] = true;
            }
        }

        let penalty = -(problem.weights.iter().map(|w| w.abs()).sum::<i64>() + 1);
        let rows = unit_slots.len();
        let weights = Matrix::from_fn(rows, items + rows, |(row, col)| {
            if col >= items {
                0
            } else if allowed[col][unit_slots[row]] {
                problem.weights[col]
            } else {
                penalty
            }
        });

        let (total, columns) = kuhn_munkres(&weights);

        let pairs: Vec<(usize, usize)> = columns
            .iter()
            .enumerate()
            .filter(|&(_, &col)| col < items)
            .map(|(row, &col)| (col, unit_slots[row]))
            .collect();
        let assignment = Assignment {
            objective: total,
            pairs,
        };
        problem.certify(&assignment)?;
        Ok(assignment)
    }
}
