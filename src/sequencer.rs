//! Replayable fill trace of the matrix-chain recurrence.
//!
//! [`FillSteps`] walks the same cells, in the same order, as
//! [`compute_order`](crate::engine::compute_order) and yields one
//! [`FillStep`] per cell `(i, j)` with `i < j`. Each step carries every
//! candidate split that was compared, so a consumer can show *why* a cell got
//! its value, not only the value.
//!
//! The iterator keeps its own running cost table (diagonal pre-filled to 0)
//! and writes each step's result into it before yielding the step. Once
//! exhausted, that table is identical to the planner's.
//!
//! Pacing (immediate, throttled, paused) is entirely up to the consumer:
//! cloning the iterator saves a cursor, and calling [`enumerate_steps`] again
//! replays the identical sequence from the start.

use std::fmt;
use std::iter::FusedIterator;

use serde::Serialize;

use crate::dims::DimensionSequence;
use crate::engine::first_strict_minimum;
use crate::table::{Cost, CostTable, SplitTable};
use crate::traits::ChainCost;
use crate::utils::step_count;

/// One split point `k` considered while resolving a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate {
    pub k: usize,
    /// `cost[i][k]`
    pub left_cost: Cost,
    /// `cost[k+1][j]`
    pub right_cost: Cost,
    /// Cost of the final join, `p * q * r` of [`factors`](Self::factors).
    pub pair_cost: Cost,
    pub total_cost: Cost,
    /// `(rows of i, cols of k, cols of j)`.
    pub factors: [u64; 3],
}

/// Resolution of one table cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FillStep {
    pub i: usize,
    pub j: usize,
    /// Candidates in ascending `k`, one per `k in i..j`.
    pub candidates: Vec<Candidate>,
    pub chosen_k: usize,
    pub result_cost: Cost,
}

impl FillStep {
    /// Chain length `j - i + 1` of the resolved subchain.
    #[inline]
    pub fn chain_len(&self) -> usize {
        self.j - self.i + 1
    }

    /// The candidate that won.
    pub fn chosen(&self) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.k == self.chosen_k)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [p, q, r] = self.factors;
        write!(
            f,
            "k={}: {} + {} + {}×{}×{} = {}",
            self.k, self.left_cost, self.right_cost, p, q, r, self.total_cost
        )
    }
}

impl fmt::Display for FillStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cost[{}][{}]", self.i, self.j)?;
        for c in &self.candidates {
            let marker = if c.k == self.chosen_k { '*' } else { ' ' };
            writeln!(f, "  {marker} {c}")?;
        }
        write!(f, "  -> k={}, cost={}", self.chosen_k, self.result_cost)
    }
}

/// Lazy, restartable sequence of [`FillStep`]s for one chain.
pub struct FillSteps<'a, C: ChainCost + ?Sized> {
    chain: &'a C,
    cost: CostTable,
    next_cell: Option<(usize, usize)>,
    emitted: usize,
    total: usize,
}

/// Fill trace for a dimension sequence.
///
/// ```
/// use chain_dp::{dims::DimensionSequence, sequencer::enumerate_steps};
///
/// let dims = DimensionSequence::from_values([10, 30, 5, 60]).unwrap();
/// let steps: Vec<_> = enumerate_steps(&dims).collect();
/// assert_eq!(steps.len(), 3);
/// assert_eq!((steps[2].i, steps[2].j), (0, 2));
/// assert_eq!(steps[2].result_cost, 4500);
/// ```
pub fn enumerate_steps(dims: &DimensionSequence) -> FillSteps<'_, DimensionSequence> {
    FillSteps::new(dims)
}

impl<'a, C: ChainCost + ?Sized> FillSteps<'a, C> {
    pub fn new(chain: &'a C) -> Self {
        let n = chain.num_matrices();
        Self {
            chain,
            cost: CostTable::with_zero_diagonal(n),
            next_cell: (n >= 2).then_some((0, 1)),
            emitted: 0,
            total: step_count(n),
        }
    }

    /// The running cost table: diagonal plus every cell emitted so far.
    pub fn cost_table(&self) -> &CostTable {
        &self.cost
    }

    pub fn into_cost_table(self) -> CostTable {
        self.cost
    }

    /// Number of steps already yielded.
    #[inline]
    pub fn position(&self) -> usize {
        self.emitted
    }

    /// Total number of steps, `n(n-1)/2`.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Drain the remaining steps, returning them with the final tables.
    ///
    /// The split table only covers the steps drained here; call it on a fresh
    /// iterator for a complete trace.
    pub fn into_trace(mut self) -> Trace {
        let n = self.cost.dim();
        let mut split = SplitTable::empty(n);
        let mut steps = Vec::with_capacity(self.total - self.emitted);
        for step in self.by_ref() {
            split.set(step.i, step.j, step.chosen_k);
            steps.push(step);
        }
        Trace {
            steps,
            cost: self.cost,
            split,
        }
    }

    fn resolve(&mut self, i: usize, j: usize) -> FillStep {
        let candidates: Vec<Candidate> = (i..j)
            .map(|k| {
                let left_cost = self.cost.resolved(i, k);
                let right_cost = self.cost.resolved(k + 1, j);
                let pair_cost = self.chain.pair_cost(i, k, j);
                Candidate {
                    k,
                    left_cost,
                    right_cost,
                    pair_cost,
                    total_cost: left_cost.saturating_add(right_cost).saturating_add(pair_cost),
                    factors: self.chain.pair_factors(i, k, j),
                }
            })
            .collect();

        let (result_cost, chosen_k) =
            first_strict_minimum(i, candidates.iter().map(|c| (c.k, c.total_cost)));
        self.cost.set(i, j, result_cost);

        #[cfg(feature = "tracing")]
        tracing::trace!(i, j, k = chosen_k, cost = result_cost, "emitted fill step");

        FillStep {
            i,
            j,
            candidates,
            chosen_k,
            result_cost,
        }
    }
}

/// Cell after `(i, j)` in dependency order, if any.
fn advance(n: usize, (i, j): (usize, usize)) -> Option<(usize, usize)> {
    let len = j - i + 1;
    if j + 1 < n {
        Some((i + 1, j + 1))
    } else if len < n {
        Some((0, len))
    } else {
        None
    }
}

impl<C: ChainCost + ?Sized> Iterator for FillSteps<'_, C> {
    type Item = FillStep;

    fn next(&mut self) -> Option<FillStep> {
        let (i, j) = self.next_cell?;
        let step = self.resolve(i, j);
        self.next_cell = advance(self.cost.dim(), (i, j));
        self.emitted += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.emitted;
        (left, Some(left))
    }
}

impl<C: ChainCost + ?Sized> ExactSizeIterator for FillSteps<'_, C> {}

impl<C: ChainCost + ?Sized> FusedIterator for FillSteps<'_, C> {}

impl<C: ChainCost + ?Sized> Clone for FillSteps<'_, C> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain,
            cost: self.cost.clone(),
            next_cell: self.next_cell,
            emitted: self.emitted,
            total: self.total,
        }
    }
}

impl<C: ChainCost + ?Sized> fmt::Debug for FillSteps<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillSteps")
            .field("next_cell", &self.next_cell)
            .field("emitted", &self.emitted)
            .field("total", &self.total)
            .finish()
    }
}

/// A fully drained fill trace with the tables it produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Trace {
    pub steps: Vec<FillStep>,
    pub cost: CostTable,
    pub split: SplitTable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_order;

    fn dims(values: &[i64]) -> DimensionSequence {
        DimensionSequence::from_values(values.iter().copied()).unwrap()
    }

    #[test]
    fn emits_cells_in_dependency_order() {
        let d = dims(&[30, 35, 15, 5, 10, 20, 25]);
        let cells: Vec<_> = enumerate_steps(&d).map(|s| (s.i, s.j)).collect();
        let expected: Vec<_> = crate::utils::fill_order(6).collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn single_matrix_has_no_steps() {
        let d = dims(&[5, 10]);
        let mut steps = enumerate_steps(&d);
        assert_eq!(steps.len(), 0);
        assert!(steps.next().is_none());
        assert_eq!(steps.cost_table().get(0, 0), Some(0));
    }

    #[test]
    fn candidates_show_full_comparison() {
        let d = dims(&[10, 20, 30, 40]);
        let last = enumerate_steps(&d).last().unwrap();
        assert_eq!((last.i, last.j), (0, 2));
        assert_eq!(
            last.candidates,
            vec![
                Candidate {
                    k: 0,
                    left_cost: 0,
                    right_cost: 24000,
                    pair_cost: 8000,
                    total_cost: 32000,
                    factors: [10, 20, 40],
                },
                Candidate {
                    k: 1,
                    left_cost: 6000,
                    right_cost: 0,
                    pair_cost: 12000,
                    total_cost: 18000,
                    factors: [10, 30, 40],
                },
            ]
        );
        assert_eq!(last.chosen_k, 1);
        assert_eq!(last.result_cost, 18000);
        assert_eq!(last.chosen().map(|c| c.total_cost), Some(18000));
        assert_eq!(last.chain_len(), 3);
    }

    #[test]
    fn running_table_matches_planner() {
        let d = dims(&[5, 10, 3, 12, 5, 50, 6]);
        let (cost, split) = compute_order(&d);
        let trace = enumerate_steps(&d).into_trace();
        assert_eq!(trace.cost, cost);
        assert_eq!(trace.split, split);
        assert_eq!(trace.steps.len(), 15);
    }

    #[test]
    fn exact_size_counts_down() {
        let d = dims(&[1, 2, 3, 4, 5]);
        let mut steps = enumerate_steps(&d);
        assert_eq!(steps.len(), 6);
        steps.next();
        steps.next();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps.position(), 2);
        assert_eq!(steps.total(), 6);
    }

    #[test]
    fn clone_is_a_saved_cursor() {
        let d = dims(&[30, 35, 15, 5, 10, 20, 25]);
        let mut steps = enumerate_steps(&d);
        for _ in 0..7 {
            steps.next();
        }
        let saved = steps.clone();
        let rest: Vec<_> = steps.collect();
        let replayed: Vec<_> = saved.collect();
        assert_eq!(rest, replayed);

        let full: Vec<_> = enumerate_steps(&d).collect();
        assert_eq!(&full[7..], rest.as_slice());
    }

    #[test]
    fn tie_break_matches_planner() {
        let d = dims(&[2, 2, 2, 2]);
        let last = enumerate_steps(&d).last().unwrap();
        assert_eq!(last.candidates[0].total_cost, last.candidates[1].total_cost);
        assert_eq!(last.chosen_k, 0);
    }

    #[test]
    fn wide_candidates_are_not_clamped() {
        let m = crate::dims::MAX_DIMENSION as i64;
        let d = dims(&[1, m, m, 2]);
        let last = enumerate_steps(&d).last().unwrap();
        let m = Cost::from(crate::dims::MAX_DIMENSION);
        assert_eq!(last.candidates[0].total_cost, 2 * m * m + 2 * m);
        assert_eq!(last.candidates[1].total_cost, m * m + 2 * m);
        assert_eq!(last.chosen_k, 1);
        assert_eq!(last.result_cost, Cost::from(u64::MAX));
    }

    #[test]
    fn display_marks_chosen_candidate() {
        let d = dims(&[10, 30, 5, 60]);
        let last = enumerate_steps(&d).last().unwrap();
        let text = last.to_string();
        assert!(text.starts_with("cost[0][2]"));
        assert!(text.contains("* k=1: 1500 + 0 + 10×5×60 = 4500"));
        assert!(text.ends_with("-> k=1, cost=4500"));
    }
}
