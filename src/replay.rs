//! Cursor over a materialized fill trace.
//!
//! A [`Replay`] is the data model behind stepping through the table fill at
//! any pace: reveal the next cell, jump to an arbitrary position, or start
//! over. It never sleeps or schedules anything; callers decide when to call
//! [`advance`](Replay::advance).

use crate::dims::DimensionSequence;
use crate::sequencer::{enumerate_steps, FillStep};
use crate::table::{CostTable, SplitTable};

/// Replay state: the full step list and how many steps are revealed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replay {
    n: usize,
    steps: Vec<FillStep>,
    position: usize,
}

impl Replay {
    pub fn new(dims: &DimensionSequence) -> Self {
        Self::from_steps(enumerate_steps(dims).collect())
    }

    /// Wrap an existing trace, e.g. the steps returned by
    /// [`ChainPlanner::plan_traced`](crate::ChainPlanner::plan_traced).
    ///
    /// The table size is taken from the widest cell in `steps`; an empty
    /// trace replays a single matrix.
    pub fn from_steps(steps: Vec<FillStep>) -> Self {
        let n = steps.iter().map(|s| s.j + 1).max().unwrap_or(1);
        Self {
            n,
            steps,
            position: 0,
        }
    }

    /// Total number of steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of revealed steps.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.position == self.steps.len()
    }

    /// Fraction of steps revealed, in `[0, 1]`. An empty trace is complete.
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            1.0
        } else {
            self.position as f64 / self.steps.len() as f64
        }
    }

    /// Reveal the next step and return it; `None` once finished.
    pub fn advance(&mut self) -> Option<&FillStep> {
        let step = self.steps.get(self.position)?;
        self.position += 1;
        Some(step)
    }

    /// Move the cursor so that exactly `position` steps are revealed.
    /// Positions past the end clamp to the end.
    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.steps.len());
    }

    pub fn restart(&mut self) {
        self.position = 0;
    }

    /// The most recently revealed step.
    pub fn current(&self) -> Option<&FillStep> {
        self.position.checked_sub(1).and_then(|idx| self.steps.get(idx))
    }

    /// Revealed steps, oldest first.
    pub fn revealed(&self) -> &[FillStep] {
        &self.steps[..self.position]
    }

    pub fn steps(&self) -> &[FillStep] {
        &self.steps
    }

    /// Cost table as of the current position: diagonal plus revealed cells.
    pub fn revealed_cost(&self) -> CostTable {
        let mut cost = CostTable::with_zero_diagonal(self.n);
        for step in self.revealed() {
            cost.set(step.i, step.j, step.result_cost);
        }
        cost
    }

    /// Split table as of the current position.
    pub fn revealed_split(&self) -> SplitTable {
        let mut split = SplitTable::empty(self.n);
        for step in self.revealed() {
            split.set(step.i, step.j, step.chosen_k);
        }
        split
    }
}

impl Iterator for Replay {
    type Item = FillStep;

    fn next(&mut self) -> Option<FillStep> {
        self.advance().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_order;

    fn replay(values: &[i64]) -> (DimensionSequence, Replay) {
        let dims = DimensionSequence::from_values(values.iter().copied()).unwrap();
        let replay = Replay::new(&dims);
        (dims, replay)
    }

    #[test]
    fn advance_reveals_one_cell_at_a_time() {
        let (_, mut r) = replay(&[10, 20, 30, 40]);
        assert_eq!(r.len(), 3);
        assert!(r.current().is_none());
        assert_eq!(r.revealed_cost().filled(), 3);

        let first = r.advance().map(|s| (s.i, s.j));
        assert_eq!(first, Some((0, 1)));
        assert_eq!(r.revealed_cost().get(0, 1), Some(6000));
        assert_eq!(r.revealed_cost().get(1, 2), None);

        r.advance();
        r.advance();
        assert!(r.is_finished());
        assert!(r.advance().is_none());
        assert_eq!(r.current().map(|s| s.result_cost), Some(18000));
    }

    #[test]
    fn finished_replay_matches_planner_tables() {
        let (dims, mut r) = replay(&[30, 35, 15, 5, 10, 20, 25]);
        r.seek(usize::MAX);
        assert!(r.is_finished());
        let (cost, split) = compute_order(&dims);
        assert_eq!(r.revealed_cost(), cost);
        assert_eq!(r.revealed_split(), split);
    }

    #[test]
    fn restart_and_seek() {
        let (_, mut r) = replay(&[30, 35, 15, 5, 10, 20, 25]);
        r.seek(10);
        let at_ten = r.revealed_cost();
        assert_eq!(r.progress(), 10.0 / 15.0);

        r.restart();
        assert_eq!(r.position(), 0);
        assert_eq!(r.revealed().len(), 0);

        for _ in 0..10 {
            r.advance();
        }
        assert_eq!(r.revealed_cost(), at_ten);
    }

    #[test]
    fn single_matrix_is_already_complete() {
        let (_, r) = replay(&[5, 10]);
        assert!(r.is_empty());
        assert!(r.is_finished());
        assert_eq!(r.progress(), 1.0);
    }

    #[test]
    fn from_steps_sizes_tables_to_the_trace() {
        let dims = DimensionSequence::from_values([10, 20, 30, 40]).unwrap();
        let (cost, split) = compute_order(&dims);
        let mut r = Replay::from_steps(enumerate_steps(&dims).collect());
        r.seek(r.len());
        assert_eq!(r.revealed_cost(), cost);
        assert_eq!(r.revealed_split(), split);

        let empty = Replay::from_steps(Vec::new());
        assert_eq!(empty.revealed_cost().dim(), 1);
        assert_eq!(empty.revealed_cost().get(0, 0), Some(0));
    }

    #[test]
    fn iterates_remaining_steps() {
        let (_, mut r) = replay(&[1, 2, 3, 4, 5]);
        r.advance();
        assert_eq!(r.by_ref().count(), 5);
        assert!(r.is_finished());
    }
}
