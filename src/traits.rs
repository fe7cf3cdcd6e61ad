//! Core trait for matrix-chain recurrences.
//!
//! The planner and the step sequencer only ever ask two questions of a chain:
//! how many matrices it has, and what multiplying the product of `i..=k` by
//! the product of `k+1..=j` costs. [`ChainCost`] captures exactly that, so the
//! same recurrence runs over either representation of a chain:
//! - a [`DimensionSequence`], indexing `p[i] * p[k+1] * p[j+1]`, or
//! - a slice of [`Matrix`], indexing `rows[i] * cols[k] * cols[j]`.
//!
//! Both forms are algebraically identical for a well-formed chain; the test
//! suite checks that they also produce identical tables.

use crate::dims::{DimensionSequence, Matrix};
use crate::table::Cost;

/// A chain whose interval products can be costed.
///
/// Semantics:
/// - Matrices are indexed `0..num_matrices()`.
/// - `pair_factors(i, k, j)` returns `(rows of i, cols of k, cols of j)`,
///   i.e. the shape of the single multiplication that joins the product of
///   `i..=k` with the product of `k+1..=j`.
/// - `pair_cost` is the scalar-multiplication count of that join.
///
/// Implementations must be pure: the same arguments always give the same
/// result. `Sync` is required so the `parallel` feature can share a chain
/// across worker threads.
pub trait ChainCost: Sync {
    /// Number of matrices `n`.
    fn num_matrices(&self) -> usize;

    /// `(p, q, r)` for joining a `p x q` product with a `q x r` product.
    ///
    /// Callers guarantee `i <= k < j < num_matrices()`.
    fn pair_factors(&self, i: usize, k: usize, j: usize) -> [u64; 3];

    /// Scalar multiplications for the join.
    ///
    /// Exact for validated dimensions; hand-built [`Matrix`] slices with
    /// larger sides saturate at `Cost::MAX`.
    #[inline]
    fn pair_cost(&self, i: usize, k: usize, j: usize) -> Cost {
        let [p, q, r] = self.pair_factors(i, k, j);
        Cost::from(p)
            .saturating_mul(Cost::from(q))
            .saturating_mul(Cost::from(r))
    }
}

impl ChainCost for DimensionSequence {
    #[inline]
    fn num_matrices(&self) -> usize {
        DimensionSequence::num_matrices(self)
    }

    #[inline]
    fn pair_factors(&self, i: usize, k: usize, j: usize) -> [u64; 3] {
        [self[i], self[k + 1], self[j + 1]]
    }
}

impl ChainCost for [Matrix] {
    #[inline]
    fn num_matrices(&self) -> usize {
        self.len()
    }

    #[inline]
    fn pair_factors(&self, i: usize, k: usize, j: usize) -> [u64; 3] {
        [self[i].rows, self[k].cols, self[j].cols]
    }
}

impl<C: ChainCost + ?Sized> ChainCost for &C {
    #[inline]
    fn num_matrices(&self) -> usize {
        (**self).num_matrices()
    }

    #[inline]
    fn pair_factors(&self, i: usize, k: usize, j: usize) -> [u64; 3] {
        (**self).pair_factors(i, k, j)
    }
}

#[cfg(test)]
mod tests {
    use super::ChainCost;
    use crate::dims::{DimensionSequence, Matrix, MAX_DIMENSION};
    use crate::table::Cost;

    #[test]
    fn both_forms_agree_on_every_triple() {
        let dims = DimensionSequence::from_values([30, 35, 15, 5, 10, 20, 25]).unwrap();
        let matrices = dims.matrices();
        let n = dims.num_matrices();
        assert_eq!(matrices.as_slice().num_matrices(), n);
        for i in 0..n {
            for j in i + 1..n {
                for k in i..j {
                    assert_eq!(
                        ChainCost::pair_factors(&dims, i, k, j),
                        matrices.as_slice().pair_factors(i, k, j),
                        "factors differ at ({i},{k},{j})"
                    );
                }
            }
        }
    }

    #[test]
    fn pair_cost_is_exact_at_the_dimension_limit() {
        let max = MAX_DIMENSION as i64;
        let dims = DimensionSequence::from_values([max, max, max]).unwrap();
        let m = Cost::from(MAX_DIMENSION);
        assert_eq!(ChainCost::pair_cost(&dims, 0, 0, 1), m * m * m);
    }

    #[test]
    fn oversized_matrices_saturate() {
        let matrices = [
            Matrix {
                index: 0,
                rows: u64::MAX,
                cols: u64::MAX,
            },
            Matrix {
                index: 1,
                rows: u64::MAX,
                cols: u64::MAX,
            },
        ];
        assert_eq!(matrices.as_slice().pair_cost(0, 0, 1), Cost::MAX);
    }
}
