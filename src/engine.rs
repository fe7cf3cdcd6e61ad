//! The interval DP for matrix-chain ordering.
//!
//! This module implements the classical three-loop recurrence:
//! 1. For each chain length `len = 2..=n` (an anti-diagonal of the table),
//! 2. for each start `i = 0..=n-len` with `j = i + len - 1`,
//! 3. take the first strict minimum over `k in i..j` of
//!    `cost[i][k] + cost[k+1][j] + pair_cost(i, k, j)`.
//!
//! Cells of one anti-diagonal only read strictly shorter subchains, so with the
//! `parallel` feature a whole diagonal is resolved with rayon and written back
//! afterwards. Both paths produce identical tables.
//!
//! The engine is generic over [`ChainCost`], so the same code runs over a
//! [`DimensionSequence`](crate::dims::DimensionSequence) or a slice of
//! [`Matrix`](crate::dims::Matrix).

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::table::{Cost, CostTable, SplitTable};
use crate::traits::ChainCost;
use crate::utils::DEFAULT_PARALLEL_THRESHOLD;

/// How matrices and products are rendered in an expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notation {
    /// Prefix of the 1-based matrix label, `A` gives `A1, A2, ...`.
    pub label_prefix: String,
    /// Infix placed between the two halves of a product.
    pub operator: String,
}

impl Default for Notation {
    fn default() -> Self {
        Self {
            label_prefix: "A".to_string(),
            operator: " × ".to_string(),
        }
    }
}

/// One split along the optimal tree: `i..=j` is computed as
/// `(i..=k) x (k+1..=j)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SplitDecision {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

/// Fill the cost and split tables for `chain`.
///
/// `cost[i][i] = 0`; `cost[i][j]` and `split[i][j]` are defined for every
/// `i < j`; cells below the diagonal stay undefined. Ties between split points
/// resolve to the smallest `k`.
pub fn compute_order<C: ChainCost + ?Sized>(chain: &C) -> (CostTable, SplitTable) {
    fill_tables(chain, DEFAULT_PARALLEL_THRESHOLD)
}

pub(crate) fn fill_tables<C: ChainCost + ?Sized>(
    chain: &C,
    parallel_threshold: usize,
) -> (CostTable, SplitTable) {
    let n = chain.num_matrices();
    let mut cost = CostTable::with_zero_diagonal(n);
    let mut split = SplitTable::empty(n);

    for len in 2..=n {
        #[cfg(feature = "tracing")]
        let span = tracing::trace_span!("fill_length", len);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();
        fill_length(chain, &mut cost, &mut split, len, parallel_threshold);
    }

    (cost, split)
}

#[cfg(not(feature = "parallel"))]
fn fill_length<C: ChainCost + ?Sized>(
    chain: &C,
    cost: &mut CostTable,
    split: &mut SplitTable,
    len: usize,
    _parallel_threshold: usize,
) {
    fill_length_sequential(chain, cost, split, len);
}

#[cfg(feature = "parallel")]
fn fill_length<C: ChainCost + ?Sized>(
    chain: &C,
    cost: &mut CostTable,
    split: &mut SplitTable,
    len: usize,
    parallel_threshold: usize,
) {
    let n = cost.dim();
    if n < parallel_threshold {
        fill_length_sequential(chain, cost, split, len);
        return;
    }

    let table: &CostTable = cost;
    let resolved: Vec<(Cost, usize)> = (0..=n - len)
        .into_par_iter()
        .map(|i| resolve_cell(chain, table, i, i + len - 1))
        .collect();

    for (i, (best, k)) in resolved.into_iter().enumerate() {
        record(cost, split, i, i + len - 1, best, k);
    }
}

fn fill_length_sequential<C: ChainCost + ?Sized>(
    chain: &C,
    cost: &mut CostTable,
    split: &mut SplitTable,
    len: usize,
) {
    let n = cost.dim();
    for i in 0..=n - len {
        let j = i + len - 1;
        let (best, k) = resolve_cell(chain, cost, i, j);
        record(cost, split, i, j, best, k);
    }
}

#[inline]
fn record(
    cost: &mut CostTable,
    split: &mut SplitTable,
    i: usize,
    j: usize,
    best: Cost,
    k: usize,
) {
    #[cfg(feature = "tracing")]
    tracing::trace!(i, j, k, cost = best, "resolved cell");
    cost.set(i, j, best);
    split.set(i, j, k);
}

/// Resolve `(i, j)` against a table whose shorter subchains are filled.
/// Returns `(minimum cost, split point)`.
#[inline]
pub(crate) fn resolve_cell<C: ChainCost + ?Sized>(
    chain: &C,
    cost: &CostTable,
    i: usize,
    j: usize,
) -> (Cost, usize) {
    first_strict_minimum(i, (i..j).map(|k| (k, candidate_total(chain, cost, i, k, j))))
}

/// `cost[i][k] + cost[k+1][j] + pair_cost(i, k, j)`, saturating.
#[inline]
pub(crate) fn candidate_total<C: ChainCost + ?Sized>(
    chain: &C,
    cost: &CostTable,
    i: usize,
    k: usize,
    j: usize,
) -> Cost {
    cost.resolved(i, k)
        .saturating_add(cost.resolved(k + 1, j))
        .saturating_add(chain.pair_cost(i, k, j))
}

/// Tie-break shared by the planner and the step sequencer: the first `k`
/// (in iteration order) whose total is strictly below every earlier total.
///
/// If no candidate beats `Cost::MAX`, the result is `(Cost::MAX, default_k)`.
pub(crate) fn first_strict_minimum<I>(default_k: usize, candidates: I) -> (Cost, usize)
where
    I: IntoIterator<Item = (usize, Cost)>,
{
    let mut best = Cost::MAX;
    let mut best_k = default_k;
    for (k, total) in candidates {
        if total < best {
            best = total;
            best_k = k;
        }
    }
    (best, best_k)
}

/// Fully parenthesized product for `i..=j` with the default notation
/// (`A1`, `A2`, ... joined by ` × `).
///
/// ```
/// use chain_dp::{dims::DimensionSequence, engine::{compute_order, reconstruct}};
///
/// let dims = DimensionSequence::from_values([10, 30, 5, 60]).unwrap();
/// let (_cost, split) = compute_order(&dims);
/// assert_eq!(reconstruct(&split, 0, 2), "((A1 × A2) × A3)");
/// ```
pub fn reconstruct(split: &SplitTable, i: usize, j: usize) -> String {
    reconstruct_with(split, i, j, &Notation::default())
}

/// [`reconstruct`] with a custom [`Notation`].
pub fn reconstruct_with(split: &SplitTable, i: usize, j: usize, notation: &Notation) -> String {
    let mut out = String::new();
    write_expression(&mut out, split, i, j, notation);
    out
}

// Recursion depth is bounded by the number of matrices.
fn write_expression(out: &mut String, split: &SplitTable, i: usize, j: usize, notation: &Notation) {
    debug_assert!(i <= j, "reconstruct called on empty range ({i},{j})");
    if i >= j {
        out.push_str(&notation.label_prefix);
        out.push_str(&(i + 1).to_string());
        return;
    }
    debug_assert!(split.get(i, j).is_some(), "split ({i},{j}) unresolved");
    let k = split.get(i, j).unwrap_or(i);
    out.push('(');
    write_expression(out, split, i, k, notation);
    out.push_str(&notation.operator);
    write_expression(out, split, k + 1, j, notation);
    out.push(')');
}

/// Split decisions of the optimal tree for `i..=j`, root first (pre-order).
pub fn split_decisions(split: &SplitTable, i: usize, j: usize) -> Vec<SplitDecision> {
    fn collect(states: &mut Vec<SplitDecision>, split: &SplitTable, i: usize, j: usize) {
        if i >= j {
            return;
        }
        let k = split.get(i, j).unwrap_or(i);
        states.push(SplitDecision { i, j, k });
        collect(states, split, i, k);
        collect(states, split, k + 1, j);
    }

    let mut states = Vec::with_capacity(j.saturating_sub(i));
    collect(&mut states, split, i, j);
    states
}
