//! The single entry point for planning a chain.
//!
//! [`ChainPlanner`] runs validate → derive matrices → fill tables →
//! reconstruct, and packages everything a presentation layer needs into a
//! [`ChainPlan`].

use serde::Serialize;

use crate::builder::ChainPlannerBuilder;
use crate::dims::{derive_matrices, validate, DimensionSequence, Matrix};
use crate::engine::{fill_tables, reconstruct_with, split_decisions, Notation, SplitDecision};
use crate::error::ValidationError;
use crate::sequencer::{FillStep, FillSteps};
use crate::table::{Cost, CostTable, SplitTable};
use crate::utils::DEFAULT_PARALLEL_THRESHOLD;

/// Minimum cost and the parenthesization achieving it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ParenthesizationResult {
    pub min_cost: Cost,
    pub expression: String,
}

/// Everything computed for one dimension sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChainPlan {
    pub dims: DimensionSequence,
    pub matrices: Vec<Matrix>,
    pub cost: CostTable,
    pub split: SplitTable,
    pub result: ParenthesizationResult,
}

impl ChainPlan {
    #[inline]
    pub fn min_cost(&self) -> Cost {
        self.result.min_cost
    }

    #[inline]
    pub fn expression(&self) -> &str {
        &self.result.expression
    }

    /// Number of matrices.
    #[inline]
    pub fn num_matrices(&self) -> usize {
        self.matrices.len()
    }

    /// Split decisions of the optimal tree, root first.
    pub fn split_decisions(&self) -> Vec<SplitDecision> {
        split_decisions(&self.split, 0, self.num_matrices() - 1)
    }

    /// A fresh fill trace over the same chain.
    pub fn steps(&self) -> FillSteps<'_, DimensionSequence> {
        FillSteps::new(&self.dims)
    }
}

/// Matrix-chain planner.
///
/// ```
/// use chain_dp::ChainPlanner;
///
/// let plan = ChainPlanner::new().plan(["10", "30", "5", "60"]).unwrap();
/// assert_eq!(plan.min_cost(), 4500);
/// assert_eq!(plan.expression(), "((A1 × A2) × A3)");
/// ```
#[derive(Clone, Debug)]
pub struct ChainPlanner {
    notation: Notation,
    parallel_threshold: usize,
}

impl Default for ChainPlanner {
    fn default() -> Self {
        Self::with_config(Notation::default(), DEFAULT_PARALLEL_THRESHOLD)
    }
}

impl ChainPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ChainPlannerBuilder {
        ChainPlannerBuilder::new()
    }

    pub(crate) fn with_config(notation: Notation, parallel_threshold: usize) -> Self {
        Self {
            notation,
            parallel_threshold,
        }
    }

    pub fn notation(&self) -> &Notation {
        &self.notation
    }

    /// Minimum chain length for the rayon path (only used with the `parallel`
    /// feature).
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Validate raw tokens and plan the chain they describe.
    ///
    /// Nothing is computed if validation fails.
    pub fn plan<I, T>(&self, raw: I) -> Result<ChainPlan, ValidationError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let dims = validate(raw)?;
        Ok(self.plan_dims(&dims))
    }

    /// Plan an already-validated sequence. Infallible.
    pub fn plan_dims(&self, dims: &DimensionSequence) -> ChainPlan {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("plan", n = dims.num_matrices());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let matrices = derive_matrices(dims);
        let (cost, split) = fill_tables(dims, self.parallel_threshold);
        self.assemble(dims, matrices, cost, split)
    }

    /// Plan and record the fill trace in a single pass of the recurrence.
    ///
    /// The returned tables are the ones the trace built; they are identical
    /// to what [`plan_dims`](Self::plan_dims) computes.
    pub fn plan_traced(&self, dims: &DimensionSequence) -> (ChainPlan, Vec<FillStep>) {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("plan_traced", n = dims.num_matrices());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let matrices = derive_matrices(dims);
        let trace = FillSteps::new(dims).into_trace();
        let plan = self.assemble(dims, matrices, trace.cost, trace.split);
        (plan, trace.steps)
    }

    fn assemble(
        &self,
        dims: &DimensionSequence,
        matrices: Vec<Matrix>,
        cost: CostTable,
        split: SplitTable,
    ) -> ChainPlan {
        let last = dims.num_matrices() - 1;
        let min_cost = cost.get(0, last).unwrap_or(0);
        let expression = reconstruct_with(&split, 0, last, &self.notation);

        #[cfg(feature = "tracing")]
        tracing::info!(min_cost, %expression, "planned chain");

        ChainPlan {
            dims: dims.clone(),
            matrices,
            cost,
            split,
            result: ParenthesizationResult {
                min_cost,
                expression,
            },
        }
    }
}

/// Plan a comma-separated dimension list with the default planner.
pub fn plan(input: &str) -> Result<ChainPlan, ValidationError> {
    let dims = DimensionSequence::parse(input)?;
    Ok(ChainPlanner::new().plan_dims(&dims))
}
