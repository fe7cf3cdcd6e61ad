//! Matrix-chain ordering with a replayable fill trace.
//!
//! This crate computes the parenthesization of a matrix chain that minimizes
//! the number of scalar multiplications, using the classical O(n³) interval
//! dynamic program, and exposes the exact order in which the DP table is
//! filled so callers can replay it (visualization, logging, testing).
//!
//! ## Core idea
//! 1. Validate a [`DimensionSequence`] (`n + 1` positive integers for `n`
//!    matrices).
//! 2. Let [`ChainPlanner`] fill the cost and split tables and reconstruct the
//!    optimal expression.
//! 3. Optionally walk the same recurrence as a lazy sequence of
//!    [`FillStep`]s, each listing every candidate split it compared, or drive a
//!    [`Replay`] cursor over it.
//!
//! The planner and the sequencer share one tie-break (first strict minimum in
//! ascending split order), so the trace always rebuilds the planner's tables
//! exactly.
//!
//! ## Quick start
//! ```
//! use chain_dp::{ChainPlanner, DimensionSequence};
//!
//! let dims: DimensionSequence = "10, 20, 30, 40".parse().unwrap();
//! let plan = ChainPlanner::new().plan_dims(&dims);
//! assert_eq!(plan.min_cost(), 18000);
//! assert_eq!(plan.expression(), "((A1 × A2) × A3)");
//!
//! let steps: Vec<_> = plan.steps().collect();
//! assert_eq!(steps.len(), 3);
//! assert_eq!(steps[2].chosen_k, 1);
//! ```
//!
//! ## Cargo features
//! - `parallel`: resolve each anti-diagonal of the table with rayon.
//! - `tracing`: spans and events for planning and step emission.
//! - `heavy`: long-running stress tests.

pub mod builder;
pub mod dims;
pub mod engine;
pub mod error;
pub mod planner;
pub mod presets;
pub mod replay;
pub mod sequencer;
pub mod table;
pub mod traits;
pub mod utils;

pub use crate::builder::ChainPlannerBuilder;
pub use crate::dims::{derive_matrices, validate, DimensionSequence, Matrix, MAX_DIMENSION};
pub use crate::engine::{compute_order, reconstruct};
pub use crate::error::ValidationError;
pub use crate::planner::{plan, ChainPlan, ChainPlanner, ParenthesizationResult};
pub use crate::presets::Preset;
pub use crate::replay::Replay;
pub use crate::sequencer::{enumerate_steps, Candidate, FillStep, FillSteps};
pub use crate::table::{Cost, CostTable, SplitTable, Table};
pub use crate::traits::ChainCost;
