//! Example: plan the CLRS matrix chain.
//!
//! Run with:
//! `cargo run --example matrix_chain`

use chain_dp::{ChainPlanner, Preset};

fn main() {
    // Example from CLRS:
    // Matrices A1..A6 with dimensions:
    // 30x35, 35x15, 15x5, 5x10, 10x20, 20x25
    let dims = Preset::Complex.dims();

    let plan = ChainPlanner::new().plan_dims(&dims);

    println!("Optimal multiplication cost: {}", plan.min_cost());
    println!("Parenthesization: {}", plan.expression());
    println!("Split decisions (i,j,k):");
    for s in plan.split_decisions() {
        println!("  Split A[{}..{}] at {}", s.i + 1, s.j + 1, s.k + 1);
    }
}
