//! Parallel Adaptive Large Neighborhood Search (PALNS).
//!
//! A domain-agnostic implementation of the ALNS metaheuristic with
//! parallel workers:
//!
//! - **Destroy/repair operators**: the user supplies a portfolio of
//!   `S -> S` transforms; the engine never looks inside a solution
//!   beyond its objective.
//! - **Adaptive pair weights**: every destroy x repair pair carries a
//!   selection weight pulled toward per-outcome rewards by exponential
//!   smoothing, and pairs are drawn by roulette-wheel sampling over the
//!   live distribution.
//! - **Simulated-annealing acceptance**: worse candidates are accepted
//!   with probability `exp(-delta / T)`; each worker cools its own
//!   temperature geometrically.
//! - **Parallel exploration**: N workers share the incumbent, the best
//!   solution, and the weight table, each behind its own lock, and run
//!   the expensive destroy/repair step outside all of them.
//!
//! # Architecture
//!
//! This crate sits at Layer 2 (Algorithms) in the U-Engine ecosystem,
//! depending only on `rand`. It contains no domain-specific concepts;
//! routing, scheduling, nesting, etc. are all defined by consumers at
//! higher layers: implement [`PalnsProblem`] for the construction
//! heuristic, [`Solution`] for the representation, and the two operator
//! traits for the neighborhood moves.
//!
//! # Usage
//!
//! ```ignore
//! use u_palns::stop::IterationLimit;
//! use u_palns::{PalnsConfig, PalnsRunner};
//!
//! let runner = PalnsRunner::new(PalnsConfig::default().with_seed(42))?;
//! let result = runner.solve(&problem, &destroy_ops, &repair_ops, IterationLimit::new(50_000))?;
//! println!("best objective: {}", result.best_objective);
//! ```
//!
//! # References
//!
//! Ropke & Pisinger (2006), "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows"

mod acceptance;
mod config;
mod runner;
mod state;
pub mod stop;
mod types;
mod weights;

pub use config::PalnsConfig;
pub use runner::{PalnsResult, PalnsRunner};
pub use state::SharedBest;
pub use stop::StopCondition;
pub use types::{
    DestroyOperator, OperatorError, Outcome, PalnsError, PalnsProblem, RepairOperator, Solution,
};
pub use weights::{WeightTable, render_weight_table, split_pair};
