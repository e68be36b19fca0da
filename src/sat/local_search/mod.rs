//! Stochastic local search over conjunctions of cardinality constraints,
//! with an optional linear objective maximized over feasible assignments.

pub mod config;
mod engine;
mod flip;
pub mod neighbor;
mod objective;
mod picker;
pub mod problem;
mod random;
mod scratch;
pub mod state;

pub use config::{Config, ConfigError};
pub use engine::run;
pub use problem::Problem;
pub use state::State;
