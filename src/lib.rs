//! Heuristic fleet routing from a shared depot.
//!
//! The core is a genetic algorithm over route assignments (one route slot
//! per vehicle), scored by a six-term weighted fitness and refined once by
//! local search. Distances come from an injected [`DistanceProvider`] and
//! are memoized per run.

pub mod config;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod solver;

pub use config::{FitnessWeights, OptimizationConfig};
pub use distance::provider::{DistanceProvider, EuclideanDistance, HaversineDistance};
pub use domain::solution::OptimizationResult;
pub use domain::types::{Delivery, Point, Priority, Vehicle};
pub use error::SolverError;
pub use solver::genetic::init::InitStrategy;
pub use solver::genetic::search::optimize;
pub use solver::greedy::solve_greedy;
