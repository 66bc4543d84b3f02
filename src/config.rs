use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::solver::genetic::init::InitStrategy;

/// Weights of the six fitness terms.
///
/// fitness = α·distance + β·capacity_excess + γ·autonomy_excess
///         + δ·priority_delay + ζ·load_imbalance + ε·used_vehicles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// α — total travelled distance.
    pub distance: f64,
    /// β — load above vehicle capacity, kept high to discourage violations.
    pub capacity: f64,
    /// γ — route distance above vehicle range.
    pub autonomy: f64,
    /// δ — critical deliveries served late within their route.
    pub priority: f64,
    /// ζ — spread of per-route loads among used vehicles.
    pub load_balance: f64,
    /// ε — number of non-empty routes.
    pub vehicle_count: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            distance: 1.0,
            capacity: 1000.0,
            autonomy: 1000.0,
            priority: 500.0,
            load_balance: 50.0,
            vehicle_count: 100.0,
        }
    }
}

impl FitnessWeights {
    pub fn validate(&self) -> Result<(), SolverError> {
        let all = [
            ("distance", self.distance),
            ("capacity", self.capacity),
            ("autonomy", self.autonomy),
            ("priority", self.priority),
            ("load_balance", self.load_balance),
            ("vehicle_count", self.vehicle_count),
        ];
        for (name, value) in all {
            if !value.is_finite() || value < 0.0 {
                return Err(SolverError::InvalidConfiguration(format!(
                    "fitness weight '{}' must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Knobs of one genetic run. Validated before any generation executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationConfig {
    pub population_size: usize,
    /// Hard cap on generations.
    pub generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    /// Individuals carried unchanged into the next generation.
    pub elite_size: usize,
    pub tournament_size: usize,
    /// Stop after this many generations without a new best.
    pub stagnation_limit: usize,
    /// Routes at or below this length are candidates for the merge mutation.
    pub merge_len_threshold: usize,
    pub init_strategy: InitStrategy,
    /// Optional wall-clock budget, checked at generation boundaries only.
    pub time_limit: Option<Duration>,
    pub seed: u64,
    pub weights: FitnessWeights,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 200,
            crossover_rate: 0.7,
            mutation_rate: 0.2,
            elite_size: 5,
            tournament_size: 3,
            stagnation_limit: 50,
            merge_len_threshold: 3,
            init_strategy: InitStrategy::Random,
            time_limit: None,
            seed: 64,
            weights: FitnessWeights::default(),
        }
    }
}

impl OptimizationConfig {
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.population_size < 2 {
            return Err(SolverError::InvalidConfiguration(format!(
                "population_size must be >= 2, got {}",
                self.population_size
            )));
        }
        if self.generations == 0 {
            return Err(SolverError::InvalidConfiguration(
                "generations must be >= 1".into(),
            ));
        }
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(SolverError::InvalidConfiguration(format!(
                    "{} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }
        if self.elite_size >= self.population_size {
            return Err(SolverError::InvalidConfiguration(format!(
                "elite_size ({}) must be smaller than population_size ({})",
                self.elite_size, self.population_size
            )));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(SolverError::InvalidConfiguration(format!(
                "tournament_size must be within [1, population_size], got {}",
                self.tournament_size
            )));
        }
        if self.stagnation_limit == 0 {
            return Err(SolverError::InvalidConfiguration(
                "stagnation_limit must be >= 1".into(),
            ));
        }
        self.weights.validate()
    }
}
