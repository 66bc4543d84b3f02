use itertools::Itertools;
use serde::Serialize;

use crate::config::FitnessWeights;
use crate::distance::matrix::DistanceMatrix;
use crate::domain::chromosome::Chromosome;
use crate::domain::types::{Delivery, Vehicle};
use crate::evaluation::penalty;

/// Weighted six-term score; lower is better.
///
/// The per-term breakdown is retained for diagnostics and result reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitnessScore {
    pub total: f64,
    pub distance: f64,
    pub capacity_penalty: f64,
    pub autonomy_penalty: f64,
    pub priority_penalty: f64,
    pub load_balance_penalty: f64,
    pub vehicle_penalty: f64,
}

impl FitnessScore {
    /// Score of the empty plan.
    pub fn zero() -> Self {
        Self {
            total: 0.0,
            distance: 0.0,
            capacity_penalty: 0.0,
            autonomy_penalty: 0.0,
            priority_penalty: 0.0,
            load_balance_penalty: 0.0,
            vehicle_penalty: 0.0,
        }
    }
}

/// Evaluates chromosomes against one run's immutable inputs.
///
/// Evaluation is side-effect-free and bit-for-bit repeatable: terms are
/// summed in a fixed order over the memoized distance matrix, so the same
/// chromosome always produces the identical score. Safe to share across
/// rayon workers.
pub struct Evaluator<'a> {
    pub deliveries: &'a [Delivery],
    pub vehicles: &'a [Vehicle],
    pub matrix: &'a DistanceMatrix,
    pub weights: &'a FitnessWeights,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        deliveries: &'a [Delivery],
        vehicles: &'a [Vehicle],
        matrix: &'a DistanceMatrix,
        weights: &'a FitnessWeights,
    ) -> Self {
        Self {
            deliveries,
            vehicles,
            matrix,
            weights,
        }
    }

    pub fn evaluate(&self, chromosome: &Chromosome) -> FitnessScore {
        let route_distances: Vec<f64> = chromosome
            .genes
            .iter()
            .map(|route| self.route_distance(route))
            .collect();
        let route_loads: Vec<f64> = chromosome
            .genes
            .iter()
            .map(|route| penalty::route_load(route, self.deliveries))
            .collect();

        let w = self.weights;
        let distance = w.distance * route_distances.iter().sum::<f64>();
        let capacity_penalty =
            w.capacity * penalty::capacity_excess(&chromosome.genes, self.deliveries, self.vehicles);
        let autonomy_penalty = w.autonomy * penalty::autonomy_excess(&route_distances, self.vehicles);
        let priority_penalty =
            w.priority * penalty::priority_delay(&chromosome.genes, self.deliveries);
        let load_balance_penalty = w.load_balance * penalty::load_imbalance(&route_loads);
        let vehicle_penalty = w.vehicle_count * penalty::used_vehicles(&chromosome.genes) as f64;

        FitnessScore {
            total: distance
                + capacity_penalty
                + autonomy_penalty
                + priority_penalty
                + load_balance_penalty
                + vehicle_penalty,
            distance,
            capacity_penalty,
            autonomy_penalty,
            priority_penalty,
            load_balance_penalty,
            vehicle_penalty,
        }
    }

    /// Depot-to-depot distance of one route; empty routes travel nothing.
    pub fn route_distance(&self, route: &[usize]) -> f64 {
        let Some((&first, &last)) = route.first().zip(route.last()) else {
            return 0.0;
        };

        let legs: f64 = route
            .iter()
            .tuple_windows()
            .map(|(&a, &b)| self.matrix.between(a, b))
            .sum();

        self.matrix.depot_to(first) + legs + self.matrix.to_depot(last)
    }

    pub fn route_load(&self, route: &[usize]) -> f64 {
        penalty::route_load(route, self.deliveries)
    }

    pub fn total_distance(&self, chromosome: &Chromosome) -> f64 {
        chromosome
            .genes
            .iter()
            .map(|route| self.route_distance(route))
            .sum()
    }
}
