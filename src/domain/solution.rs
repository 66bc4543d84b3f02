use serde::Serialize;

use crate::domain::chromosome::Chromosome;
use crate::evaluation::fitness::{Evaluator, FitnessScore};
use crate::evaluation::penalty;

/// Per-vehicle slice of the final plan.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleRoute {
    pub vehicle_id: String,
    /// Delivery ids in visit order, depot implied at both ends.
    pub stops: Vec<String>,
    pub distance_km: f64,
    pub load: f64,
    pub cost: f64,
}

/// Raw constraint slack left in a finished plan.
///
/// Nonzero values are not an error; the GA is heuristic and reports what
/// it could not resolve. `late_critical` counts critical deliveries not
/// served as the first stop of their route.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ResidualViolations {
    pub capacity_excess: f64,
    pub autonomy_excess: f64,
    pub late_critical: usize,
}

impl ResidualViolations {
    pub fn is_clean(&self) -> bool {
        self.capacity_excess == 0.0 && self.autonomy_excess == 0.0 && self.late_critical == 0
    }
}

/// Immutable outcome of one optimization run.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    /// One entry per used vehicle; empty slots are omitted.
    pub routes: Vec<VehicleRoute>,
    pub total_distance: f64,
    pub total_cost: f64,
    pub fitness: FitnessScore,
    pub generations_run: usize,
    pub elapsed_seconds: f64,
    /// Best fitness after each executed generation.
    pub best_fitness_history: Vec<f64>,
    pub residual_violations: ResidualViolations,
}

impl OptimizationResult {
    /// Freeze a chromosome into the externally visible result.
    pub(crate) fn from_chromosome(
        chromosome: &Chromosome,
        evaluator: &Evaluator<'_>,
        generations_run: usize,
        best_fitness_history: Vec<f64>,
        elapsed_seconds: f64,
    ) -> Self {
        let mut routes = Vec::new();
        let mut route_distances = Vec::with_capacity(chromosome.slot_count());

        for (slot, route) in chromosome.genes.iter().enumerate() {
            let distance = evaluator.route_distance(route);
            route_distances.push(distance);
            if route.is_empty() {
                continue;
            }

            let vehicle = &evaluator.vehicles[slot];
            routes.push(VehicleRoute {
                vehicle_id: vehicle.id.clone(),
                stops: route
                    .iter()
                    .map(|&d| evaluator.deliveries[d].id.clone())
                    .collect(),
                distance_km: distance,
                load: evaluator.route_load(route),
                cost: distance * vehicle.cost_per_km,
            });
        }

        let residual_violations = ResidualViolations {
            capacity_excess: penalty::capacity_excess(
                &chromosome.genes,
                evaluator.deliveries,
                evaluator.vehicles,
            ),
            autonomy_excess: penalty::autonomy_excess(&route_distances, evaluator.vehicles),
            late_critical: penalty::late_critical_stops(&chromosome.genes, evaluator.deliveries),
        };

        Self {
            total_distance: routes.iter().map(|r| r.distance_km).sum(),
            total_cost: routes.iter().map(|r| r.cost).sum(),
            fitness: evaluator.evaluate(chromosome),
            routes,
            generations_run,
            elapsed_seconds,
            best_fitness_history,
            residual_violations,
        }
    }

    /// Result of the trivial zero-delivery boundary case.
    pub(crate) fn trivial(elapsed_seconds: f64) -> Self {
        Self {
            routes: Vec::new(),
            total_distance: 0.0,
            total_cost: 0.0,
            fitness: FitnessScore::zero(),
            generations_run: 0,
            elapsed_seconds,
            best_fitness_history: Vec::new(),
            residual_violations: ResidualViolations::default(),
        }
    }
}
