use std::time::Instant;

use tracing::info;

use crate::config::FitnessWeights;
use crate::distance::matrix::DistanceMatrix;
use crate::distance::provider::DistanceProvider;
use crate::domain::chromosome::Chromosome;
use crate::domain::solution::OptimizationResult;
use crate::domain::types::{Delivery, Point, Vehicle};
use crate::error::SolverError;
use crate::evaluation::fitness::Evaluator;
use crate::solver::genetic::repair::repair;
use crate::solver::genetic::search::validate_inputs;

/// One-shot nearest-neighbor construction, no evolution.
///
/// Fast and deterministic; useful as a baseline to gauge how much the
/// genetic run actually buys. Shares the validation and distance-matrix
/// path with [`optimize`](crate::solver::genetic::search::optimize), and
/// reports `generations_run == 0`.
pub fn solve_greedy(
    deliveries: &[Delivery],
    vehicles: &[Vehicle],
    depot: Point,
    provider: &dyn DistanceProvider,
    weights: &FitnessWeights,
) -> Result<OptimizationResult, SolverError> {
    let started = Instant::now();

    weights.validate()?;
    validate_inputs(deliveries, vehicles)?;
    if deliveries.is_empty() {
        return Ok(OptimizationResult::trivial(started.elapsed().as_secs_f64()));
    }

    let matrix = DistanceMatrix::build(depot, deliveries, provider)?;
    let evaluator = Evaluator::new(deliveries, vehicles, &matrix, weights);

    let mut plan = nearest_neighbor_plan(&evaluator);
    repair(&mut plan, &evaluator);
    plan.cached_fitness = Some(evaluator.evaluate(&plan));

    info!(
        "Greedy baseline: fitness = {:.2} over {} routes",
        plan.fitness_total(),
        plan.used_slots()
    );

    let history = vec![plan.fitness_total()];
    Ok(OptimizationResult::from_chromosome(
        &plan,
        &evaluator,
        0,
        history,
        started.elapsed().as_secs_f64(),
    ))
}

/// Each vehicle in turn takes the nearest unserved delivery that fits its
/// capacity and remaining range. Deliveries no vehicle could take stay
/// unassigned; callers restore them through repair.
pub(crate) fn nearest_neighbor_plan(evaluator: &Evaluator<'_>) -> Chromosome {
    let n = evaluator.deliveries.len();
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut genes = Vec::with_capacity(evaluator.vehicles.len());

    for vehicle in evaluator.vehicles {
        let mut route = Vec::new();
        let mut load = 0.0;
        let mut travelled = 0.0;
        let mut at: Option<usize> = None;

        while !remaining.is_empty() {
            let mut nearest: Option<(f64, usize)> = None;
            for (idx, &delivery) in remaining.iter().enumerate() {
                let hop = match at {
                    Some(from) => evaluator.matrix.between(from, delivery),
                    None => evaluator.matrix.depot_to(delivery),
                };
                let fits = load + evaluator.deliveries[delivery].weight <= vehicle.max_capacity
                    && travelled + hop <= vehicle.max_range;
                if fits && nearest.map_or(true, |(best, _)| hop < best) {
                    nearest = Some((hop, idx));
                }
            }

            let Some((hop, idx)) = nearest else {
                break;
            };
            let delivery = remaining.remove(idx);
            load += evaluator.deliveries[delivery].weight;
            travelled += hop;
            at = Some(delivery);
            route.push(delivery);
        }

        genes.push(route);
    }

    Chromosome::new(genes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::provider::EuclideanDistance;
    use crate::domain::types::Priority;

    #[test]
    fn greedy_covers_every_delivery_once() {
        let depot = Point::new(0.0, 0.0);
        let deliveries: Vec<Delivery> = (0..6)
            .map(|i| {
                Delivery::new(
                    format!("d{}", i),
                    Point::new(i as f64 + 1.0, (i % 2) as f64),
                    15.0,
                    Priority::Regular,
                )
            })
            .collect();
        let vehicles = vec![
            Vehicle::new("v1", 50.0, 1000.0, 1.0),
            Vehicle::new("v2", 50.0, 1000.0, 1.0),
        ];

        let result = solve_greedy(
            &deliveries,
            &vehicles,
            depot,
            &EuclideanDistance,
            &FitnessWeights::default(),
        )
        .unwrap();

        let mut stops: Vec<String> = result
            .routes
            .iter()
            .flat_map(|route| route.stops.clone())
            .collect();
        stops.sort();
        assert_eq!(stops, vec!["d0", "d1", "d2", "d3", "d4", "d5"]);
        assert_eq!(result.generations_run, 0);
    }

    #[test]
    fn greedy_trivial_boundary() {
        let result = solve_greedy(
            &[],
            &[Vehicle::new("v1", 50.0, 100.0, 1.0)],
            Point::new(0.0, 0.0),
            &EuclideanDistance,
            &FitnessWeights::default(),
        )
        .unwrap();
        assert!(result.routes.is_empty());
    }
}
