use tracing::debug;

use crate::domain::chromosome::Chromosome;
use crate::evaluation::fitness::Evaluator;

/// Outer rounds of the 2-opt + relocation sweep. Every accepted move
/// strictly improves, so convergence usually lands well before the cap.
const MAX_ROUNDS: usize = 50;

/// Refine the final best individual in place; never worsens it.
///
/// Two move types run to convergence or the round cap: 2-opt segment
/// reversal within each route and relocation of single deliveries between
/// routes. A 2-opt move must strictly reduce its route's distance without
/// raising total fitness (reversals can push a critical stop later); a
/// relocation must strictly reduce total fitness. Finding no improving
/// move is the normal exit, not a failure, and the individual is restored
/// untouched if the sweep somehow failed to help.
pub fn refine(chromosome: &mut Chromosome, evaluator: &Evaluator<'_>) {
    let snapshot = chromosome.genes.clone();
    let before = evaluator.evaluate(chromosome).total;

    for round in 0..MAX_ROUNDS {
        let mut improved = false;
        improved |= two_opt_pass(chromosome, evaluator);
        improved |= relocate_pass(chromosome, evaluator);

        if !improved {
            debug!("Local search converged after {} rounds", round);
            break;
        }
    }

    let score = evaluator.evaluate(chromosome);
    if score.total > before {
        chromosome.genes = snapshot;
        chromosome.cached_fitness = Some(evaluator.evaluate(chromosome));
        return;
    }

    if score.total < before {
        debug!(
            "Local search improved fitness {:.2} -> {:.2}",
            before, score.total
        );
    }
    chromosome.cached_fitness = Some(score);
}

/// First-improvement 2-opt inside every route.
fn two_opt_pass(chromosome: &mut Chromosome, evaluator: &Evaluator<'_>) -> bool {
    let mut improved_any = false;

    for slot in 0..chromosome.slot_count() {
        loop {
            let len = chromosome.genes[slot].len();
            if len < 3 {
                break;
            }
            let base_distance = evaluator.route_distance(&chromosome.genes[slot]);
            let base_total = evaluator.evaluate(chromosome).total;

            let mut improved = false;
            'scan: for i in 0..len - 1 {
                for j in i + 1..len {
                    chromosome.genes[slot][i..=j].reverse();
                    if evaluator.route_distance(&chromosome.genes[slot]) < base_distance
                        && evaluator.evaluate(chromosome).total <= base_total
                    {
                        improved = true;
                        improved_any = true;
                        break 'scan;
                    }
                    chromosome.genes[slot][i..=j].reverse();
                }
            }

            if !improved {
                break;
            }
        }
    }

    if improved_any {
        chromosome.invalidate();
    }
    improved_any
}

/// Try moving each delivery into every other route position; keep the first
/// move that strictly lowers total fitness.
fn relocate_pass(chromosome: &mut Chromosome, evaluator: &Evaluator<'_>) -> bool {
    let current = evaluator.evaluate(chromosome).total;
    let slots = chromosome.slot_count();

    for source in 0..slots {
        for position in 0..chromosome.genes[source].len() {
            let delivery = chromosome.genes[source][position];

            for target in 0..slots {
                if target == source {
                    continue;
                }
                for insert_at in 0..=chromosome.genes[target].len() {
                    chromosome.genes[source].remove(position);
                    chromosome.genes[target].insert(insert_at, delivery);

                    if evaluator.evaluate(chromosome).total < current {
                        chromosome.invalidate();
                        return true;
                    }

                    // Undo and keep scanning.
                    chromosome.genes[target].remove(insert_at);
                    chromosome.genes[source].insert(position, delivery);
                }
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FitnessWeights;
    use crate::domain::types::{Delivery, Point, Priority, Vehicle};
    use crate::evaluation::fitness::tests::build_matrix;

    fn square_instance() -> (Vec<Delivery>, Vec<Vehicle>, Point) {
        // Three corners of a unit square, depot at the fourth.
        let depot = Point::new(0.0, 0.0);
        let deliveries = vec![
            Delivery::new("a", Point::new(1.0, 0.0), 5.0, Priority::Regular),
            Delivery::new("b", Point::new(1.0, 1.0), 5.0, Priority::Regular),
            Delivery::new("c", Point::new(0.0, 1.0), 5.0, Priority::Regular),
        ];
        let vehicles = vec![
            Vehicle::new("v1", 100.0, 1000.0, 1.0),
            Vehicle::new("v2", 100.0, 1000.0, 1.0),
        ];
        (deliveries, vehicles, depot)
    }

    #[test]
    fn two_opt_untangles_a_crossed_route() {
        let (deliveries, vehicles, depot) = square_instance();
        let matrix = build_matrix(depot, &deliveries);
        let weights = FitnessWeights::default();
        let evaluator = Evaluator::new(&deliveries, &vehicles, &matrix, &weights);

        // a -> c -> b zig-zags across the square; a -> b -> c walks it.
        let mut chromosome = Chromosome::new(vec![vec![0, 2, 1], vec![]]);
        let before = evaluator.route_distance(&chromosome.genes[0]);
        assert!(two_opt_pass(&mut chromosome, &evaluator));
        let after = evaluator.route_distance(&chromosome.genes[0]);
        assert!(after < before);
        assert_eq!(chromosome.genes[0], vec![0, 1, 2]);
    }

    #[test]
    fn refine_never_worsens_fitness() {
        let (deliveries, vehicles, depot) = square_instance();
        let matrix = build_matrix(depot, &deliveries);
        let weights = FitnessWeights::default();
        let evaluator = Evaluator::new(&deliveries, &vehicles, &matrix, &weights);

        let layouts = [
            vec![vec![0, 2, 1], vec![]],
            vec![vec![2], vec![0, 1]],
            vec![vec![], vec![1, 0, 2]],
        ];
        for genes in layouts {
            let mut chromosome = Chromosome::new(genes);
            let before = evaluator.evaluate(&chromosome).total;
            refine(&mut chromosome, &evaluator);
            let after = chromosome.fitness_total();
            assert!(after <= before);
            assert!(chromosome.is_complete(3));
        }
    }

    #[test]
    fn two_opt_keeps_a_critical_stop_in_front() {
        let (mut deliveries, vehicles, depot) = square_instance();
        // Make the first-visited stop critical: reversals that would pull it
        // away from position 0 must be rejected even if marginally shorter.
        deliveries[0].priority = Priority::Critical;
        let matrix = build_matrix(depot, &deliveries);
        let weights = FitnessWeights::default();
        let evaluator = Evaluator::new(&deliveries, &vehicles, &matrix, &weights);

        let mut chromosome = Chromosome::new(vec![vec![0, 2, 1], vec![]]);
        let before = evaluator.evaluate(&chromosome).total;
        refine(&mut chromosome, &evaluator);
        assert!(chromosome.fitness_total() <= before);
        // The critical delivery is still served first.
        assert_eq!(chromosome.genes[0][0], 0);
    }

    #[test]
    fn relocation_consolidates_when_it_pays() {
        let (deliveries, vehicles, depot) = square_instance();
        let matrix = build_matrix(depot, &deliveries);
        let weights = FitnessWeights::default();
        let evaluator = Evaluator::new(&deliveries, &vehicles, &matrix, &weights);

        // Two vehicles for three nearby stops pays an extra vehicle penalty
        // and extra depot legs; relocation should empty one route.
        let mut chromosome = Chromosome::new(vec![vec![0, 1], vec![2]]);
        refine(&mut chromosome, &evaluator);
        assert_eq!(chromosome.used_slots(), 1);
        assert!(chromosome.is_complete(3));
    }

    #[test]
    fn refine_handles_degenerate_individuals() {
        let (deliveries, vehicles, depot) = square_instance();
        let matrix = build_matrix(depot, &deliveries);
        let weights = FitnessWeights::default();
        let evaluator = Evaluator::new(&deliveries, &vehicles, &matrix, &weights);

        let mut empty = Chromosome::empty(vehicles.len());
        refine(&mut empty, &evaluator);
        assert_eq!(empty.fitness_total(), 0.0);

        let mut single = Chromosome::new(vec![vec![0], vec![1, 2]]);
        refine(&mut single, &evaluator);
        assert!(single.is_complete(3));
    }
}
