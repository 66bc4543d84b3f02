use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::domain::chromosome::Chromosome;
use crate::evaluation::fitness::Evaluator;
use crate::solver::genetic::repair::repair;

/// Seeding strategy for the initial population.
///
/// All three produce structurally valid individuals; capacity and range
/// feasibility is deliberately left to the fitness penalties, since
/// infeasible intermediates are useful search material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitStrategy {
    /// Shuffle all deliveries and cut them into contiguous per-vehicle chunks.
    Random,
    /// Greedy nearest-neighbor per vehicle under capacity/range.
    NearestNeighbor,
    /// Critical deliveries distributed across vehicles before regular ones.
    PriorityFirst,
}

/// Build `size` individuals with the configured strategy.
pub fn build_population(
    strategy: InitStrategy,
    size: usize,
    evaluator: &Evaluator<'_>,
    rng: &mut ChaCha8Rng,
) -> Vec<Chromosome> {
    (0..size)
        .map(|_| match strategy {
            InitStrategy::Random => random_individual(evaluator, rng),
            InitStrategy::NearestNeighbor => nearest_neighbor_individual(evaluator),
            InitStrategy::PriorityFirst => priority_first_individual(evaluator),
        })
        .collect()
}

fn random_individual(evaluator: &Evaluator<'_>, rng: &mut ChaCha8Rng) -> Chromosome {
    let n = evaluator.deliveries.len();
    let slots = evaluator.vehicles.len();

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut genes = Vec::with_capacity(slots);
    for slot in 0..slots {
        let start = slot * n / slots;
        let end = (slot + 1) * n / slots;
        genes.push(order[start..end].to_vec());
    }

    let chromosome = Chromosome::new(genes);
    debug_assert!(chromosome.is_complete(n));
    chromosome
}

/// Deterministic greedy construction: each vehicle repeatedly takes the
/// nearest unserved delivery that still fits its capacity and remaining
/// range. Whatever no vehicle could take is restored by the shared repair.
fn nearest_neighbor_individual(evaluator: &Evaluator<'_>) -> Chromosome {
    let n = evaluator.deliveries.len();
    let mut chromosome = crate::solver::greedy::nearest_neighbor_plan(evaluator);
    if chromosome.delivery_count() < n {
        repair(&mut chromosome, evaluator);
    }
    debug_assert!(chromosome.is_complete(n));
    chromosome
}

/// Critical deliveries first, round-robin across vehicles; regular ones are
/// then packed greedily under capacity, leftovers restored by repair.
fn priority_first_individual(evaluator: &Evaluator<'_>) -> Chromosome {
    let n = evaluator.deliveries.len();
    let slots = evaluator.vehicles.len();
    let mut genes = vec![Vec::new(); slots];

    let (critical, regular): (Vec<usize>, Vec<usize>) =
        (0..n).partition(|&d| evaluator.deliveries[d].priority.is_critical());

    for (i, delivery) in critical.iter().enumerate() {
        genes[i % slots].push(*delivery);
    }

    let mut loads: Vec<f64> = genes
        .iter()
        .map(|route| evaluator.route_load(route))
        .collect();
    let mut leftovers = Vec::new();
    'regular: for delivery in regular {
        let weight = evaluator.deliveries[delivery].weight;
        for slot in 0..slots {
            if loads[slot] + weight <= evaluator.vehicles[slot].max_capacity {
                genes[slot].push(delivery);
                loads[slot] += weight;
                continue 'regular;
            }
        }
        leftovers.push(delivery);
    }

    let mut chromosome = Chromosome::new(genes);
    if !leftovers.is_empty() {
        repair(&mut chromosome, evaluator);
    }
    debug_assert!(chromosome.is_complete(n));
    chromosome
}
