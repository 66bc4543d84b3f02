use crate::domain::chromosome::Chromosome;
use crate::evaluation::fitness::Evaluator;

/// Restore assignment completeness after a genetic operator.
///
/// Duplicates are dropped keeping the first occurrence in slot order, then
/// every missing delivery is reinserted at its cheapest position. Missing
/// ids are processed in ascending order and ties go to the first candidate
/// scanned (lowest slot, then lowest position), so the pass is fully
/// deterministic. A no-op on already-complete individuals.
pub fn repair(chromosome: &mut Chromosome, evaluator: &Evaluator<'_>) {
    let delivery_count = evaluator.deliveries.len();

    let mut seen = vec![false; delivery_count];
    for route in &mut chromosome.genes {
        route.retain(|&delivery| {
            if delivery >= delivery_count || seen[delivery] {
                false
            } else {
                seen[delivery] = true;
                true
            }
        });
    }

    for missing in (0..delivery_count).filter(|&d| !seen[d]) {
        insert_cheapest(chromosome, missing, evaluator);
    }

    chromosome.invalidate();
    debug_assert!(chromosome.is_complete(delivery_count));
}

/// Insert `delivery` where it raises total distance the least.
pub(crate) fn insert_cheapest(
    chromosome: &mut Chromosome,
    delivery: usize,
    evaluator: &Evaluator<'_>,
) {
    let mut best: Option<(f64, usize, usize)> = None;

    for (slot, route) in chromosome.genes.iter().enumerate() {
        for position in 0..=route.len() {
            let delta = insertion_cost(route, position, delivery, evaluator);
            // Strict less keeps the first candidate on ties.
            if best.map_or(true, |(cost, _, _)| delta < cost) {
                best = Some((delta, slot, position));
            }
        }
    }

    if let Some((_, slot, position)) = best {
        chromosome.genes[slot].insert(position, delivery);
        chromosome.invalidate();
    }
}

/// Marginal distance of inserting `delivery` into `route` at `position`.
fn insertion_cost(
    route: &[usize],
    position: usize,
    delivery: usize,
    evaluator: &Evaluator<'_>,
) -> f64 {
    let matrix = evaluator.matrix;

    let entering = if position == 0 {
        matrix.depot_to(delivery)
    } else {
        matrix.between(route[position - 1], delivery)
    };
    let leaving = if position == route.len() {
        matrix.to_depot(delivery)
    } else {
        matrix.between(delivery, route[position])
    };
    let displaced = if route.is_empty() {
        0.0
    } else if position == 0 {
        matrix.depot_to(route[0])
    } else if position == route.len() {
        matrix.to_depot(route[position - 1])
    } else {
        matrix.between(route[position - 1], route[position])
    };

    entering + leaving - displaced
}
