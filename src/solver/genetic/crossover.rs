use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::domain::chromosome::Chromosome;
use crate::evaluation::fitness::Evaluator;
use crate::solver::genetic::repair::repair;

/// Order crossover (OX) adapted to multi-route individuals.
///
/// Both parents are flattened to their route-ordered delivery sequence
/// while the per-slot sizes are recorded; classical OX runs between two
/// random cut points; each child sequence is re-partitioned by its own
/// parent's slot sizes and repaired back to assignment completeness.
pub fn order_crossover(
    parent1: &Chromosome,
    parent2: &Chromosome,
    evaluator: &Evaluator<'_>,
    rng: &mut ChaCha8Rng,
) -> (Chromosome, Chromosome) {
    let flat1 = parent1.flatten();
    let flat2 = parent2.flatten();
    let n = flat1.len();

    if n < 2 || flat2.len() != n {
        return (parent1.clone(), parent2.clone());
    }

    let start = rng.gen_range(0..n - 1);
    let end = rng.gen_range(start + 1..=n);

    let child1_flat = order_fill(&flat1, &flat2, start, end, evaluator.deliveries.len());
    let child2_flat = order_fill(&flat2, &flat1, start, end, evaluator.deliveries.len());

    let mut child1 = Chromosome::new(split_by_sizes(&child1_flat, &parent1.slot_sizes()));
    let mut child2 = Chromosome::new(split_by_sizes(&child2_flat, &parent2.slot_sizes()));

    repair(&mut child1, evaluator);
    repair(&mut child2, evaluator);

    (child1, child2)
}

/// Classical OX fill: keep `keep[start..end]` in place, then fill the
/// remaining positions from `end` onward (wrapping) with `fill`'s genes in
/// their original order, skipping genes already inside the segment.
fn order_fill(keep: &[usize], fill: &[usize], start: usize, end: usize, id_space: usize) -> Vec<usize> {
    let n = keep.len();
    let mut child = vec![0usize; n];
    let mut in_segment = vec![false; id_space];

    for i in start..end {
        child[i] = keep[i];
        in_segment[keep[i]] = true;
    }

    let mut donors = fill[end % n..]
        .iter()
        .chain(&fill[..end % n])
        .copied()
        .filter(|&gene| !in_segment[gene]);

    for offset in 0..n - (end - start) {
        let position = (end + offset) % n;
        match donors.next() {
            Some(gene) => child[position] = gene,
            // Degenerate parents; repair restores the missing ids.
            None => break,
        }
    }

    child
}

/// Cut a flat sequence back into routes of the given sizes.
fn split_by_sizes(flat: &[usize], sizes: &[usize]) -> Vec<Vec<usize>> {
    let mut routes = Vec::with_capacity(sizes.len());
    let mut cursor = 0;
    for &size in sizes {
        let end = (cursor + size).min(flat.len());
        routes.push(flat[cursor..end].to_vec());
        cursor = end;
    }
    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FitnessWeights;
    use crate::domain::types::{Delivery, Point, Priority, Vehicle};
    use crate::evaluation::fitness::tests::build_matrix;
    use rand::SeedableRng;

    fn instance(n: usize) -> (Vec<Delivery>, Vec<Vehicle>, Point) {
        let depot = Point::new(0.0, 0.0);
        let deliveries = (0..n)
            .map(|i| {
                Delivery::new(
                    format!("d{}", i),
                    Point::new(i as f64 + 1.0, 0.0),
                    5.0,
                    Priority::Regular,
                )
            })
            .collect();
        let vehicles = vec![
            Vehicle::new("v1", 100.0, 1000.0, 1.0),
            Vehicle::new("v2", 100.0, 1000.0, 1.0),
            Vehicle::new("v3", 100.0, 1000.0, 1.0),
        ];
        (deliveries, vehicles, depot)
    }

    #[test]
    fn order_fill_keeps_segment_in_place() {
        let keep = vec![0, 1, 2, 3, 4];
        let fill = vec![4, 3, 2, 1, 0];
        let child = order_fill(&keep, &fill, 1, 3, 5);

        assert_eq!(child[1..3], [1, 2]);
        // Donors are read from the fill parent starting after the cut:
        // 1 is skipped (in segment), then 0, 4, 3 land on positions 3, 4, 0.
        assert_eq!(child, vec![3, 1, 2, 0, 4]);

        let mut sorted = child.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn children_are_structurally_valid() {
        let (deliveries, vehicles, depot) = instance(8);
        let matrix = build_matrix(depot, &deliveries);
        let weights = FitnessWeights::default();
        let evaluator = Evaluator::new(&deliveries, &vehicles, &matrix, &weights);

        let parent1 = Chromosome::new(vec![vec![0, 1, 2], vec![3, 4], vec![5, 6, 7]]);
        let parent2 = Chromosome::new(vec![vec![7, 5, 3], vec![1, 6, 0], vec![4, 2]]);

        let mut rng = ChaCha8Rng::seed_from_u64(64);
        for _ in 0..50 {
            let (child1, child2) = order_crossover(&parent1, &parent2, &evaluator, &mut rng);
            assert!(child1.is_complete(8));
            assert!(child2.is_complete(8));
            assert_eq!(child1.slot_count(), 3);
            assert_eq!(child2.slot_count(), 3);
        }
    }

    #[test]
    fn children_follow_parental_route_sizes() {
        let (deliveries, vehicles, depot) = instance(6);
        let matrix = build_matrix(depot, &deliveries);
        let weights = FitnessWeights::default();
        let evaluator = Evaluator::new(&deliveries, &vehicles, &matrix, &weights);

        let parent1 = Chromosome::new(vec![vec![0, 1, 2, 3], vec![4, 5], vec![]]);
        let parent2 = Chromosome::new(vec![vec![5, 4], vec![3, 2], vec![1, 0]]);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let (child1, child2) = order_crossover(&parent1, &parent2, &evaluator, &mut rng);

        // OX itself is a permutation, so repair has nothing to move and the
        // parental partition survives exactly.
        assert_eq!(child1.slot_sizes(), vec![4, 2, 0]);
        assert_eq!(child2.slot_sizes(), vec![2, 2, 2]);
    }

    #[test]
    fn single_delivery_parents_pass_through() {
        let (deliveries, vehicles, depot) = instance(1);
        let matrix = build_matrix(depot, &deliveries);
        let weights = FitnessWeights::default();
        let evaluator = Evaluator::new(&deliveries, &vehicles, &matrix, &weights);

        let parent = Chromosome::new(vec![vec![0], vec![], vec![]]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (child1, child2) = order_crossover(&parent, &parent, &evaluator, &mut rng);
        assert!(child1.is_complete(1));
        assert!(child2.is_complete(1));
    }
}
