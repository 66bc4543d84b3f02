use crate::evaluation::fitness::FitnessScore;

/// One candidate solution: an ordered route per vehicle slot.
///
/// `genes[v]` holds the delivery indices served by vehicle `v`, in visit
/// order; a slot may be empty. Every delivery index appears in exactly one
/// slot exactly once, and the slot count never changes, so the route-count
/// bound holds by construction.
#[derive(Debug, Clone)]
pub struct Chromosome {
    pub genes: Vec<Vec<usize>>,
    /// Last evaluation of this exact gene layout, dropped on any mutation.
    pub cached_fitness: Option<FitnessScore>,
}

impl Chromosome {
    pub fn new(genes: Vec<Vec<usize>>) -> Self {
        Self {
            genes,
            cached_fitness: None,
        }
    }

    /// All-empty chromosome with one slot per vehicle.
    pub fn empty(slots: usize) -> Self {
        Self::new(vec![Vec::new(); slots])
    }

    pub fn slot_count(&self) -> usize {
        self.genes.len()
    }

    pub fn used_slots(&self) -> usize {
        self.genes.iter().filter(|route| !route.is_empty()).count()
    }

    pub fn delivery_count(&self) -> usize {
        self.genes.iter().map(Vec::len).sum()
    }

    /// Delivery indices in slot order, route boundaries dropped.
    pub fn flatten(&self) -> Vec<usize> {
        self.genes.iter().flatten().copied().collect()
    }

    /// Route lengths per slot, in slot order.
    pub fn slot_sizes(&self) -> Vec<usize> {
        self.genes.iter().map(Vec::len).collect()
    }

    /// Drop the cached fitness after a structural change.
    pub fn invalidate(&mut self) {
        self.cached_fitness = None;
    }

    /// Cached total fitness, or +inf when the individual is unevaluated.
    pub fn fitness_total(&self) -> f64 {
        self.cached_fitness
            .as_ref()
            .map_or(f64::INFINITY, |score| score.total)
    }

    /// True when every delivery index `0..delivery_count` occurs exactly once.
    pub fn is_complete(&self, delivery_count: usize) -> bool {
        let mut seen = vec![false; delivery_count];
        for &delivery in self.genes.iter().flatten() {
            if delivery >= delivery_count || seen[delivery] {
                return false;
            }
            seen[delivery] = true;
        }
        seen.into_iter().all(|s| s)
    }

    /// Locate a delivery as (slot, position within route).
    pub fn position_of(&self, delivery: usize) -> Option<(usize, usize)> {
        self.genes.iter().enumerate().find_map(|(slot, route)| {
            route
                .iter()
                .position(|&d| d == delivery)
                .map(|pos| (slot, pos))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_detects_duplicates_and_gaps() {
        let complete = Chromosome::new(vec![vec![0, 2], vec![1], vec![]]);
        assert!(complete.is_complete(3));

        let duplicated = Chromosome::new(vec![vec![0, 1], vec![1]]);
        assert!(!duplicated.is_complete(2));

        let missing = Chromosome::new(vec![vec![0], vec![]]);
        assert!(!missing.is_complete(2));

        let out_of_range = Chromosome::new(vec![vec![0, 5]]);
        assert!(!out_of_range.is_complete(2));
    }

    #[test]
    fn flatten_preserves_slot_then_visit_order() {
        let chromosome = Chromosome::new(vec![vec![3, 1], vec![], vec![0, 2]]);
        assert_eq!(chromosome.flatten(), vec![3, 1, 0, 2]);
        assert_eq!(chromosome.slot_sizes(), vec![2, 0, 2]);
        assert_eq!(chromosome.used_slots(), 2);
    }

    #[test]
    fn position_of_finds_slot_and_offset() {
        let chromosome = Chromosome::new(vec![vec![2], vec![0, 1]]);
        assert_eq!(chromosome.position_of(1), Some((1, 1)));
        assert_eq!(chromosome.position_of(7), None);
    }

    #[test]
    fn unevaluated_fitness_is_infinite() {
        let chromosome = Chromosome::empty(2);
        assert_eq!(chromosome.fitness_total(), f64::INFINITY);
    }
}
