use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::domain::chromosome::Chromosome;
use crate::evaluation::fitness::Evaluator;
use crate::solver::genetic::repair::repair;

/// The four mutation moves, one of which is chosen uniformly per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Exchange two delivery positions within one route.
    Swap,
    /// Remove one delivery and reinsert it elsewhere, same route or not.
    Insertion,
    /// Exchange one delivery between two different routes.
    InterRouteSwap,
    /// Concatenate two short routes, freeing a vehicle slot.
    RouteMerge,
}

impl MutationKind {
    fn pick(rng: &mut ChaCha8Rng) -> Self {
        match rng.gen_range(0..4) {
            0 => MutationKind::Swap,
            1 => MutationKind::Insertion,
            2 => MutationKind::InterRouteSwap,
            _ => MutationKind::RouteMerge,
        }
    }
}

/// Apply one uniformly chosen mutation, then the shared repair check.
///
/// Every move preserves assignment completeness on its own; a move that
/// cannot apply safely leaves the individual unchanged (and its cached
/// fitness intact).
pub fn mutate(
    chromosome: &mut Chromosome,
    evaluator: &Evaluator<'_>,
    merge_len_threshold: usize,
    rng: &mut ChaCha8Rng,
) {
    let applied = match MutationKind::pick(rng) {
        MutationKind::Swap => swap_within_route(chromosome, rng),
        MutationKind::Insertion => reinsert(chromosome, rng),
        MutationKind::InterRouteSwap => swap_between_routes(chromosome, rng),
        MutationKind::RouteMerge => merge_short_routes(chromosome, merge_len_threshold, rng),
    };

    if applied {
        repair(chromosome, evaluator);
    }
}

fn swap_within_route(chromosome: &mut Chromosome, rng: &mut ChaCha8Rng) -> bool {
    let candidates: Vec<usize> = chromosome
        .genes
        .iter()
        .enumerate()
        .filter(|(_, route)| route.len() >= 2)
        .map(|(slot, _)| slot)
        .collect();
    let Some(&slot) = candidates.choose(rng) else {
        return false;
    };

    let route = &mut chromosome.genes[slot];
    let i = rng.gen_range(0..route.len());
    let mut j = rng.gen_range(0..route.len() - 1);
    if j >= i {
        j += 1;
    }
    route.swap(i, j);
    true
}

fn reinsert(chromosome: &mut Chromosome, rng: &mut ChaCha8Rng) -> bool {
    let sources: Vec<usize> = chromosome
        .genes
        .iter()
        .enumerate()
        .filter(|(_, route)| !route.is_empty())
        .map(|(slot, _)| slot)
        .collect();
    let Some(&source) = sources.choose(rng) else {
        return false;
    };

    let position = rng.gen_range(0..chromosome.genes[source].len());
    let delivery = chromosome.genes[source].remove(position);

    let target = rng.gen_range(0..chromosome.genes.len());
    let insert_at = rng.gen_range(0..=chromosome.genes[target].len());
    chromosome.genes[target].insert(insert_at, delivery);
    true
}

fn swap_between_routes(chromosome: &mut Chromosome, rng: &mut ChaCha8Rng) -> bool {
    let non_empty: Vec<usize> = chromosome
        .genes
        .iter()
        .enumerate()
        .filter(|(_, route)| !route.is_empty())
        .map(|(slot, _)| slot)
        .collect();
    if non_empty.len() < 2 {
        return false;
    }

    let picked: Vec<usize> = non_empty.choose_multiple(rng, 2).copied().collect();
    let (a, b) = (picked[0], picked[1]);
    let i = rng.gen_range(0..chromosome.genes[a].len());
    let j = rng.gen_range(0..chromosome.genes[b].len());

    let tmp = chromosome.genes[a][i];
    chromosome.genes[a][i] = chromosome.genes[b][j];
    chromosome.genes[b][j] = tmp;
    true
}

fn merge_short_routes(
    chromosome: &mut Chromosome,
    merge_len_threshold: usize,
    rng: &mut ChaCha8Rng,
) -> bool {
    let short: Vec<usize> = chromosome
        .genes
        .iter()
        .enumerate()
        .filter(|(_, route)| !route.is_empty() && route.len() <= merge_len_threshold)
        .map(|(slot, _)| slot)
        .collect();
    if short.len() < 2 {
        return false;
    }

    let picked: Vec<usize> = short.choose_multiple(rng, 2).copied().collect();
    let (keep, drain) = (picked[0], picked[1]);
    let moved = std::mem::take(&mut chromosome.genes[drain]);
    chromosome.genes[keep].extend(moved);
    true
}
