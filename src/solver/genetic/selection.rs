use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::domain::chromosome::Chromosome;

/// Tournament selection: one winner per population slot, with replacement.
///
/// Every tournament draws `k` contestants and keeps the one with the lowest
/// cached fitness; strict `<` means the first contestant drawn wins ties,
/// which keeps selection deterministic under the seeded RNG.
pub fn select(population: &[Chromosome], k: usize, rng: &mut ChaCha8Rng) -> Vec<Chromosome> {
    (0..population.len())
        .map(|_| population[tournament(population, k, rng)].clone())
        .collect()
}

fn tournament(population: &[Chromosome], k: usize, rng: &mut ChaCha8Rng) -> usize {
    let mut winner = rng.gen_range(0..population.len());
    for _ in 1..k {
        let contender = rng.gen_range(0..population.len());
        if population[contender].fitness_total() < population[winner].fitness_total() {
            winner = contender;
        }
    }
    winner
}
