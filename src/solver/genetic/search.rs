use std::collections::HashSet;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, span, Level};

use crate::config::OptimizationConfig;
use crate::distance::matrix::DistanceMatrix;
use crate::distance::provider::DistanceProvider;
use crate::domain::chromosome::Chromosome;
use crate::domain::solution::OptimizationResult;
use crate::domain::types::{Delivery, Point, Vehicle};
use crate::error::SolverError;
use crate::evaluation::fitness::Evaluator;
use crate::solver::genetic::crossover::order_crossover;
use crate::solver::genetic::init::build_population;
use crate::solver::genetic::mutation::mutate;
use crate::solver::genetic::selection::select;
use crate::solver::local_search;

/// Book-keeping carried across generations.
struct EvolutionState {
    best: Chromosome,
    best_generation: usize,
    stagnation: usize,
    history: Vec<f64>,
}

impl EvolutionState {
    fn new(best: Chromosome) -> Self {
        Self {
            best,
            best_generation: 0,
            stagnation: 0,
            history: Vec::new(),
        }
    }
}

/// Run the genetic optimization and return the refined best plan.
///
/// The loop is synchronous generation by generation; within one generation
/// fitness evaluation is mapped in parallel over the population, everything
/// else runs sequentially on the population buffer. The optional time limit
/// is checked only at generation boundaries and falls back to the best
/// individual found so far.
pub fn optimize(
    deliveries: &[Delivery],
    vehicles: &[Vehicle],
    depot: Point,
    provider: &dyn DistanceProvider,
    config: &OptimizationConfig,
) -> Result<OptimizationResult, SolverError> {
    let started = Instant::now();

    config.validate()?;
    validate_inputs(deliveries, vehicles)?;

    // Zero deliveries is a valid boundary case, not an error.
    if deliveries.is_empty() {
        return Ok(OptimizationResult::trivial(started.elapsed().as_secs_f64()));
    }

    let matrix = {
        let setup_span = span!(Level::INFO, "setup");
        let _guard = setup_span.enter();
        DistanceMatrix::build(depot, deliveries, provider)?
    };
    let evaluator = Evaluator::new(deliveries, vehicles, &matrix, &config.weights);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    info!(
        "Starting genetic run: {} deliveries, {} vehicles, population {}, up to {} generations",
        deliveries.len(),
        vehicles.len(),
        config.population_size,
        config.generations
    );

    let mut population = build_population(
        config.init_strategy,
        config.population_size,
        &evaluator,
        &mut rng,
    );
    evaluate_population(&mut population, &evaluator);

    let mut state = EvolutionState::new(best_of(&population).clone());
    let mut generations_run = 0;

    let loop_span = span!(Level::INFO, "evolution", generations = config.generations);
    let _loop_guard = loop_span.enter();

    for generation in 1..=config.generations {
        if let Some(limit) = config.time_limit {
            if started.elapsed() >= limit {
                info!(
                    "Time limit reached at generation {}, keeping best so far",
                    generation
                );
                break;
            }
        }

        run_generation(&mut population, &evaluator, config, &mut rng);
        generations_run = generation;

        let generation_best = best_of(&population);
        state.history.push(generation_best.fitness_total());

        if generation_best.fitness_total() < state.best.fitness_total() {
            state.best = generation_best.clone();
            state.best_generation = generation;
            state.stagnation = 0;
            info!(
                "New best at generation {}: fitness = {:.2}",
                generation,
                state.best.fitness_total()
            );
        } else {
            state.stagnation += 1;
        }

        debug!(
            "Generation {} done: best = {:.2}, stagnation = {}",
            generation,
            state.best.fitness_total(),
            state.stagnation
        );

        if state.stagnation >= config.stagnation_limit {
            info!(
                "No improvement for {} generations, stopping early at generation {}",
                state.stagnation, generation
            );
            break;
        }
    }

    let mut best = state.best;
    {
        let refine_span = span!(Level::INFO, "local_search");
        let _guard = refine_span.enter();
        local_search::refine(&mut best, &evaluator);
    }

    info!(
        "Optimization complete: best found at generation {}, fitness = {:.2}",
        state.best_generation,
        best.fitness_total()
    );

    Ok(OptimizationResult::from_chromosome(
        &best,
        &evaluator,
        generations_run,
        state.history,
        started.elapsed().as_secs_f64(),
    ))
}

/// One full SELECT -> CROSSOVER -> MUTATE -> EVALUATE -> ELITE-MERGE cycle.
fn run_generation(
    population: &mut Vec<Chromosome>,
    evaluator: &Evaluator<'_>,
    config: &OptimizationConfig,
    rng: &mut ChaCha8Rng,
) {
    let parents = select(population, config.tournament_size, rng);

    let mut offspring = Vec::with_capacity(parents.len());
    for pair in parents.chunks(2) {
        if pair.len() == 2 && rng.gen::<f64>() < config.crossover_rate {
            let (child1, child2) = order_crossover(&pair[0], &pair[1], evaluator, rng);
            offspring.push(child1);
            offspring.push(child2);
        } else {
            offspring.extend(pair.iter().cloned());
        }
    }

    for individual in &mut offspring {
        if rng.gen::<f64>() < config.mutation_rate {
            mutate(individual, evaluator, config.merge_len_threshold, rng);
        }
    }

    evaluate_population(&mut offspring, evaluator);

    // Elite merge: the prior generation's top-N compete with the offspring;
    // stable sort keeps offspring ahead of elites on equal fitness.
    let mut elites = population.clone();
    elites.sort_by(|a, b| a.fitness_total().total_cmp(&b.fitness_total()));
    elites.truncate(config.elite_size);

    offspring.extend(elites);
    offspring.sort_by(|a, b| a.fitness_total().total_cmp(&b.fitness_total()));
    offspring.truncate(config.population_size);

    *population = offspring;
}

/// Score every unevaluated individual in parallel over read-only inputs.
fn evaluate_population(population: &mut [Chromosome], evaluator: &Evaluator<'_>) {
    population.par_iter_mut().for_each(|individual| {
        if individual.cached_fitness.is_none() {
            individual.cached_fitness = Some(evaluator.evaluate(individual));
        }
    });
}

fn best_of(population: &[Chromosome]) -> &Chromosome {
    population
        .iter()
        .min_by(|a, b| a.fitness_total().total_cmp(&b.fitness_total()))
        .expect("population is never empty")
}

/// Reject inputs no assignment can be built for.
pub(crate) fn validate_inputs(
    deliveries: &[Delivery],
    vehicles: &[Vehicle],
) -> Result<(), SolverError> {
    if !deliveries.is_empty() && vehicles.is_empty() {
        return Err(SolverError::InfeasibleInput(
            "no vehicles available for a non-empty delivery set".into(),
        ));
    }

    let mut ids = HashSet::new();
    for delivery in deliveries {
        if !ids.insert(delivery.id.as_str()) {
            return Err(SolverError::InfeasibleInput(format!(
                "duplicate delivery id '{}'",
                delivery.id
            )));
        }
        if !delivery.weight.is_finite() || delivery.weight <= 0.0 {
            return Err(SolverError::InfeasibleInput(format!(
                "delivery '{}' has non-positive weight {}",
                delivery.id, delivery.weight
            )));
        }
    }

    for vehicle in vehicles {
        if vehicle.max_capacity <= 0.0 || vehicle.max_range <= 0.0 {
            return Err(SolverError::InfeasibleInput(format!(
                "vehicle '{}' must have positive capacity and range",
                vehicle.id
            )));
        }
        if vehicle.cost_per_km < 0.0 {
            return Err(SolverError::InfeasibleInput(format!(
                "vehicle '{}' has negative cost per km",
                vehicle.id
            )));
        }
    }

    Ok(())
}
