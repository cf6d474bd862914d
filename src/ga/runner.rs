//! GA generational loop execution.
//!
//! [`GaRunner`] drives the search:
//! seed generation 0 → (select → vary → evaluate → update best) × generations.
//!
//! Each generation replaces the whole population with tournament-selected
//! offspring. Consecutive offspring pairs are recombined with probability
//! `crossover_prob`, then each offspring is mutated with probability
//! `mutation_prob`. Only individuals whose genes changed are re-evaluated.
//! A size-1 best-so-far archive survives population turnover.

use super::config::GaConfig;
use super::logbook::{LogRecord, Logbook};
use super::selection::select_tournament;
use super::types::{Fitness, GaProblem, Individual};
use crate::error::{FairnetError, Result};
use rand::Rng;
use tracing::{debug, info};
use u_numflow::random::create_rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<G> {
    /// Best individual found during the entire run.
    pub best: Individual<G>,

    /// Fitness of `best`.
    pub best_fitness: Fitness,

    /// Best fitness of generation 0.
    pub initial_best: Fitness,

    /// Generations executed after generation 0.
    pub generations: usize,

    /// One record per generation, generation 0 included.
    pub logbook: Logbook,
}

/// Executes the GA generational loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config)?;
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA.
    ///
    /// # Errors
    ///
    /// [`FairnetError::InvalidConfig`] if `config` does not validate. The
    /// check happens before any individual is created.
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> Result<GaResult<P::Gene>> {
        config.validate().map_err(FairnetError::InvalidConfig)?;

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        // 1. Seed generation 0
        let mut population: Vec<Individual<P::Gene>> = (0..config.population_size)
            .map(|_| Individual::new(problem.create_genes(&mut rng)))
            .collect();
        evaluate_invalid(problem, &mut population, config.parallel);

        // 2. Best-so-far archive
        let mut best = population[best_index(&population)].clone();
        let initial_best = fitness_of(&best);

        let mut logbook = Logbook::new();
        let record = compile_record(0, &population, &best);
        debug!(?record, "generation complete");
        problem.on_generation(&record);
        logbook.record(record);

        // 3. Generational loop
        for gen in 1..=config.generations {
            let mut offspring = select_tournament(
                &population,
                config.tournament_size,
                population.len(),
                &mut rng,
            );

            for pair in offspring.chunks_exact_mut(2) {
                if rng.random_range(0.0..1.0) < config.crossover_prob {
                    let (left, right) = pair.split_at_mut(1);
                    problem.crossover(&mut left[0].genes, &mut right[0].genes, &mut rng);
                    left[0].invalidate();
                    right[0].invalidate();
                }
            }

            for child in offspring.iter_mut() {
                if rng.random_range(0.0..1.0) < config.mutation_prob {
                    problem.mutate(&mut child.genes, &mut rng);
                    child.invalidate();
                }
            }

            evaluate_invalid(problem, &mut offspring, config.parallel);

            let candidate = &offspring[best_index(&offspring)];
            if candidate.score() > best.score() {
                best = candidate.clone();
            }

            population = offspring;

            let record = compile_record(gen, &population, &best);
            debug!(?record, "generation complete");
            problem.on_generation(&record);
            logbook.record(record);
        }

        let best_fitness = fitness_of(&best);
        info!(
            generations = config.generations,
            best = ?best_fitness.values(),
            "search finished"
        );

        Ok(GaResult {
            best,
            best_fitness,
            initial_best,
            generations: config.generations,
            logbook,
        })
    }
}

/// Evaluates every individual without a fitness.
#[cfg_attr(not(feature = "parallel"), allow(unused_variables))]
fn evaluate_invalid<P: GaProblem>(
    problem: &P,
    population: &mut [Individual<P::Gene>],
    parallel: bool,
) {
    #[cfg(feature = "parallel")]
    if parallel {
        population
            .par_iter_mut()
            .filter(|ind| !ind.is_evaluated())
            .for_each(|ind| {
                ind.fitness = Some(problem.evaluate(&ind.genes));
            });
        return;
    }

    for ind in population.iter_mut().filter(|ind| !ind.is_evaluated()) {
        ind.fitness = Some(problem.evaluate(&ind.genes));
    }
}

/// Index of the first individual with the best weighted sum.
fn best_index<G>(population: &[Individual<G>]) -> usize {
    let mut best = 0;
    for (i, ind) in population.iter().enumerate().skip(1) {
        if ind.score() > population[best].score() {
            best = i;
        }
    }
    best
}

fn fitness_of<G>(ind: &Individual<G>) -> Fitness {
    ind.fitness
        .unwrap_or_else(|| Fitness::new(f64::INFINITY, f64::INFINITY))
}

/// Population statistics on the primary objective plus the archive's
/// remaining objectives.
fn compile_record<G>(
    generation: usize,
    population: &[Individual<G>],
    best: &Individual<G>,
) -> LogRecord {
    let primaries: Vec<f64> = population
        .iter()
        .filter_map(|ind| ind.fitness.map(|f| f.primary))
        .collect();
    let min = primaries.iter().copied().fold(f64::INFINITY, f64::min);
    let average = if primaries.is_empty() {
        f64::NAN
    } else {
        primaries.iter().sum::<f64>() / primaries.len() as f64
    };
    let archived = fitness_of(best);
    LogRecord {
        generation,
        best: min,
        average,
        secondary: archived.secondary,
        budget: archived.budget,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::operators::flip_bit_mutation;

    // ---- OneMax: minimize the number of false bits ----

    struct OneMaxProblem {
        n: usize,
    }

    impl GaProblem for OneMaxProblem {
        type Gene = bool;

        fn create_genes<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
            (0..self.n).map(|_| rng.random_bool(0.5)).collect()
        }

        fn evaluate(&self, genes: &[bool]) -> Fitness {
            let zeros = genes.iter().filter(|&&b| !b).count() as f64;
            Fitness::new(zeros, 0.0)
        }

        fn mutate<R: Rng>(&self, genes: &mut [bool], rng: &mut R) {
            flip_bit_mutation(genes, 0.1, rng);
        }
    }

    fn config() -> GaConfig {
        GaConfig::default()
            .with_population_size(40)
            .with_generations(40)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_onemax_convergence() {
        let problem = OneMaxProblem { n: 20 };
        let result = GaRunner::run(&problem, &config()).unwrap();
        assert!(
            result.best_fitness.primary <= 4.0,
            "expected at most 4 zero bits, got {}",
            result.best_fitness.primary
        );
    }

    #[test]
    fn test_logbook_has_one_record_per_generation() {
        let problem = OneMaxProblem { n: 10 };
        let result = GaRunner::run(&problem, &config().with_generations(12)).unwrap();
        assert_eq!(result.logbook.len(), 13);
        for (i, r) in result.logbook.records().iter().enumerate() {
            assert_eq!(r.generation, i);
            assert!(r.best <= r.average);
            assert!(r.budget.is_none());
        }
    }

    #[test]
    fn test_archive_never_worsens() {
        let problem = OneMaxProblem { n: 16 };
        let result = GaRunner::run(&problem, &config()).unwrap();
        assert!(!result.initial_best.is_better_than(&result.best_fitness));
        assert!(result.best_fitness.primary <= result.initial_best.primary);
    }

    #[test]
    fn test_zero_generations_evaluates_seed_only() {
        let problem = OneMaxProblem { n: 8 };
        let result = GaRunner::run(&problem, &config().with_generations(0)).unwrap();
        assert_eq!(result.generations, 0);
        assert_eq!(result.logbook.len(), 1);
        assert_eq!(result.best_fitness, result.initial_best);
    }

    #[test]
    fn test_empty_genome() {
        let problem = OneMaxProblem { n: 0 };
        let result = GaRunner::run(&problem, &config().with_generations(3)).unwrap();
        assert!(result.best.genes.is_empty());
        assert_eq!(result.best_fitness.primary, 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let problem = OneMaxProblem { n: 8 };
        let err = GaRunner::run(&problem, &config().with_population_size(1)).unwrap_err();
        assert!(matches!(err, FairnetError::InvalidConfig(_)));
    }

    #[test]
    fn test_same_seed_same_result() {
        let problem = OneMaxProblem { n: 24 };
        let a = GaRunner::run(&problem, &config()).unwrap();
        let b = GaRunner::run(&problem, &config()).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.logbook, b.logbook);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let problem = OneMaxProblem { n: 24 };
        let seq = GaRunner::run(&problem, &config()).unwrap();
        let par = GaRunner::run(&problem, &config().with_parallel(true)).unwrap();
        assert_eq!(seq.best, par.best);
        assert_eq!(seq.logbook, par.logbook);
    }
}
