//! Core type definitions for the GA engine.
//!
//! An [`Individual`] is a plain record of genes plus an optional
//! [`Fitness`]. Fitness compares by a weighted sum in which every objective
//! carries weight [`OBJECTIVE_WEIGHT`] (= −1): all objectives are minimized
//! and a larger weighted sum is better. [`GaProblem`] is the contract
//! between the generic engine and the edit / imputation searches.

use super::logbook::LogRecord;
use super::operators::uniform_crossover;
use rand::Rng;
use std::cmp::Ordering;
use std::fmt::Debug;

/// Weight applied to every objective when scalarizing.
pub const OBJECTIVE_WEIGHT: f64 = -1.0;

/// Per-gene swap probability of the default uniform crossover.
pub const GENE_SWAP_PROB: f64 = 0.5;

/// Objective values of an evaluated individual.
///
/// `budget` is only present for searches that charge a cost per gene
/// (the edit search); the imputation search has two objectives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fitness {
    /// Metric selected by the fitness mode.
    pub primary: f64,

    /// Edit count, when the search has one.
    pub budget: Option<f64>,

    /// The metric not selected by the fitness mode.
    pub secondary: f64,
}

impl Fitness {
    /// Two-objective fitness.
    pub fn new(primary: f64, secondary: f64) -> Self {
        Self {
            primary,
            budget: None,
            secondary,
        }
    }

    /// Three-objective fitness `(primary, budget, secondary)`.
    pub fn with_budget(primary: f64, budget: f64, secondary: f64) -> Self {
        Self {
            primary,
            budget: Some(budget),
            secondary,
        }
    }

    /// Objective values in tuple order: primary, budget (if any), secondary.
    pub fn values(&self) -> Vec<f64> {
        match self.budget {
            Some(b) => vec![self.primary, b, self.secondary],
            None => vec![self.primary, self.secondary],
        }
    }

    /// Scalarized fitness. Higher is better.
    pub fn weighted_sum(&self) -> f64 {
        OBJECTIVE_WEIGHT * (self.primary + self.budget.unwrap_or(0.0) + self.secondary)
    }

    /// Strict comparison on the weighted sum.
    pub fn is_better_than(&self, other: &Fitness) -> bool {
        self.weighted_sum() > other.weighted_sum()
    }
}

/// Orders fitness values best first.
pub fn compare_fitness(a: &Fitness, b: &Fitness) -> Ordering {
    b.weighted_sum()
        .partial_cmp(&a.weighted_sum())
        .unwrap_or(Ordering::Equal)
}

/// A candidate solution: a fixed-length gene vector and its fitness.
///
/// `fitness` is `None` until the individual has been evaluated, and is
/// reset whenever crossover or mutation touches the genes.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual<G> {
    pub genes: Vec<G>,
    pub fitness: Option<Fitness>,
}

impl<G> Individual<G> {
    /// Unevaluated individual.
    pub fn new(genes: Vec<G>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Drops the fitness after the genes changed.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Weighted sum, `-inf` when unevaluated.
    pub fn score(&self) -> f64 {
        self.fitness
            .map_or(f64::NEG_INFINITY, |f| f.weighted_sum())
    }
}

/// Defines a GA search problem.
///
/// Implementors supply gene creation and evaluation; crossover defaults to
/// uniform crossover with [`GENE_SWAP_PROB`], mutation defaults to a no-op.
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the runner may evaluate
/// individuals in parallel. Evaluation must not consume randomness, so the
/// evaluation order never changes a run's outcome.
pub trait GaProblem: Send + Sync {
    /// Gene type.
    type Gene: Clone + Debug + Send + Sync;

    /// Creates the genes of a random individual.
    fn create_genes<R: Rng>(&self, rng: &mut R) -> Vec<Self::Gene>;

    /// Evaluates a gene vector. All objectives are minimized.
    fn evaluate(&self, genes: &[Self::Gene]) -> Fitness;

    /// Recombines two gene vectors in place.
    fn crossover<R: Rng>(&self, a: &mut [Self::Gene], b: &mut [Self::Gene], rng: &mut R) {
        uniform_crossover(a, b, GENE_SWAP_PROB, rng);
    }

    /// Mutates a gene vector in place.
    fn mutate<R: Rng>(&self, _genes: &mut [Self::Gene], _rng: &mut R) {}

    /// Called after each generation's record is written.
    fn on_generation(&self, _record: &LogRecord) {}
}
