//! Genetic Algorithm engine.
//!
//! A small generational GA shared by the edit search and the imputation
//! search. Problems implement [`GaProblem`]; the engine owns selection,
//! variation, evaluation and the best-so-far archive.
//!
//! # Core Types
//!
//! - [`Individual`]: gene vector plus optional [`Fitness`]
//! - [`Fitness`]: objective values compared by their weighted sum
//! - [`GaProblem`]: gene creation, evaluation, crossover, mutation
//!
//! # Key Types
//!
//! - [`GaConfig`]: generations, population size, operator probabilities
//! - [`GaRunner`]: executes the generational loop
//! - [`GaResult`]: best individual and the [`Logbook`]
//!
//! # Submodules
//!
//! - [`operators`]: uniform crossover, bit-flip and categorical mutation
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod logbook;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use logbook::{LogRecord, Logbook};
pub use runner::{GaResult, GaRunner};
pub use selection::{select_tournament, tournament};
pub use types::{compare_fitness, Fitness, GaProblem, Individual, GENE_SWAP_PROB, OBJECTIVE_WEIGHT};
