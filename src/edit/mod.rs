//! Edge-edit search.
//!
//! Searches subsets of a candidate pool for the edits that most reduce
//! marginalization. Each individual is one bit per candidate; evaluation
//! toggles the selected edges on a private copy of the graph and rescores
//! it. Objectives, all minimized:
//!
//! 1. the metric chosen by [`FitnessMode`]
//! 2. the number of edits (bits set)
//! 3. the other metric
//!
//! An empty pool is not an error: the search evaluates generation 0 only
//! and returns the graph unchanged.

mod problem;

pub use problem::{EditProblem, EDIT_FLIP_PROB};

use crate::candidates::Candidate;
use crate::error::{FairnetError, Result};
use crate::ga::{Fitness, GaConfig, GaRunner, Individual, Logbook};
use crate::graph::Topology;
use crate::score::{ensure_labeled, Attributes, FitnessMode, Label, Marginalization};
use tracing::info;

/// Result of [`search_edits`].
#[derive(Debug, Clone)]
pub struct EditOutcome<G: Topology> {
    /// Input graph with the best individual's edits applied.
    pub edited_graph: G,

    /// Endpoints of every applied candidate, in pool order.
    pub applied_edits: Vec<(G::Node, G::Node)>,

    /// Best-so-far individual over the whole run.
    pub best: Individual<bool>,

    pub best_fitness: Fitness,

    /// Best fitness of generation 0.
    pub initial_best: Fitness,

    pub logbook: Logbook,
}

/// Runs the edit search over `candidates`.
///
/// `model` must come from fitting `graph` and `attrs`; its weights and
/// threshold are reused for every evaluation.
///
/// # Errors
///
/// - [`FairnetError::InvalidConfig`] if `config` does not validate
/// - [`FairnetError::MissingAttribute`] if a node has no value
pub fn search_edits<G: Topology, V: Label>(
    graph: &G,
    attrs: &Attributes<G::Node, V>,
    model: &Marginalization<G::Node, V>,
    candidates: &[Candidate<G::Node>],
    mode: FitnessMode,
    config: &GaConfig,
) -> Result<EditOutcome<G>> {
    config.validate().map_err(FairnetError::InvalidConfig)?;
    ensure_labeled(graph, attrs)?;

    let config = if candidates.is_empty() {
        config.clone().with_generations(0)
    } else {
        config.clone()
    };
    info!(
        pool = candidates.len(),
        generations = config.generations,
        population = config.population_size,
        ?mode,
        "starting edit search"
    );

    let problem = EditProblem::new(
        graph,
        attrs,
        &model.weights,
        candidates,
        model.threshold,
        mode,
    );
    let result = GaRunner::run(&problem, &config)?;
    let (edited_graph, applied_edits) = problem.apply(&result.best.genes);
    info!(applied = applied_edits.len(), "edit search finished");

    Ok(EditOutcome {
        edited_graph,
        applied_edits,
        best: result.best,
        best_fitness: result.best_fitness,
        initial_best: result.initial_best,
        logbook: result.logbook,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::{generate_candidates, CandidateConfig, Strategy};
    use crate::graph::graph_from_edges;
    use petgraph::graphmap::UnGraphMap;

    type Net = (UnGraphMap<u32, ()>, Attributes<u32, char>);

    /// Two "r" hubs bridged through a "x" connector, plus a "c" triangle
    /// hanging off hub 10.
    fn net() -> Net {
        let g = graph_from_edges(&[
            (0u32, 1),
            (0, 2),
            (0, 3),
            (0, 5),
            (10, 11),
            (10, 12),
            (10, 5),
            (10, 20),
            (20, 21),
            (20, 22),
            (21, 22),
        ]);
        let mut attrs = Attributes::new();
        for n in [0, 1, 2, 3, 10, 11, 12] {
            attrs.insert(n, 'r');
        }
        attrs.insert(5, 'x');
        for n in [20, 21, 22] {
            attrs.insert(n, 'c');
        }
        (g, attrs)
    }

    fn config() -> GaConfig {
        GaConfig::default()
            .with_population_size(30)
            .with_generations(15)
            .with_seed(7)
            .with_parallel(false)
    }

    fn pool(net: &Net, model: &Marginalization<u32, char>) -> Vec<Candidate<u32>> {
        let config = CandidateConfig::new(Strategy::default()).with_to_add(1.0);
        generate_candidates(&net.0, &net.1, model, &config).unwrap()
    }

    #[test]
    fn test_add_only_local_search() {
        let net = net();
        let model = Marginalization::fit(&net.0, &net.1, 0.3).unwrap();
        assert!(!model.marginalized.is_empty());
        let pool = pool(&net, &model);
        assert!(!pool.is_empty());

        let outcome =
            search_edits(&net.0, &net.1, &model, &pool, FitnessMode::MeanScore, &config()).unwrap();

        let bits = outcome.best.genes.iter().filter(|&&b| b).count();
        assert_eq!(outcome.best.genes.len(), pool.len());
        assert!(bits <= pool.len());
        assert_eq!(outcome.applied_edits.len(), bits);
        assert_eq!(outcome.best_fitness.budget, Some(bits as f64));
        assert!(!outcome.initial_best.is_better_than(&outcome.best_fitness));
        assert_eq!(outcome.logbook.len(), 16);
    }

    #[test]
    fn test_primary_only_trades_against_other_objectives() {
        // The archive compares the summed objectives, so the primary metric
        // may rise only if the budget or the secondary metric falls.
        let net = net();
        let model = Marginalization::fit(&net.0, &net.1, 0.3).unwrap();
        let pool = pool(&net, &model);
        for mode in [FitnessMode::MeanScore, FitnessMode::MarginalizedNodes] {
            for seed in 0..20 {
                let config = config().with_seed(seed);
                let outcome = search_edits(&net.0, &net.1, &model, &pool, mode, &config).unwrap();
                let (start, end) = (outcome.initial_best, outcome.best_fitness);
                assert!(end.weighted_sum() >= start.weighted_sum(), "seed {seed}");

                let budget = |f: Fitness| f.budget.unwrap_or(0.0);
                if budget(end) >= budget(start) && end.secondary >= start.secondary {
                    assert!(end.primary <= start.primary, "{mode:?} seed {seed}");
                }
            }
        }
    }

    #[test]
    fn test_reapplying_edits_reproduces_graph() {
        let net = net();
        let model = Marginalization::fit(&net.0, &net.1, 0.3).unwrap();
        let pool = pool(&net, &model);
        let outcome = search_edits(
            &net.0,
            &net.1,
            &model,
            &pool,
            FitnessMode::MarginalizedNodes,
            &config(),
        )
        .unwrap();

        let mut replay = net.0.clone();
        for &(u, v) in &outcome.applied_edits {
            replay.toggle_edge(u, v);
        }
        assert_eq!(Topology::edges(&replay), Topology::edges(&outcome.edited_graph));
        assert_eq!(Topology::nodes(&replay), Topology::nodes(&outcome.edited_graph));
    }

    #[test]
    fn test_empty_pool_degenerates_to_generation_zero() {
        let net = net();
        let model = Marginalization::fit(&net.0, &net.1, 0.3).unwrap();
        let outcome = search_edits(
            &net.0,
            &net.1,
            &model,
            &[],
            FitnessMode::default(),
            &config(),
        )
        .unwrap();

        assert_eq!(outcome.logbook.len(), 1);
        assert!(outcome.applied_edits.is_empty());
        assert!(outcome.best.genes.is_empty());
        assert_eq!(Topology::edges(&outcome.edited_graph), Topology::edges(&net.0));
        assert_eq!(outcome.best_fitness, outcome.initial_best);
        assert_eq!(outcome.best_fitness.budget, Some(0.0));
    }

    #[test]
    fn test_invalid_config_fails_before_search() {
        let net = net();
        let model = Marginalization::fit(&net.0, &net.1, 0.3).unwrap();
        let bad = config().with_population_size(0);
        let err = search_edits(&net.0, &net.1, &model, &[], FitnessMode::default(), &bad);
        assert!(matches!(err, Err(FairnetError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_attribute_rejected() {
        let net = net();
        let model = Marginalization::fit(&net.0, &net.1, 0.3).unwrap();
        let mut attrs = net.1.clone();
        attrs.remove(&21);
        let err = search_edits(&net.0, &attrs, &model, &[], FitnessMode::default(), &config());
        assert!(matches!(err, Err(FairnetError::MissingAttribute(_))));
    }
}
