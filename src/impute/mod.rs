//! Missing-attribute imputation search.
//!
//! Nodes without a value get one gene each. Genes are drawn from the
//! values already present, and the search keeps the assignment that
//! leaves the network least marginalized. Objectives, both minimized: the
//! metric chosen by [`FitnessMode`], then the other one. There is no edit
//! budget; every missing node always receives a value.

mod problem;

pub use problem::{ImputeProblem, IMPUTE_REPLACE_PROB};

use crate::error::{FairnetError, Result};
use crate::ga::{Fitness, GaConfig, GaRunner, Individual, Logbook};
use crate::graph::Topology;
use crate::score::{Attributes, FitnessMode, Label};
use tracing::info;

/// Result of [`impute_missing`].
#[derive(Debug, Clone)]
pub struct ImputeOutcome<N: Ord, V> {
    /// Known values plus the best assignment. Covers every graph node.
    pub completed: Attributes<N, V>,

    /// Only the values assigned by the search.
    pub imputed: Attributes<N, V>,

    pub best: Individual<V>,
    pub best_fitness: Fitness,
    pub initial_best: Fitness,
    pub logbook: Logbook,
}

/// Graph nodes without a value, ascending.
pub fn missing_nodes<G: Topology, V: Label>(
    graph: &G,
    attrs: &Attributes<G::Node, V>,
) -> Vec<G::Node> {
    graph
        .nodes()
        .into_iter()
        .filter(|n| !attrs.contains_key(n))
        .collect()
}

/// Fills every node of `graph` that has no value in `attrs`.
///
/// # Errors
///
/// - [`FairnetError::InvalidConfig`] if `config` does not validate
/// - [`FairnetError::EmptyDomain`] if nodes are missing but no value is known
/// - [`FairnetError::TooFewLabeled`] if fewer than two nodes would be labeled
pub fn impute_missing<G: Topology, V: Label>(
    graph: &G,
    attrs: &Attributes<G::Node, V>,
    threshold: f64,
    mode: FitnessMode,
    config: &GaConfig,
) -> Result<ImputeOutcome<G::Node, V>> {
    config.validate().map_err(FairnetError::InvalidConfig)?;

    let missing = missing_nodes(graph, attrs);
    if !missing.is_empty() && attrs.is_empty() {
        return Err(FairnetError::EmptyDomain);
    }
    let labeled = attrs.len() + missing.len();
    if labeled < 2 {
        return Err(FairnetError::TooFewLabeled(labeled));
    }

    let problem = ImputeProblem::new(graph, attrs, missing, threshold, mode);
    info!(
        missing = problem.missing().len(),
        domain = problem.domain().len(),
        ?mode,
        "starting imputation search"
    );

    let result = GaRunner::run(&problem, config)?;
    let completed = problem.complete(&result.best.genes);
    let imputed = problem
        .missing()
        .iter()
        .copied()
        .zip(result.best.genes.iter().cloned())
        .collect();

    Ok(ImputeOutcome {
        completed,
        imputed,
        best: result.best,
        best_fitness: result.best_fitness,
        initial_best: result.initial_best,
        logbook: result.logbook,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph_from_edges;
    use crate::score::Marginalization;
    use petgraph::graphmap::UnGraphMap;

    /// Two triangles joined by a path; a third of the nodes are unlabeled.
    fn net() -> (UnGraphMap<u32, ()>, Attributes<u32, u8>) {
        let g = graph_from_edges(&[
            (0u32, 1),
            (0, 2),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 6),
            (5, 7),
            (6, 7),
            (0, 8),
        ]);
        let attrs = [(0, 1), (1, 1), (2, 2), (4, 2), (5, 3), (6, 3)]
            .into_iter()
            .collect();
        (g, attrs)
    }

    fn config() -> GaConfig {
        GaConfig::default()
            .with_population_size(20)
            .with_generations(10)
            .with_seed(3)
            .with_parallel(false)
    }

    #[test]
    fn test_completes_every_node() {
        let (g, attrs) = net();
        let outcome = impute_missing(&g, &attrs, 0.3, FitnessMode::default(), &config()).unwrap();

        assert!(missing_nodes(&g, &outcome.completed).is_empty());
        for (node, value) in &attrs {
            assert_eq!(outcome.completed.get(node), Some(value));
        }
        assert_eq!(outcome.imputed.keys().copied().collect::<Vec<_>>(), vec![3, 7, 8]);
        for value in outcome.imputed.values() {
            assert!([1, 2, 3].contains(value));
        }
        assert!(Marginalization::fit(&g, &outcome.completed, 0.3).is_ok());
    }

    #[test]
    fn test_logbook_has_no_budget() {
        let (g, attrs) = net();
        let outcome = impute_missing(&g, &attrs, 0.3, FitnessMode::MeanScore, &config()).unwrap();
        assert_eq!(outcome.logbook.len(), 11);
        assert!(outcome.logbook.records().iter().all(|r| r.budget.is_none()));
        assert!(!outcome.initial_best.is_better_than(&outcome.best_fitness));
    }

    #[test]
    fn test_nothing_missing() {
        let (g, mut attrs) = net();
        for n in [3, 7, 8] {
            attrs.insert(n, 1);
        }
        let outcome = impute_missing(&g, &attrs, 0.3, FitnessMode::default(), &config()).unwrap();
        assert_eq!(outcome.completed, attrs);
        assert!(outcome.imputed.is_empty());
    }

    #[test]
    fn test_empty_domain() {
        let (g, _) = net();
        let err = impute_missing(
            &g,
            &Attributes::<u32, u8>::new(),
            0.3,
            FitnessMode::default(),
            &config(),
        );
        assert_eq!(err.unwrap_err(), FairnetError::EmptyDomain);
    }

    #[test]
    fn test_same_seed_same_assignment() {
        let (g, attrs) = net();
        let a = impute_missing(&g, &attrs, 0.3, FitnessMode::default(), &config()).unwrap();
        let b = impute_missing(&g, &attrs, 0.3, FitnessMode::default(), &config()).unwrap();
        assert_eq!(a.completed, b.completed);
    }
}
