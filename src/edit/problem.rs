//! Bit-vector encoding of edge edits.

use crate::candidates::Candidate;
use crate::ga::operators::flip_bit_mutation;
use crate::ga::{Fitness, GaProblem};
use crate::graph::Topology;
use crate::score::{
    marginalized_nodes, network_score, score_labeled, Attributes, FitnessMode, Label, Weights,
};
use rand::Rng;

/// Per-bit flip probability once mutation fires.
pub const EDIT_FLIP_PROB: f64 = 0.2;

/// Edit search over a fixed candidate pool.
///
/// Gene `i` set means "toggle candidate `i`": the edge is removed if the
/// graph has it and added otherwise. Attributes never change during the
/// search, so the rarity weights are computed once and shared.
pub struct EditProblem<'a, G: Topology, V: Label> {
    graph: &'a G,
    attrs: &'a Attributes<G::Node, V>,
    weights: &'a Weights<V>,
    candidates: &'a [Candidate<G::Node>],
    threshold: f64,
    mode: FitnessMode,
}

impl<'a, G: Topology, V: Label> EditProblem<'a, G, V> {
    pub fn new(
        graph: &'a G,
        attrs: &'a Attributes<G::Node, V>,
        weights: &'a Weights<V>,
        candidates: &'a [Candidate<G::Node>],
        threshold: f64,
        mode: FitnessMode,
    ) -> Self {
        Self {
            graph,
            attrs,
            weights,
            candidates,
            threshold,
            mode,
        }
    }

    /// Number of genes.
    pub fn pool_size(&self) -> usize {
        self.candidates.len()
    }

    /// Applies the selected edits to a copy of the graph.
    ///
    /// Returns the edited graph and the endpoints of every selected
    /// candidate, in pool order.
    pub fn apply(&self, genes: &[bool]) -> (G, Vec<(G::Node, G::Node)>) {
        let mut graph = self.graph.clone();
        let mut applied = Vec::new();
        for (candidate, _) in self
            .candidates
            .iter()
            .zip(genes)
            .filter(|(_, &selected)| selected)
        {
            graph.toggle_edge(candidate.u, candidate.v);
            applied.push(candidate.endpoints());
        }
        (graph, applied)
    }
}

impl<G: Topology, V: Label> GaProblem for EditProblem<'_, G, V> {
    type Gene = bool;

    fn create_genes<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
        (0..self.candidates.len())
            .map(|_| rng.random_bool(0.5))
            .collect()
    }

    fn evaluate(&self, genes: &[bool]) -> Fitness {
        let (graph, applied) = self.apply(genes);
        let (scores, _) = score_labeled(&graph, self.attrs, self.weights);
        let marginalized = marginalized_nodes(&scores, self.threshold).len();
        let (primary, secondary) = self.mode.arrange(marginalized, network_score(&scores));
        Fitness::with_budget(primary, applied.len() as f64, secondary)
    }

    fn mutate<R: Rng>(&self, genes: &mut [bool], rng: &mut R) {
        flip_bit_mutation(genes, EDIT_FLIP_PROB, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph_from_edges;
    use crate::score::Marginalization;
    use petgraph::graphmap::UnGraphMap;

    fn net() -> (UnGraphMap<u32, ()>, Attributes<u32, char>) {
        let g = graph_from_edges(&[(0u32, 1), (0, 2), (0, 3), (3, 4), (3, 5), (3, 6), (4, 5)]);
        let attrs = [(0, 'r'), (1, 'r'), (2, 'r'), (3, 'c'), (4, 'c'), (5, 'c'), (6, 'c')]
            .into_iter()
            .collect();
        (g, attrs)
    }

    fn pool() -> Vec<Candidate<u32>> {
        vec![
            Candidate { u: 0, v: 4, weight: 1 },
            Candidate { u: 0, v: 3, weight: 0 },
        ]
    }

    #[test]
    fn test_apply_toggles_selected_candidates() {
        let (g, attrs) = net();
        let model = Marginalization::fit(&g, &attrs, 0.3).unwrap();
        let pool = pool();
        let problem = EditProblem::new(&g, &attrs, &model.weights, &pool, 0.3, FitnessMode::default());

        let (edited, applied) = problem.apply(&[true, true]);
        assert_eq!(applied, vec![(0, 4), (0, 3)]);
        assert!(edited.has_edge(0, 4));
        assert!(!edited.has_edge(0, 3));
        // The original is untouched.
        assert!(!g.has_edge(0, 4));
        assert!(g.has_edge(0, 3));
    }

    #[test]
    fn test_empty_selection_matches_fit() {
        let (g, attrs) = net();
        let model = Marginalization::fit(&g, &attrs, 0.3).unwrap();
        let pool = pool();
        let problem = EditProblem::new(&g, &attrs, &model.weights, &pool, 0.3, FitnessMode::default());

        let fitness = problem.evaluate(&[false, false]);
        assert_eq!(fitness.primary, model.marginalized.len() as f64);
        assert_eq!(fitness.budget, Some(0.0));
        assert!((fitness.secondary - model.network_score()).abs() < 1e-12);
    }

    #[test]
    fn test_budget_counts_set_bits() {
        let (g, attrs) = net();
        let model = Marginalization::fit(&g, &attrs, 0.3).unwrap();
        let pool = pool();
        let problem = EditProblem::new(&g, &attrs, &model.weights, &pool, 0.3, FitnessMode::MeanScore);

        assert_eq!(problem.evaluate(&[true, false]).budget, Some(1.0));
        assert_eq!(problem.evaluate(&[true, true]).budget, Some(2.0));
    }

    #[test]
    fn test_mean_score_mode_swaps_objectives() {
        let (g, attrs) = net();
        let model = Marginalization::fit(&g, &attrs, 0.3).unwrap();
        let pool = pool();
        let problem = EditProblem::new(&g, &attrs, &model.weights, &pool, 0.3, FitnessMode::MeanScore);

        let fitness = problem.evaluate(&[false, false]);
        assert!((fitness.primary - model.network_score()).abs() < 1e-12);
        assert_eq!(fitness.secondary, model.marginalized.len() as f64);
    }
}
