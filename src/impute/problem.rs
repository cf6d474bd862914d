//! Categorical encoding of missing attribute values.

use crate::ga::operators::replace_value_mutation;
use crate::ga::{Fitness, GaProblem};
use crate::graph::Topology;
use crate::score::{
    marginalized_nodes, network_score, rarity_weights, score_labeled, value_counts, Attributes,
    FitnessMode, Label,
};
use rand::Rng;

/// Per-gene replacement probability once mutation fires.
pub const IMPUTE_REPLACE_PROB: f64 = 0.05;

/// Imputation search: one gene per missing node, in ascending node order.
///
/// Every evaluation recomputes the rarity weights, since the value
/// distribution shifts with each assignment.
pub struct ImputeProblem<'a, G: Topology, V: Label> {
    graph: &'a G,
    known: &'a Attributes<G::Node, V>,
    missing: Vec<G::Node>,
    domain: Vec<V>,
    threshold: f64,
    mode: FitnessMode,
}

impl<'a, G: Topology, V: Label> ImputeProblem<'a, G, V> {
    /// `missing` is sorted and deduplicated. The domain is the set of
    /// distinct values in `known`.
    pub fn new(
        graph: &'a G,
        known: &'a Attributes<G::Node, V>,
        mut missing: Vec<G::Node>,
        threshold: f64,
        mode: FitnessMode,
    ) -> Self {
        missing.sort_unstable();
        missing.dedup();
        let domain = value_counts(known.values()).into_keys().collect();
        Self {
            graph,
            known,
            missing,
            domain,
            threshold,
            mode,
        }
    }

    pub fn missing(&self) -> &[G::Node] {
        &self.missing
    }

    /// Distinct known values, ascending.
    pub fn domain(&self) -> &[V] {
        &self.domain
    }

    /// Known values plus one value per missing node.
    pub fn complete(&self, genes: &[V]) -> Attributes<G::Node, V> {
        let mut attrs = self.known.clone();
        attrs.extend(self.missing.iter().copied().zip(genes.iter().cloned()));
        attrs
    }
}

impl<G: Topology, V: Label> GaProblem for ImputeProblem<'_, G, V> {
    type Gene = V;

    /// Draws each gene from the known values, so frequent values are
    /// proportionally more likely.
    fn create_genes<R: Rng>(&self, rng: &mut R) -> Vec<V> {
        let known: Vec<&V> = self.known.values().collect();
        if known.is_empty() {
            return Vec::new();
        }
        self.missing
            .iter()
            .map(|_| known[rng.random_range(0..known.len())].clone())
            .collect()
    }

    fn evaluate(&self, genes: &[V]) -> Fitness {
        let attrs = self.complete(genes);
        let n = attrs.len().max(2);
        let weights = rarity_weights(&value_counts(attrs.values()), n);
        let (scores, _) = score_labeled(self.graph, &attrs, &weights);
        let marginalized = marginalized_nodes(&scores, self.threshold).len();
        let (primary, secondary) = self.mode.arrange(marginalized, network_score(&scores));
        Fitness::new(primary, secondary)
    }

    fn mutate<R: Rng>(&self, genes: &mut [V], rng: &mut R) {
        replace_value_mutation(genes, &self.domain, IMPUTE_REPLACE_PROB, rng);
    }
}
