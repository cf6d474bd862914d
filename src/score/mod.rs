//! Marginalization scoring.
//!
//! Turns the attribute distribution into rarity weights and combines the
//! weights with the topology into a signed per-node score:
//!
//! ```text
//! weight(a) = 1 - (count(a) - 1) / (N - 1)
//! ratio     = c·w(a) / (c·w(a) + (k - c)·(1 - w(a)))
//! score     = (ratio - 0.5) · 2
//! ```
//!
//! where `N` is the number of labeled nodes, `k` the node's degree and `c`
//! the number of neighbours sharing the node's value. Nodes with `k <= 2`
//! score exactly 0. A node with no neighbour sharing its value, a zero
//! denominator, or a value without a weight entry saturates the score to
//! `+1` instead of failing.
//!
//! A positive score marks a node surrounded by peers of its own rare value;
//! a negative score marks a node cut off from peers sharing its value.

mod types;

pub use types::{
    Attributes, FitnessMode, Label, Marginalization, MarginalizationSummary, Scores, Weights,
};

use crate::error::{FairnetError, Result};
use crate::graph::{NodeId, Topology};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Computes the rarity weight of every attribute value.
///
/// # Errors
///
/// [`FairnetError::TooFewLabeled`] if fewer than two nodes carry a value.
pub fn compute_weights<N: NodeId, V: Label>(attrs: &Attributes<N, V>) -> Result<Weights<V>> {
    let n = attrs.len();
    if n < 2 {
        return Err(FairnetError::TooFewLabeled(n));
    }
    Ok(rarity_weights(&value_counts(attrs.values()), n))
}

/// Frequency of each value.
pub(crate) fn value_counts<'a, V: Label>(
    values: impl Iterator<Item = &'a V>,
) -> BTreeMap<V, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v.clone()).or_insert(0usize) += 1;
    }
    counts
}

/// Weights from precomputed counts. `n` must be at least 2.
pub(crate) fn rarity_weights<V: Label>(counts: &BTreeMap<V, usize>, n: usize) -> Weights<V> {
    let denom = (n - 1) as f64;
    counts
        .iter()
        .map(|(v, &c)| (v.clone(), 1.0 - (c as f64 - 1.0) / denom))
        .collect()
}

/// Score of a single node.
///
/// # Errors
///
/// - [`FairnetError::UnknownNode`] if `node` is not in `graph`
/// - [`FairnetError::MissingAttribute`] if `node` or one of its neighbours
///   has no value
pub fn individual_score<G: Topology, V: Label>(
    graph: &G,
    node: G::Node,
    attrs: &Attributes<G::Node, V>,
    weights: &Weights<V>,
) -> Result<f64> {
    if !graph.contains_node(node) {
        return Err(FairnetError::UnknownNode(format!("{node:?}")));
    }
    let value = attrs
        .get(&node)
        .ok_or_else(|| FairnetError::MissingAttribute(format!("{node:?}")))?;
    if let Some(n) = graph
        .neighbors(node)
        .into_iter()
        .find(|n| !attrs.contains_key(n))
    {
        return Err(FairnetError::MissingAttribute(format!("{n:?}")));
    }
    Ok(score_node(graph, node, value, attrs, weights).0)
}

/// Scores every node of the graph.
///
/// # Errors
///
/// [`FairnetError::MissingAttribute`] for the first node without a value.
pub fn network_scores<G: Topology, V: Label>(
    graph: &G,
    attrs: &Attributes<G::Node, V>,
    weights: &Weights<V>,
) -> Result<Scores<G::Node>> {
    ensure_labeled(graph, attrs)?;
    Ok(score_labeled(graph, attrs, weights).0)
}

/// Mean absolute score. `0.0` for an empty map.
pub fn network_score<N: NodeId>(scores: &Scores<N>) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.values().map(|s| s.abs()).sum::<f64>() / scores.len() as f64
}

/// Nodes whose `|score|` exceeds `threshold`.
pub fn marginalized_nodes<N: NodeId>(scores: &Scores<N>, threshold: f64) -> BTreeSet<N> {
    scores
        .iter()
        .filter(|(_, s)| s.abs() > threshold)
        .map(|(&n, _)| n)
        .collect()
}

/// Groups scores by the value of the scored node.
///
/// Nodes without a value are skipped.
pub fn scores_by_attribute<N: NodeId, V: Label>(
    attrs: &Attributes<N, V>,
    scores: &Scores<N>,
) -> BTreeMap<V, Vec<f64>> {
    let mut groups: BTreeMap<V, Vec<f64>> = BTreeMap::new();
    for (node, &score) in scores {
        if let Some(v) = attrs.get(node) {
            groups.entry(v.clone()).or_default().push(score);
        }
    }
    groups
}

impl<N: NodeId, V: Label> Marginalization<N, V> {
    /// Runs a full scoring pass: weights, scores, marginalized set.
    ///
    /// # Errors
    ///
    /// Fails if a node has no value or fewer than two nodes are labeled.
    pub fn fit<G>(graph: &G, attrs: &Attributes<N, V>, threshold: f64) -> Result<Self>
    where
        G: Topology<Node = N>,
    {
        ensure_labeled(graph, attrs)?;
        let weights = compute_weights(attrs)?;
        let (scores, saturated) = score_labeled(graph, attrs, &weights);
        if saturated > 0 {
            debug!(saturated, "scores saturated on a zero denominator");
        }
        let marginalized = marginalized_nodes(&scores, threshold);
        Ok(Self {
            threshold,
            weights,
            scores,
            marginalized,
            saturated,
        })
    }

    /// Mean absolute score.
    pub fn network_score(&self) -> f64 {
        network_score(&self.scores)
    }

    /// Score of `node`, `None` if it was not scored.
    pub fn score(&self, node: N) -> Option<f64> {
        self.scores.get(&node).copied()
    }

    /// Whether `|score(node)|` exceeds the threshold of this pass.
    pub fn is_marginalized(&self, node: N) -> bool {
        self.marginalized.contains(&node)
    }

    /// Aggregate statistics of this pass.
    pub fn summary(&self) -> MarginalizationSummary<V> {
        let total = self.scores.len();
        let share = if total == 0 {
            0.0
        } else {
            self.marginalized.len() as f64 * 100.0 / total as f64
        };
        MarginalizationSummary {
            weights: self.weights.clone(),
            marginalized_count: self.marginalized.len(),
            marginalized_share: share,
            network_score: self.network_score(),
        }
    }
}

/// Fails on the first graph node without a value.
pub(crate) fn ensure_labeled<G: Topology, V: Label>(
    graph: &G,
    attrs: &Attributes<G::Node, V>,
) -> Result<()> {
    match graph.nodes().into_iter().find(|n| !attrs.contains_key(n)) {
        Some(n) => Err(FairnetError::MissingAttribute(format!("{n:?}"))),
        None => Ok(()),
    }
}

/// Scores every labeled node; returns the scores and the saturation count.
pub(crate) fn score_labeled<G: Topology, V: Label>(
    graph: &G,
    attrs: &Attributes<G::Node, V>,
    weights: &Weights<V>,
) -> (Scores<G::Node>, usize) {
    let mut saturated = 0usize;
    let mut scores = Scores::new();
    for node in graph.nodes() {
        let Some(value) = attrs.get(&node) else {
            continue;
        };
        let (score, hit) = score_node(graph, node, value, attrs, weights);
        if hit {
            saturated += 1;
        }
        scores.insert(node, score);
    }
    (scores, saturated)
}

/// Core formula. The flag reports a saturated score.
fn score_node<G: Topology, V: Label>(
    graph: &G,
    node: G::Node,
    value: &V,
    attrs: &Attributes<G::Node, V>,
    weights: &Weights<V>,
) -> (f64, bool) {
    let neighbors = graph.neighbors(node);
    let size = neighbors.len();
    if size <= 2 {
        return (0.0, false);
    }

    let Some(&w) = weights.get(value) else {
        return (1.0, true);
    };

    let count = neighbors
        .iter()
        .filter(|n| attrs.get(n) == Some(value))
        .count();
    if count == 0 {
        return (1.0, true);
    }
    let same = count as f64 * w;
    let denom = same + (size - count) as f64 * (1.0 - w);
    if !denom.is_finite() || denom <= 0.0 {
        return (1.0, true);
    }

    ((same / denom - 0.5) * 2.0, false)
}
