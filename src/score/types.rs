//! Data types produced by the scoring model.

use crate::error::FairnetError;
use crate::graph::NodeId;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Categorical attribute value bound.
///
/// Values are unordered in meaning; `Ord` is only required so that maps
/// keyed by value iterate deterministically.
pub trait Label: Clone + Ord + Debug + Send + Sync + 'static {}

impl<T> Label for T where T: Clone + Ord + Debug + Send + Sync + 'static {}

/// Node → attribute value. Nodes without an entry are "missing".
pub type Attributes<N, V> = BTreeMap<N, V>;

/// Attribute value → rarity weight.
pub type Weights<V> = BTreeMap<V, f64>;

/// Node → signed marginalization score in `[-1, 1]`.
pub type Scores<N> = BTreeMap<N, f64>;

/// Which metric a search minimizes first.
///
/// The other metric is always carried as the secondary objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FitnessMode {
    /// Number of nodes whose `|score|` exceeds the threshold.
    #[default]
    MarginalizedNodes,
    /// Mean absolute score over the network.
    MeanScore,
}

impl FitnessMode {
    /// Orders `(marginalized count, mean score)` as `(primary, secondary)`.
    pub fn arrange(self, marginalized: usize, mean_score: f64) -> (f64, f64) {
        match self {
            FitnessMode::MarginalizedNodes => (marginalized as f64, mean_score),
            FitnessMode::MeanScore => (mean_score, marginalized as f64),
        }
    }
}

impl FromStr for FitnessMode {
    type Err = FairnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nodes" => Ok(FitnessMode::MarginalizedNodes),
            "marg" => Ok(FitnessMode::MeanScore),
            other => Err(FairnetError::UnknownFitnessMode(other.to_string())),
        }
    }
}

/// Output of one scoring pass over a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Marginalization<N: NodeId, V: Label> {
    /// Threshold used to build [`marginalized`](Self::marginalized).
    pub threshold: f64,

    /// Rarity weight per attribute value.
    pub weights: Weights<V>,

    /// Score per node.
    pub scores: Scores<N>,

    /// Nodes with `|score| > threshold`.
    pub marginalized: BTreeSet<N>,

    /// Nodes whose score hit the degenerate-denominator case and was
    /// saturated to `+1`.
    pub saturated: usize,
}

/// Aggregate view of a [`Marginalization`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarginalizationSummary<V: Label> {
    pub weights: Weights<V>,
    pub marginalized_count: usize,
    /// Percentage of scored nodes that are marginalized.
    pub marginalized_share: f64,
    /// Mean absolute score.
    pub network_score: f64,
}
