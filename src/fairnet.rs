//! Orchestrator tying scoring, candidate generation and the searches
//! together over one graph and its attribute mapping.
//!
//! ```text
//! FairNet::new ──► fit ──► search_edits ──► (graph replaced, fit dropped)
//!        │
//!        └────► impute_missing ──► (attributes completed, fit dropped)
//! ```
//!
//! Missing values are allowed at construction time and only reported.
//! Scoring fails until they are imputed.

use crate::candidates::{generate_candidates, Candidate, CandidateConfig};
use crate::edit::{search_edits, EditOutcome};
use crate::error::{FairnetError, Result};
use crate::ga::{GaConfig, Logbook};
use crate::graph::Topology;
use crate::impute::{impute_missing, missing_nodes, ImputeOutcome};
use crate::score::{
    scores_by_attribute, Attributes, FitnessMode, Label, Marginalization, MarginalizationSummary,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Stateful façade over one network.
///
/// # Examples
///
/// ```
/// use u_fairnet::candidates::{CandidateConfig, Strategy};
/// use u_fairnet::fairnet::FairNet;
/// use u_fairnet::ga::GaConfig;
/// use u_fairnet::graph::graph_from_edges;
/// use u_fairnet::score::FitnessMode;
///
/// let graph = graph_from_edges(&[(0u32, 1), (0, 2), (0, 3), (3, 4), (3, 5), (3, 6), (4, 5)]);
/// let attrs = [(0, 'r'), (1, 'r'), (2, 'r'), (3, 'c'), (4, 'c'), (5, 'c'), (6, 'c')]
///     .into_iter()
///     .collect();
///
/// let mut net = FairNet::new(graph, attrs);
/// let model = net.fit(0.3).unwrap();
/// assert!(model.is_marginalized(0));
///
/// let candidates = CandidateConfig::new(Strategy::default()).with_to_add(1.0);
/// let ga = GaConfig::default().with_population_size(10).with_generations(3).with_seed(1);
/// let outcome = net.search_edits(FitnessMode::default(), &candidates, &ga).unwrap();
/// assert_eq!(net.applied_edits(), outcome.applied_edits.as_slice());
/// ```
#[derive(Debug, Clone)]
pub struct FairNet<G: Topology, V: Label> {
    graph: G,
    attrs: Attributes<G::Node, V>,
    missing: Vec<G::Node>,
    model: Option<Marginalization<G::Node, V>>,
    candidates: Vec<Candidate<G::Node>>,
    applied: Vec<(G::Node, G::Node)>,
    logbook: Option<Logbook>,
}

impl<G: Topology, V: Label> FairNet<G, V> {
    /// Takes ownership of the network. Nodes without a value are recorded
    /// and reported with a warning.
    pub fn new(graph: G, attrs: Attributes<G::Node, V>) -> Self {
        let missing = missing_nodes(&graph, &attrs);
        if !missing.is_empty() {
            warn!(
                missing = missing.len(),
                nodes = graph.node_count(),
                "nodes without an attribute value; impute them before scoring"
            );
        }
        Self {
            graph,
            attrs,
            missing,
            model: None,
            candidates: Vec::new(),
            applied: Vec::new(),
            logbook: None,
        }
    }

    /// Scores the current network and keeps the result.
    ///
    /// # Errors
    ///
    /// [`FairnetError::MissingAttribute`] while values are missing;
    /// [`FairnetError::TooFewLabeled`] for fewer than two labeled nodes.
    pub fn fit(&mut self, threshold: f64) -> Result<&Marginalization<G::Node, V>> {
        let model = Marginalization::fit(&self.graph, &self.attrs, threshold)?;
        info!(
            threshold,
            marginalized = model.marginalized.len(),
            network_score = model.network_score(),
            "network scored"
        );
        Ok(self.model.insert(model))
    }

    /// Generates candidates from the current fit, runs the edit search and
    /// adopts the edited graph.
    ///
    /// The fit is dropped afterwards since it describes the old graph.
    ///
    /// # Errors
    ///
    /// Configuration errors are reported before anything runs;
    /// [`FairnetError::NotFitted`] without a prior [`fit`](Self::fit).
    pub fn search_edits(
        &mut self,
        mode: FitnessMode,
        candidates: &CandidateConfig,
        config: &GaConfig,
    ) -> Result<EditOutcome<G>> {
        candidates.validate()?;
        config.validate().map_err(FairnetError::InvalidConfig)?;
        let model = self.model.as_ref().ok_or(FairnetError::NotFitted)?;

        let pool = generate_candidates(&self.graph, &self.attrs, model, candidates)?;
        let outcome = search_edits(&self.graph, &self.attrs, model, &pool, mode, config)?;

        self.candidates = pool;
        self.graph = outcome.edited_graph.clone();
        self.applied = outcome.applied_edits.clone();
        self.logbook = Some(outcome.logbook.clone());
        self.model = None;
        Ok(outcome)
    }

    /// Imputes every missing value and adopts the completed mapping.
    ///
    /// # Errors
    ///
    /// See [`impute_missing`].
    pub fn impute_missing(
        &mut self,
        threshold: f64,
        mode: FitnessMode,
        config: &GaConfig,
    ) -> Result<ImputeOutcome<G::Node, V>> {
        let outcome = impute_missing(&self.graph, &self.attrs, threshold, mode, config)?;

        self.attrs = outcome.completed.clone();
        self.missing.clear();
        self.logbook = Some(outcome.logbook.clone());
        self.model = None;
        Ok(outcome)
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn attributes(&self) -> &Attributes<G::Node, V> {
        &self.attrs
    }

    /// Nodes that had no value at construction, until imputed.
    pub fn missing(&self) -> &[G::Node] {
        &self.missing
    }

    /// The latest fit, if still current.
    pub fn marginalization(&self) -> Option<&Marginalization<G::Node, V>> {
        self.model.as_ref()
    }

    /// Candidate pool of the last edit search.
    pub fn candidates(&self) -> &[Candidate<G::Node>] {
        &self.candidates
    }

    /// Edges toggled by the last edit search.
    pub fn applied_edits(&self) -> &[(G::Node, G::Node)] {
        &self.applied
    }

    /// Logbook of the last search of either kind.
    pub fn logbook(&self) -> Option<&Logbook> {
        self.logbook.as_ref()
    }

    /// # Errors
    ///
    /// [`FairnetError::NotFitted`] or [`FairnetError::UnknownNode`].
    pub fn is_marginalized(&self, node: G::Node) -> Result<bool> {
        let model = self.fitted()?;
        if model.score(node).is_none() {
            return Err(FairnetError::UnknownNode(format!("{node:?}")));
        }
        Ok(model.is_marginalized(node))
    }

    pub fn summary(&self) -> Result<MarginalizationSummary<V>> {
        Ok(self.fitted()?.summary())
    }

    /// Scores of the current fit grouped by attribute value.
    pub fn scores_by_attribute(&self) -> Result<BTreeMap<V, Vec<f64>>> {
        Ok(scores_by_attribute(&self.attrs, &self.fitted()?.scores))
    }

    fn fitted(&self) -> Result<&Marginalization<G::Node, V>> {
        self.model.as_ref().ok_or(FairnetError::NotFitted)
    }
}
