//! Candidate edge generation.
//!
//! Turns a fitted [`Marginalization`] into a bounded, ranked pool of edge
//! edits for the edit search.
//!
//! - **Plausible additions**: for each marginalized node `u`, every node at
//!   exactly two hops (the "second ring") is a potential new neighbour.
//! - **Removable edges**: existing edges touching marginalized nodes.
//!
//! Both pools are weighted by the number of neighbours the endpoints share,
//! sorted ascending (weak ties first, so the least disruptive edits lead)
//! and truncated to `round(len · fraction)`, rounding halves to even.
//! Ties keep node order.

mod types;

pub use types::{Candidate, CandidateConfig, EditDirection, EditLocality, Strategy};

use crate::error::Result;
use crate::graph::Topology;
use crate::score::{Attributes, Label, Marginalization};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Builds the candidate pool: plausible additions first, then removals.
///
/// # Errors
///
/// Configuration errors from [`CandidateConfig::validate`]; nothing is
/// generated in that case.
pub fn generate_candidates<G: Topology, V: Label>(
    graph: &G,
    attrs: &Attributes<G::Node, V>,
    model: &Marginalization<G::Node, V>,
    config: &CandidateConfig,
) -> Result<Vec<Candidate<G::Node>>> {
    config.validate()?;
    let strategy = config.strategy;

    let mut pool = Vec::new();
    if let (true, Some(to_add)) = (strategy.direction.adds(), config.to_add) {
        pool.extend(plausible_edges(graph, attrs, model, strategy.locality, to_add));
    }
    if let (true, Some(to_remove)) = (strategy.direction.removes(), config.to_remove) {
        pool.extend(removable_edges(graph, attrs, model, strategy.locality, to_remove));
    }
    debug!(%strategy, candidates = pool.len(), "candidate pool built");
    Ok(pool)
}

/// Absent edges from marginalized nodes to their second ring.
pub fn plausible_edges<G: Topology, V: Label>(
    graph: &G,
    attrs: &Attributes<G::Node, V>,
    model: &Marginalization<G::Node, V>,
    locality: EditLocality,
    to_add: f64,
) -> Vec<Candidate<G::Node>> {
    let mut neighborhoods = Neighborhoods::new(graph);
    let mut found: BTreeMap<(G::Node, G::Node), usize> = BTreeMap::new();

    for &u in &model.marginalized {
        let direct = neighborhoods.get(u).clone();
        let ring: Vec<G::Node> = graph
            .ego_subgraph(u, 2)
            .nodes()
            .into_iter()
            .filter(|&n| n != u && !direct.contains(&n))
            .collect();

        for n in ring {
            if locality == EditLocality::GroupAware && !reinforces_on_add(model, attrs, u, n) {
                continue;
            }
            let key = ordered(u, n);
            if found.contains_key(&key) {
                continue;
            }
            let weight = direct.intersection(neighborhoods.get(n)).count();
            found.insert(key, weight);
        }
    }

    rank_and_truncate(found, to_add)
}

/// Existing edges eligible for removal.
pub fn removable_edges<G: Topology, V: Label>(
    graph: &G,
    attrs: &Attributes<G::Node, V>,
    model: &Marginalization<G::Node, V>,
    locality: EditLocality,
    to_remove: f64,
) -> Vec<Candidate<G::Node>> {
    let mut neighborhoods = Neighborhoods::new(graph);
    let mut found: BTreeMap<(G::Node, G::Node), usize> = BTreeMap::new();

    for (x, y) in graph.edges() {
        let keep = match locality {
            EditLocality::Local => model.is_marginalized(x) || model.is_marginalized(y),
            EditLocality::GroupAware => reinforces_on_remove(model, attrs, x, y),
        };
        if !keep {
            continue;
        }
        let shared = neighborhoods.get(x).clone();
        let weight = shared.intersection(neighborhoods.get(y)).count();
        found.insert((x, y), weight);
    }

    rank_and_truncate(found, to_remove)
}

/// Group-aware addition filter.
///
/// Both endpoints marginalized with the same sign. Over-represented pairs
/// (positive) are bridged across values; under-represented pairs
/// (negative) are joined within their value.
fn reinforces_on_add<N, V: Label>(
    model: &Marginalization<N, V>,
    attrs: &Attributes<N, V>,
    u: N,
    n: N,
) -> bool
where
    N: crate::graph::NodeId,
{
    if !model.is_marginalized(u) || !model.is_marginalized(n) {
        return false;
    }
    let (Some(su), Some(sn)) = (model.score(u), model.score(n)) else {
        return false;
    };
    let same_value = attrs.get(&u) == attrs.get(&n);
    match shared_sign(su, sn) {
        Some(true) => !same_value,
        Some(false) => same_value,
        None => false,
    }
}

/// Group-aware removal filter, the mirror of [`reinforces_on_add`]:
/// same-value edges are cut between over-represented nodes, cross-value
/// edges between under-represented ones.
fn reinforces_on_remove<N, V: Label>(
    model: &Marginalization<N, V>,
    attrs: &Attributes<N, V>,
    x: N,
    y: N,
) -> bool
where
    N: crate::graph::NodeId,
{
    if !model.is_marginalized(x) || !model.is_marginalized(y) {
        return false;
    }
    let (Some(sx), Some(sy)) = (model.score(x), model.score(y)) else {
        return false;
    };
    let same_value = attrs.get(&x) == attrs.get(&y);
    match shared_sign(sx, sy) {
        Some(true) => same_value,
        Some(false) => !same_value,
        None => false,
    }
}

/// `Some(true)` if both positive, `Some(false)` if both negative.
fn shared_sign(a: f64, b: f64) -> Option<bool> {
    if a > 0.0 && b > 0.0 {
        Some(true)
    } else if a < 0.0 && b < 0.0 {
        Some(false)
    } else {
        None
    }
}

fn ordered<N: Ord>(a: N, b: N) -> (N, N) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Stable ascending sort by weight, then keep `round(len · fraction)` with
/// halves rounded to even.
fn rank_and_truncate<N: Copy>(found: BTreeMap<(N, N), usize>, fraction: f64) -> Vec<Candidate<N>> {
    let mut pool: Vec<Candidate<N>> = found
        .into_iter()
        .map(|((u, v), weight)| Candidate { u, v, weight })
        .collect();
    pool.sort_by_key(|c| c.weight);
    let keep = ((pool.len() as f64) * fraction).round_ties_even() as usize;
    pool.truncate(keep.min(pool.len()));
    pool
}

/// Memoized neighbour sets.
struct Neighborhoods<'a, G: Topology> {
    graph: &'a G,
    cache: BTreeMap<G::Node, BTreeSet<G::Node>>,
}

impl<'a, G: Topology> Neighborhoods<'a, G> {
    fn new(graph: &'a G) -> Self {
        Self {
            graph,
            cache: BTreeMap::new(),
        }
    }

    fn get(&mut self, node: G::Node) -> &BTreeSet<G::Node> {
        let graph = self.graph;
        self.cache
            .entry(node)
            .or_insert_with(|| graph.neighbors(node).into_iter().collect())
    }
}
