//! Graph interface consumed by the scoring model and the searches.
//!
//! The analysis never owns a graph representation of its own. Anything
//! that can answer adjacency queries, toggle edges and clone itself can be
//! plugged in through [`Topology`]. An implementation for petgraph's
//! [`UnGraphMap`] is provided.
//!
//! Graphs are undirected and simple. Edge lists returned by [`Topology::edges`]
//! are normalized so that `u < v` and sorted, which keeps every downstream
//! enumeration deterministic.

use petgraph::graphmap::{NodeTrait, UnGraphMap};
use std::collections::{BTreeSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

/// Node identifier bound used throughout the crate.
pub trait NodeId: Copy + Ord + Hash + Debug + Send + Sync + 'static {}

impl<T> NodeId for T where T: Copy + Ord + Hash + Debug + Send + Sync + 'static {}

/// Undirected simple graph as seen by the analysis.
///
/// `Clone` must produce an independent copy: edits to the clone never
/// affect the original. Every search evaluates candidates on clones.
pub trait Topology: Clone + Send + Sync {
    /// Node identifier type.
    type Node: NodeId;

    /// All nodes, in ascending order.
    fn nodes(&self) -> Vec<Self::Node>;

    /// Adjacent nodes of `node`, in ascending order. Empty for unknown nodes.
    fn neighbors(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Returns `true` if `node` belongs to the graph.
    fn contains_node(&self, node: Self::Node) -> bool;

    /// Returns `true` if `u` and `v` are adjacent.
    fn has_edge(&self, u: Self::Node, v: Self::Node) -> bool;

    /// Inserts the undirected edge `(u, v)`. No-op if it already exists.
    fn add_edge(&mut self, u: Self::Node, v: Self::Node);

    /// Removes the undirected edge `(u, v)`. No-op if it does not exist.
    fn remove_edge(&mut self, u: Self::Node, v: Self::Node);

    /// All edges as `(u, v)` with `u < v`, sorted.
    fn edges(&self) -> Vec<(Self::Node, Self::Node)>;

    /// Subgraph induced by the nodes within `radius` hops of `node`,
    /// `node` included.
    fn ego_subgraph(&self, node: Self::Node, radius: usize) -> Self;

    /// Number of nodes.
    fn node_count(&self) -> usize {
        self.nodes().len()
    }

    /// Adds the edge if absent, removes it if present.
    fn toggle_edge(&mut self, u: Self::Node, v: Self::Node) {
        if self.has_edge(u, v) {
            self.remove_edge(u, v);
        } else {
            self.add_edge(u, v);
        }
    }
}

impl<N> Topology for UnGraphMap<N, ()>
where
    N: NodeTrait + NodeId,
{
    type Node = N;

    fn nodes(&self) -> Vec<N> {
        let mut nodes: Vec<N> = UnGraphMap::nodes(self).collect();
        nodes.sort_unstable();
        nodes
    }

    fn neighbors(&self, node: N) -> Vec<N> {
        if !UnGraphMap::contains_node(self, node) {
            return Vec::new();
        }
        let mut out: Vec<N> = UnGraphMap::neighbors(self, node)
            .filter(|&n| n != node)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    fn contains_node(&self, node: N) -> bool {
        UnGraphMap::contains_node(self, node)
    }

    fn has_edge(&self, u: N, v: N) -> bool {
        self.contains_edge(u, v)
    }

    fn add_edge(&mut self, u: N, v: N) {
        if u != v && !self.contains_edge(u, v) {
            UnGraphMap::add_edge(self, u, v, ());
        }
    }

    fn remove_edge(&mut self, u: N, v: N) {
        UnGraphMap::remove_edge(self, u, v);
    }

    fn edges(&self) -> Vec<(N, N)> {
        let mut edges: Vec<(N, N)> = self
            .all_edges()
            .filter(|(a, b, _)| a != b)
            .map(|(a, b, _)| if a < b { (a, b) } else { (b, a) })
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    fn ego_subgraph(&self, node: N, radius: usize) -> Self {
        let mut sub = UnGraphMap::new();
        if !UnGraphMap::contains_node(self, node) {
            return sub;
        }

        // Breadth-first search bounded by hop distance.
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        seen.insert(node);
        queue.push_back((node, 0usize));
        while let Some((current, depth)) = queue.pop_front() {
            if depth == radius {
                continue;
            }
            for next in UnGraphMap::neighbors(self, current) {
                if seen.insert(next) {
                    queue.push_back((next, depth + 1));
                }
            }
        }

        for &n in &seen {
            sub.add_node(n);
        }
        for &n in &seen {
            for m in UnGraphMap::neighbors(self, n) {
                if n < m && seen.contains(&m) {
                    UnGraphMap::add_edge(&mut sub, n, m, ());
                }
            }
        }
        sub
    }

    fn node_count(&self) -> usize {
        UnGraphMap::node_count(self)
    }
}

/// Builds an [`UnGraphMap`] from an edge list.
pub fn graph_from_edges<N>(edges: &[(N, N)]) -> UnGraphMap<N, ()>
where
    N: NodeTrait + NodeId,
{
    let mut g = UnGraphMap::new();
    for &(u, v) in edges {
        Topology::add_edge(&mut g, u, v);
    }
    g
}
