//! Marginalization analysis and repair for attributed networks.
//!
//! A node is *marginalized* when its neighbourhood is unusually homogeneous
//! (or unusually foreign) given how rare its own attribute value is in the
//! whole network. This crate measures that and searches for small changes
//! that reduce it:
//!
//! - **Scoring** ([`score`]): rarity weights per attribute value and a
//!   signed per-node score in `[-1, 1]`.
//! - **Candidate edits** ([`candidates`]): a ranked, bounded pool of edges
//!   to add near marginalized nodes or to remove from them.
//! - **Edit search** ([`edit`]): a genetic algorithm choosing the subset
//!   of candidate edits that best lowers marginalization with few edits.
//! - **Imputation** ([`impute`]): a genetic algorithm assigning values to
//!   nodes whose attribute is unknown.
//! - **Orchestration** ([`fairnet`]): [`FairNet`] sequences the above over
//!   one network.
//!
//! # Architecture
//!
//! The graph is an external collaborator reached through the
//! [`graph::Topology`] trait (implemented for petgraph's `UnGraphMap`).
//! Both searches are [`ga::GaProblem`]s run by the shared generational
//! engine in [`ga`]; every evaluation works on a private copy of the graph
//! or the attribute map, so populations can be scored in parallel.

pub mod candidates;
pub mod edit;
pub mod error;
pub mod fairnet;
pub mod ga;
pub mod graph;
pub mod impute;
pub mod score;

pub use error::{FairnetError, Result};
pub use fairnet::FairNet;
