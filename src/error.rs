//! Error types shared by every stage of the analysis.

use thiserror::Error;

/// Errors raised by scoring, candidate generation and the searches.
///
/// Configuration problems are always reported before a search starts;
/// a search that has begun runs to its configured generation count.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FairnetError {
    #[error("rarity weights need at least two labeled nodes, found {0}")]
    TooFewLabeled(usize),

    #[error("node {0} has no attribute value")]
    MissingAttribute(String),

    #[error("node {0} is not part of the graph")]
    UnknownNode(String),

    #[error("unknown strategy code `{0}`")]
    UnknownStrategy(String),

    #[error("unknown fitness mode `{0}` (expected `nodes` or `marg`)")]
    UnknownFitnessMode(String),

    #[error("strategy adds edges but no `to_add` fraction was given")]
    MissingToAdd,

    #[error("strategy removes edges but no `to_remove` fraction was given")]
    MissingToRemove,

    #[error("`{name}` must lie in [0, 1], got {value}")]
    InvalidFraction { name: &'static str, value: f64 },

    #[error("no known attribute values to impute from")]
    EmptyDomain,

    #[error("invalid GA configuration: {0}")]
    InvalidConfig(String),

    #[error("marginalization scores are not available; call fit first")]
    NotFitted,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FairnetError>;
