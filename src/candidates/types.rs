//! Strategy and candidate types.

use crate::error::{FairnetError, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which kinds of edits populate the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EditDirection {
    /// Only insertions of currently absent edges.
    Add,
    /// Only removals of existing edges.
    Remove,
    /// Insertions followed by removals.
    Both,
}

impl EditDirection {
    pub fn adds(self) -> bool {
        matches!(self, EditDirection::Add | EditDirection::Both)
    }

    pub fn removes(self) -> bool {
        matches!(self, EditDirection::Remove | EditDirection::Both)
    }
}

/// How candidate edits are filtered around marginalized nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EditLocality {
    /// Any edit near a marginalized node, regardless of attributes.
    Local,
    /// Only edits between marginalized nodes whose attribute relationship
    /// matches the sign of their scores.
    GroupAware,
}

/// Edit strategy: direction × locality.
///
/// Parses from the two-letter codes `al`, `ag`, `rl`, `rg`, `bl`, `bg`
/// (first letter add/remove/both, last letter local/group-aware). A bare
/// direction letter means local.
///
/// ```
/// use u_fairnet::candidates::{EditDirection, EditLocality, Strategy};
///
/// let s: Strategy = "rg".parse().unwrap();
/// assert_eq!(s, Strategy::new(EditDirection::Remove, EditLocality::GroupAware));
/// assert_eq!(s.to_string(), "rg");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Strategy {
    pub direction: EditDirection,
    pub locality: EditLocality,
}

impl Strategy {
    pub fn new(direction: EditDirection, locality: EditLocality) -> Self {
        Self {
            direction,
            locality,
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::new(EditDirection::Add, EditLocality::Local)
    }
}

impl FromStr for Strategy {
    type Err = FairnetError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_ascii_lowercase();
        let unknown = || FairnetError::UnknownStrategy(s.to_string());

        let mut chars = code.chars();
        let direction = match chars.next() {
            Some('a') => EditDirection::Add,
            Some('r') => EditDirection::Remove,
            Some('b') => EditDirection::Both,
            _ => return Err(unknown()),
        };
        let locality = match (code.len(), chars.last()) {
            (1, _) => EditLocality::Local,
            (2, Some('l')) => EditLocality::Local,
            (2, Some('g')) => EditLocality::GroupAware,
            _ => return Err(unknown()),
        };
        Ok(Self::new(direction, locality))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = match self.direction {
            EditDirection::Add => 'a',
            EditDirection::Remove => 'r',
            EditDirection::Both => 'b',
        };
        let l = match self.locality {
            EditLocality::Local => 'l',
            EditLocality::GroupAware => 'g',
        };
        write!(f, "{d}{l}")
    }
}

/// Candidate-pool configuration.
///
/// `to_add` / `to_remove` are the fractions of each ranked pool that are
/// kept. Each is required when the strategy's direction uses it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateConfig {
    pub strategy: Strategy,
    pub to_add: Option<f64>,
    pub to_remove: Option<f64>,
}

impl CandidateConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            to_add: None,
            to_remove: None,
        }
    }

    pub fn with_to_add(mut self, fraction: f64) -> Self {
        self.to_add = Some(fraction);
        self
    }

    pub fn with_to_remove(mut self, fraction: f64) -> Self {
        self.to_remove = Some(fraction);
        self
    }

    /// Checks that every fraction the strategy needs is present and in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let direction = self.strategy.direction;
        if direction.adds() {
            let to_add = self.to_add.ok_or(FairnetError::MissingToAdd)?;
            check_fraction("to_add", to_add)?;
        }
        if direction.removes() {
            let to_remove = self.to_remove.ok_or(FairnetError::MissingToRemove)?;
            check_fraction("to_remove", to_remove)?;
        }
        Ok(())
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FairnetError::InvalidFraction { name, value })
    }
}

/// One edge edit. The action is implicit: toggling the edge removes it if
/// present in the graph and adds it otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate<N> {
    pub u: N,
    pub v: N,
    /// Number of neighbours shared by `u` and `v`.
    pub weight: usize,
}

impl<N: Copy> Candidate<N> {
    pub fn endpoints(&self) -> (N, N) {
        (self.u, self.v)
    }
}
