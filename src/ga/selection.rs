//! Tournament selection.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::Individual;
use rand::Rng;

/// Picks `k` individuals uniformly with replacement and returns the index
/// of the best one. Ties keep the earliest contestant.
///
/// # Complexity
/// O(k) per selection
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<G, R: Rng>(population: &[Individual<G>], k: usize, rng: &mut R) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].score() > population[best_idx].score() {
            best_idx = idx;
        }
    }
    best_idx
}

/// Runs `count` tournaments and clones the winners into a new population.
pub fn select_tournament<G: Clone, R: Rng>(
    population: &[Individual<G>],
    k: usize,
    count: usize,
    rng: &mut R,
) -> Vec<Individual<G>> {
    (0..count)
        .map(|_| population[tournament(population, k, rng)].clone())
        .collect()
}
