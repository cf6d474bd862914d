//! Gene-level crossover and mutation operators.
//!
//! All operators work in place on fixed-length gene slices and never change
//! their length.
//!
//! - [`uniform_crossover`]: swap each position between two parents
//! - [`flip_bit_mutation`]: independent bit flips
//! - [`replace_value_mutation`]: categorical replacement that always changes
//!   the gene when it fires
//!
//! # References
//!
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"

use rand::Rng;

/// Uniform crossover: position `i` is swapped between `a` and `b` with
/// probability `swap_prob`. Only the common prefix is considered.
pub fn uniform_crossover<T, R: Rng>(a: &mut [T], b: &mut [T], swap_prob: f64, rng: &mut R) {
    let n = a.len().min(b.len());
    for i in 0..n {
        if rng.random_range(0.0..1.0) < swap_prob {
            std::mem::swap(&mut a[i], &mut b[i]);
        }
    }
}

/// Flips each bit independently with probability `flip_prob`.
pub fn flip_bit_mutation<R: Rng>(bits: &mut [bool], flip_prob: f64, rng: &mut R) {
    for bit in bits.iter_mut() {
        if rng.random_range(0.0..1.0) < flip_prob {
            *bit = !*bit;
        }
    }
}

/// Replaces each gene with probability `replace_prob` by a value drawn
/// uniformly from `domain` minus the gene's current value.
///
/// Genes with no alternative in `domain` are left unchanged.
pub fn replace_value_mutation<T, R>(genes: &mut [T], domain: &[T], replace_prob: f64, rng: &mut R)
where
    T: Clone + PartialEq,
    R: Rng,
{
    for gene in genes.iter_mut() {
        if rng.random_range(0.0..1.0) >= replace_prob {
            continue;
        }
        let alternatives: Vec<&T> = domain.iter().filter(|v| **v != *gene).collect();
        if alternatives.is_empty() {
            continue;
        }
        *gene = alternatives[rng.random_range(0..alternatives.len())].clone();
    }
}
