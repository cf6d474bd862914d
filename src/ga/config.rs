//! GA configuration.
//!
//! [`GaConfig`] holds every parameter of the generational loop. It is passed
//! explicitly into each search entry point; there is no global registration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the genetic searches.
///
/// # Defaults
///
/// ```
/// use u_fairnet::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.generations, 30);
/// assert_eq!(config.population_size, 150);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_fairnet::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(60)
///     .with_generations(10)
///     .with_crossover_prob(0.7)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Number of generations after generation 0.
    ///
    /// `0` evaluates the initial population only.
    pub generations: usize,

    /// Number of individuals in the population.
    pub population_size: usize,

    /// Probability of recombining a pair of selected parents (0.0–1.0).
    pub crossover_prob: f64,

    /// Probability of mutating an offspring (0.0–1.0).
    pub mutation_prob: f64,

    /// Number of contestants per tournament.
    pub tournament_size: usize,

    /// Whether to evaluate individuals in parallel using rayon.
    ///
    /// Has no effect without the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            generations: 30,
            population_size: 150,
            crossover_prob: 0.5,
            mutation_prob: 0.25,
            tournament_size: 3,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_prob(mut self, p: f64) -> Self {
        self.crossover_prob = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_prob(mut self, p: f64) -> Self {
        self.mutation_prob = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.tournament_size == 0 {
            return Err("tournament_size must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.crossover_prob) {
            return Err(format!(
                "crossover_prob must lie in [0, 1], got {}",
                self.crossover_prob
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_prob) {
            return Err(format!(
                "mutation_prob must lie in [0, 1], got {}",
                self.mutation_prob
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.generations, 30);
        assert_eq!(config.population_size, 150);
        assert!((config.crossover_prob - 0.5).abs() < 1e-10);
        assert!((config.mutation_prob - 0.25).abs() < 1e-10);
        assert_eq!(config.tournament_size, 3);
        assert!(config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_generations(5)
            .with_population_size(20)
            .with_crossover_prob(0.8)
            .with_mutation_prob(0.1)
            .with_tournament_size(2)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.generations, 5);
        assert_eq!(config.population_size, 20);
        assert!((config.crossover_prob - 0.8).abs() < 1e-10);
        assert!((config.mutation_prob - 0.1).abs() < 1e-10);
        assert_eq!(config.tournament_size, 2);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(GaConfig::default().validate().is_ok());
        assert!(GaConfig::default().with_generations(0).validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_tournament() {
        let config = GaConfig::default().with_tournament_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_raw_probabilities() {
        let config = GaConfig {
            mutation_prob: 1.5,
            ..GaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default()
            .with_crossover_prob(-0.5)
            .with_mutation_prob(2.0);

        assert!((config.crossover_prob - 0.0).abs() < 1e-10);
        assert!((config.mutation_prob - 1.0).abs() < 1e-10);
    }
}
