//! # AlgorithmOptions
//!
//! The `AlgorithmOptions` struct holds the run-wide settings of a genetic
//! algorithm: how large each population is, how many populations (demes)
//! the environment holds, and from how many pending evaluations on the
//! fitness evaluation fans out over worker threads.
//!
//! ## Example
//!
//! ```rust
//! use genevo::algorithm::options::AlgorithmOptions;
//!
//! let options = AlgorithmOptions::builder()
//!     .min_population_size(40)
//!     .population_count(4)
//!     .parallel_threshold(500)
//!     .build();
//!
//! assert_eq!(options.get_min_population_size(), 40);
//! assert_eq!(options.get_population_count(), 4);
//!
//! let default_options = AlgorithmOptions::default();
//! assert_eq!(default_options.get_population_count(), 1);
//! ```

use crate::validation::{ConfigViolation, Validate};

const DEFAULT_MIN_POPULATION_SIZE: usize = 50;
const DEFAULT_POPULATION_COUNT: usize = 1;
const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmOptions {
    /// Number of entities each population is filled to on initialization.
    min_population_size: usize,
    /// Number of populations (demes) in the environment.
    population_count: usize,
    /// Minimum number of pending evaluations to evaluate in parallel.
    parallel_threshold: usize,
}

impl AlgorithmOptions {
    pub fn new(min_population_size: usize, population_count: usize) -> Self {
        Self {
            min_population_size,
            population_count,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn get_min_population_size(&self) -> usize {
        self.min_population_size
    }

    pub fn get_population_count(&self) -> usize {
        self.population_count
    }

    /// Returns the minimum number of pending evaluations to evaluate in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn set_min_population_size(&mut self, min_population_size: usize) {
        self.min_population_size = min_population_size;
    }

    pub fn set_population_count(&mut self, population_count: usize) {
        self.population_count = population_count;
    }

    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    /// Returns a builder for creating an `AlgorithmOptions` instance.
    pub fn builder() -> AlgorithmOptionsBuilder {
        AlgorithmOptionsBuilder::default()
    }
}

impl Default for AlgorithmOptions {
    fn default() -> Self {
        Self {
            min_population_size: DEFAULT_MIN_POPULATION_SIZE,
            population_count: DEFAULT_POPULATION_COUNT,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl Validate for AlgorithmOptions {
    fn validate(&self) -> Vec<ConfigViolation> {
        let mut violations = Vec::new();
        if self.min_population_size == 0 {
            violations.push(ConfigViolation::new(
                "AlgorithmOptions",
                "min_population_size",
                "must be at least 1",
            ));
        }
        if self.population_count == 0 {
            violations.push(ConfigViolation::new(
                "AlgorithmOptions",
                "population_count",
                "must be at least 1",
            ));
        }
        violations
    }
}

/// Builder for `AlgorithmOptions`.
///
/// Unset values fall back to the defaults of [`AlgorithmOptions::default`].
#[derive(Debug, Clone, Default)]
pub struct AlgorithmOptionsBuilder {
    min_population_size: Option<usize>,
    population_count: Option<usize>,
    parallel_threshold: Option<usize>,
}

impl AlgorithmOptionsBuilder {
    pub fn min_population_size(mut self, value: usize) -> Self {
        self.min_population_size = Some(value);
        self
    }

    pub fn population_count(mut self, value: usize) -> Self {
        self.population_count = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn build(self) -> AlgorithmOptions {
        AlgorithmOptions {
            min_population_size: self
                .min_population_size
                .unwrap_or(DEFAULT_MIN_POPULATION_SIZE),
            population_count: self.population_count.unwrap_or(DEFAULT_POPULATION_COUNT),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let options = AlgorithmOptions::builder().population_count(3).build();
        assert_eq!(options.get_min_population_size(), DEFAULT_MIN_POPULATION_SIZE);
        assert_eq!(options.get_population_count(), 3);
        assert_eq!(options.get_parallel_threshold(), DEFAULT_PARALLEL_THRESHOLD);
    }

    #[test]
    fn test_validate_zero_sizes() {
        let violations = AlgorithmOptions::new(0, 0).validate();
        let properties: Vec<&str> = violations.iter().map(|v| v.property).collect();
        assert_eq!(properties, vec!["min_population_size", "population_count"]);

        assert!(AlgorithmOptions::default().validate().is_empty());
    }

    #[test]
    fn test_setters() {
        let mut options = AlgorithmOptions::default();
        options.set_min_population_size(8);
        options.set_parallel_threshold(2);
        assert_eq!(options.get_min_population_size(), 8);
        assert_eq!(options.get_parallel_threshold(), 2);
    }
}
