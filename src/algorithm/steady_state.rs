//! # Steady-State Replacement
//!
//! Each generation replaces only part of a population: a fixed number or a
//! percentage of the weakest entities make room for the same number of
//! offspring. Everything else survives unchanged.
//!
//! Elite entities are excluded from replacement. Since replacement removes
//! the weakest entities first, elitism only matters here when the
//! replacement count reaches into the best part of the population.

use std::collections::HashSet;

use tracing::debug;

use crate::entity::GeneticEntity;
use crate::error::Result;
use crate::fitness::FitnessKind;
use crate::genome::Genome;
use crate::population::Population;
use crate::validation::{ensure_valid, ConfigViolation, Validate};

use super::options::AlgorithmOptions;
use super::strategy::{breed_offspring, survivors, BreedingContext, GenerationStrategy};

/// How many entities to replace each steady-state generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PopulationReplacementValue {
    /// An absolute number of entities.
    FixedCount(usize),
    /// A percentage in `[0, 100]` of the population size.
    Percentage(f64),
}

impl PopulationReplacementValue {
    /// Resolves to a number of entities for a population of `population_size`.
    ///
    /// Percentages are rounded to the nearest whole entity.
    pub fn resolve(&self, population_size: usize) -> usize {
        match *self {
            PopulationReplacementValue::FixedCount(count) => count,
            PopulationReplacementValue::Percentage(percentage) => {
                (population_size as f64 * percentage / 100.0).round() as usize
            }
        }
    }
}

impl Default for PopulationReplacementValue {
    fn default() -> Self {
        PopulationReplacementValue::Percentage(10.0)
    }
}

impl Validate for PopulationReplacementValue {
    fn validate(&self) -> Vec<ConfigViolation> {
        match *self {
            PopulationReplacementValue::Percentage(percentage)
                if !(percentage.is_finite() && (0.0..=100.0).contains(&percentage)) =>
            {
                vec![ConfigViolation::new(
                    "PopulationReplacementValue",
                    "percentage",
                    format!("must be within [0, 100], got {}", percentage),
                )]
            }
            _ => Vec::new(),
        }
    }
}

/// Replaces the weakest entities of each population with offspring.
///
/// # Examples
///
/// ```
/// use genevo::algorithm::steady_state::{PopulationReplacementValue, SteadyState};
/// use genevo::fitness::FitnessKind;
///
/// let strategy =
///     SteadyState::new(PopulationReplacementValue::Percentage(20.0), FitnessKind::Raw).unwrap();
/// assert_eq!(strategy.replacement().resolve(50), 10);
///
/// let invalid = SteadyState::new(PopulationReplacementValue::Percentage(120.0), FitnessKind::Raw);
/// assert!(invalid.is_err());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct SteadyState {
    replacement: PopulationReplacementValue,
    fitness_kind: FitnessKind,
}

impl SteadyState {
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if a percentage
    /// replacement value is not within `[0, 100]`.
    pub fn new(replacement: PopulationReplacementValue, fitness_kind: FitnessKind) -> Result<Self> {
        let strategy = Self {
            replacement,
            fitness_kind,
        };
        ensure_valid(strategy.validate())?;
        Ok(strategy)
    }

    pub fn replacement(&self) -> PopulationReplacementValue {
        self.replacement
    }

    pub fn fitness_kind(&self) -> FitnessKind {
        self.fitness_kind
    }
}

impl Validate for SteadyState {
    fn validate(&self) -> Vec<ConfigViolation> {
        self.replacement.validate()
    }
}

impl<G: Genome> GenerationStrategy<G> for SteadyState {
    fn name(&self) -> &'static str {
        "steady-state"
    }

    fn check_options(&self, _options: &AlgorithmOptions) -> Vec<ConfigViolation> {
        self.validate()
    }

    fn next_generation(
        &self,
        population: &Population<G>,
        context: &mut BreedingContext<'_, G>,
    ) -> Result<Vec<GeneticEntity<G>>> {
        let protected: HashSet<usize> = context.elite_indices(population).into_iter().collect();
        let removable = population.len() - protected.len();

        let requested = self.replacement.resolve(population.len());
        let count = requested.min(removable);
        if count < requested {
            debug!(
                population = population.index(),
                requested,
                replaced = count,
                "Replacement count limited by protected elite"
            );
        }

        let offspring = breed_offspring(population, count, context)?;

        let weakest: HashSet<usize> = population
            .ranked_indices(self.fitness_kind, context.mode)
            .into_iter()
            .filter(|index| !protected.contains(index))
            .take(count)
            .collect();

        let kept = population
            .iter()
            .enumerate()
            .filter(|(index, _)| !weakest.contains(index))
            .map(|(_, entity)| entity);

        let mut next: Vec<GeneticEntity<G>> = survivors(kept).collect();
        next.extend(offspring);
        Ok(next)
    }
}
