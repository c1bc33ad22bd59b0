//! # Elitism
//!
//! Elitism carries the best entities of a population unchanged into the next
//! generation, so a run never loses its best solutions to crossover or
//! mutation.

use std::fmt::Debug;

use crate::entity::GeneticEntity;
use crate::error::Result;
use crate::fitness::{EvaluationMode, FitnessKind};
use crate::genome::Genome;
use crate::population::Population;
use crate::validation::{check_rate, ensure_valid, ConfigViolation, Validate};

/// Chooses the entities that survive a generation unchanged.
pub trait ElitismStrategy<G: Genome>: Debug + Send + Sync {
    /// Number of elite entities for a population of `population_size`.
    fn elite_count(&self, population_size: usize) -> usize;

    /// Configuration problems that would make this strategy misbehave.
    /// Types that cannot be misconfigured keep the empty default.
    fn config_violations(&self) -> Vec<ConfigViolation> {
        Vec::new()
    }

    /// Indices of the elite entities, best first.
    fn elite_indices(&self, population: &Population<G>, mode: EvaluationMode) -> Vec<usize>;

    /// Clones of the elite entities, best first.
    fn select_elite(
        &self,
        population: &Population<G>,
        mode: EvaluationMode,
    ) -> Vec<GeneticEntity<G>> {
        self.elite_indices(population, mode)
            .into_iter()
            .filter_map(|index| population.get(index).cloned())
            .collect()
    }
}

/// Keeps `floor(elitist_ratio * size)` of the best entities.
///
/// Entities with equal fitness are taken in insertion order.
///
/// # Examples
///
/// ```
/// use genevo::elitism::{ElitismStrategy, RatioElitism};
/// use genevo::entity::GeneticEntity;
/// use genevo::fitness::{EvaluationMode, FitnessKind};
/// use genevo::population::Population;
///
/// let population = Population::with_entities(
///     0,
///     vec![
///         GeneticEntity::evaluated('a', 5.0),
///         GeneticEntity::evaluated('b', 3.0),
///         GeneticEntity::evaluated('c', 8.0),
///         GeneticEntity::evaluated('d', 1.0),
///     ],
/// );
///
/// let elitism = RatioElitism::new(0.25, FitnessKind::Raw).unwrap();
/// let elite = elitism.select_elite(&population, EvaluationMode::Maximize);
///
/// assert_eq!(elite.len(), 1);
/// assert_eq!(*elite[0].genome(), 'c');
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct RatioElitism {
    elitist_ratio: f64,
    fitness_kind: FitnessKind,
}

impl RatioElitism {
    /// Creates a new elitism strategy.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if `elitist_ratio` is not within `[0, 1]`.
    pub fn new(elitist_ratio: f64, fitness_kind: FitnessKind) -> Result<Self> {
        let elitism = Self {
            elitist_ratio,
            fitness_kind,
        };
        ensure_valid(elitism.validate())?;
        Ok(elitism)
    }

    pub fn elitist_ratio(&self) -> f64 {
        self.elitist_ratio
    }

    pub fn fitness_kind(&self) -> FitnessKind {
        self.fitness_kind
    }
}

impl Validate for RatioElitism {
    fn validate(&self) -> Vec<ConfigViolation> {
        check_rate("RatioElitism", "elitist_ratio", self.elitist_ratio)
            .into_iter()
            .collect()
    }
}

impl<G: Genome> ElitismStrategy<G> for RatioElitism {
    fn config_violations(&self) -> Vec<ConfigViolation> {
        self.validate()
    }

    fn elite_count(&self, population_size: usize) -> usize {
        let count = (self.elitist_ratio * population_size as f64).floor() as usize;
        count.min(population_size)
    }

    fn elite_indices(&self, population: &Population<G>, mode: EvaluationMode) -> Vec<usize> {
        let count = ElitismStrategy::<G>::elite_count(self, population.len());
        if count == 0 {
            return Vec::new();
        }

        let worst = mode.worst_value();
        let mut indices: Vec<usize> = (0..population.len()).collect();
        indices.sort_by(|&a, &b| {
            let fa = population.entities()[a].fitness(self.fitness_kind).unwrap_or(worst);
            let fb = population.entities()[b].fitness(self.fitness_kind).unwrap_or(worst);
            mode.compare(fb, fa)
        });
        indices.truncate(count);
        indices
    }
}
