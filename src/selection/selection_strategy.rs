use std::fmt::Debug;

use crate::entity::GeneticEntity;
use crate::error::{GeneticError, Result};
use crate::fitness::{EvaluationMode, FitnessKind};
use crate::genome::Genome;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::validation::ConfigViolation;

/// Trait for selection operators.
///
/// A selection operator chooses `count` entities from a population, with
/// replacement: the same entity may be returned several times. The returned
/// entities are clones, so the caller can hand them to crossover and
/// mutation without touching the population.
///
/// # Examples
///
/// ```
/// use genevo::entity::GeneticEntity;
/// use genevo::fitness::{EvaluationMode, FitnessKind};
/// use genevo::population::Population;
/// use genevo::rng::RandomNumberGenerator;
/// use genevo::selection::{FitnessProportionateSelection, SelectionOperator};
///
/// fn main() -> genevo::Result<()> {
///     let population = Population::with_entities(
///         0,
///         vec![
///             GeneticEntity::evaluated(vec![1.0], 0.5),
///             GeneticEntity::evaluated(vec![2.0], 0.8),
///             GeneticEntity::evaluated(vec![3.0], 0.3),
///         ],
///     );
///     let mut rng = RandomNumberGenerator::from_seed(42);
///
///     let selection = FitnessProportionateSelection::new(FitnessKind::Raw);
///     let selected =
///         selection.select_entities(4, &population, EvaluationMode::Maximize, &mut rng)?;
///
///     assert_eq!(selected.len(), 4);
///     Ok(())
/// }
/// ```
pub trait SelectionOperator<G: Genome>: Debug + Send + Sync {
    /// Selects `count` entities from `population`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The population is empty and `count` is greater than zero
    /// - The operator needs fitness values and an entity has not been evaluated
    /// - Sampling fails on degenerate weights
    fn select_entities(
        &self,
        count: usize,
        population: &Population<G>,
        mode: EvaluationMode,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<GeneticEntity<G>>>;

    /// Configuration problems of this operator, empty by default.
    fn config_violations(&self) -> Vec<ConfigViolation> {
        Vec::new()
    }
}

/// Collects the fitness values of every entity, failing on unevaluated ones.
pub(crate) fn fitness_values<G: Genome>(
    population: &Population<G>,
    kind: FitnessKind,
) -> Result<Vec<f64>> {
    population
        .iter()
        .enumerate()
        .map(|(index, entity)| {
            entity.fitness(kind).ok_or_else(|| {
                GeneticError::FitnessCalculation(format!(
                    "Entity {} of population {} has not been evaluated",
                    index,
                    population.index()
                ))
            })
        })
        .collect()
}

/// Common precondition of every selection operator.
pub(crate) fn ensure_selectable<G: Genome>(population: &Population<G>) -> Result<()> {
    if population.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    Ok(())
}
