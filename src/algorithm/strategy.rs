//! # Generation Strategies
//!
//! A [`GenerationStrategy`] decides how one population turns into the next:
//! how many offspring are bred, which entities survive, and whether anything
//! happens across populations after evaluation. The engine owns the
//! operators and lends them to the strategy through a [`BreedingContext`].

use std::fmt::Debug;

use crate::algorithm::options::AlgorithmOptions;
use crate::elitism::ElitismStrategy;
use crate::entity::GeneticEntity;
use crate::environment::Environment;
use crate::error::{GeneticError, Result};
use crate::fitness::EvaluationMode;
use crate::genome::Genome;
use crate::operators::{CrossoverOperator, MutationOperator};
use crate::population::Population;
use crate::rng::RandomSource;
use crate::selection::SelectionOperator;
use crate::validation::ConfigViolation;

/// The operators and random source available while breeding one generation.
pub struct BreedingContext<'a, G: Genome> {
    pub selection: &'a dyn SelectionOperator<G>,
    pub crossover: &'a dyn CrossoverOperator<G>,
    pub mutation: Option<&'a dyn MutationOperator<G>>,
    pub elitism: Option<&'a dyn ElitismStrategy<G>>,
    pub mode: EvaluationMode,
    pub rng: &'a mut dyn RandomSource,
}

impl<G: Genome> BreedingContext<'_, G> {
    /// Elite entities of `population`, best first. Empty without elitism.
    pub fn elite(&self, population: &Population<G>) -> Vec<GeneticEntity<G>> {
        self.elitism
            .map(|elitism| elitism.select_elite(population, self.mode))
            .unwrap_or_default()
    }

    /// Indices of the elite entities of `population`, best first.
    pub fn elite_indices(&self, population: &Population<G>) -> Vec<usize> {
        self.elitism
            .map(|elitism| elitism.elite_indices(population, self.mode))
            .unwrap_or_default()
    }
}

/// Turns each population into its next generation.
pub trait GenerationStrategy<G: Genome>: Debug + Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &'static str;

    /// Violations of this strategy's requirements on the run-wide options.
    fn check_options(&self, _options: &AlgorithmOptions) -> Vec<ConfigViolation> {
        Vec::new()
    }

    /// Builds the entities of the next generation of `population`.
    ///
    /// Entities without a fitness value are evaluated by the engine
    /// afterwards.
    fn next_generation(
        &self,
        population: &Population<G>,
        context: &mut BreedingContext<'_, G>,
    ) -> Result<Vec<GeneticEntity<G>>>;

    /// Runs after every population of `environment` has been evaluated and
    /// rescaled. `generation` is the number of the generation just produced.
    fn after_evaluation(
        &self,
        _environment: &mut Environment<G>,
        _generation: usize,
        _mode: EvaluationMode,
    ) -> Result<()> {
        Ok(())
    }
}

/// Breeds exactly `count` mutated offspring from `population`.
///
/// Parents are selected in groups of the crossover arity. Each group is
/// recombined with the crossover rate or passed through unchanged.
pub fn breed_offspring<G: Genome>(
    population: &Population<G>,
    count: usize,
    context: &mut BreedingContext<'_, G>,
) -> Result<Vec<GeneticEntity<G>>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let arity = context.crossover.parent_count();
    if arity == 0 {
        return Err(GeneticError::Breeding(
            "Crossover operator declares zero parents".to_string(),
        ));
    }

    let mut offspring = Vec::with_capacity(count);
    while offspring.len() < count {
        let parent_total = (count - offspring.len()).div_ceil(arity) * arity;
        let parents =
            context
                .selection
                .select_entities(parent_total, population, context.mode, context.rng)?;

        let produced_before = offspring.len();
        for group in parents.chunks_exact(arity) {
            offspring.extend(apply_crossover(group, context)?);
        }
        if offspring.len() == produced_before {
            return Err(GeneticError::Breeding(format!(
                "No offspring produced from {} selected parents",
                parents.len()
            )));
        }
    }
    offspring.truncate(count);

    if let Some(mutation) = context.mutation {
        for child in offspring.iter_mut() {
            mutation.mutate(child, context.rng);
        }
    }

    Ok(offspring)
}

/// Recombines one parent group, or passes the parents through when the
/// crossover draw fails. Passed-through parents age by one generation.
fn apply_crossover<G: Genome>(
    parents: &[GeneticEntity<G>],
    context: &mut BreedingContext<'_, G>,
) -> Result<Vec<GeneticEntity<G>>> {
    if context.rng.next_ratio() < context.crossover.crossover_rate() {
        let genomes: Vec<&G> = parents.iter().map(GeneticEntity::genome).collect();
        let children = context.crossover.crossover(&genomes, context.rng)?;
        return Ok(children.into_iter().map(GeneticEntity::new).collect());
    }

    Ok(parents
        .iter()
        .cloned()
        .map(|mut parent| {
            parent.increment_age();
            parent
        })
        .collect())
}

/// Copies of `entities` aged by one generation.
pub(crate) fn survivors<'a, G, I>(entities: I) -> impl Iterator<Item = GeneticEntity<G>> + 'a
where
    G: Genome,
    I: IntoIterator<Item = &'a GeneticEntity<G>>,
    I::IntoIter: 'a,
{
    entities.into_iter().cloned().map(|mut entity| {
        entity.increment_age();
        entity
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::{population, Operators};
    use super::*;
    use crate::rng::RandomNumberGenerator;

    #[test]
    fn test_breed_exact_count_and_unevaluated_children() {
        let operators = Operators::new(1.0);
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut context = operators.context(None, EvaluationMode::Maximize, &mut rng);
        let pop = population(0, &[1.0, 2.0, 3.0, 4.0]);

        let offspring = breed_offspring(&pop, 5, &mut context).unwrap();
        assert_eq!(offspring.len(), 5);
        assert!(offspring.iter().all(|child| !child.is_evaluated() && child.age() == 0));
    }

    #[test]
    fn test_zero_crossover_rate_passes_parents_through() {
        let operators = Operators::new(0.0);
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut context = operators.context(None, EvaluationMode::Maximize, &mut rng);
        let pop = population(0, &[1.0, 2.0, 3.0]);

        let offspring = breed_offspring(&pop, 4, &mut context).unwrap();
        for child in &offspring {
            assert!(child.is_evaluated());
            assert_eq!(child.age(), 1);
            assert!(pop.iter().any(|parent| parent.genome() == child.genome()));
        }
    }

    #[test]
    fn test_mutation_applied_to_offspring() {
        #[derive(Debug)]
        struct Always;
        impl MutationOperator<Vec<u8>> for Always {
            fn mutate(
                &self,
                entity: &mut GeneticEntity<Vec<u8>>,
                _rng: &mut dyn RandomSource,
            ) -> bool {
                entity.modify(|genome| {
                    genome.push(99);
                    true
                })
            }
        }

        let operators = Operators::new(0.0);
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut context = operators.context(None, EvaluationMode::Maximize, &mut rng);
        context.mutation = Some(&Always);
        let pop = population(0, &[1.0, 2.0]);

        let offspring = breed_offspring(&pop, 3, &mut context).unwrap();
        assert!(offspring
            .iter()
            .all(|child| child.genome().len() == 5 && !child.is_evaluated()));
        // The parents are untouched.
        assert!(pop.iter().all(|parent| parent.genome().len() == 4));
    }

    #[test]
    fn test_zero_count() {
        let operators = Operators::new(1.0);
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut context = operators.context(None, EvaluationMode::Maximize, &mut rng);
        let pop: Population<Vec<u8>> = Population::new(0);

        assert!(breed_offspring(&pop, 0, &mut context).unwrap().is_empty());
    }
}
