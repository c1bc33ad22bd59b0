//! # Multi-Deme Migration
//!
//! Several populations (demes) evolve side by side with generational
//! replacement. Every `migrate_each_generation` generations, entities move
//! around a ring of demes: the fittest entities of deme 0 move to deme 1,
//! which in turn sends the same number of its strong (but not strongest)
//! entities to deme 2, and so on, until the last deme's batch closes the
//! ring into deme 0.
//!
//! Every deme ends a migration with the size it started with.

use tracing::debug;

use crate::entity::GeneticEntity;
use crate::environment::Environment;
use crate::error::{GeneticError, Result};
use crate::fitness::{EvaluationMode, FitnessKind};
use crate::genome::Genome;
use crate::population::Population;
use crate::validation::{ConfigViolation, Validate};

use super::generational::Generational;
use super::options::AlgorithmOptions;
use super::strategy::{BreedingContext, GenerationStrategy};

/// Generational replacement in every deme plus periodic ring migration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct MultiDeme {
    migrant_count: usize,
    migrate_each_generation: usize,
    fitness_kind: FitnessKind,
}

impl MultiDeme {
    /// Migrants are ranked on raw fitness. See [`MultiDeme::with_fitness_kind`].
    pub fn new(migrant_count: usize, migrate_each_generation: usize) -> Self {
        Self {
            migrant_count,
            migrate_each_generation,
            fitness_kind: FitnessKind::Raw,
        }
    }

    pub fn with_fitness_kind(mut self, fitness_kind: FitnessKind) -> Self {
        self.fitness_kind = fitness_kind;
        self
    }

    pub fn migrant_count(&self) -> usize {
        self.migrant_count
    }

    pub fn migrate_each_generation(&self) -> usize {
        self.migrate_each_generation
    }

    /// Whether migration happens after `generation` has been produced.
    pub fn is_migration_generation(&self, generation: usize) -> bool {
        self.migrate_each_generation > 0 && generation % self.migrate_each_generation == 0
    }
}

impl Validate for MultiDeme {
    fn validate(&self) -> Vec<ConfigViolation> {
        if self.migrate_each_generation == 0 {
            vec![ConfigViolation::new(
                "MultiDeme",
                "migrate_each_generation",
                "must be at least 1",
            )]
        } else {
            Vec::new()
        }
    }
}

impl<G: Genome> GenerationStrategy<G> for MultiDeme {
    fn name(&self) -> &'static str {
        "multi-deme"
    }

    fn check_options(&self, options: &AlgorithmOptions) -> Vec<ConfigViolation> {
        let mut violations = self.validate();
        if options.get_population_count() < 2 {
            violations.push(ConfigViolation::new(
                "MultiDeme",
                "population_count",
                format!(
                    "multi-deme evolution needs at least 2 populations, got {}",
                    options.get_population_count()
                ),
            ));
        }
        if self.migrant_count > options.get_min_population_size() {
            violations.push(ConfigViolation::new(
                "MultiDeme",
                "migrant_count",
                format!(
                    "must not exceed the population size {}, got {}",
                    options.get_min_population_size(),
                    self.migrant_count
                ),
            ));
        }
        violations
    }

    fn next_generation(
        &self,
        population: &Population<G>,
        context: &mut BreedingContext<'_, G>,
    ) -> Result<Vec<GeneticEntity<G>>> {
        Generational.next_generation(population, context)
    }

    fn after_evaluation(
        &self,
        environment: &mut Environment<G>,
        generation: usize,
        mode: EvaluationMode,
    ) -> Result<()> {
        if !self.is_migration_generation(generation) {
            return Ok(());
        }
        debug!(
            generation,
            migrants = self.migrant_count,
            demes = environment.len(),
            "Migrating between demes"
        );
        migrate(environment, self.migrant_count, self.fitness_kind, mode)
    }
}

/// Moves `migrant_count` entities around the ring of populations.
///
/// 1. The `migrant_count` fittest entities of population 0 form the first batch.
/// 2. Each following population receives the batch, is ranked from worst to
///    best, and gives up the entities at ranked positions `len - i - 2` for
///    slots `i = 0..migrant_count` as the next batch. Its single best entity
///    therefore never leaves.
/// 3. The last batch moves into population 0.
///
/// Does nothing with fewer than two populations or no migrants.
pub fn migrate<G: Genome>(
    environment: &mut Environment<G>,
    migrant_count: usize,
    kind: FitnessKind,
    mode: EvaluationMode,
) -> Result<()> {
    let populations = environment.populations_mut();
    if populations.len() < 2 || migrant_count == 0 {
        return Ok(());
    }

    let (first, rest) = populations.split_at_mut(1);
    let source = &mut first[0];
    if source.len() < migrant_count {
        return Err(GeneticError::Evolution(format!(
            "Population {} holds {} entities, fewer than the {} migrants requested",
            source.index(),
            source.len(),
            migrant_count
        )));
    }
    let fittest: Vec<usize> = source
        .ranked_indices(kind, mode)
        .into_iter()
        .rev()
        .take(migrant_count)
        .collect();
    let mut batch = source.take_entities(&fittest)?;

    for deme in rest.iter_mut() {
        deme.extend(batch);

        let ranked = deme.ranked_indices(kind, mode);
        let picks = (0..migrant_count)
            .map(|slot| {
                ranked
                    .len()
                    .checked_sub(slot + 2)
                    .map(|position| ranked[position])
                    .ok_or_else(|| {
                        GeneticError::Evolution(format!(
                            "Population {} is too small to give up migrant {}",
                            deme.index(),
                            slot
                        ))
                    })
            })
            .collect::<Result<Vec<usize>>>()?;

        batch = deme.take_entities(&picks)?;
    }

    source.extend(batch);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::strategy::test_support::population;

    fn fitness_of(population: &Population<Vec<u8>>) -> Vec<f64> {
        population.iter().filter_map(|e| e.raw_fitness()).collect()
    }

    #[test]
    fn test_ring_of_three() {
        let mut env = Environment::with_populations(vec![
            population(0, &[1.0, 9.0, 5.0]),
            population(1, &[2.0, 4.0, 8.0]),
            population(2, &[3.0, 6.0, 7.0]),
        ]);

        migrate(&mut env, 1, FitnessKind::Raw, EvaluationMode::Maximize).unwrap();

        // 9 leaves deme 0; deme 1 then holds [2, 4, 8, 9] and gives up 8.
        assert_eq!(fitness_of(&env.populations()[1]), vec![2.0, 4.0, 9.0]);
        // Deme 2 holds [3, 6, 7, 8] and gives up 7.
        assert_eq!(fitness_of(&env.populations()[2]), vec![3.0, 6.0, 8.0]);
        assert_eq!(fitness_of(&env.populations()[0]), vec![1.0, 5.0, 7.0]);
    }

    #[test]
    fn test_sizes_kept_and_global_best_unique() {
        let mut env = Environment::with_populations(vec![
            population(0, &[1.0, 2.0, 3.0, 4.0]),
            population(1, &[10.0, 0.5, 0.7, 0.2]),
        ]);

        migrate(&mut env, 2, FitnessKind::Raw, EvaluationMode::Maximize).unwrap();

        for deme in env.populations() {
            assert_eq!(deme.len(), 4);
        }
        let holders: usize = env
            .populations()
            .iter()
            .map(|deme| deme.iter().filter(|e| e.raw_fitness() == Some(10.0)).count())
            .sum();
        assert_eq!(holders, 1);
    }

    #[test]
    fn test_minimize_sends_lowest_values() {
        let mut env = Environment::with_populations(vec![
            population(0, &[4.0, 1.0]),
            population(1, &[3.0, 2.0]),
        ]);

        migrate(&mut env, 1, FitnessKind::Raw, EvaluationMode::Minimize).unwrap();

        // Deme 1 holds [3, 2, 1]; ranked worst to best that is [3, 2, 1] and
        // position 1 (value 2) moves back to deme 0.
        assert_eq!(fitness_of(&env.populations()[0]), vec![4.0, 2.0]);
        assert_eq!(fitness_of(&env.populations()[1]), vec![3.0, 1.0]);
    }

    #[test]
    fn test_no_op_cases() {
        let mut single = Environment::with_populations(vec![population(0, &[1.0, 2.0])]);
        migrate(&mut single, 1, FitnessKind::Raw, EvaluationMode::Maximize).unwrap();
        assert_eq!(fitness_of(&single.populations()[0]), vec![1.0, 2.0]);

        let mut pair = Environment::with_populations(vec![
            population(0, &[1.0]),
            population(1, &[2.0]),
        ]);
        migrate(&mut pair, 0, FitnessKind::Raw, EvaluationMode::Maximize).unwrap();
        assert_eq!(fitness_of(&pair.populations()[1]), vec![2.0]);
    }

    #[test]
    fn test_too_many_migrants() {
        let mut env = Environment::with_populations(vec![
            population(0, &[1.0]),
            population(1, &[2.0, 3.0]),
        ]);
        let result = migrate(&mut env, 2, FitnessKind::Raw, EvaluationMode::Maximize);
        assert!(matches!(result, Err(GeneticError::Evolution(_))));
    }

    #[test]
    fn test_migration_schedule_and_options() {
        let strategy = MultiDeme::new(2, 3);
        assert!(!strategy.is_migration_generation(1));
        assert!(strategy.is_migration_generation(3));
        assert!(strategy.is_migration_generation(6));

        let options = AlgorithmOptions::new(10, 1);
        let violations = GenerationStrategy::<u8>::check_options(&strategy, &options);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].property, "population_count");

        let options = AlgorithmOptions::new(10, 2);
        let violations = GenerationStrategy::<u8>::check_options(&MultiDeme::new(20, 0), &options);
        let properties: Vec<&str> = violations.iter().map(|v| v.property).collect();
        assert_eq!(properties, vec!["migrate_each_generation", "migrant_count"]);
    }
}
