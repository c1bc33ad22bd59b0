//! # Mutation
//!
//! Mutation operators perturb a single entity. They change the genome only
//! through [`GeneticEntity::modify`], which clears the entity's fitness when
//! something actually changed so the entity is re-evaluated.

use std::fmt::Debug;

use crate::entity::GeneticEntity;
use crate::error::Result;
use crate::genome::{Genome, SequenceGenome};
use crate::rng::RandomSource;
use crate::validation::{check_rate, ensure_valid, ConfigViolation, Validate};

/// Probabilistically alters one entity.
pub trait MutationOperator<G: Genome>: Debug + Send + Sync {
    /// Mutates `entity` in place. Returns `true` iff at least one change was applied.
    fn mutate(&self, entity: &mut GeneticEntity<G>, rng: &mut dyn RandomSource) -> bool;

    /// Out-of-range settings of this operator.
    fn config_violations(&self) -> Vec<ConfigViolation> {
        Vec::new()
    }
}

/// Flips each boolean gene independently with probability `mutation_rate`.
///
/// An empty genome is left alone and reported as unchanged.
///
/// # Examples
///
/// ```
/// use genevo::entity::GeneticEntity;
/// use genevo::operators::{BitFlipMutation, MutationOperator};
/// use genevo::rng::RandomNumberGenerator;
///
/// let mutation = BitFlipMutation::new(1.0).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(1);
/// let mut entity = GeneticEntity::evaluated(vec![true, false], 1.0);
///
/// assert!(mutation.mutate(&mut entity, &mut rng));
/// assert_eq!(entity.genome(), &vec![false, true]);
/// assert!(!entity.is_evaluated());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct BitFlipMutation {
    mutation_rate: f64,
}

impl BitFlipMutation {
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if `mutation_rate` is not within `[0, 1]`.
    pub fn new(mutation_rate: f64) -> Result<Self> {
        let mutation = Self { mutation_rate };
        ensure_valid(mutation.validate())?;
        Ok(mutation)
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }
}

impl Validate for BitFlipMutation {
    fn validate(&self) -> Vec<ConfigViolation> {
        check_rate("BitFlipMutation", "mutation_rate", self.mutation_rate)
            .into_iter()
            .collect()
    }
}

impl<G> MutationOperator<G> for BitFlipMutation
where
    G: SequenceGenome<Gene = bool>,
{
    fn config_violations(&self) -> Vec<ConfigViolation> {
        self.validate()
    }

    fn mutate(&self, entity: &mut GeneticEntity<G>, rng: &mut dyn RandomSource) -> bool {
        let flips: Vec<usize> = (0..entity.genome().gene_count())
            .filter(|_| rng.next_ratio() < self.mutation_rate)
            .collect();

        entity.modify(|genome| {
            let genes = genome.genes_mut();
            for &position in &flips {
                genes[position] = !genes[position];
            }
            !flips.is_empty()
        })
    }
}
