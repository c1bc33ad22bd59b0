use crate::entity::GeneticEntity;
use crate::error::Result;
use crate::genome::Genome;
use crate::population::Population;

use super::strategy::{breed_offspring, survivors, BreedingContext, GenerationStrategy};

/// Replaces the whole population every generation.
///
/// The elite entities are copied forward unchanged; the rest of the next
/// generation is bred offspring, so the population size stays the same.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default)]
pub struct Generational;

impl Generational {
    pub fn new() -> Self {
        Self
    }
}

impl<G: Genome> GenerationStrategy<G> for Generational {
    fn name(&self) -> &'static str {
        "generational"
    }

    fn next_generation(
        &self,
        population: &Population<G>,
        context: &mut BreedingContext<'_, G>,
    ) -> Result<Vec<GeneticEntity<G>>> {
        let elite = context.elite(population);
        let offspring_count = population.len().saturating_sub(elite.len());

        let mut next: Vec<GeneticEntity<G>> = survivors(&elite).collect();
        next.extend(breed_offspring(population, offspring_count, context)?);
        Ok(next)
    }
}
