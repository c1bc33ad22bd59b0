use crate::entity::GeneticEntity;
use crate::error::Result;
use crate::fitness::EvaluationMode;
use crate::genome::Genome;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::selection::selection_strategy::{ensure_selectable, SelectionOperator};

/// Selects entities uniformly at random, ignoring fitness entirely.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct UniformSelection;

impl UniformSelection {
    pub fn new() -> Self {
        Self
    }
}

impl<G: Genome> SelectionOperator<G> for UniformSelection {
    fn select_entities(
        &self,
        count: usize,
        population: &Population<G>,
        _mode: EvaluationMode,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<GeneticEntity<G>>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        ensure_selectable(population)?;

        let entities = population.entities();
        Ok((0..count)
            .map(|_| entities[rng.next_int(entities.len())].clone())
            .collect())
    }
}
