use crate::error::Result;
use crate::genome::Genome;
use crate::population::Population;

use super::{evaluated_raw, FitnessScalingStrategy};

/// Replaces each raw value with its 1-based position in ascending raw order.
///
/// Equal raw values receive consecutive positions in insertion order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct RankScaling;

impl RankScaling {
    pub fn new() -> Self {
        Self
    }
}

impl<G: Genome> FitnessScalingStrategy<G> for RankScaling {
    fn rescale(&self, population: &mut Population<G>) -> Result<()> {
        let mut evaluated = evaluated_raw(population);
        evaluated.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (position, (index, _)) in evaluated.into_iter().enumerate() {
            population.set_scaled_fitness(index, (position + 1) as f64)?;
        }
        Ok(())
    }
}
