use crate::error::Result;
use crate::genome::Genome;
use crate::population::Population;
use crate::validation::{ensure_valid, ConfigViolation, Validate};

use super::{evaluated_raw, FitnessScalingStrategy};

/// Sigma truncation: `scaled = 1 + (raw - mean) / (multiplier * σ)`.
///
/// When every raw value is equal (`σ = 0`) every entity gets a scaled
/// fitness of `1.0`. The mean and standard deviation are taken from the
/// population's cached raw aggregates.
///
/// # Examples
///
/// ```
/// use genevo::entity::GeneticEntity;
/// use genevo::population::Population;
/// use genevo::scaling::{FitnessScalingStrategy, SigmaScaling};
///
/// let mut population = Population::with_entities(
///     0,
///     vec![GeneticEntity::evaluated(0, 2.0), GeneticEntity::evaluated(1, 4.0)],
/// );
/// SigmaScaling::new(1.0).unwrap().rescale(&mut population).unwrap();
///
/// assert_eq!(population.entities()[0].scaled_fitness(), Some(0.0));
/// assert_eq!(population.entities()[1].scaled_fitness(), Some(2.0));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct SigmaScaling {
    multiplier: f64,
}

impl SigmaScaling {
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error unless `multiplier` is positive and finite.
    pub fn new(multiplier: f64) -> Result<Self> {
        let scaling = Self { multiplier };
        ensure_valid(scaling.validate())?;
        Ok(scaling)
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Default for SigmaScaling {
    fn default() -> Self {
        Self { multiplier: 2.0 }
    }
}

impl Validate for SigmaScaling {
    fn validate(&self) -> Vec<ConfigViolation> {
        if self.multiplier.is_finite() && self.multiplier > 0.0 {
            Vec::new()
        } else {
            vec![ConfigViolation::new(
                "SigmaScaling",
                "multiplier",
                format!("must be positive and finite, got {}", self.multiplier),
            )]
        }
    }
}

impl<G: Genome> FitnessScalingStrategy<G> for SigmaScaling {
    fn config_violations(&self) -> Vec<ConfigViolation> {
        self.validate()
    }

    fn rescale(&self, population: &mut Population<G>) -> Result<()> {
        let Some(summary) = population.raw_summary() else {
            return Ok(());
        };

        let spread = self.multiplier * summary.standard_deviation;
        for (index, raw) in evaluated_raw(population) {
            let scaled = if spread > 0.0 {
                1.0 + (raw - summary.mean) / spread
            } else {
                1.0
            };
            population.set_scaled_fitness(index, scaled)?;
        }
        Ok(())
    }
}
