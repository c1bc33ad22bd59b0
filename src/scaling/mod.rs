//! # Fitness Scaling
//!
//! A fitness scaling strategy maps the raw fitness distribution of a
//! population onto scaled fitness values. Selection operators and metrics
//! configured with [`FitnessKind::Scaled`](crate::fitness::FitnessKind) read
//! the scaled values.
//!
//! Without a scaling strategy the engine resets every scaled value to the
//! raw one after evaluation.
//!
//! Both built-in strategies preserve the order of raw values, so a scaled
//! value is better than another exactly when its raw value is. Scaled values
//! are therefore compared under the same evaluation mode as raw values.

use std::fmt::Debug;

use crate::error::Result;
use crate::genome::Genome;
use crate::population::Population;
use crate::validation::ConfigViolation;

pub mod rank;
pub mod sigma;

pub use rank::RankScaling;
pub use sigma::SigmaScaling;

/// Recomputes the scaled fitness of every evaluated entity of a population.
pub trait FitnessScalingStrategy<G: Genome>: Debug + Send + Sync {
    /// Sets each evaluated entity's scaled fitness from the raw distribution.
    ///
    /// Unevaluated entities are left untouched.
    fn rescale(&self, population: &mut Population<G>) -> Result<()>;

    /// Reported by the builder alongside the other configuration checks.
    fn config_violations(&self) -> Vec<ConfigViolation> {
        Vec::new()
    }
}

/// Indices and raw fitness of the evaluated entities, in insertion order.
fn evaluated_raw<G: Genome>(population: &Population<G>) -> Vec<(usize, f64)> {
    population
        .iter()
        .enumerate()
        .filter_map(|(index, entity)| entity.raw_fitness().map(|raw| (index, raw)))
        .collect()
}
