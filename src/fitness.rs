//! # Fitness
//!
//! Fitness evaluation is the one part of a run supplied entirely by the user.
//! A [`FitnessEvaluator`] scores a genome and declares whether larger or
//! smaller scores are better through its [`EvaluationMode`]. Every comparison
//! made by the engine (selection, elitism, replacement, migration,
//! termination) goes through that mode.

use std::cmp::Ordering;

use crate::{error::Result, genome::Genome};

/// Whether larger or smaller fitness values are better.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvaluationMode {
    /// Larger fitness values are better.
    #[default]
    Maximize,
    /// Smaller fitness values are better.
    Minimize,
}

impl EvaluationMode {
    /// Compares two fitness values so that the better one compares `Greater`.
    ///
    /// NaN values compare as the worst possible value.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        let ordering = match a.partial_cmp(&b) {
            Some(ordering) => ordering,
            None if a.is_nan() && b.is_nan() => return Ordering::Equal,
            None if a.is_nan() => return Ordering::Less,
            None => return Ordering::Greater,
        };

        match self {
            EvaluationMode::Maximize => ordering,
            EvaluationMode::Minimize => ordering.reverse(),
        }
    }

    /// Returns `true` if `candidate` is strictly better than `incumbent`.
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        self.compare(candidate, incumbent) == Ordering::Greater
    }

    /// The value every real fitness value beats.
    pub fn worst_value(self) -> f64 {
        match self {
            EvaluationMode::Maximize => f64::NEG_INFINITY,
            EvaluationMode::Minimize => f64::INFINITY,
        }
    }
}

/// Which of an entity's fitness values a component compares on.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FitnessKind {
    /// The value produced by the evaluator.
    Raw,
    /// The value produced by the fitness scaling strategy, or the raw value
    /// when no scaling strategy is configured.
    #[default]
    Scaled,
}

/// Scores genomes.
///
/// Evaluators are shared between worker threads during the evaluation phase,
/// so they must be `Send + Sync`. Evaluating one genome must not depend on
/// the evaluation of any other.
///
/// # Example
///
/// ```rust
/// use genevo::fitness::{EvaluationMode, FitnessEvaluator};
///
/// struct OneMax;
///
/// impl FitnessEvaluator<Vec<bool>> for OneMax {
///     fn evaluate(&self, genome: &Vec<bool>) -> genevo::Result<f64> {
///         Ok(genome.iter().filter(|&&bit| bit).count() as f64)
///     }
/// }
///
/// assert_eq!(OneMax.evaluate(&vec![true, false, true]).unwrap(), 2.0);
/// assert_eq!(OneMax.evaluation_mode(), EvaluationMode::Maximize);
/// ```
pub trait FitnessEvaluator<G: Genome>: Send + Sync {
    /// Computes the raw fitness of a genome.
    fn evaluate(&self, genome: &G) -> Result<f64>;

    /// Whether larger or smaller scores are better. Defaults to `Maximize`.
    fn evaluation_mode(&self) -> EvaluationMode {
        EvaluationMode::Maximize
    }
}
