//! # Terminators
//!
//! A terminator decides when a run is complete. It is consulted before every
//! generation, including before the first one.

use std::fmt;

use crate::environment::Environment;
use crate::fitness::{EvaluationMode, FitnessKind};
use crate::genome::Genome;

pub trait Terminator<G: Genome> {
    /// Returns `true` once the run should stop. `generation` is the number
    /// of generations completed so far.
    fn is_complete(&mut self, environment: &Environment<G>, generation: usize) -> bool;
}

/// Stops after a fixed number of generations.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationLimit {
    max_generations: usize,
}

impl GenerationLimit {
    pub fn new(max_generations: usize) -> Self {
        Self { max_generations }
    }
}

impl<G: Genome> Terminator<G> for GenerationLimit {
    fn is_complete(&mut self, _environment: &Environment<G>, generation: usize) -> bool {
        generation >= self.max_generations
    }
}

/// Stops once any entity's raw fitness reaches `target` under `mode`.
///
/// Under [`EvaluationMode::Maximize`] the target is reached by values at or
/// above it, under [`EvaluationMode::Minimize`] by values at or below it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessTarget {
    target: f64,
    mode: EvaluationMode,
}

impl FitnessTarget {
    pub fn new(target: f64, mode: EvaluationMode) -> Self {
        Self { target, mode }
    }
}

impl<G: Genome> Terminator<G> for FitnessTarget {
    fn is_complete(&mut self, environment: &Environment<G>, _generation: usize) -> bool {
        environment
            .fittest(FitnessKind::Raw, self.mode)
            .and_then(|(_, entity)| entity.raw_fitness())
            .is_some_and(|best| !self.mode.is_better(self.target, best))
    }
}

/// A terminator backed by a closure. Created with [`from_fn`].
pub struct FnTerminator<F> {
    condition: F,
}

impl<F> fmt::Debug for FnTerminator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTerminator").finish_non_exhaustive()
    }
}

/// Wraps a closure as a terminator.
///
/// ```
/// use genevo::algorithm::terminator::{from_fn, Terminator};
/// use genevo::environment::Environment;
///
/// let mut stop_at_three = from_fn(|_env: &Environment<Vec<bool>>, generation| generation >= 3);
/// assert!(!stop_at_three.is_complete(&Environment::new(), 2));
/// assert!(stop_at_three.is_complete(&Environment::new(), 3));
/// ```
pub fn from_fn<G, F>(condition: F) -> FnTerminator<F>
where
    G: Genome,
    F: FnMut(&Environment<G>, usize) -> bool,
{
    FnTerminator { condition }
}

impl<G, F> Terminator<G> for FnTerminator<F>
where
    G: Genome,
    F: FnMut(&Environment<G>, usize) -> bool,
{
    fn is_complete(&mut self, environment: &Environment<G>, generation: usize) -> bool {
        (self.condition)(environment, generation)
    }
}
