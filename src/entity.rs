//! # Genetic Entities
//!
//! A [`GeneticEntity`] is one candidate solution: a genome plus the fitness
//! values the engine attaches to it and the number of generations it has
//! survived.
//!
//! Fitness values start out unevaluated (`None`). They are filled in by the
//! evaluation phase and cleared again whenever the genome is modified through
//! [`GeneticEntity::modify`].

use crate::{fitness::FitnessKind, genome::Genome};

/// One candidate solution.
///
/// Cloning an entity deep-copies its genome: the clone and the original can
/// be modified independently.
///
/// # Example
///
/// ```rust
/// use genevo::entity::GeneticEntity;
/// use genevo::fitness::FitnessKind;
///
/// let mut entity = GeneticEntity::evaluated(vec![true, false], 1.0);
/// let mut clone = entity.clone();
///
/// let changed = clone.modify(|genome| {
///     genome[1] = true;
///     true
/// });
///
/// assert!(changed);
/// assert_eq!(clone.raw_fitness(), None);
/// assert_eq!(entity.genome(), &vec![true, false]);
/// assert_eq!(entity.fitness(FitnessKind::Scaled), Some(1.0));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GeneticEntity<G> {
    genome: G,
    raw_fitness: Option<f64>,
    scaled_fitness: Option<f64>,
    age: usize,
}

impl<G: Genome> GeneticEntity<G> {
    /// Creates an unevaluated entity of age zero.
    pub fn new(genome: G) -> Self {
        Self {
            genome,
            raw_fitness: None,
            scaled_fitness: None,
            age: 0,
        }
    }

    /// Creates an entity whose raw fitness is already known.
    ///
    /// The scaled fitness starts out equal to the raw fitness.
    pub fn evaluated(genome: G, raw_fitness: f64) -> Self {
        let mut entity = Self::new(genome);
        entity.set_raw_fitness(raw_fitness);
        entity
    }

    /// Returns the genome.
    pub fn genome(&self) -> &G {
        &self.genome
    }

    /// Returns the genetic representation, for display and debugging.
    pub fn representation(&self) -> String {
        format!("{:?}", self.genome)
    }

    /// Consumes the entity and returns its genome.
    pub fn into_genome(self) -> G {
        self.genome
    }

    /// Returns the raw fitness, or `None` if the entity has not been evaluated.
    pub fn raw_fitness(&self) -> Option<f64> {
        self.raw_fitness
    }

    /// Returns the scaled fitness, or `None` if the entity has not been evaluated.
    pub fn scaled_fitness(&self) -> Option<f64> {
        self.scaled_fitness
    }

    /// Returns the fitness value of the requested kind.
    pub fn fitness(&self, kind: FitnessKind) -> Option<f64> {
        match kind {
            FitnessKind::Raw => self.raw_fitness,
            FitnessKind::Scaled => self.scaled_fitness,
        }
    }

    /// Returns `true` once the entity has a raw fitness value.
    pub fn is_evaluated(&self) -> bool {
        self.raw_fitness.is_some()
    }

    /// Returns the number of generations this entity has survived.
    pub fn age(&self) -> usize {
        self.age
    }

    /// Applies `change` to the genome.
    ///
    /// `change` returns whether it actually modified the genome. If it did,
    /// both fitness values are cleared so the entity is re-evaluated.
    pub fn modify<F>(&mut self, change: F) -> bool
    where
        F: FnOnce(&mut G) -> bool,
    {
        let changed = change(&mut self.genome);
        if changed {
            self.raw_fitness = None;
            self.scaled_fitness = None;
        }
        changed
    }

    /// Sets the raw fitness. The scaled fitness tracks it until rescaled.
    pub(crate) fn set_raw_fitness(&mut self, value: f64) {
        self.raw_fitness = Some(value);
        self.scaled_fitness = Some(value);
    }

    pub(crate) fn set_scaled_fitness(&mut self, value: f64) {
        self.scaled_fitness = Some(value);
    }

    pub(crate) fn reset_scaled_fitness(&mut self) {
        self.scaled_fitness = self.raw_fitness;
    }

    pub(crate) fn increment_age(&mut self) {
        self.age += 1;
    }
}
