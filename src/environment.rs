//! # Environment
//!
//! The set of populations taking part in a run. Single-population variants
//! use an environment of one; the multi-deme variant uses several and moves
//! entities between them during migration.

use crate::{
    entity::GeneticEntity,
    fitness::{EvaluationMode, FitnessKind},
    genome::Genome,
    population::Population,
};

/// Ordered populations of one run, indexed by deme.
#[derive(Debug)]
pub struct Environment<G> {
    populations: Vec<Population<G>>,
}

impl<G: Genome> Clone for Environment<G> {
    fn clone(&self) -> Self {
        Self {
            populations: self.populations.clone(),
        }
    }
}

impl<G: Genome> Environment<G> {
    pub fn new() -> Self {
        Self {
            populations: Vec::new(),
        }
    }

    pub fn with_populations(populations: Vec<Population<G>>) -> Self {
        Self { populations }
    }

    pub fn populations(&self) -> &[Population<G>] {
        &self.populations
    }

    pub fn populations_mut(&mut self) -> &mut [Population<G>] {
        &mut self.populations
    }

    pub fn population(&self, index: usize) -> Option<&Population<G>> {
        self.populations.get(index)
    }

    pub fn push(&mut self, population: Population<G>) {
        self.populations.push(population);
    }

    /// Number of populations.
    pub fn len(&self) -> usize {
        self.populations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    /// Number of entities across every population.
    pub fn entity_count(&self) -> usize {
        self.populations.iter().map(Population::len).sum()
    }

    /// Best evaluated entity across every population, with the index of the
    /// population holding it. Earlier populations win ties.
    pub fn fittest(
        &self,
        kind: FitnessKind,
        mode: EvaluationMode,
    ) -> Option<(usize, &GeneticEntity<G>)> {
        let mut best: Option<(usize, &GeneticEntity<G>, f64)> = None;
        for population in &self.populations {
            let Some(candidate) = population.fittest(kind, mode) else {
                continue;
            };
            let Some(fitness) = candidate.fitness(kind) else {
                continue;
            };
            match best {
                Some((_, _, best_fitness)) if !mode.is_better(fitness, best_fitness) => {}
                _ => best = Some((population.index(), candidate, fitness)),
            }
        }
        best.map(|(index, entity, _)| (index, entity))
    }
}

impl<G: Genome> Default for Environment<G> {
    fn default() -> Self {
        Self::new()
    }
}
