//! # Populations
//!
//! A [`Population`] is an ordered collection of entities belonging to one
//! deme. Insertion order carries no meaning beyond making random draws
//! reproducible.
//!
//! A population caches aggregates of its raw fitness values
//! ([`FitnessSummary`]). The cache is computed on first use and dropped every
//! time the entity set or a raw fitness value changes.

use std::sync::OnceLock;

use crate::{
    entity::GeneticEntity,
    error::{GeneticError, Result},
    fitness::{EvaluationMode, FitnessKind},
    genome::Genome,
};

/// Mean, extremes and standard deviation of a set of fitness values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation (divides by the number of values).
    pub standard_deviation: f64,
    pub count: usize,
}

impl FitnessSummary {
    /// Summarizes the given values. Returns `None` for an empty input.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            mean,
            min,
            max,
            standard_deviation: variance.sqrt(),
            count,
        })
    }
}

/// The entities of one deme.
#[derive(Debug)]
pub struct Population<G> {
    index: usize,
    entities: Vec<GeneticEntity<G>>,
    raw_summary: OnceLock<Option<FitnessSummary>>,
}

impl<G: Genome> Clone for Population<G> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            entities: self.entities.clone(),
            raw_summary: OnceLock::new(),
        }
    }
}

impl<G: Genome> Population<G> {
    /// Creates an empty population for deme `index`.
    pub fn new(index: usize) -> Self {
        Self::with_entities(index, Vec::new())
    }

    /// Creates a population for deme `index` holding `entities`.
    pub fn with_entities(index: usize, entities: Vec<GeneticEntity<G>>) -> Self {
        Self {
            index,
            entities,
            raw_summary: OnceLock::new(),
        }
    }

    /// Identifies the deme within its environment.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the entities in insertion order.
    pub fn entities(&self) -> &[GeneticEntity<G>] {
        &self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneticEntity<G>> {
        self.entities.iter()
    }

    pub fn get(&self, index: usize) -> Option<&GeneticEntity<G>> {
        self.entities.get(index)
    }

    /// Appends an entity.
    pub fn push(&mut self, entity: GeneticEntity<G>) {
        self.entities.push(entity);
        self.invalidate();
    }

    /// Appends several entities, keeping their order.
    pub fn extend<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = GeneticEntity<G>>,
    {
        self.entities.extend(entities);
        self.invalidate();
    }

    /// Removes and returns the entity at `index`.
    pub fn remove(&mut self, index: usize) -> Result<GeneticEntity<G>> {
        if index >= self.entities.len() {
            return Err(GeneticError::InvalidArgument(format!(
                "Entity index {} is out of range for a population of {}",
                index,
                self.entities.len()
            )));
        }
        let entity = self.entities.remove(index);
        self.invalidate();
        Ok(entity)
    }

    /// Removes the entities at `indices` and returns them in the order the
    /// indices were given. The remaining entities keep their relative order.
    pub fn take_entities(&mut self, indices: &[usize]) -> Result<Vec<GeneticEntity<G>>> {
        let mut order: Vec<(usize, usize)> = indices
            .iter()
            .enumerate()
            .map(|(slot, &index)| (index, slot))
            .collect();
        order.sort_unstable_by(|a, b| b.0.cmp(&a.0));

        if order.windows(2).any(|pair| pair[0].0 == pair[1].0) {
            return Err(GeneticError::InvalidArgument(
                "Entity indices to take must be distinct".to_string(),
            ));
        }
        if let Some(&(largest, _)) = order.first() {
            if largest >= self.entities.len() {
                return Err(GeneticError::InvalidArgument(format!(
                    "Entity index {} is out of range for a population of {}",
                    largest,
                    self.entities.len()
                )));
            }
        }

        let mut taken: Vec<Option<GeneticEntity<G>>> = (0..indices.len()).map(|_| None).collect();
        for (index, slot) in order {
            taken[slot] = Some(self.entities.remove(index));
        }
        self.invalidate();

        Ok(taken.into_iter().flatten().collect())
    }

    /// Replaces every entity with `entities`.
    pub fn replace_entities(&mut self, entities: Vec<GeneticEntity<G>>) {
        self.entities = entities;
        self.invalidate();
    }

    /// Sets the scaled fitness of the entity at `index`.
    ///
    /// Used by fitness scaling strategies. Does not affect the raw aggregates.
    pub fn set_scaled_fitness(&mut self, index: usize, value: f64) -> Result<()> {
        let count = self.entities.len();
        let entity = self.entities.get_mut(index).ok_or_else(|| {
            GeneticError::InvalidArgument(format!(
                "Entity index {} is out of range for a population of {}",
                index, count
            ))
        })?;
        entity.set_scaled_fitness(value);
        Ok(())
    }

    /// Resets every scaled fitness value to the corresponding raw value.
    pub fn reset_scaled_fitness(&mut self) {
        self.entities
            .iter_mut()
            .for_each(GeneticEntity::reset_scaled_fitness);
    }

    /// Number of entities still waiting for a fitness value.
    pub fn unevaluated_count(&self) -> usize {
        self.entities.iter().filter(|e| !e.is_evaluated()).count()
    }

    /// Raw fitness values of every evaluated entity, in insertion order.
    pub fn raw_fitness_values(&self) -> Vec<f64> {
        self.entities.iter().filter_map(|e| e.raw_fitness()).collect()
    }

    /// Cached aggregates of the raw fitness values.
    ///
    /// Returns `None` when no entity has been evaluated.
    pub fn raw_summary(&self) -> Option<FitnessSummary> {
        *self
            .raw_summary
            .get_or_init(|| FitnessSummary::from_values(self.raw_fitness_values()))
    }

    pub fn raw_mean(&self) -> Option<f64> {
        self.raw_summary().map(|s| s.mean)
    }

    pub fn raw_min(&self) -> Option<f64> {
        self.raw_summary().map(|s| s.min)
    }

    pub fn raw_max(&self) -> Option<f64> {
        self.raw_summary().map(|s| s.max)
    }

    pub fn raw_standard_deviation(&self) -> Option<f64> {
        self.raw_summary().map(|s| s.standard_deviation)
    }

    /// Aggregates of the scaled fitness values. Computed on every call.
    pub fn scaled_summary(&self) -> Option<FitnessSummary> {
        FitnessSummary::from_values(self.entities.iter().filter_map(|e| e.scaled_fitness()))
    }

    /// Entity indices ordered from worst to best under `mode`.
    ///
    /// The sort is stable, so entities with equal fitness keep their
    /// insertion order. Unevaluated entities rank below every evaluated one.
    pub fn ranked_indices(&self, kind: FitnessKind, mode: EvaluationMode) -> Vec<usize> {
        let worst = mode.worst_value();
        let mut indices: Vec<usize> = (0..self.entities.len()).collect();
        indices.sort_by(|&a, &b| {
            let fa = self.entities[a].fitness(kind).unwrap_or(worst);
            let fb = self.entities[b].fitness(kind).unwrap_or(worst);
            mode.compare(fa, fb)
        });
        indices
    }

    /// Returns the best evaluated entity under `mode`.
    ///
    /// On ties the entity inserted first wins.
    pub fn fittest(&self, kind: FitnessKind, mode: EvaluationMode) -> Option<&GeneticEntity<G>> {
        self.entities
            .iter()
            .filter_map(|e| e.fitness(kind).map(|f| (e, f)))
            .fold(None, |best: Option<(&GeneticEntity<G>, f64)>, (entity, fitness)| match best {
                Some((_, best_fitness)) if !mode.is_better(fitness, best_fitness) => best,
                _ => Some((entity, fitness)),
            })
            .map(|(entity, _)| entity)
    }

    /// Mutable access to the entities for the evaluation phase and ageing.
    ///
    /// Drops the raw aggregate cache since fitness values may change.
    pub(crate) fn entities_mut(&mut self) -> &mut [GeneticEntity<G>] {
        self.invalidate();
        &mut self.entities
    }

    /// Drops the cached raw aggregates.
    pub fn invalidate(&mut self) {
        self.raw_summary = OnceLock::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population(values: &[f64]) -> Population<u32> {
        Population::with_entities(
            0,
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| GeneticEntity::evaluated(i as u32, v))
                .collect(),
        )
    }

    #[test]
    fn test_summary_values() {
        let summary =
            FitnessSummary::from_values([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((summary.mean - 5.0).abs() < f64::EPSILON);
        assert!((summary.standard_deviation - 2.0).abs() < f64::EPSILON);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
        assert_eq!(summary.count, 8);
        assert!(FitnessSummary::from_values(Vec::new()).is_none());
    }

    #[test]
    fn test_raw_cache_invalidated_on_push() {
        let mut pop = population(&[1.0, 3.0]);
        assert_eq!(pop.raw_mean(), Some(2.0));

        pop.push(GeneticEntity::evaluated(9, 5.0));
        assert_eq!(pop.raw_mean(), Some(3.0));
        assert_eq!(pop.raw_max(), Some(5.0));
    }

    #[test]
    fn test_raw_cache_invalidated_on_fitness_change() {
        let mut pop = population(&[1.0, 3.0]);
        assert_eq!(pop.raw_min(), Some(1.0));

        pop.entities_mut()[0].set_raw_fitness(10.0);
        assert_eq!(pop.raw_min(), Some(3.0));
    }

    #[test]
    fn test_unevaluated_entities_are_excluded_from_summary() {
        let mut pop = population(&[2.0]);
        pop.push(GeneticEntity::new(7));

        assert_eq!(pop.unevaluated_count(), 1);
        assert_eq!(pop.raw_summary().unwrap().count, 1);
    }

    #[test]
    fn test_ranked_indices_stable_and_mode_aware() {
        let pop = population(&[5.0, 3.0, 8.0, 3.0]);

        let max = pop.ranked_indices(FitnessKind::Raw, EvaluationMode::Maximize);
        assert_eq!(max, vec![1, 3, 0, 2]);

        let min = pop.ranked_indices(FitnessKind::Raw, EvaluationMode::Minimize);
        assert_eq!(min, vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_take_entities_preserves_request_order() {
        let mut pop = population(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let taken = pop.take_entities(&[3, 0, 4]).unwrap();

        let genomes: Vec<u32> = taken.iter().map(|e| *e.genome()).collect();
        assert_eq!(genomes, vec![3, 0, 4]);

        let remaining: Vec<u32> = pop.iter().map(|e| *e.genome()).collect();
        assert_eq!(remaining, vec![1, 2]);
    }

    #[test]
    fn test_take_entities_rejects_bad_indices() {
        let mut pop = population(&[0.0, 1.0]);
        assert!(pop.take_entities(&[0, 0]).is_err());
        assert!(pop.take_entities(&[2]).is_err());
        assert_eq!(pop.len(), 2);
    }

    #[test]
    fn test_fittest() {
        let pop = population(&[5.0, 3.0, 8.0, 8.0, 1.0]);
        let best = pop.fittest(FitnessKind::Raw, EvaluationMode::Maximize).unwrap();
        assert_eq!(*best.genome(), 2);

        let best = pop.fittest(FitnessKind::Raw, EvaluationMode::Minimize).unwrap();
        assert_eq!(*best.genome(), 4);
    }

    #[test]
    fn test_clone_is_independent() {
        let pop = population(&[1.0, 2.0]);
        let mut copy = pop.clone();
        copy.remove(0).unwrap();

        assert_eq!(pop.len(), 2);
        assert_eq!(copy.len(), 1);
        assert_eq!(copy.raw_mean(), Some(2.0));
    }
}
