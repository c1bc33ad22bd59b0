//! # Metrics
//!
//! Metrics are per-population statistics computed after every evaluation
//! pass: fitness mean, extremes, standard deviation and the best fitness
//! seen so far.
//!
//! When a metric reads raw fitness, or when no scaling strategy is
//! configured, it uses the population's cached raw aggregates. Only a metric
//! on scaled fitness with scaling active aggregates the scaled values.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use crate::entity::GeneticEntity;
use crate::fitness::{EvaluationMode, FitnessKind};
use crate::genome::Genome;
use crate::population::{FitnessSummary, Population};

/// Information a metric receives besides the population.
#[derive(Debug, Clone, Copy)]
pub struct MetricContext {
    pub scaling_active: bool,
    pub mode: EvaluationMode,
    pub generation: usize,
}

/// A derived value computed from one population.
pub trait Metric<G: Genome>: Debug + Send + Sync {
    /// Identifies the metric in [`PopulationStatistics`].
    fn name(&self) -> &str;

    /// Computes the metric. Returns `None` when the population holds no
    /// evaluated entity.
    fn compute(&mut self, population: &Population<G>, context: &MetricContext) -> Option<f64>;
}

fn summary_for<G: Genome>(
    population: &Population<G>,
    kind: FitnessKind,
    context: &MetricContext,
) -> Option<FitnessSummary> {
    match kind {
        FitnessKind::Scaled if context.scaling_active => population.scaled_summary(),
        _ => population.raw_summary(),
    }
}

macro_rules! summary_metric {
    ($(#[$doc:meta])* $name:ident, $label:literal, $field:ident) => {
        $(#[$doc])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            fitness_kind: FitnessKind,
        }

        impl $name {
            pub fn new(fitness_kind: FitnessKind) -> Self {
                Self { fitness_kind }
            }
        }

        impl<G: Genome> Metric<G> for $name {
            fn name(&self) -> &str {
                $label
            }

            fn compute(
                &mut self,
                population: &Population<G>,
                context: &MetricContext,
            ) -> Option<f64> {
                summary_for(population, self.fitness_kind, context).map(|s| s.$field)
            }
        }
    };
}

summary_metric!(
    /// Mean fitness of the evaluated entities.
    FitnessMean,
    "fitness_mean",
    mean
);
summary_metric!(
    /// Lowest fitness value, regardless of the evaluation mode.
    FitnessMinimum,
    "fitness_minimum",
    min
);
summary_metric!(
    /// Highest fitness value, regardless of the evaluation mode.
    FitnessMaximum,
    "fitness_maximum",
    max
);
summary_metric!(
    /// Population standard deviation of the fitness values.
    FitnessStandardDeviation,
    "fitness_standard_deviation",
    standard_deviation
);

/// Best raw fitness seen in each deme since the run started.
///
/// Keeps a cloned snapshot of the best entity per deme, so later changes to
/// the population never alter it. Clones share the snapshots: keep a clone
/// before handing the metric to the builder to read them after the run.
///
/// ```
/// use genevo::metrics::{BestFitnessSoFar, Metric};
///
/// let tracker: BestFitnessSoFar<Vec<bool>> = BestFitnessSoFar::new();
/// let handle = tracker.clone();
/// // `tracker` goes to `GeneticAlgorithmBuilder::with_metric`.
/// assert!(handle.best_entity(0).is_none());
/// assert_eq!(tracker.name(), "best_fitness_so_far");
/// ```
pub struct BestFitnessSoFar<G> {
    best: Arc<Mutex<HashMap<usize, GeneticEntity<G>>>>,
}

impl<G: Genome> BestFitnessSoFar<G> {
    pub fn new() -> Self {
        Self {
            best: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// A copy of the best entity recorded for deme `population_index`.
    pub fn best_entity(&self, population_index: usize) -> Option<GeneticEntity<G>> {
        self.lock().get(&population_index).cloned()
    }

    /// The best recorded entity across all demes, with its deme index.
    ///
    /// On ties the lowest deme index wins.
    pub fn best_overall(&self, mode: EvaluationMode) -> Option<(usize, GeneticEntity<G>)> {
        let best = self.lock();
        let mut demes: Vec<&usize> = best.keys().collect();
        demes.sort();
        demes
            .into_iter()
            .filter_map(|deme| {
                best.get(deme)
                    .and_then(|entity| entity.raw_fitness().map(|f| (*deme, entity, f)))
            })
            .fold(None, |acc: Option<(usize, &GeneticEntity<G>, f64)>, candidate| match acc {
                Some((_, _, current)) if !mode.is_better(candidate.2, current) => acc,
                _ => Some(candidate),
            })
            .map(|(deme, entity, _)| (deme, entity.clone()))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<usize, GeneticEntity<G>>> {
        self.best.lock().unwrap_or_else(|poisoned| {
            warn!("Best-so-far snapshot lock was poisoned; recovering");
            poisoned.into_inner()
        })
    }
}

impl<G: Genome> Clone for BestFitnessSoFar<G> {
    fn clone(&self) -> Self {
        Self {
            best: Arc::clone(&self.best),
        }
    }
}

impl<G: Genome> Default for BestFitnessSoFar<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Genome> Debug for BestFitnessSoFar<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BestFitnessSoFar")
            .field("demes", &self.lock().len())
            .finish()
    }
}

impl<G: Genome> Metric<G> for BestFitnessSoFar<G> {
    fn name(&self) -> &str {
        "best_fitness_so_far"
    }

    fn compute(&mut self, population: &Population<G>, context: &MetricContext) -> Option<f64> {
        let mut best = self.lock();

        if let Some(candidate) = population.fittest(FitnessKind::Raw, context.mode) {
            let improves = match best.get(&population.index()) {
                Some(recorded) => match (candidate.raw_fitness(), recorded.raw_fitness()) {
                    (Some(new), Some(old)) => context.mode.is_better(new, old),
                    _ => false,
                },
                None => true,
            };
            if improves {
                best.insert(population.index(), candidate.clone());
            }
        }

        best.get(&population.index()).and_then(GeneticEntity::raw_fitness)
    }
}

/// One computed metric value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub name: String,
    pub value: Option<f64>,
}

/// The metric values of one population for one generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationStatistics {
    pub population: usize,
    pub generation: usize,
    pub values: Vec<MetricValue>,
}

impl PopulationStatistics {
    /// Looks up a metric by name. Returns `None` if the metric is unknown
    /// or had no value.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|metric| metric.name == name)
            .and_then(|metric| metric.value)
    }
}

/// Computes every metric for every population, in population order.
pub(crate) fn compute_statistics<G: Genome>(
    metrics: &mut [Box<dyn Metric<G>>],
    populations: &[Population<G>],
    context: &MetricContext,
) -> Vec<PopulationStatistics> {
    populations
        .iter()
        .map(|population| PopulationStatistics {
            population: population.index(),
            generation: context.generation,
            values: metrics
                .iter_mut()
                .map(|metric| MetricValue {
                    name: metric.name().to_string(),
                    value: metric.compute(population, context),
                })
                .collect(),
        })
        .collect()
}
