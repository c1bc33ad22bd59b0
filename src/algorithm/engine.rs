//! # Genetic Algorithm Engine
//!
//! [`GeneticAlgorithm`] drives a run. It owns the environment and every
//! configured component, and advances the environment one generation per
//! [`GeneticAlgorithm::step`]:
//!
//! 1. the generation strategy breeds the next generation of each population,
//! 2. every entity without a fitness value is evaluated,
//! 3. scaled fitness values are refreshed,
//! 4. the strategy's post-evaluation hook runs (migration for multi-deme runs)
//!    and scaled values are refreshed again,
//! 5. metrics are computed and observers are notified.
//!
//! A step works on a copy of the environment and only commits it once every
//! phase succeeded, so a failed step leaves the previous generation intact.
//!
//! ## Example
//!
//! ```rust
//! use genevo::algorithm::{GeneticAlgorithm, Generational, GenerationLimit};
//! use genevo::fitness::{EvaluationMode, FitnessEvaluator};
//! use genevo::operators::{BitFlipMutation, SinglePointCrossover};
//! use genevo::rng::RandomSource;
//! use genevo::selection::TournamentSelection;
//!
//! struct OneMax;
//!
//! impl FitnessEvaluator<Vec<bool>> for OneMax {
//!     fn evaluate(&self, genome: &Vec<bool>) -> genevo::Result<f64> {
//!         Ok(genome.iter().filter(|&&bit| bit).count() as f64)
//!     }
//! }
//!
//! fn main() -> genevo::Result<()> {
//!     let mut algorithm = GeneticAlgorithm::builder(Generational)
//!         .with_genome_factory(|rng: &mut dyn RandomSource| -> genevo::Result<Vec<bool>> {
//!             Ok((0..16).map(|_| rng.next_ratio() < 0.5).collect())
//!         })
//!         .with_evaluator(OneMax)
//!         .with_selection(TournamentSelection::default())
//!         .with_crossover(SinglePointCrossover::new(0.9)?)
//!         .with_mutation(BitFlipMutation::new(0.05)?)
//!         .with_seed(7)
//!         .build()?;
//!
//!     let summary = algorithm.run(&mut GenerationLimit::new(10))?;
//!     assert_eq!(summary.generations, 10);
//!     assert!(summary.best.is_some());
//!     Ok(())
//! }
//! ```

use std::fmt;

use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::elitism::ElitismStrategy;
use crate::entity::GeneticEntity;
use crate::environment::Environment;
use crate::error::{GeneticError, Result};
use crate::fitness::{EvaluationMode, FitnessEvaluator, FitnessKind};
use crate::genome::{Genome, GenomeFactory};
use crate::metrics::{compute_statistics, Metric, MetricContext, PopulationStatistics};
use crate::operators::{CrossoverOperator, MutationOperator};
use crate::population::Population;
use crate::rng::RandomSource;
use crate::scaling::FitnessScalingStrategy;
use crate::selection::SelectionOperator;

use super::builder::GeneticAlgorithmBuilder;
use super::cancellation::CancellationToken;
use super::multi_deme::MultiDeme;
use super::options::AlgorithmOptions;
use super::steady_state::SteadyState;
use super::strategy::{BreedingContext, GenerationStrategy};
use super::terminator::Terminator;

/// Lifecycle of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmState {
    Created,
    Initialized,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for AlgorithmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgorithmState::Created => "created",
            AlgorithmState::Initialized => "initialized",
            AlgorithmState::Running => "running",
            AlgorithmState::Completed => "completed",
            AlgorithmState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Passed to observers after every generation, including generation 0
/// produced by initialization.
#[derive(Debug)]
pub struct GenerationEvent<'a, G: Genome> {
    pub generation: usize,
    pub environment: &'a Environment<G>,
    pub statistics: &'a [PopulationStatistics],
}

/// Callback invoked synchronously after every generation.
pub type GenerationObserver<G> = Box<dyn FnMut(&GenerationEvent<'_, G>) + Send>;

/// Outcome of one [`GeneticAlgorithm::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub generation: usize,
    /// Number of entities evaluated during the step.
    pub evaluated: usize,
    /// Best raw fitness across all populations.
    pub best_fitness: Option<f64>,
}

/// Outcome of [`GeneticAlgorithm::run`].
#[derive(Debug, Clone)]
pub struct RunSummary<G: Genome> {
    /// Number of generations completed.
    pub generations: usize,
    /// Best entity by raw fitness across all populations.
    pub best: Option<GeneticEntity<G>>,
    /// Index of the population holding `best`.
    pub best_population: Option<usize>,
    pub statistics: Vec<PopulationStatistics>,
}

/// Generation-step engine, parameterized by its generation strategy.
pub struct GeneticAlgorithm<G: Genome, S: GenerationStrategy<G>> {
    pub(crate) options: AlgorithmOptions,
    pub(crate) strategy: S,
    pub(crate) factory: Box<dyn GenomeFactory<G>>,
    pub(crate) evaluator: Box<dyn FitnessEvaluator<G>>,
    pub(crate) seed_genomes: Vec<G>,
    pub(crate) selection: Box<dyn SelectionOperator<G>>,
    pub(crate) crossover: Box<dyn CrossoverOperator<G>>,
    pub(crate) mutation: Option<Box<dyn MutationOperator<G>>>,
    pub(crate) elitism: Option<Box<dyn ElitismStrategy<G>>>,
    pub(crate) scaling: Option<Box<dyn FitnessScalingStrategy<G>>>,
    pub(crate) metrics: Vec<Box<dyn Metric<G>>>,
    pub(crate) observers: Vec<GenerationObserver<G>>,
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) cancellation: CancellationToken,
    pub(crate) environment: Option<Environment<G>>,
    pub(crate) generation: usize,
    pub(crate) state: AlgorithmState,
    pub(crate) statistics: Vec<PopulationStatistics>,
}

/// A genetic algorithm with steady-state replacement.
pub type SteadyStateGeneticAlgorithm<G> = GeneticAlgorithm<G, SteadyState>;

/// A genetic algorithm with several demes and ring migration.
pub type MultiDemeGeneticAlgorithm<G> = GeneticAlgorithm<G, MultiDeme>;

impl<G, S> fmt::Debug for GeneticAlgorithm<G, S>
where
    G: Genome,
    S: GenerationStrategy<G>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneticAlgorithm")
            .field("strategy", &self.strategy)
            .field("options", &self.options)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl<G, S> GeneticAlgorithm<G, S>
where
    G: Genome,
    S: GenerationStrategy<G>,
{
    /// Returns a builder for a run with the given generation strategy.
    pub fn builder(strategy: S) -> GeneticAlgorithmBuilder<G, S> {
        GeneticAlgorithmBuilder::new(strategy)
    }

    pub fn options(&self) -> &AlgorithmOptions {
        &self.options
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn state(&self) -> AlgorithmState {
        self.state
    }

    /// Number of generations completed since initialization.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn evaluation_mode(&self) -> EvaluationMode {
        self.evaluator.evaluation_mode()
    }

    /// A token that cancels this run when triggered from anywhere.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Adds an observer notified after every generation.
    pub fn add_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&GenerationEvent<'_, G>) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// The current environment, or `None` before initialization.
    pub fn environment(&self) -> Option<&Environment<G>> {
        self.environment.as_ref()
    }

    /// Metric values of the latest generation, one entry per population.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Uninitialized` before [`initialize`](Self::initialize).
    pub fn statistics(&self) -> Result<&[PopulationStatistics]> {
        self.require_environment("statistics")?;
        Ok(&self.statistics)
    }

    /// Best entity by raw fitness across all populations, with the index of
    /// its population.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Uninitialized` before [`initialize`](Self::initialize).
    pub fn best_entity(&self) -> Result<Option<(usize, &GeneticEntity<G>)>> {
        let environment = self.require_environment("best_entity")?;
        Ok(environment.fittest(FitnessKind::Raw, self.evaluation_mode()))
    }

    /// Creates the populations, fills them and evaluates them.
    ///
    /// Seed genomes are placed at the front of every population; the genome
    /// factory fills the rest up to the minimum population size.
    ///
    /// # Errors
    ///
    /// Returns an error if the run was already initialized, or if genome
    /// creation, evaluation or scaling fails. A failed initialization can be
    /// retried.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != AlgorithmState::Created {
            return Err(GeneticError::Evolution(format!(
                "Cannot initialize a run that is already {}",
                self.state
            )));
        }

        let size = self.options.get_min_population_size();
        let mut environment = Environment::new();
        for index in 0..self.options.get_population_count() {
            let mut population = Population::new(index);
            population.extend(self.seed_genomes.iter().cloned().map(GeneticEntity::new));
            while population.len() < size {
                let genome = self.factory.create(self.rng.as_mut())?;
                population.push(GeneticEntity::new(genome));
            }
            environment.push(population);
        }

        let evaluated = self.evaluate(&mut environment).map_err(|e| {
            error!(error = %e, "Initial evaluation failed");
            e
        })?;
        self.rescale(&mut environment)?;
        self.statistics = self.compute_statistics(&environment, 0);

        info!(
            strategy = self.strategy.name(),
            populations = environment.len(),
            entities = environment.entity_count(),
            evaluated,
            "Initialized genetic algorithm"
        );

        self.environment = Some(environment);
        self.generation = 0;
        self.state = AlgorithmState::Initialized;
        self.notify_observers();
        Ok(())
    }

    /// Advances every population by one generation.
    ///
    /// # Errors
    ///
    /// - `GeneticError::Uninitialized` before [`initialize`](Self::initialize).
    /// - `GeneticError::Cancelled` if the cancellation token fired. The run
    ///   becomes [`AlgorithmState::Failed`].
    /// - Any breeding, evaluation or migration error. The environment and
    ///   the generation count are left unchanged.
    pub fn step(&mut self) -> Result<GenerationSummary> {
        if matches!(self.state, AlgorithmState::Completed | AlgorithmState::Failed) {
            return Err(GeneticError::Evolution(format!(
                "Cannot step a run that is {}",
                self.state
            )));
        }
        self.require_environment("step")?;

        let next_generation = self.generation + 1;
        if self.cancellation.is_cancelled() {
            warn!(generation = next_generation, "Run cancelled");
            self.state = AlgorithmState::Failed;
            return Err(GeneticError::Cancelled {
                generation: next_generation,
            });
        }

        let mut environment = self.require_environment("step")?.clone();

        let evaluated = self
            .advance(&mut environment, next_generation)
            .map_err(|e| {
                error!(generation = next_generation, error = %e, "Generation step failed");
                e
            })?;

        let mode = self.evaluation_mode();
        let best_fitness = environment
            .fittest(FitnessKind::Raw, mode)
            .and_then(|(_, entity)| entity.raw_fitness());

        self.statistics = self.compute_statistics(&environment, next_generation);
        self.environment = Some(environment);
        self.generation = next_generation;
        self.state = AlgorithmState::Running;

        debug!(
            generation = next_generation,
            evaluated,
            best_fitness = ?best_fitness,
            "Generation completed"
        );
        self.notify_observers();

        Ok(GenerationSummary {
            generation: next_generation,
            evaluated,
            best_fitness,
        })
    }

    /// Runs generations until `terminator` reports completion.
    ///
    /// Initializes the run first if needed. The terminator is consulted
    /// before every generation, so a terminator that is complete from the
    /// start yields a run of zero generations.
    pub fn run<T>(&mut self, terminator: &mut T) -> Result<RunSummary<G>>
    where
        T: Terminator<G> + ?Sized,
    {
        if self.state == AlgorithmState::Created {
            self.initialize()?;
        }

        loop {
            let environment = self.require_environment("run")?;
            if terminator.is_complete(environment, self.generation) {
                break;
            }
            self.step()?;
        }

        self.state = AlgorithmState::Completed;
        let best = self.best_entity()?;
        let summary = RunSummary {
            generations: self.generation,
            best: best.map(|(_, entity)| entity.clone()),
            best_population: best.map(|(index, _)| index),
            statistics: self.statistics.clone(),
        };

        info!(
            generations = summary.generations,
            best_fitness = ?summary.best.as_ref().and_then(GeneticEntity::raw_fitness),
            "Run completed"
        );
        Ok(summary)
    }

    fn require_environment(&self, operation: &str) -> Result<&Environment<G>> {
        self.environment
            .as_ref()
            .ok_or_else(|| GeneticError::Uninitialized(operation.to_string()))
    }

    /// Runs every fallible phase of a generation on `environment`.
    fn advance(&mut self, environment: &mut Environment<G>, generation: usize) -> Result<usize> {
        let mode = self.evaluator.evaluation_mode();

        {
            let mut context = BreedingContext {
                selection: self.selection.as_ref(),
                crossover: self.crossover.as_ref(),
                mutation: self.mutation.as_deref(),
                elitism: self.elitism.as_deref(),
                mode,
                rng: self.rng.as_mut(),
            };
            for population in environment.populations_mut() {
                let next = self.strategy.next_generation(population, &mut context)?;
                population.replace_entities(next);
            }
        }

        let evaluated = self.evaluate(environment)?;
        // Survivors still carry last generation's scaled values until rescaled.
        self.rescale(environment)?;
        self.strategy.after_evaluation(environment, generation, mode)?;
        self.rescale(environment)?;
        Ok(evaluated)
    }

    fn evaluate(&self, environment: &mut Environment<G>) -> Result<usize> {
        let threshold = self.options.get_parallel_threshold();
        let mut evaluated = 0;
        for population in environment.populations_mut() {
            evaluated += evaluate_population(population, self.evaluator.as_ref(), threshold)?;
        }
        Ok(evaluated)
    }

    fn rescale(&self, environment: &mut Environment<G>) -> Result<()> {
        for population in environment.populations_mut() {
            match &self.scaling {
                Some(scaling) => scaling.rescale(population)?,
                None => population.reset_scaled_fitness(),
            }
        }
        Ok(())
    }

    fn compute_statistics(
        &mut self,
        environment: &Environment<G>,
        generation: usize,
    ) -> Vec<PopulationStatistics> {
        let context = MetricContext {
            scaling_active: self.scaling.is_some(),
            mode: self.evaluator.evaluation_mode(),
            generation,
        };
        compute_statistics(&mut self.metrics, environment.populations(), &context)
    }

    fn notify_observers(&mut self) {
        let Some(environment) = self.environment.as_ref() else {
            return;
        };
        let event = GenerationEvent {
            generation: self.generation,
            environment,
            statistics: &self.statistics,
        };
        for observer in self.observers.iter_mut() {
            observer(&event);
        }
    }
}

/// Evaluates every unevaluated entity of `population` and returns how many
/// were evaluated.
///
/// Evaluation runs on the rayon thread pool once at least `parallel_threshold`
/// entities are pending; below that it runs on the calling thread. Either way
/// all evaluations finish before this returns. Non-finite scores are errors.
pub fn evaluate_population<G: Genome>(
    population: &mut Population<G>,
    evaluator: &dyn FitnessEvaluator<G>,
    parallel_threshold: usize,
) -> Result<usize> {
    let pending = population.unevaluated_count();
    if pending == 0 {
        return Ok(0);
    }

    let score = |entity: &mut GeneticEntity<G>| -> Result<()> {
        if entity.is_evaluated() {
            return Ok(());
        }
        let value = evaluator.evaluate(entity.genome())?;
        if !value.is_finite() {
            return Err(GeneticError::FitnessCalculation(format!(
                "Non-finite fitness score encountered: {}",
                value
            )));
        }
        entity.set_raw_fitness(value);
        Ok(())
    };

    let entities = population.entities_mut();
    if pending >= parallel_threshold {
        entities.par_iter_mut().try_for_each(score)?;
    } else {
        entities.iter_mut().try_for_each(score)?;
    }
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::generational::Generational;
    use crate::algorithm::terminator::GenerationLimit;
    use crate::operators::{BitFlipMutation, SinglePointCrossover};
    use crate::selection::TournamentSelection;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct CountingOneMax {
        calls: Arc<AtomicUsize>,
    }

    impl FitnessEvaluator<Vec<bool>> for CountingOneMax {
        fn evaluate(&self, genome: &Vec<bool>) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(genome.iter().filter(|&&bit| bit).count() as f64)
        }
    }

    fn algorithm(
        evaluator: CountingOneMax,
        parallel_threshold: usize,
    ) -> GeneticAlgorithm<Vec<bool>, Generational> {
        GeneticAlgorithm::builder(Generational)
            .with_options(
                AlgorithmOptions::builder()
                    .min_population_size(12)
                    .parallel_threshold(parallel_threshold)
                    .build(),
            )
            .with_genome_factory(|rng: &mut dyn RandomSource| -> Result<Vec<bool>> {
                Ok((0..10).map(|_| rng.next_ratio() < 0.5).collect())
            })
            .with_evaluator(evaluator)
            .with_selection(TournamentSelection::default())
            .with_crossover(SinglePointCrossover::new(0.8).unwrap())
            .with_mutation(BitFlipMutation::new(0.05).unwrap())
            .with_seed(3)
            .build()
            .unwrap()
    }

    fn counting() -> CountingOneMax {
        CountingOneMax {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[test]
    fn test_uninitialized_use() {
        let mut ga = algorithm(counting(), 1000);
        assert!(matches!(ga.step(), Err(GeneticError::Uninitialized(_))));
        assert!(matches!(ga.statistics(), Err(GeneticError::Uninitialized(_))));
        assert!(matches!(ga.best_entity(), Err(GeneticError::Uninitialized(_))));
        assert_eq!(ga.state(), AlgorithmState::Created);
    }

    #[test]
    fn test_initialize_evaluates_everything() {
        let evaluator = counting();
        let mut ga = algorithm(evaluator.clone(), 1000);
        ga.initialize().unwrap();

        let environment = ga.environment().unwrap();
        assert_eq!(environment.len(), 1);
        assert_eq!(environment.populations()[0].len(), 12);
        assert_eq!(environment.populations()[0].unevaluated_count(), 0);
        assert_eq!(evaluator.calls.load(Ordering::SeqCst), 12);
        assert_eq!(ga.state(), AlgorithmState::Initialized);

        assert!(matches!(ga.initialize(), Err(GeneticError::Evolution(_))));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let mut sequential = algorithm(counting(), 1000);
        let mut parallel = algorithm(counting(), 1);

        for ga in [&mut sequential, &mut parallel] {
            ga.initialize().unwrap();
            for _ in 0..3 {
                ga.step().unwrap();
            }
        }

        let fitness = |ga: &GeneticAlgorithm<Vec<bool>, Generational>| -> Vec<Option<f64>> {
            ga.environment().unwrap().populations()[0]
                .iter()
                .map(|e| e.raw_fitness())
                .collect()
        };
        assert_eq!(fitness(&sequential), fitness(&parallel));
    }

    #[test]
    fn test_cancellation_fails_run() {
        let mut ga = algorithm(counting(), 1000);
        ga.initialize().unwrap();
        ga.step().unwrap();

        let token = ga.cancellation_token();
        token.cancel();

        let snapshot: Vec<Vec<bool>> = ga.environment().unwrap().populations()[0]
            .iter()
            .map(|e| e.genome().clone())
            .collect();

        match ga.step() {
            Err(GeneticError::Cancelled { generation }) => assert_eq!(generation, 2),
            other => panic!("Expected cancellation, got {:?}", other),
        }
        assert_eq!(ga.state(), AlgorithmState::Failed);
        assert_eq!(ga.generation(), 1);

        let after: Vec<Vec<bool>> = ga.environment().unwrap().populations()[0]
            .iter()
            .map(|e| e.genome().clone())
            .collect();
        assert_eq!(snapshot, after);
        assert!(ga.step().is_err());
    }

    #[test]
    fn test_observer_sees_every_generation() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut ga = algorithm(counting(), 1000);
        let counter = Arc::clone(&seen);
        ga.add_observer(move |event: &GenerationEvent<'_, Vec<bool>>| {
            assert_eq!(event.environment.entity_count(), 12);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let summary = ga.run(&mut GenerationLimit::new(4)).unwrap();
        assert_eq!(summary.generations, 4);
        // Initialization plus four generations.
        assert_eq!(seen.load(Ordering::SeqCst), 5);
        assert_eq!(ga.state(), AlgorithmState::Completed);
    }

    #[test]
    fn test_non_finite_score_is_an_error() {
        #[derive(Debug)]
        struct Broken;
        impl FitnessEvaluator<u8> for Broken {
            fn evaluate(&self, _genome: &u8) -> Result<f64> {
                Ok(f64::NAN)
            }
        }

        let mut population = Population::with_entities(0, vec![GeneticEntity::new(1u8)]);
        let result = evaluate_population(&mut population, &Broken, 1000);
        assert!(matches!(result, Err(GeneticError::FitnessCalculation(_))));
        assert_eq!(population.unevaluated_count(), 1);
    }
}
