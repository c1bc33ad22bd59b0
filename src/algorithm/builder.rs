use crate::{
    elitism::ElitismStrategy,
    error::{GeneticError, Result},
    fitness::FitnessEvaluator,
    genome::{Genome, GenomeFactory},
    metrics::Metric,
    operators::{CrossoverOperator, MutationOperator},
    rng::{RandomNumberGenerator, RandomSource},
    scaling::FitnessScalingStrategy,
    selection::SelectionOperator,
    validation::{ensure_valid, ConfigViolation, Validate},
};

use super::{
    cancellation::CancellationToken,
    engine::{AlgorithmState, GenerationEvent, GenerationObserver, GeneticAlgorithm},
    options::AlgorithmOptions,
    strategy::GenerationStrategy,
};

/// Builder for [`GeneticAlgorithm`].
///
/// The genome factory, evaluator, selection and crossover operators are
/// required. Everything else is optional. [`build`](Self::build) reports
/// every problem at once in a single `GeneticError::Configuration`.
pub struct GeneticAlgorithmBuilder<G, S>
where
    G: Genome,
    S: GenerationStrategy<G>,
{
    strategy: S,
    options: AlgorithmOptions,
    factory: Option<Box<dyn GenomeFactory<G>>>,
    evaluator: Option<Box<dyn FitnessEvaluator<G>>>,
    seed_genomes: Vec<G>,
    selection: Option<Box<dyn SelectionOperator<G>>>,
    crossover: Option<Box<dyn CrossoverOperator<G>>>,
    mutation: Option<Box<dyn MutationOperator<G>>>,
    elitism: Option<Box<dyn ElitismStrategy<G>>>,
    scaling: Option<Box<dyn FitnessScalingStrategy<G>>>,
    metrics: Vec<Box<dyn Metric<G>>>,
    observers: Vec<GenerationObserver<G>>,
    rng: Option<Box<dyn RandomSource>>,
    cancellation: CancellationToken,
}

impl<G, S> GeneticAlgorithmBuilder<G, S>
where
    G: Genome,
    S: GenerationStrategy<G>,
{
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            options: AlgorithmOptions::default(),
            factory: None,
            evaluator: None,
            seed_genomes: Vec::new(),
            selection: None,
            crossover: None,
            mutation: None,
            elitism: None,
            scaling: None,
            metrics: Vec::new(),
            observers: Vec::new(),
            rng: None,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_options(mut self, options: AlgorithmOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_genome_factory<F>(mut self, factory: F) -> Self
    where
        F: GenomeFactory<G> + 'static,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn with_evaluator<E>(mut self, evaluator: E) -> Self
    where
        E: FitnessEvaluator<G> + 'static,
    {
        self.evaluator = Some(Box::new(evaluator));
        self
    }

    /// Genomes placed at the front of every population on initialization.
    pub fn with_seed_genomes<I>(mut self, genomes: I) -> Self
    where
        I: IntoIterator<Item = G>,
    {
        self.seed_genomes.extend(genomes);
        self
    }

    pub fn with_selection<T>(mut self, selection: T) -> Self
    where
        T: SelectionOperator<G> + 'static,
    {
        self.selection = Some(Box::new(selection));
        self
    }

    pub fn with_crossover<C>(mut self, crossover: C) -> Self
    where
        C: CrossoverOperator<G> + 'static,
    {
        self.crossover = Some(Box::new(crossover));
        self
    }

    pub fn with_mutation<M>(mut self, mutation: M) -> Self
    where
        M: MutationOperator<G> + 'static,
    {
        self.mutation = Some(Box::new(mutation));
        self
    }

    pub fn with_elitism<E>(mut self, elitism: E) -> Self
    where
        E: ElitismStrategy<G> + 'static,
    {
        self.elitism = Some(Box::new(elitism));
        self
    }

    pub fn with_scaling<F>(mut self, scaling: F) -> Self
    where
        F: FitnessScalingStrategy<G> + 'static,
    {
        self.scaling = Some(Box::new(scaling));
        self
    }

    pub fn with_metric<M>(mut self, metric: M) -> Self
    where
        M: Metric<G> + 'static,
    {
        self.metrics.push(Box::new(metric));
        self
    }

    /// Registers a callback invoked after initialization and after every generation.
    pub fn on_generation<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&GenerationEvent<'_, G>) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
        self
    }

    /// Replaces the default random source.
    pub fn with_rng<R>(mut self, rng: R) -> Self
    where
        R: RandomSource + 'static,
    {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Uses a seeded [`RandomNumberGenerator`] for a reproducible run.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(RandomNumberGenerator::from_seed(seed))
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Validates the configuration and builds the algorithm.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` listing every violation of
    /// the options, the generation strategy and the configured components,
    /// along with any missing component.
    pub fn build(self) -> Result<GeneticAlgorithm<G, S>> {
        let mut violations = self.options.validate();
        violations.extend(self.strategy.check_options(&self.options));

        let missing = |property: &'static str| {
            ConfigViolation::new("GeneticAlgorithm", property, "is required")
        };
        if self.factory.is_none() {
            violations.push(missing("genome_factory"));
        }
        if self.evaluator.is_none() {
            violations.push(missing("evaluator"));
        }
        if self.selection.is_none() {
            violations.push(missing("selection"));
        }
        match &self.crossover {
            None => violations.push(missing("crossover")),
            Some(crossover) if crossover.parent_count() < 2 => {
                violations.push(ConfigViolation::new(
                    "GeneticAlgorithm",
                    "crossover",
                    format!(
                        "must combine at least 2 parents, got {}",
                        crossover.parent_count()
                    ),
                ))
            }
            Some(_) => {}
        }

        // Deserialized operators never went through their checked constructors.
        if let Some(selection) = &self.selection {
            violations.extend(selection.config_violations());
        }
        if let Some(crossover) = &self.crossover {
            violations.extend(crossover.config_violations());
        }
        if let Some(mutation) = &self.mutation {
            violations.extend(mutation.config_violations());
        }
        if let Some(elitism) = &self.elitism {
            violations.extend(elitism.config_violations());
        }
        if let Some(scaling) = &self.scaling {
            violations.extend(scaling.config_violations());
        }
        ensure_valid(violations)?;

        match (self.factory, self.evaluator, self.selection, self.crossover) {
            (Some(factory), Some(evaluator), Some(selection), Some(crossover)) => {
                Ok(GeneticAlgorithm {
                    options: self.options,
                    strategy: self.strategy,
                    factory,
                    evaluator,
                    seed_genomes: self.seed_genomes,
                    selection,
                    crossover,
                    mutation: self.mutation,
                    elitism: self.elitism,
                    scaling: self.scaling,
                    metrics: self.metrics,
                    observers: self.observers,
                    rng: self
                        .rng
                        .unwrap_or_else(|| Box::new(RandomNumberGenerator::new())),
                    cancellation: self.cancellation,
                    environment: None,
                    generation: 0,
                    state: AlgorithmState::Created,
                    statistics: Vec::new(),
                })
            }
            _ => Err(GeneticError::Configuration(
                "GeneticAlgorithm is missing a required component".to_string(),
            )),
        }
    }
}
