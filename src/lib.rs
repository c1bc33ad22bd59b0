//! # genevo
//!
//! A pluggable evolutionary-computation engine. A run evolves one or more
//! populations of candidate solutions by repeated selection, crossover,
//! mutation and elitism, re-evaluating fitness every generation until a
//! terminator reports completion.
//!
//! Three generation strategies are available:
//!
//! - [`Generational`](algorithm::Generational) replaces the whole population
//!   every generation.
//! - [`SteadyState`](algorithm::SteadyState) replaces only the weakest part
//!   of each population.
//! - [`MultiDeme`](algorithm::MultiDeme) evolves several populations
//!   side by side and migrates entities between them in a ring.
//!
//! Every other component (selection, crossover, mutation, elitism, fitness
//! scaling, metrics) is a trait with built-in implementations, configured
//! through [`GeneticAlgorithmBuilder`](algorithm::GeneticAlgorithmBuilder).
pub mod algorithm;
pub mod caching;
pub mod elitism;
pub mod entity;
pub mod environment;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod metrics;
pub mod operators;
pub mod population;
pub mod rng;
pub mod scaling;
pub mod selection;
pub mod validation;

// Re-export commonly used types for convenience
pub use algorithm::{GeneticAlgorithm, GeneticAlgorithmBuilder};
pub use entity::GeneticEntity;
pub use environment::Environment;
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use fitness::{EvaluationMode, FitnessEvaluator, FitnessKind};
pub use genome::{Genome, GenomeFactory, SequenceGenome};
pub use population::Population;
