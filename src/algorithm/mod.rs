//! # Algorithm
//!
//! The generation-step engine and its configuration: options, builder,
//! generation strategies, terminators and cancellation.
pub mod builder;
pub mod cancellation;
pub mod engine;
pub mod generational;
pub mod multi_deme;
pub mod options;
pub mod steady_state;
pub mod strategy;
pub mod terminator;

pub use builder::GeneticAlgorithmBuilder;
pub use cancellation::CancellationToken;
pub use engine::{
    evaluate_population, AlgorithmState, GenerationEvent, GenerationObserver, GenerationSummary,
    GeneticAlgorithm, MultiDemeGeneticAlgorithm, RunSummary, SteadyStateGeneticAlgorithm,
};
pub use generational::Generational;
pub use multi_deme::{migrate, MultiDeme};
pub use options::{AlgorithmOptions, AlgorithmOptionsBuilder};
pub use steady_state::{PopulationReplacementValue, SteadyState};
pub use strategy::{breed_offspring, BreedingContext, GenerationStrategy};
pub use terminator::{from_fn, FitnessTarget, FnTerminator, GenerationLimit, Terminator};
