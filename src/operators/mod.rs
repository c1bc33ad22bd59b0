//! # Genetic Operators
//!
//! Crossover and mutation operators, plus built-in implementations for
//! genomes made of a flat list of genes.
pub mod crossover;
pub mod mutation;

pub use crossover::{CrossoverOperator, SinglePointCrossover, UniformCrossover};
pub use mutation::{BitFlipMutation, MutationOperator};
