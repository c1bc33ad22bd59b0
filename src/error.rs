//! # Error Types
//!
//! This module defines the error type shared by every part of the engine.
//! Each variant corresponds to one failure class of a run: invalid
//! configuration detected before the run starts, use of the engine before it
//! was initialized, fitness evaluation failures, degenerate sampling input and
//! cancellation.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use genevo::error::{GeneticError, Result};
//!
//! fn some_function() -> Result<()> {
//!     Ok(())
//! }
//!
//! match some_function() {
//!     Ok(_) => println!("Success!"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```
//!
//! Using the `ResultExt` trait to wrap a foreign error inside a fitness evaluator:
//!
//! ```rust
//! use genevo::error::{Result, ResultExt};
//!
//! fn parse_score(raw: &str) -> Result<f64> {
//!     raw.trim().parse::<f64>().context("Failed to parse external score")
//! }
//!
//! assert_eq!(parse_score(" 4.5 ").unwrap(), 4.5);
//! assert!(parse_score("abc").is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use genevo::error::{GeneticError, OptionExt};
//!
//! fn best(candidates: &[i32]) -> genevo::error::Result<i32> {
//!     candidates.iter().max().cloned().ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert!(best(&[]).is_err());
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while configuring or running a genetic algorithm.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// One or more configuration values are invalid. Raised before a run begins.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An operation that requires an initialized algorithm was called too early.
    #[error("Uninitialized use: {0} requires the algorithm to be initialized first")]
    Uninitialized(String),

    /// Fitness evaluation failed or produced an unusable value.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// A sampling routine received an empty or non-positive set of weights.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when a crossover or mutation step fails.
    #[error("Breeding error: {0}")]
    Breeding(String),

    /// Error that occurs when the evolution process reaches an illegal state.
    #[error("Evolution error: {0}")]
    Evolution(String),

    /// The run was cancelled between generations.
    #[error("Run cancelled before generation {generation} completed")]
    Cancelled {
        /// The generation that was in progress when cancellation was observed.
        generation: usize,
    },

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for genetic algorithm operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// Converts any standard error into `GeneticError::Other`, prefixed with the
/// given context. Mostly useful inside user supplied fitness evaluators.
pub trait ResultExt<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an Option to a Result using a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
