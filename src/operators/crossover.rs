//! # Crossover
//!
//! Crossover operators recombine the genomes of a parent group into new
//! offspring genomes. They receive shared references to the parents and
//! never modify them.
//!
//! Whether crossover happens at all for a given parent group is decided by
//! the engine, which draws once per group and compares the draw with
//! [`CrossoverOperator::crossover_rate`].

use std::fmt::Debug;

use crate::error::{GeneticError, Result};
use crate::genome::{Genome, SequenceGenome};
use crate::rng::RandomSource;
use crate::validation::{check_rate, ensure_valid, ConfigViolation, Validate};

/// Recombines parent genomes into offspring genomes.
pub trait CrossoverOperator<G: Genome>: Debug + Send + Sync {
    /// Number of parents consumed per application. At least 2.
    fn parent_count(&self) -> usize {
        2
    }

    /// Probability in `[0, 1]` that a parent group is recombined rather
    /// than passed through unchanged.
    fn crossover_rate(&self) -> f64;

    /// Configuration problems that would make this operator misbehave.
    /// Types that cannot be misconfigured keep the empty default.
    fn config_violations(&self) -> Vec<ConfigViolation> {
        Vec::new()
    }

    /// Produces offspring from `parents`, which holds exactly
    /// [`parent_count`](Self::parent_count) genomes.
    fn crossover(&self, parents: &[&G], rng: &mut dyn RandomSource) -> Result<Vec<G>>;
}

fn ensure_pair<'a, G>(parents: &[&'a G]) -> Result<(&'a G, &'a G)> {
    match parents {
        [first, second] => Ok((*first, *second)),
        _ => Err(GeneticError::Breeding(format!(
            "Crossover expects 2 parents, got {}",
            parents.len()
        ))),
    }
}

fn rate_violations(component: &'static str, rate: f64) -> Vec<ConfigViolation> {
    check_rate(component, "crossover_rate", rate).into_iter().collect()
}

/// Cuts both parents at one random point and swaps the tails.
///
/// Parents of different lengths are cut within the shorter one. Genomes with
/// fewer than two genes have no interior cut point and are copied unchanged.
///
/// # Examples
///
/// ```
/// use genevo::operators::{CrossoverOperator, SinglePointCrossover};
/// use genevo::rng::RandomNumberGenerator;
///
/// let crossover = SinglePointCrossover::new(1.0).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(4);
///
/// let a = vec![0u8; 6];
/// let b = vec![1u8; 6];
/// let children = crossover.crossover(&[&a, &b], &mut rng).unwrap();
///
/// assert_eq!(children.len(), 2);
/// assert_eq!(children[0].iter().map(|&g| g as usize).sum::<usize>()
///     + children[1].iter().map(|&g| g as usize).sum::<usize>(), 6);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct SinglePointCrossover {
    crossover_rate: f64,
}

impl SinglePointCrossover {
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if `crossover_rate` is not within `[0, 1]`.
    pub fn new(crossover_rate: f64) -> Result<Self> {
        let crossover = Self { crossover_rate };
        ensure_valid(crossover.validate())?;
        Ok(crossover)
    }
}

impl Validate for SinglePointCrossover {
    fn validate(&self) -> Vec<ConfigViolation> {
        rate_violations("SinglePointCrossover", self.crossover_rate)
    }
}

impl<G: SequenceGenome> CrossoverOperator<G> for SinglePointCrossover {
    fn config_violations(&self) -> Vec<ConfigViolation> {
        self.validate()
    }

    fn crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    fn crossover(&self, parents: &[&G], rng: &mut dyn RandomSource) -> Result<Vec<G>> {
        let (first, second) = ensure_pair(parents)?;
        let (a, b) = (first.genes(), second.genes());

        let shortest = a.len().min(b.len());
        if shortest < 2 {
            return Ok(vec![first.clone(), second.clone()]);
        }

        let point = 1 + rng.next_int(shortest - 1);
        let child_a = a[..point].iter().chain(&b[point..]).cloned().collect();
        let child_b = b[..point].iter().chain(&a[point..]).cloned().collect();

        Ok(vec![G::from_genes(child_a), G::from_genes(child_b)])
    }
}

/// Swaps each gene position between the two parents with a fixed probability.
///
/// Only positions present in both parents are candidates for a swap.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct UniformCrossover {
    crossover_rate: f64,
    swap_probability: f64,
}

impl UniformCrossover {
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if either probability is not within `[0, 1]`.
    pub fn new(crossover_rate: f64, swap_probability: f64) -> Result<Self> {
        let crossover = Self {
            crossover_rate,
            swap_probability,
        };
        ensure_valid(crossover.validate())?;
        Ok(crossover)
    }
}

impl Validate for UniformCrossover {
    fn validate(&self) -> Vec<ConfigViolation> {
        let mut violations = rate_violations("UniformCrossover", self.crossover_rate);
        violations.extend(check_rate(
            "UniformCrossover",
            "swap_probability",
            self.swap_probability,
        ));
        violations
    }
}

impl<G: SequenceGenome> CrossoverOperator<G> for UniformCrossover {
    fn config_violations(&self) -> Vec<ConfigViolation> {
        self.validate()
    }

    fn crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    fn crossover(&self, parents: &[&G], rng: &mut dyn RandomSource) -> Result<Vec<G>> {
        let (first, second) = ensure_pair(parents)?;
        let mut child_a = first.genes().to_vec();
        let mut child_b = second.genes().to_vec();

        let shortest = child_a.len().min(child_b.len());
        for position in 0..shortest {
            if rng.next_ratio() < self.swap_probability {
                std::mem::swap(&mut child_a[position], &mut child_b[position]);
            }
        }

        Ok(vec![G::from_genes(child_a), G::from_genes(child_b)])
    }
}
