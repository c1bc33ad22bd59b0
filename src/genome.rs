//! # Genome Traits
//!
//! A genome is the opaque genetic representation carried by a
//! [`GeneticEntity`](crate::entity::GeneticEntity). The engine never looks
//! inside it: only crossover and mutation operators do.
//!
//! Any `Clone + Debug + Send + Sync + 'static` type is a [`Genome`].
//! Representations that are a flat list of genes additionally implement
//! [`SequenceGenome`], which unlocks the built-in operators in
//! [`operators`](crate::operators). `Vec<T>` implements it out of the box.
//!
//! ## Example
//!
//! ```rust
//! use genevo::genome::{GenomeFactory, SequenceGenome};
//! use genevo::rng::{RandomNumberGenerator, RandomSource};
//!
//! let factory = |rng: &mut dyn RandomSource| -> genevo::Result<Vec<bool>> {
//!     Ok((0..8).map(|_| rng.next_ratio() < 0.5).collect())
//! };
//!
//! let mut rng = RandomNumberGenerator::from_seed(1);
//! let genome = factory.create(&mut rng).unwrap();
//! assert_eq!(genome.genes().len(), 8);
//! ```

use std::fmt::Debug;

use crate::{error::Result, rng::RandomSource};

/// Marker trait for genetic representations.
///
/// Types implementing this trait must be `Clone` (entities are cloned for
/// migration and snapshots), `Debug` (for display), and `Send + Sync` so
/// fitness evaluation can run in parallel.
pub trait Genome: Clone + Debug + Send + Sync + 'static {}

impl<T> Genome for T where T: Clone + Debug + Send + Sync + 'static {}

/// A genome made of an ordered list of genes.
pub trait SequenceGenome: Genome {
    /// The type of a single gene.
    type Gene: Clone + Debug + Send + Sync;

    /// Returns the genes in order.
    fn genes(&self) -> &[Self::Gene];

    /// Returns the genes for in-place modification.
    fn genes_mut(&mut self) -> &mut [Self::Gene];

    /// Builds a genome from a list of genes.
    fn from_genes(genes: Vec<Self::Gene>) -> Self;

    /// Returns the number of genes.
    fn gene_count(&self) -> usize {
        self.genes().len()
    }
}

impl<T> SequenceGenome for Vec<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    type Gene = T;

    fn genes(&self) -> &[T] {
        self
    }

    fn genes_mut(&mut self) -> &mut [T] {
        self
    }

    fn from_genes(genes: Vec<T>) -> Self {
        genes
    }
}

/// Creates fresh genomes when a population is seeded.
///
/// Implemented for any closure `Fn(&mut dyn RandomSource) -> Result<G>`.
pub trait GenomeFactory<G: Genome>: Send + Sync {
    /// Creates one new genome, drawing randomness from `rng`.
    fn create(&self, rng: &mut dyn RandomSource) -> Result<G>;
}

impl<G, F> GenomeFactory<G> for F
where
    G: Genome,
    F: Fn(&mut dyn RandomSource) -> Result<G> + Send + Sync,
{
    fn create(&self, rng: &mut dyn RandomSource) -> Result<G> {
        self(rng)
    }
}
