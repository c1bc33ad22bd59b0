use crate::entity::GeneticEntity;
use crate::error::Result;
use crate::fitness::{EvaluationMode, FitnessKind};
use crate::genome::Genome;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::selection::selection_strategy::{ensure_selectable, fitness_values, SelectionOperator};
use crate::validation::{ensure_valid, ConfigViolation, Validate};

/// A selection operator that selects entities through tournament selection.
///
/// Each selection draws `tournament_size` entities uniformly at random (with
/// replacement) and keeps the best of them under the evaluation mode. The
/// first contestant drawn wins ties.
///
/// Tournament selection provides a balance between exploration and exploitation:
/// - Smaller tournament sizes lead to more exploration (more random selection)
/// - Larger tournament sizes lead to more exploitation (more focus on the best entities)
///
/// # Examples
///
/// ```
/// use genevo::entity::GeneticEntity;
/// use genevo::fitness::{EvaluationMode, FitnessKind};
/// use genevo::population::Population;
/// use genevo::rng::RandomNumberGenerator;
/// use genevo::selection::{SelectionOperator, TournamentSelection};
///
/// fn main() -> genevo::Result<()> {
///     let population = Population::with_entities(
///         0,
///         vec![
///             GeneticEntity::evaluated(1u8, 0.5),
///             GeneticEntity::evaluated(2u8, 0.8),
///             GeneticEntity::evaluated(3u8, 0.3),
///         ],
///     );
///     let mut rng = RandomNumberGenerator::from_seed(42);
///
///     let selection = TournamentSelection::new(2, FitnessKind::Raw)?;
///     let selected =
///         selection.select_entities(3, &population, EvaluationMode::Minimize, &mut rng)?;
///
///     assert_eq!(selected.len(), 3);
///     Ok(())
/// }
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
    fitness_kind: FitnessKind,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection operator.
    ///
    /// # Arguments
    ///
    /// * `tournament_size` - The number of entities that participate in each tournament.
    ///   Must be at least 1. A tournament size of 1 is equivalent to uniform selection.
    /// * `fitness_kind` - Which fitness value contestants are compared on.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if `tournament_size` is 0.
    pub fn new(tournament_size: usize, fitness_kind: FitnessKind) -> Result<Self> {
        let selection = Self {
            tournament_size,
            fitness_kind,
        };
        ensure_valid(selection.validate())?;
        Ok(selection)
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Runs a single tournament and returns the index of the winner.
    fn run_tournament(
        &self,
        fitness: &[f64],
        mode: EvaluationMode,
        rng: &mut dyn RandomSource,
    ) -> usize {
        let mut winner = rng.next_int(fitness.len());
        for _ in 1..self.tournament_size {
            let contestant = rng.next_int(fitness.len());
            if mode.is_better(fitness[contestant], fitness[winner]) {
                winner = contestant;
            }
        }
        winner
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self {
            tournament_size: 2,
            fitness_kind: FitnessKind::default(),
        }
    }
}

impl Validate for TournamentSelection {
    fn validate(&self) -> Vec<ConfigViolation> {
        if self.tournament_size < 1 {
            return vec![ConfigViolation::new(
                "TournamentSelection",
                "tournament_size",
                "must be at least 1",
            )];
        }
        Vec::new()
    }
}

impl<G: Genome> SelectionOperator<G> for TournamentSelection {
    fn config_violations(&self) -> Vec<ConfigViolation> {
        self.validate()
    }

    fn select_entities(
        &self,
        count: usize,
        population: &Population<G>,
        mode: EvaluationMode,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<GeneticEntity<G>>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        ensure_selectable(population)?;

        let fitness = fitness_values(population, self.fitness_kind)?;
        let entities = population.entities();

        Ok((0..count)
            .map(|_| entities[self.run_tournament(&fitness, mode, rng)].clone())
            .collect())
    }
}
