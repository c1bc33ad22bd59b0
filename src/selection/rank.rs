use crate::entity::GeneticEntity;
use crate::error::Result;
use crate::fitness::{EvaluationMode, FitnessKind};
use crate::genome::Genome;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::selection::roulette::{RouletteWheel, WheelSlice};
use crate::selection::selection_strategy::{ensure_selectable, fitness_values, SelectionOperator};

/// A selection operator that selects entities based on their rank in the population.
///
/// Entities are sorted from worst to best under the evaluation mode and the
/// entity at 1-based position `i` gets a wheel slice of weight `i`. Entities
/// with equal fitness keep their insertion order when ranks are assigned.
///
/// Ranking always uses raw fitness, so attaching a fitness scaling strategy
/// never changes how rank selection behaves.
///
/// # Examples
///
/// ```
/// use genevo::entity::GeneticEntity;
/// use genevo::fitness::EvaluationMode;
/// use genevo::population::Population;
/// use genevo::rng::RandomNumberGenerator;
/// use genevo::selection::{RankSelection, SelectionOperator};
///
/// let population = Population::with_entities(
///     0,
///     vec![
///         GeneticEntity::evaluated("low", -40.0),
///         GeneticEntity::evaluated("high", 2.5),
///     ],
/// );
/// let mut rng = RandomNumberGenerator::from_seed(3);
///
/// let selected = RankSelection::new()
///     .select_entities(3, &population, EvaluationMode::Maximize, &mut rng)
///     .unwrap();
/// assert_eq!(selected.len(), 3);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct RankSelection;

impl RankSelection {
    pub fn new() -> Self {
        Self
    }

    /// Returns the rank weight of every entity, in population order.
    pub(crate) fn weights(fitness: &[f64], mode: EvaluationMode) -> Vec<f64> {
        let mut order: Vec<usize> = (0..fitness.len()).collect();
        order.sort_by(|&a, &b| mode.compare(fitness[a], fitness[b]));

        let mut weights = vec![0.0; fitness.len()];
        for (position, &index) in order.iter().enumerate() {
            weights[index] = (position + 1) as f64;
        }
        weights
    }
}

impl<G: Genome> SelectionOperator<G> for RankSelection {
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

        let fitness = fitness_values(population, FitnessKind::Raw)?;
        let weights = Self::weights(&fitness, mode);

        let wheel = RouletteWheel::new(
            population
                .iter()
                .zip(weights)
                .map(|(entity, weight)| WheelSlice::new(entity, weight))
                .collect(),
        )?;

        Ok((0..count).map(|_| wheel.spin(rng).clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomNumberGenerator;

    #[test]
    fn test_weights_maximize() {
        let weights = RankSelection::weights(&[0.5, 0.8, 0.3, 0.9, 0.1], EvaluationMode::Maximize);
        assert_eq!(weights, vec![3.0, 4.0, 2.0, 5.0, 1.0]);
    }

    #[test]
    fn test_weights_minimize() {
        let weights = RankSelection::weights(&[0.5, 0.8, 0.3, 0.9, 0.1], EvaluationMode::Minimize);
        assert_eq!(weights, vec![3.0, 2.0, 4.0, 1.0, 5.0]);
    }

    #[test]
    fn test_weights_ties_keep_insertion_order() {
        let weights = RankSelection::weights(&[2.0, 1.0, 2.0, 1.0], EvaluationMode::Maximize);
        assert_eq!(weights, vec![3.0, 1.0, 4.0, 2.0]);
    }

    #[test]
    fn test_negative_fitness_is_fine() {
        let population = Population::with_entities(
            0,
            vec![
                GeneticEntity::evaluated(0usize, -10.0),
                GeneticEntity::evaluated(1usize, -20.0),
            ],
        );
        let mut rng = RandomNumberGenerator::from_seed(5);

        let selected = RankSelection::new()
            .select_entities(3000, &population, EvaluationMode::Maximize, &mut rng)
            .unwrap();
        let best = selected.iter().filter(|e| *e.genome() == 0).count();

        // Weights 2 and 1, so roughly two thirds.
        assert!(best > 1800 && best < 2200, "best was selected {} times", best);
    }
}
