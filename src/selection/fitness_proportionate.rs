use crate::entity::GeneticEntity;
use crate::error::Result;
use crate::fitness::{EvaluationMode, FitnessKind};
use crate::genome::Genome;
use crate::population::Population;
use crate::rng::RandomSource;
use crate::selection::roulette::{RouletteWheel, WheelSlice};
use crate::selection::selection_strategy::{ensure_selectable, fitness_values, SelectionOperator};

/// Fitness proportionate (roulette wheel) selection.
///
/// Each entity gets a slice of the wheel as large as its fitness value of
/// the configured kind. Under `Minimize`, entities sorted by ascending
/// fitness swap values with their mirror from the other end of the order,
/// so the smallest fitness receives the largest slice. When the smallest
/// weight is not positive, every weight is shifted up by `|min| + 1`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct FitnessProportionateSelection {
    fitness_kind: FitnessKind,
}

impl FitnessProportionateSelection {
    pub fn new(fitness_kind: FitnessKind) -> Self {
        Self { fitness_kind }
    }

    pub fn fitness_kind(&self) -> FitnessKind {
        self.fitness_kind
    }

    /// Computes the strictly positive wheel weight of every entity.
    pub(crate) fn weights(fitness: &[f64], mode: EvaluationMode) -> Vec<f64> {
        let mut weights = match mode {
            EvaluationMode::Maximize => fitness.to_vec(),
            EvaluationMode::Minimize => {
                let mut order: Vec<usize> = (0..fitness.len()).collect();
                order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));

                let mut mirrored = vec![0.0; fitness.len()];
                for (position, &index) in order.iter().enumerate() {
                    mirrored[index] = fitness[order[order.len() - 1 - position]];
                }
                mirrored
            }
        };

        let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
        if min <= 0.0 {
            let shift = min.abs() + 1.0;
            weights.iter_mut().for_each(|w| *w += shift);
        }

        weights
    }
}

impl<G: Genome> SelectionOperator<G> for FitnessProportionateSelection {
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
