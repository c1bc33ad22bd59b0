#![cfg(feature = "serde")]

use genevo::{
    algorithm::{
        AlgorithmOptions, Generational, GeneticAlgorithm, MultiDeme, PopulationReplacementValue,
        SteadyState,
    },
    elitism::RatioElitism,
    entity::GeneticEntity,
    fitness::{EvaluationMode, FitnessEvaluator, FitnessKind},
    metrics::{MetricValue, PopulationStatistics},
    operators::{BitFlipMutation, SinglePointCrossover},
    rng::RandomSource,
    selection::RankSelection,
    validation::Validate,
    GeneticError, Result,
};
use serde_json::json;

#[test]
fn test_options_from_json() {
    let options: AlgorithmOptions = serde_json::from_value(json!({
        "min_population_size": 80,
        "population_count": 4,
        "parallel_threshold": 200,
    }))
    .unwrap();

    assert_eq!(options.get_min_population_size(), 80);
    assert_eq!(options.get_population_count(), 4);
    assert_eq!(options.get_parallel_threshold(), 200);
    assert!(options.validate().is_empty());
}

#[test]
fn test_deserialized_configuration_is_still_validated() {
    let strategy: SteadyState = serde_json::from_value(json!({
        "replacement": { "Percentage": 150.0 },
        "fitness_kind": "Raw",
    }))
    .unwrap();
    let violations = strategy.validate();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].property, "percentage");

    let strategy: SteadyState = serde_json::from_value(json!({
        "replacement": { "FixedCount": 7 },
        "fitness_kind": "Scaled",
    }))
    .unwrap();
    assert_eq!(strategy.replacement(), PopulationReplacementValue::FixedCount(7));
    assert_eq!(strategy.fitness_kind(), FitnessKind::Scaled);

    let multi_deme: MultiDeme = serde_json::from_value(json!({
        "migrant_count": 2,
        "migrate_each_generation": 0,
        "fitness_kind": "Raw",
    }))
    .unwrap();
    assert_eq!(multi_deme.validate()[0].property, "migrate_each_generation");
}

#[derive(Debug)]
struct OneMax;

impl FitnessEvaluator<Vec<bool>> for OneMax {
    fn evaluate(&self, genome: &Vec<bool>) -> Result<f64> {
        Ok(genome.iter().filter(|&&bit| bit).count() as f64)
    }
}

#[test]
fn test_builder_rejects_deserialized_operators() {
    let elitism: RatioElitism = serde_json::from_value(json!({
        "elitist_ratio": 1.5,
        "fitness_kind": "Raw",
    }))
    .unwrap();
    let mutation: BitFlipMutation =
        serde_json::from_value(json!({ "mutation_rate": 2.0 })).unwrap();
    let crossover: SinglePointCrossover =
        serde_json::from_value(json!({ "crossover_rate": 0.5 })).unwrap();

    let result = GeneticAlgorithm::builder(Generational)
        .with_options(AlgorithmOptions::new(4, 1))
        .with_genome_factory(|rng: &mut dyn RandomSource| -> Result<Vec<bool>> {
            Ok((0..8).map(|_| rng.next_ratio() < 0.5).collect())
        })
        .with_evaluator(OneMax)
        .with_selection(RankSelection::new())
        .with_crossover(crossover)
        .with_mutation(mutation)
        .with_elitism(elitism)
        .build();

    match result {
        Err(GeneticError::Configuration(msg)) => {
            assert!(msg.contains("RatioElitism.elitist_ratio"), "{}", msg);
            assert!(msg.contains("BitFlipMutation.mutation_rate"), "{}", msg);
            assert!(!msg.contains("SinglePointCrossover"), "{}", msg);
        }
        other => panic!("Expected Configuration error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_statistics_export() {
    let statistics = PopulationStatistics {
        population: 1,
        generation: 12,
        values: vec![
            MetricValue {
                name: "fitness_mean".to_string(),
                value: Some(3.5),
            },
            MetricValue {
                name: "fitness_standard_deviation".to_string(),
                value: None,
            },
        ],
    };

    let exported = serde_json::to_value(&statistics).unwrap();
    assert_eq!(
        exported,
        json!({
            "population": 1,
            "generation": 12,
            "values": [
                { "name": "fitness_mean", "value": 3.5 },
                { "name": "fitness_standard_deviation", "value": null },
            ],
        })
    );
}

#[test]
fn test_entity_snapshot() {
    let entity = GeneticEntity::evaluated(vec![true, false, true], 2.0);
    let text = serde_json::to_string(&entity).unwrap();
    let restored: GeneticEntity<Vec<bool>> = serde_json::from_str(&text).unwrap();

    assert_eq!(restored, entity);
    assert_eq!(restored.fitness(FitnessKind::Raw), Some(2.0));
    assert_eq!(
        serde_json::to_value(EvaluationMode::Minimize).unwrap(),
        json!("Minimize")
    );
}
