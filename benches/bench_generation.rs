use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use genevo::{
    algorithm::{
        evaluate_population, AlgorithmOptions, Generational, GeneticAlgorithm, MultiDeme,
        PopulationReplacementValue, SteadyState,
    },
    elitism::RatioElitism,
    entity::GeneticEntity,
    fitness::{FitnessEvaluator, FitnessKind},
    operators::{BitFlipMutation, SinglePointCrossover},
    population::Population,
    rng::{RandomNumberGenerator, RandomSource},
    selection::TournamentSelection,
    Result,
};

const GENOME_LENGTH: usize = 64;

// OneMax with some extra arithmetic so evaluation is not free.
#[derive(Debug)]
struct WeightedOneMax;

impl FitnessEvaluator<Vec<bool>> for WeightedOneMax {
    fn evaluate(&self, genome: &Vec<bool>) -> Result<f64> {
        Ok(genome
            .iter()
            .enumerate()
            .filter(|(_, &bit)| bit)
            .map(|(position, _)| ((position + 1) as f64).sqrt().sin().abs() + 1.0)
            .sum())
    }
}

fn random_bits(rng: &mut dyn RandomSource) -> Result<Vec<bool>> {
    Ok((0..GENOME_LENGTH).map(|_| rng.next_ratio() < 0.5).collect())
}

fn unevaluated(size: usize, rng: &mut RandomNumberGenerator) -> Population<Vec<bool>> {
    Population::with_entities(
        0,
        (0..size)
            .filter_map(|_| random_bits(rng).ok())
            .map(GeneticEntity::new)
            .collect(),
    )
}

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");
    let mut rng = RandomNumberGenerator::from_seed(42);

    for size in [100, 1000, 10000].iter() {
        let population = unevaluated(*size, &mut rng);

        group.bench_with_input(BenchmarkId::new("sequential", size), &population, |b, population| {
            b.iter(|| {
                let mut population = population.clone();
                evaluate_population(black_box(&mut population), &WeightedOneMax, usize::MAX)
            })
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &population, |b, population| {
            b.iter(|| {
                let mut population = population.clone();
                evaluate_population(black_box(&mut population), &WeightedOneMax, 1)
            })
        });
    }

    group.finish();
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation_strategies");

    for size in [50, 500].iter() {
        group.bench_with_input(BenchmarkId::new("generational", size), size, |b, &size| {
            let mut algorithm = GeneticAlgorithm::builder(Generational)
                .with_options(AlgorithmOptions::new(size, 1))
                .with_genome_factory(random_bits)
                .with_evaluator(WeightedOneMax)
                .with_selection(TournamentSelection::new(3, FitnessKind::Raw).unwrap())
                .with_crossover(SinglePointCrossover::new(0.9).unwrap())
                .with_mutation(BitFlipMutation::new(0.01).unwrap())
                .with_elitism(RatioElitism::new(0.05, FitnessKind::Raw).unwrap())
                .with_seed(1)
                .build()
                .unwrap();
            algorithm.initialize().unwrap();
            b.iter(|| algorithm.step().unwrap())
        });

        group.bench_with_input(BenchmarkId::new("steady_state", size), size, |b, &size| {
            let strategy =
                SteadyState::new(PopulationReplacementValue::Percentage(20.0), FitnessKind::Raw)
                    .unwrap();
            let mut algorithm = GeneticAlgorithm::builder(strategy)
                .with_options(AlgorithmOptions::new(size, 1))
                .with_genome_factory(random_bits)
                .with_evaluator(WeightedOneMax)
                .with_selection(TournamentSelection::new(3, FitnessKind::Raw).unwrap())
                .with_crossover(SinglePointCrossover::new(0.9).unwrap())
                .with_mutation(BitFlipMutation::new(0.01).unwrap())
                .with_seed(1)
                .build()
                .unwrap();
            algorithm.initialize().unwrap();
            b.iter(|| algorithm.step().unwrap())
        });

        group.bench_with_input(BenchmarkId::new("multi_deme", size), size, |b, &size| {
            let mut algorithm = GeneticAlgorithm::builder(MultiDeme::new(2, 5))
                .with_options(AlgorithmOptions::new(size / 4, 4))
                .with_genome_factory(random_bits)
                .with_evaluator(WeightedOneMax)
                .with_selection(TournamentSelection::new(3, FitnessKind::Raw).unwrap())
                .with_crossover(SinglePointCrossover::new(0.9).unwrap())
                .with_mutation(BitFlipMutation::new(0.01).unwrap())
                .with_seed(1)
                .build()
                .unwrap();
            algorithm.initialize().unwrap();
            b.iter(|| algorithm.step().unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluation, bench_strategies);
criterion_main!(benches);
