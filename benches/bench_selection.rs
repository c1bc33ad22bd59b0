use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use genevo::{
    entity::GeneticEntity,
    fitness::{EvaluationMode, FitnessKind},
    population::Population,
    rng::{RandomNumberGenerator, RandomSource},
    selection::{
        FitnessProportionateSelection, RankSelection, SelectionOperator, TournamentSelection,
        UniformSelection,
    },
};

fn population(size: usize, rng: &mut RandomNumberGenerator) -> Population<usize> {
    Population::with_entities(
        0,
        (0..size)
            .map(|index| GeneticEntity::evaluated(index, rng.next_ratio() * 100.0))
            .collect(),
    )
}

fn bench_selection_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    let mut rng = RandomNumberGenerator::from_seed(42);

    let operators: Vec<(&str, Box<dyn SelectionOperator<usize>>)> = vec![
        (
            "fitness_proportionate",
            Box::new(FitnessProportionateSelection::new(FitnessKind::Raw)),
        ),
        ("rank", Box::new(RankSelection::new())),
        ("tournament", Box::new(TournamentSelection::default())),
        ("uniform", Box::new(UniformSelection::new())),
    ];

    for size in [100, 1000, 10000].iter() {
        let population = population(*size, &mut rng);

        for (name, operator) in &operators {
            group.bench_with_input(BenchmarkId::new(*name, size), &population, |b, population| {
                b.iter(|| {
                    operator
                        .select_entities(
                            black_box(population.len()),
                            black_box(population),
                            EvaluationMode::Maximize,
                            &mut rng,
                        )
                        .unwrap()
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_selection_operators);
criterion_main!(benches);
