use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use dado_universe::simulation::tick::run_evolution_step;
use dado_universe::universe::Universe;

fn populated(units: usize) -> Universe {
    let mut universe = Universe::seeded(7);
    for _ in 0..units {
        universe.create_unit();
    }
    universe
}

fn bench_evolution_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolution_step");
    for units in [10usize, 50, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(units), &units, |b, &units| {
            let mut universe = populated(units);
            b.iter(|| black_box(run_evolution_step(&mut universe)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evolution_step);
criterion_main!(benches);
