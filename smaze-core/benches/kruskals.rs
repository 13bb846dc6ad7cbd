use criterion::{black_box, criterion_group, criterion_main, Criterion};
use smaze_core::{
    generator::{MazeGenerator, Random},
    search::{Algorithm, SearchKind},
};

use rand::SeedableRng as _;

const SIZE: usize = 99;

pub fn kruskals(c: &mut Criterion) {
    c.bench_function("kruskals", |b| {
        b.iter(|| {
            let mut rng = Random::seed_from_u64(black_box(42));
            MazeGenerator::build(black_box(SIZE), &mut rng)
        })
    });
}

pub fn solvers(c: &mut Criterion) {
    let mut generator = MazeGenerator::with_seed(SIZE as i64, 42);
    let grid = generator.generate();
    let (start, goal) = (generator.start_position(), generator.goal_position());

    for kind in SearchKind::ALL {
        c.bench_function(&format!("solve_{}", kind.name()), |b| {
            b.iter(|| {
                Algorithm::new(black_box(kind), grid.clone(), start, goal).run_to_end(|_| {})
            })
        });
    }
}

criterion_group! {name = benches; config = Criterion::default().sample_size(10); targets = kruskals, solvers}
criterion_main!(benches);
