//! Benchmarks for the stacking engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pstack_core::{Mesh, StackSettings};
use pstack_stacker::{PartSpec, RotationMode, Stacker};

fn stacker_benchmark(c: &mut Criterion) {
    let settings = StackSettings::new()
        .with_initial_box(20.0, 20.0, 10.0)
        .with_maximum_box(40.0, 40.0, 40.0);

    let parts = || {
        vec![
            PartSpec::new("plate", Mesh::cuboid(8.0, 6.0, 1.0))
                .with_quantity(4)
                .with_rotation_mode(RotationMode::Cubic),
            PartSpec::new("block", Mesh::cuboid(3.0, 3.0, 3.0)).with_quantity(10),
        ]
    };

    c.bench_function("stack_14_cuboids", |b| {
        b.iter(|| {
            let mut stacker = Stacker::new(settings.clone());
            let outcome = stacker.run(black_box(parts()));
            black_box(outcome)
        })
    });
}

criterion_group!(benches, stacker_benchmark);
criterion_main!(benches);
