use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use meadow::core::camera::Camera;
use meadow::core::time::SimulationTime;
use meadow::grass::{scatter_blades, CullConfig, GrassConfig, GrassField, SimulateCullPass, SimulateParams};
use meadow::terrain::{HeightfieldTile, ReliefGenerator, ReliefParams};

fn field() -> GrassField {
    let tile = HeightfieldTile::generate(15.0, 100, (0.0, 0.0), &ReliefGenerator::new(ReliefParams::default()));
    GrassField::generate(&GrassConfig::default(), &tile, 7)
}

fn bench_scatter_blades(c: &mut Criterion) {
    let config = GrassConfig::default();

    c.bench_function("scatter_blades_32k", |b| {
        b.iter(|| scatter_blades(black_box(&config), 15.0, (0.0, 0.0), black_box(7)));
    });
}

fn bench_simulate_cull(c: &mut Criterion) {
    let mut field = field();
    let camera = Camera::default();
    let params = SimulateParams::new(&CullConfig::default(), &camera, field.blade_count(), 7);
    let mut pass = SimulateCullPass::new(field.blade_count());
    let mut time = SimulationTime::new();

    c.bench_function("simulate_cull_32k", |b| {
        b.iter(|| {
            time.advance(1.0 / 60.0);
            pass.run(black_box(&mut field), &params, &time.to_uniform())
        });
    });
}

criterion_group!(benches, bench_scatter_blades, bench_simulate_cull);
criterion_main!(benches);
