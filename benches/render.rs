use criterion::{black_box, criterion_group, criterion_main, Criterion};

use psymol::render::depict_smiles;
use psymol::{BackgroundColor, Renderer};

const AMPHETAMINE: &str = "CC(N)Cc1ccccc1";
const DMT: &str = "CN(C)CCc1c[nH]c2ccccc12";

fn bench_render(c: &mut Criterion) {
    let renderer = Renderer::default();
    let dmt = depict_smiles(DMT).unwrap();

    let mut group = c.benchmark_group("render");
    group.sample_size(10);

    group.bench_function("amphetamine_smiles", |b| {
        b.iter(|| {
            black_box(renderer.render_from_smiles(black_box(AMPHETAMINE), BackgroundColor::WHITE))
        })
    });
    group.bench_function("dmt_draw", |b| {
        b.iter(|| black_box(renderer.draw(black_box(&dmt), BackgroundColor::WHITE)))
    });

    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
