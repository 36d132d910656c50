use criterion::{criterion_group, criterion_main, Criterion, black_box};
use dischex::config::{discriminator_layers, GeneratorConfig};
use dischex::expand::expand_weights;
use dischex::golden::{fixed_reference, make_rng, GoldenBundle};

fn bench_fixed_reference(c: &mut Criterion) {
    let cfg = GeneratorConfig { seed: Some(0x1234_5678), ..GeneratorConfig::default() };
    let bundle = GoldenBundle::random(&cfg, &mut make_rng(&cfg)).expect("valid ranges");
    c.bench_function("fixed_reference_256", |ben| {
        ben.iter(|| black_box(fixed_reference(black_box(&bundle), cfg.frac_bits)))
    });
}

fn bench_tile_layer1(c: &mut Criterion) {
    let shape = discriminator_layers().remove(0);
    let neuron: Vec<String> = (0..shape.input_count).map(|i| format!("{:04x}", i)).collect();
    c.bench_function("tile_layer1_256x128", |ben| {
        ben.iter(|| black_box(expand_weights(&shape, black_box(&neuron)).map(|(m, _)| m.len())))
    });
}

criterion_group!(benches, bench_fixed_reference, bench_tile_layer1);
criterion_main!(benches);
