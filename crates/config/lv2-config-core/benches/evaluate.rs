use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use lv2_config::{resolve, Environment, FunctionRegistry, HostConfig, RawDocument, RawPlugin};
use lv2_config_fixtures::configs;

fn synthetic_document(plugins: usize) -> RawDocument {
    RawDocument {
        reference_level: Some(-18.0),
        plugins: (0..plugins)
            .map(|i| {
                RawPlugin::new(format!("urn:bench:{i}"))
                    .with_parameter("gain", "linear(reference + 6)")
                    .with_parameter("ratio", "4")
                    .with_parameter("attack", "scale(50, 0, 100, 5, 25)")
                    .with_parameter("knee", "sqrt(pow(3, 2)) * 2")
            })
            .collect(),
    }
}

fn bench_resolve(c: &mut Criterion) {
    let env: Environment = [("reference", -18.0)].into_iter().collect();
    let functions = FunctionRegistry::new();
    let mut group = c.benchmark_group("resolve");
    for text in ["0.125", "reference - 6", "max(1, linear(reference + 21))"] {
        group.bench_with_input(BenchmarkId::from_parameter(text), text, |b, text| {
            b.iter(|| resolve(black_box(text), &env, &functions))
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut fixture = HostConfig::new();
    fixture
        .load_str(&configs::yaml("mastering-chain").expect("fixture"))
        .expect("fixture parses");
    c.bench_function("evaluate/mastering-chain", |b| {
        b.iter(|| fixture.evaluate().expect("evaluates"))
    });

    let mut group = c.benchmark_group("evaluate");
    for plugins in [8, 64, 512] {
        let mut config = HostConfig::new();
        config.load(synthetic_document(plugins));
        group.throughput(Throughput::Elements(plugins as u64 * 4));
        group.bench_with_input(BenchmarkId::from_parameter(plugins), &plugins, |b, _| {
            b.iter(|| config.evaluate().expect("evaluates"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_evaluate);
criterion_main!(benches);
