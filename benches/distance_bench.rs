use criterion::{Criterion, criterion_group, criterion_main};
use lpq::quantization::{LowPrecisionQuantizer, QuantizerConfig};
use lpq::vector::{DistanceMetric, Element};
use std::hint::black_box;

fn generate_test_vectors(count: usize, dimension: usize) -> Vec<Vec<f32>> {
    let mut vectors = Vec::with_capacity(count);
    for i in 0..count {
        let mut data = Vec::with_capacity(dimension);
        for j in 0..dimension {
            let value = ((i as f32 * 0.1 + j as f32 * 0.01).sin() * 0.5 + 0.5) * 2.0 - 1.0;
            data.push(value);
        }
        vectors.push(data);
    }
    vectors
}

fn bench_metric<T: Element>(c: &mut Criterion, label: &str, vectors: &[Vec<T>]) {
    let query = &vectors[0];
    let targets = &vectors[1..];

    let mut group = c.benchmark_group(format!("distance_metrics/{label}"));

    for metric in [DistanceMetric::Euclidean, DistanceMetric::Angular] {
        group.bench_function(metric.name(), |b| {
            b.iter(|| {
                for target in targets {
                    let _ = black_box(
                        metric
                            .distance(black_box(query), black_box(target))
                            .unwrap(),
                    );
                }
            })
        });
    }

    group.finish();
}

fn bench_distances(c: &mut Criterion) {
    let vectors = generate_test_vectors(101, 128);
    let quantizer = LowPrecisionQuantizer::<i8>::with_config(QuantizerConfig::affine());
    let int8 = quantizer.quantize_vectors(&vectors).unwrap();
    let int16 = LowPrecisionQuantizer::<i16>::with_config(QuantizerConfig::affine())
        .quantize_vectors(&vectors)
        .unwrap();

    bench_metric(c, "f32", &vectors);
    bench_metric(c, "i8", &int8);
    bench_metric(c, "i16", &int16);
}

criterion_group!(benches, bench_distances);
criterion_main!(benches);
