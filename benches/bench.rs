//! Criterion benchmarks for lpq.
//!
//! Covers the two hot paths:
//! - Quantization of a batch under each strategy and bit width
//! - Exact top-k search over float and quantized datasets

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use lpq::dataset::GaussianDataset;
use lpq::index::{ExactSearchIndex, IndexConfig};
use lpq::quantization::{LowPrecisionQuantizer, QuantizerConfig, StatisticsGranularity};
use lpq::vector::DistanceMetric;
use std::hint::black_box;

fn bench_quantization(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantization");
    group.sample_size(20);

    let batch = GaussianDataset::new(1000, 128).generate().unwrap();
    group.throughput(Throughput::Elements(batch.len() as u64));

    for (name, config) in [
        ("affine", QuantizerConfig::affine()),
        (
            "per_vector",
            QuantizerConfig::distributional(StatisticsGranularity::PerVector),
        ),
        (
            "per_dimension",
            QuantizerConfig::distributional(StatisticsGranularity::PerDimension),
        ),
    ] {
        let int8 = LowPrecisionQuantizer::<i8>::with_config(config.clone());
        group.bench_function(format!("{name}_i8"), |b| {
            b.iter(|| black_box(int8.quantize_vectors(black_box(&batch)).unwrap()))
        });

        let int16 = LowPrecisionQuantizer::<i16>::with_config(config);
        group.bench_function(format!("{name}_i16"), |b| {
            b.iter(|| black_box(int16.quantize_vectors(black_box(&batch)).unwrap()))
        });
    }

    group.finish();
}

fn bench_exact_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_search");
    group.sample_size(10);

    let data = GaussianDataset::new(5000, 128).generate().unwrap();
    let queries = GaussianDataset::new(50, 128).with_seed(7).generate().unwrap();
    group.throughput(Throughput::Elements(queries.len() as u64));

    let mut float_index =
        ExactSearchIndex::with_config(DistanceMetric::Euclidean, IndexConfig::default())
            .unwrap();
    float_index.build(data.clone()).unwrap();
    group.bench_function("f32_top10", |b| {
        b.iter(|| black_box(float_index.search(black_box(&queries), 10).unwrap()))
    });

    let quantizer = LowPrecisionQuantizer::<i8>::with_config(QuantizerConfig::affine());
    let (codes, params) = quantizer.quantize_with_params(&data).unwrap();
    let query_codes = quantizer.quantize_queries(&params, &queries).unwrap();

    let mut int8_index =
        ExactSearchIndex::with_config(DistanceMetric::Euclidean, IndexConfig::default())
            .unwrap();
    int8_index.build(codes).unwrap();
    group.bench_function("i8_top10", |b| {
        b.iter(|| black_box(int8_index.search(black_box(&query_codes), 10).unwrap()))
    });

    group.bench_function("i8_top10_sequential", |b| {
        b.iter(|| {
            for query in &query_codes {
                black_box(int8_index.search_one(black_box(query), 10).unwrap());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_quantization, bench_exact_search);
criterion_main!(benches);
