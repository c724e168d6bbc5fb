//! Command implementations for the lpq CLI.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::dataset::{self, GaussianDataset};
use crate::error::{LpqError, Result};
use crate::evaluation::{SearchTiming, recall_at_k};
use crate::index::{ExactSearchIndex, IndexConfig, SearchResults};
use crate::quantization::{AnyQuantizer, LowPrecisionQuantizer, QuantizerConfig};
use crate::vector::batch::{batch_dimension, normalized_rows};
use crate::vector::distance::DistanceMetric;
use crate::vector::element::{Element, QuantizedElement};

/// Contents of a `--config-file`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub quantizer: QuantizerConfig,
    pub index: IndexConfig,
}

impl CliConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Execute a CLI command.
pub fn execute_command(args: LpqArgs) -> Result<()> {
    match &args.command {
        Command::Benchmark(benchmark_args) => run_benchmark(benchmark_args.clone(), &args),
        Command::Quantize(quantize_args) => quantize_file(quantize_args.clone(), &args),
        Command::Search(search_args) => search_files(search_args.clone(), &args),
    }
}

/// Merge the config file with command line overrides.
fn resolve_config(options: &QuantizationOptions, threads: Option<usize>) -> Result<CliConfig> {
    let mut config = match &options.config_file {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    if let Some(strategy) = options.strategy {
        config.quantizer = config.quantizer.with_strategy(strategy.into());
    }
    if let Some(threads) = threads {
        config.index = config.index.with_num_threads(threads);
    }
    debug!("resolved configuration: {config:?}");
    Ok(config)
}

/// Build an index over `dataset`, search it, and time both steps.
fn timed_search<T: Element>(
    metric: DistanceMetric,
    index_config: &IndexConfig,
    dataset: Vec<Vec<T>>,
    queries: &[Vec<T>],
    top_k: usize,
) -> Result<(SearchResults, SearchTiming)> {
    let mut index = ExactSearchIndex::with_config(metric, index_config.clone())?;

    let start = Instant::now();
    index.build(dataset)?;
    let indexing = start.elapsed();

    let start = Instant::now();
    let results = index.search(queries, top_k)?;
    let querying = start.elapsed();

    Ok((results, SearchTiming::new(indexing, querying, queries.len())))
}

/// Quantize dataset and queries consistently, then search the codes.
///
/// Returns the search results, their timing and the quantization time in ms.
fn quantized_search<T: QuantizedElement>(
    config: &CliConfig,
    metric: DistanceMetric,
    dataset: &[Vec<f32>],
    queries: &[Vec<f32>],
    top_k: usize,
) -> Result<(SearchResults, SearchTiming, f64)> {
    let quantizer = LowPrecisionQuantizer::<T>::with_config(config.quantizer.clone());

    let start = Instant::now();
    let (codes, params) = quantizer.quantize_with_params(dataset)?;
    let query_codes = quantizer.quantize_queries(&params, queries)?;
    let quantization_ms = start.elapsed().as_secs_f64() * 1000.0;

    let (results, timing) = timed_search(metric, &config.index, codes, &query_codes, top_k)?;
    Ok((results, timing, quantization_ms))
}

fn quantized_search_dyn(
    bit_width: u32,
    config: &CliConfig,
    metric: DistanceMetric,
    dataset: &[Vec<f32>],
    queries: &[Vec<f32>],
    top_k: usize,
) -> Result<(SearchResults, SearchTiming, f64)> {
    match bit_width {
        8 => quantized_search::<i8>(config, metric, dataset, queries, top_k),
        16 => quantized_search::<i16>(config, metric, dataset, queries, top_k),
        _ => Err(LpqError::invalid_argument(format!(
            "unsupported bit width {bit_width}: expected 8 or 16"
        ))),
    }
}

/// Compare quantized search against a float baseline on synthetic data.
fn run_benchmark(args: BenchmarkArgs, cli_args: &LpqArgs) -> Result<()> {
    let config = resolve_config(&args.quantization, args.threads)?;

    if cli_args.verbosity() > 1 {
        println!(
            "Generating {} vectors and {} queries of dimension {}",
            args.num_vectors, args.num_queries, args.dimension
        );
    }

    let start_time = Instant::now();

    let generator = GaussianDataset::new(args.num_vectors, args.dimension)
        .with_distribution(args.mean, args.std_dev)
        .with_seed(args.seed);
    let mut data = generator.generate()?;
    let mut queries = GaussianDataset {
        num_vectors: args.num_queries,
        seed: args.seed.wrapping_add(1),
        ..generator
    }
    .generate()?;

    if args.metric == DistanceMetric::Angular {
        data = normalized_rows(&data);
        queries = normalized_rows(&queries);
    }

    let (truth, baseline) =
        timed_search(args.metric, &config.index, data.clone(), &queries, args.top_k)?;
    let (computed, quantized, quantization_time_ms) = quantized_search_dyn(
        args.quantization.bit_width,
        &config,
        args.metric,
        &data,
        &queries,
        args.top_k,
    )?;

    let results = BenchmarkReport {
        metric: args.metric.to_string(),
        strategy: config.quantizer.strategy.name().to_string(),
        bit_width: args.quantization.bit_width,
        num_vectors: args.num_vectors,
        num_queries: args.num_queries,
        dimension: args.dimension,
        top_k: computed.top_k,
        threads: config.index.effective_threads(),
        quantization_time_ms,
        baseline,
        quantized,
        recall: recall_at_k(&computed.ids(), &truth.ids()),
        total_duration_ms: start_time.elapsed().as_secs_f64() * 1000.0,
    };

    // Save results to file if specified
    if let Some(output_file) = &args.output_file {
        save_results(&results, output_file, cli_args)?;
    }

    output_result("Benchmark completed", &results, cli_args)
}

/// Quantize a vector file.
fn quantize_file(args: QuantizeArgs, cli_args: &LpqArgs) -> Result<()> {
    let config = resolve_config(&args.quantization, None)?;
    let vectors = dataset::read_vectors(&args.input)?;
    let quantizer = AnyQuantizer::new(args.quantization.bit_width, config.quantizer.clone())?;

    let start = Instant::now();
    let codes = quantizer.quantize_vectors(&vectors)?;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    let output_file = match &args.output_file {
        Some(path) => {
            dataset::write_json(path, &codes, cli_args.pretty)?;
            Some(path.display().to_string())
        }
        None => None,
    };

    let report = QuantizationReport {
        strategy: config.quantizer.strategy.name().to_string(),
        bit_width: quantizer.bit_width(),
        num_vectors: vectors.len(),
        dimension: batch_dimension(&vectors)?.unwrap_or(0),
        duration_ms,
        codes: if output_file.is_none() { Some(codes) } else { None },
        output_file,
    };

    output_result("Quantization completed", &report, cli_args)
}

/// Search a dataset file with a query file.
fn search_files(args: SearchArgs, cli_args: &LpqArgs) -> Result<()> {
    let config = resolve_config(&args.quantization, args.threads)?;
    let data = dataset::read_vectors(&args.dataset)?;
    let queries = dataset::read_vectors(&args.queries)?;

    let (results, timing) = if args.quantize {
        let (results, timing, _) = quantized_search_dyn(
            args.quantization.bit_width,
            &config,
            args.metric,
            &data,
            &queries,
            args.top_k,
        )?;
        (results, timing)
    } else {
        timed_search(args.metric, &config.index, data, &queries, args.top_k)?
    };

    let report = SearchReport {
        metric: args.metric.to_string(),
        top_k: results.top_k,
        quantized: args.quantize,
        timing,
        results: results.results,
    };

    if let Some(output_file) = &args.output_file {
        save_results(&report, output_file, cli_args)?;
    }

    output_result("Search completed", &report, cli_args)
}

/// Save a report to a file. Files are always JSON.
fn save_results<T: Serialize>(results: &T, file_path: &Path, cli_args: &LpqArgs) -> Result<()> {
    let pretty = cli_args.pretty || cli_args.output_format == OutputFormat::Human;
    dataset::write_json(file_path, results, pretty)?;

    if cli_args.verbosity() > 1 {
        println!("Results saved to: {}", file_path.display());
    }

    Ok(())
}
