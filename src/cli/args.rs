//! Command line argument parsing for the lpq CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::quantization::{QuantizationStrategy, StatisticsGranularity};
use crate::vector::DistanceMetric;

/// lpq - Low-precision vector quantization and exact nearest-neighbor search
#[derive(Parser, Debug, Clone)]
#[command(name = "lpq")]
#[command(about = "Low-precision vector quantization and exact nearest-neighbor search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LpqArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LpqArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compare quantized and float exact search on a synthetic dataset
    Benchmark(BenchmarkArgs),

    /// Quantize a JSON file of float vectors
    Quantize(QuantizeArgs),

    /// Run exact top-k search over JSON vector files
    Search(SearchArgs),
}

/// Options shared by commands that quantize vectors.
#[derive(Args, Debug, Clone)]
pub struct QuantizationOptions {
    /// JSON file with `quantizer` and `index` configuration sections
    #[arg(short, long)]
    pub config_file: Option<PathBuf>,

    /// Code width in bits (8 or 16)
    #[arg(short, long, default_value = "8")]
    pub bit_width: u32,

    /// Quantization strategy (overrides the config file)
    #[arg(short, long)]
    pub strategy: Option<StrategyArg>,
}

/// Arguments for the benchmark command
#[derive(Args, Debug, Clone)]
pub struct BenchmarkArgs {
    #[command(flatten)]
    pub quantization: QuantizationOptions,

    /// Number of dataset vectors
    #[arg(short = 'n', long, default_value = "10000")]
    pub num_vectors: usize,

    /// Number of query vectors
    #[arg(long, default_value = "100")]
    pub num_queries: usize,

    /// Vector dimension
    #[arg(short, long, default_value = "128")]
    pub dimension: usize,

    /// Mean of the generated values
    #[arg(long, default_value = "20.0")]
    pub mean: f32,

    /// Standard deviation of the generated values
    #[arg(long, default_value = "3.0")]
    pub std_dev: f32,

    /// Random seed
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Distance metric
    #[arg(short, long, default_value = "euclidean")]
    pub metric: DistanceMetric,

    /// Number of neighbors per query
    #[arg(short = 'k', long, default_value = "10")]
    pub top_k: usize,

    /// Number of threads to use
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Output file for results
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

/// Arguments for the quantize command
#[derive(Args, Debug, Clone)]
pub struct QuantizeArgs {
    /// JSON file holding an array of float vectors
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub quantization: QuantizationOptions,

    /// Output file for the codes (printed if omitted)
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

/// Arguments for the search command
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// JSON file holding the dataset vectors
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// JSON file holding the query vectors
    #[arg(value_name = "QUERIES")]
    pub queries: PathBuf,

    /// Distance metric
    #[arg(short, long, default_value = "euclidean")]
    pub metric: DistanceMetric,

    /// Number of neighbors per query
    #[arg(short = 'k', long, default_value = "10")]
    pub top_k: usize,

    /// Quantize dataset and queries with shared parameters before searching
    #[arg(long)]
    pub quantize: bool,

    #[command(flatten)]
    pub quantization: QuantizationOptions,

    /// Number of threads to use
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Output file for results
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

/// Quantization strategies selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyArg {
    /// Range-based scale and zero point per dimension
    Affine,
    /// Mean and standard deviation per vector
    PerVector,
    /// Mean and standard deviation per dimension
    PerDimension,
}

impl From<StrategyArg> for QuantizationStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Affine => QuantizationStrategy::Affine,
            StrategyArg::PerVector => QuantizationStrategy::Distributional {
                granularity: StatisticsGranularity::PerVector,
            },
            StrategyArg::PerDimension => QuantizationStrategy::Distributional {
                granularity: StatisticsGranularity::PerDimension,
            },
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
