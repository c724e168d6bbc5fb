//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{LpqArgs, OutputFormat};
use crate::error::Result;
use crate::evaluation::SearchTiming;
use crate::index::TopKResult;
use crate::quantization::QuantizedVectors;

/// Result structure for the quantize command.
#[derive(Debug, Serialize)]
pub struct QuantizationReport {
    pub strategy: String,
    pub bit_width: u32,
    pub num_vectors: usize,
    pub dimension: usize,
    pub duration_ms: f64,
    /// Codes, present when no output file was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codes: Option<QuantizedVectors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

/// Result structure for the search command.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchReport {
    pub metric: String,
    pub top_k: usize,
    pub quantized: bool,
    pub timing: SearchTiming,
    pub results: Vec<TopKResult>,
}

/// Result structure for the benchmark command.
#[derive(Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub metric: String,
    pub strategy: String,
    pub bit_width: u32,
    pub num_vectors: usize,
    pub num_queries: usize,
    pub dimension: usize,
    pub top_k: usize,
    pub threads: usize,
    pub quantization_time_ms: f64,
    pub baseline: SearchTiming,
    pub quantized: SearchTiming,
    pub recall: f64,
    pub total_duration_ms: f64,
}

/// A report that knows how to print itself for humans.
pub trait HumanReadable {
    fn print_human(&self);
}

impl HumanReadable for QuantizationReport {
    fn print_human(&self) {
        println!("Quantization:");
        println!("═════════════");
        println!("Strategy: {}", self.strategy);
        println!("Bit width: {}", self.bit_width);
        println!("Vectors: {} x {}", self.num_vectors, self.dimension);
        println!("Time: {:.3}ms", self.duration_ms);
        if let Some(path) = &self.output_file {
            println!("Codes written to: {path}");
        } else if let Some(codes) = &self.codes {
            println!();
            match codes {
                QuantizedVectors::Int8(rows) => print_rows(rows),
                QuantizedVectors::Int16(rows) => print_rows(rows),
            }
        }
    }
}

impl HumanReadable for SearchReport {
    fn print_human(&self) {
        println!("Search Results:");
        println!("═══════════════");
        for (query, result) in self.results.iter().enumerate() {
            println!();
            println!("Query {query}:");
            println!("─────────────");
            for (rank, neighbor) in result.neighbors.iter().enumerate() {
                println!(
                    "{:>4}. id {:<8} {}: {:.6}",
                    rank + 1,
                    neighbor.id,
                    self.metric,
                    neighbor.distance
                );
            }
        }
        println!();
        println!("Quantized: {}", self.quantized);
        println!("Indexing time: {:.3}ms", self.timing.indexing_time_ms);
        println!("Search time: {:.3}ms", self.timing.querying_time_ms);
    }
}

impl HumanReadable for BenchmarkReport {
    fn print_human(&self) {
        println!("Benchmark Results:");
        println!("═════════════════");
        println!(
            "Dataset: {} vectors, {} queries, dimension {}",
            self.num_vectors, self.num_queries, self.dimension
        );
        println!(
            "Metric: {}  Strategy: {}  Bit width: {}  Threads: {}",
            self.metric, self.strategy, self.bit_width, self.threads
        );
        println!("Quantization time: {:.2}ms", self.quantization_time_ms);

        let runs = [("Float baseline", &self.baseline), ("Quantized", &self.quantized)];
        for (label, timing) in runs {
            println!();
            println!("{label}:");
            println!("──────────────");
            println!("Indexing time: {:.2}ms", timing.indexing_time_ms);
            println!("Querying time: {:.2}ms", timing.querying_time_ms);
            println!("Queries per second: {:.1}", timing.queries_per_second());
        }

        println!();
        println!("recall@{}: {:.4}", self.top_k, self.recall);
        println!("Total benchmark time: {:.2}ms", self.total_duration_ms);
    }
}

fn print_rows<T: std::fmt::Debug>(rows: &[Vec<T>]) {
    for row in rows {
        println!("{row:?}");
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanReadable>(
    message: &str,
    result: &T,
    args: &LpqArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &LpqArgs) -> Result<()> {
    println!("{}", to_json(result, args.pretty)?);
    Ok(())
}

/// Serialize a result as JSON.
pub fn to_json<T: Serialize>(result: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}
