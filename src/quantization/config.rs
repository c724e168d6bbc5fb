//! Configuration for quantizers.

use serde::{Deserialize, Serialize};

/// Whether distributional statistics are gathered per vector or per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsGranularity {
    /// One `(mean, standard_deviation)` per dimension, across all rows.
    PerDimension,
    /// One `(mean, standard_deviation)` per row, across its elements.
    #[default]
    PerVector,
}

/// Quantization rule applied to each value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuantizationStrategy {
    /// Range-based `(scale, zero_point)`, always per dimension.
    Affine,
    /// Mean/standard-deviation based, saturating outside one standard deviation.
    Distributional {
        #[serde(default)]
        granularity: StatisticsGranularity,
    },
}

impl Default for QuantizationStrategy {
    fn default() -> Self {
        QuantizationStrategy::Distributional {
            granularity: StatisticsGranularity::default(),
        }
    }
}

impl QuantizationStrategy {
    /// Get the name of this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            QuantizationStrategy::Affine => "affine",
            QuantizationStrategy::Distributional {
                granularity: StatisticsGranularity::PerVector,
            } => "distributional/per-vector",
            QuantizationStrategy::Distributional {
                granularity: StatisticsGranularity::PerDimension,
            } => "distributional/per-dimension",
        }
    }
}

/// Configuration for [`LowPrecisionQuantizer`](crate::quantization::LowPrecisionQuantizer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizerConfig {
    /// Quantization rule.
    pub strategy: QuantizationStrategy,

    /// Batches with fewer rows than this are processed on the calling thread.
    pub parallel_threshold: usize,
}

impl Default for QuantizerConfig {
    fn default() -> Self {
        Self {
            strategy: QuantizationStrategy::default(),
            parallel_threshold: 1024,
        }
    }
}

impl QuantizerConfig {
    /// Affine quantization with default settings.
    pub fn affine() -> Self {
        Self::default().with_strategy(QuantizationStrategy::Affine)
    }

    /// Distributional quantization with the given statistics granularity.
    pub fn distributional(granularity: StatisticsGranularity) -> Self {
        Self::default().with_strategy(QuantizationStrategy::Distributional { granularity })
    }

    /// Set the quantization strategy.
    pub fn with_strategy(mut self, strategy: QuantizationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the row count at which work moves onto the rayon pool.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Whether a batch of `rows` vectors should be processed in parallel.
    pub fn is_parallel(&self, rows: usize) -> bool {
        rows >= self.parallel_threshold
    }
}
