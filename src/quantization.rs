//! Low-precision quantization of float vectors.
//!
//! Two strategies map a batch of `f32` vectors to fixed-width signed integer
//! codes (`i8` or `i16`):
//!
//! - **Affine**: per-dimension `(scale, zero_point)` derived from each
//!   dimension's range, widened to include zero.
//! - **Distributional (LPQ)**: `(mean, standard_deviation)` per vector or per
//!   dimension; values beyond one standard deviation saturate.
//!
//! Parameters are derived from the batch passed to each call and are not
//! retained by the quantizer. Callers that need to encode queries with the
//! dataset's parameters use [`LowPrecisionQuantizer::fit`] and
//! [`QuantizationParams::encode`] explicitly.
//!
//! [`NaiveQuantizer`] rounds values directly with no statistics and serves as
//! a quality baseline.

pub mod affine;
pub mod config;
pub mod distributional;
pub mod naive;
pub mod quantizer;
pub mod stats;

pub use self::affine::AffineParams;
pub use self::config::{QuantizationStrategy, QuantizerConfig, StatisticsGranularity};
pub use self::distributional::DistributionParams;
pub use self::naive::{NaiveQuantizer, RoundingMode};
pub use self::quantizer::{
    AnyQuantizer, LowPrecisionQuantizer, QuantizationParams, QuantizedVectors, Quantizer,
};
