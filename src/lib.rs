//! # lpq
//!
//! Low-precision vector quantization and exact nearest-neighbor search.
//!
//! ## Features
//!
//! - Affine and distributional (LPQ) quantization to 8- or 16-bit codes
//! - Exhaustive top-k search under euclidean or angular metrics
//! - Generic over the stored element type (`f32`, `i8`, `i16`)
//! - Rayon-parallel batch processing and SIMD float kernels
//!
//! ## Example
//!
//! ```
//! use lpq::prelude::*;
//!
//! # fn main() -> lpq::error::Result<()> {
//! let dataset = vec![vec![1.0f32, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
//! let queries = vec![vec![0.9f32, 0.1]];
//!
//! let quantizer = LowPrecisionQuantizer::<i8>::with_config(QuantizerConfig::affine());
//! let params = quantizer.fit(&dataset)?;
//!
//! let mut index = ExactSearchIndex::new("euclidean")?;
//! index.build(params.encode(&dataset)?)?;
//!
//! let results = index.search(&params.encode(&queries)?, 1)?;
//! assert_eq!(results.ids(), vec![vec![0]]);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod index;
pub mod quantization;
pub mod util;
pub mod vector;

pub mod prelude {
    pub use crate::error::{LpqError, Result};
    pub use crate::index::{ExactSearchIndex, IndexConfig, Neighbor, SearchResults, TopKResult};
    pub use crate::quantization::{
        AnyQuantizer, LowPrecisionQuantizer, NaiveQuantizer, QuantizationParams,
        QuantizationStrategy, QuantizedVectors, Quantizer, QuantizerConfig, StatisticsGranularity,
    };
    pub use crate::vector::{DistanceMetric, Element, Polarity, QuantizedElement, compute_distance};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
