//! Vector element types, distance metrics and batch helpers.
//!
//! # Module Structure
//!
//! - `element`: numeric element traits for raw (f32) and quantized (i8, i16) vectors
//! - `distance`: euclidean and angular metrics with explicit polarity
//! - `batch`: shape validation and row normalization for vector batches

pub mod batch;
pub mod distance;
pub mod element;

pub use self::batch::{batch_dimension, normalize, normalized_rows};
pub use self::distance::{DistanceMetric, Polarity, compute_distance};
pub use self::element::{Element, QuantizedElement};
