//! Exact (exhaustive) nearest-neighbor search.
//!
//! # Module Structure
//!
//! - `collector`: bounded top-k selection that honors metric polarity
//! - `config`: thread pool and parallelism settings
//! - `exact`: the index itself and its result types

pub mod collector;
pub mod config;
pub mod exact;

pub use self::collector::TopKCollector;
pub use self::config::IndexConfig;
pub use self::exact::{ExactSearchIndex, Neighbor, SearchResults, TopKResult};
