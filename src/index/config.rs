//! Configuration for the exact search index.

use serde::{Deserialize, Serialize};

/// Parallelism settings for [`ExactSearchIndex`](crate::index::ExactSearchIndex).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Thread pool size for batch search.
    /// If None, uses the global rayon pool (one thread per CPU core).
    pub num_threads: Option<usize>,

    /// Query batches smaller than this are searched on the calling thread.
    pub parallel_threshold: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            parallel_threshold: 4,
        }
    }
}

impl IndexConfig {
    /// Use a dedicated pool with `num_threads` workers.
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Set the query count at which batch search runs in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Number of workers batch search will use.
    pub fn effective_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(num_cpus::get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IndexConfig::default();
        assert_eq!(config.num_threads, None);
        assert_eq!(config.effective_threads(), num_cpus::get());

        let config = config.with_num_threads(2).with_parallel_threshold(1);
        assert_eq!(config.effective_threads(), 2);
        assert_eq!(config.parallel_threshold, 1);
    }

    #[test]
    fn test_deserialize() {
        let config: IndexConfig = serde_json::from_str(r#"{"num_threads": 3}"#).unwrap();
        assert_eq!(config.num_threads, Some(3));
        assert_eq!(config.parallel_threshold, 4);
    }
}
