//! Search quality and throughput measurements.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fraction of ground-truth neighbors recovered by a search.
///
/// Each query contributes the size of the intersection between its computed
/// ids and its ground-truth ids; the total is divided by the number of
/// ground-truth ids over all queries. Queries are paired positionally and
/// extra rows on either side are ignored. Returns 0.0 when there is no
/// ground truth.
pub fn recall_at_k(computed: &[Vec<usize>], ground_truth: &[Vec<usize>]) -> f64 {
    let total: usize = ground_truth.iter().map(Vec::len).sum();
    if total == 0 {
        return 0.0;
    }

    let found: usize = computed
        .iter()
        .zip(ground_truth)
        .map(|(row, truth)| {
            let truth: HashSet<usize> = truth.iter().copied().collect();
            row.iter()
                .collect::<HashSet<_>>()
                .into_iter()
                .filter(|id| truth.contains(id))
                .count()
        })
        .sum();

    found as f64 / total as f64
}

/// Wall-clock timings of one index build and one batch search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchTiming {
    pub indexing_time_ms: f64,
    pub querying_time_ms: f64,
    pub num_queries: usize,
}

impl SearchTiming {
    pub fn new(indexing: Duration, querying: Duration, num_queries: usize) -> Self {
        Self {
            indexing_time_ms: indexing.as_secs_f64() * 1000.0,
            querying_time_ms: querying.as_secs_f64() * 1000.0,
            num_queries,
        }
    }

    /// Queries per second, or 0.0 if no time elapsed.
    pub fn queries_per_second(&self) -> f64 {
        if self.querying_time_ms <= 0.0 {
            0.0
        } else {
            self.num_queries as f64 / (self.querying_time_ms / 1000.0)
        }
    }
}
