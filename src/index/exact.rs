//! Exhaustive top-k search over an immutable dataset.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use rayon::ThreadPool;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{LpqError, Result};
use crate::index::collector::TopKCollector;
use crate::index::config::IndexConfig;
use crate::vector::batch::batch_dimension;
use crate::vector::distance::{DistanceMetric, Polarity};
use crate::vector::element::Element;

/// One search hit: the score under the index metric and the dataset id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub distance: f32,
    pub id: usize,
}

/// Ranked neighbors of a single query, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopKResult {
    pub neighbors: Vec<Neighbor>,
}

impl TopKResult {
    /// Scores in rank order.
    pub fn distances(&self) -> Vec<f32> {
        self.neighbors.iter().map(|n| n.distance).collect()
    }

    /// Ids in rank order.
    pub fn ids(&self) -> Vec<usize> {
        self.neighbors.iter().map(|n| n.id).collect()
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

/// Results of a batch search, in query order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    /// One entry per query.
    pub results: Vec<TopKResult>,
    /// Number of neighbors requested after clamping to the dataset size.
    pub top_k: usize,
    /// Wall-clock time of the batch in milliseconds.
    pub search_time_ms: f64,
}

impl SearchResults {
    /// Per-query score lists.
    pub fn distances(&self) -> Vec<Vec<f32>> {
        self.results.iter().map(TopKResult::distances).collect()
    }

    /// Per-query id lists.
    pub fn ids(&self) -> Vec<Vec<usize>> {
        self.results.iter().map(TopKResult::ids).collect()
    }

    /// Split into `(distances, ids)`.
    pub fn into_parts(self) -> (Vec<Vec<f32>>, Vec<Vec<usize>>) {
        let distances = self.distances();
        let ids = self.ids();
        (distances, ids)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Exact nearest-neighbor index over vectors of element type `T`.
///
/// The metric is fixed at construction. The dataset is loaded exactly once by
/// [`build`](Self::build); ids are the 0-based input positions and never
/// change. A second build is rejected; rebuilding requires a new index.
///
/// The index does not check that queries were quantized with the dataset's
/// parameters. Callers using quantized `T` must encode both consistently.
#[derive(Debug)]
pub struct ExactSearchIndex<T> {
    metric: DistanceMetric,
    config: IndexConfig,
    thread_pool: Option<Arc<ThreadPool>>,
    vectors: Vec<Vec<T>>,
    dimension: Option<usize>,
}

impl<T: Element> ExactSearchIndex<T> {
    /// Create an empty index for the named metric (`euclidean` or `angular`,
    /// case-insensitive). An unknown name fails with `InvalidArgument`.
    pub fn new(metric_name: &str) -> Result<Self> {
        Ok(Self::with_metric(DistanceMetric::parse_str(metric_name)?))
    }

    /// Create an empty index for `metric` using the global rayon pool.
    pub fn with_metric(metric: DistanceMetric) -> Self {
        Self {
            metric,
            config: IndexConfig::default(),
            thread_pool: None,
            vectors: Vec::new(),
            dimension: None,
        }
    }

    /// Create an empty index for `metric` with explicit parallelism settings.
    pub fn with_config(metric: DistanceMetric, config: IndexConfig) -> Result<Self> {
        let thread_pool = match config.num_threads {
            Some(0) => {
                return Err(LpqError::invalid_argument(
                    "num_threads must be at least 1",
                ));
            }
            Some(n) => {
                debug!("creating search thread pool with {n} threads");
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| {
                        LpqError::thread_pool(format!("Failed to create thread pool: {e}"))
                    })?;
                Some(Arc::new(pool))
            }
            None => None,
        };

        Ok(Self {
            metric,
            config,
            thread_pool,
            vectors: Vec::new(),
            dimension: None,
        })
    }

    /// The metric bound to this index.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Ranking direction of the bound metric.
    pub fn polarity(&self) -> Polarity {
        self.metric.polarity()
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimension of the stored vectors, once built with a non-empty dataset.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Stored vector by id.
    pub fn get(&self, id: usize) -> Option<&[T]> {
        self.vectors.get(id).map(Vec::as_slice)
    }

    /// Load the dataset, assigning ids `0..n` in input order.
    ///
    /// Fails with `PreconditionViolation` if the index already holds vectors
    /// and with `InvalidArgument` if the rows differ in length.
    #[doc(alias = "add_dataset")]
    pub fn build(&mut self, dataset: Vec<Vec<T>>) -> Result<()> {
        if !self.vectors.is_empty() {
            return Err(LpqError::precondition(format!(
                "index already holds {} vectors; build a new index instead",
                self.vectors.len()
            )));
        }

        let dimension = batch_dimension(&dataset)?;
        self.vectors = dataset;
        self.dimension = dimension;

        info!(
            "built exact {} index: {} vectors, dimension {}, metric {}",
            T::NAME,
            self.vectors.len(),
            dimension.unwrap_or(0),
            self.metric
        );
        Ok(())
    }

    fn effective_top_k(&self, top_k: usize) -> usize {
        if top_k > self.vectors.len() {
            warn!(
                "top_k {} exceeds dataset size {}; clamping",
                top_k,
                self.vectors.len()
            );
            self.vectors.len()
        } else {
            top_k
        }
    }

    fn scan(&self, query: &[T], top_k: usize) -> Result<TopKResult> {
        if let Some(dimension) = self.dimension {
            if query.len() != dimension {
                return Err(LpqError::invalid_argument(format!(
                    "query dimension {} does not match index dimension {dimension}",
                    query.len()
                )));
            }
        }

        let mut collector = TopKCollector::new(top_k, self.metric.polarity());
        for (id, vector) in self.vectors.iter().enumerate() {
            collector.collect(id, self.metric.distance(query, vector)?);
        }

        Ok(TopKResult {
            neighbors: collector.into_sorted(),
        })
    }

    /// Find the `top_k` nearest stored vectors to a single query.
    ///
    /// `top_k` larger than the dataset is clamped to the dataset size.
    pub fn search_one(&self, query: &[T], top_k: usize) -> Result<TopKResult> {
        self.scan(query, self.effective_top_k(top_k))
    }

    /// Find the `top_k` nearest stored vectors to each query.
    ///
    /// Queries are evaluated independently, in parallel for batches of at
    /// least `parallel_threshold` queries, and results keep the query order.
    /// If any query fails the whole batch fails with the error of the
    /// lowest-index failing query.
    pub fn search(&self, queries: &[Vec<T>], top_k: usize) -> Result<SearchResults> {
        let start = Instant::now();
        let top_k = self.effective_top_k(top_k);
        let parallel = queries.len() >= self.config.parallel_threshold;

        debug!(
            "searching {} queries against {} vectors (top_k: {}, parallel: {})",
            queries.len(),
            self.vectors.len(),
            top_k,
            parallel
        );

        let run = || -> Vec<Result<TopKResult>> {
            if parallel {
                queries.par_iter().map(|q| self.scan(q, top_k)).collect()
            } else {
                queries.iter().map(|q| self.scan(q, top_k)).collect()
            }
        };

        let outcomes = match &self.thread_pool {
            Some(pool) => pool.install(run),
            None => run(),
        };
        let results = outcomes.into_iter().collect::<Result<Vec<_>>>()?;

        let search_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(
            "searched {} queries in {:.3} ms",
            results.len(),
            search_time_ms
        );

        Ok(SearchResults {
            results,
            top_k,
            search_time_ms,
        })
    }
}
