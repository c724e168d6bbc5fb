//! Distance metrics for vector similarity calculation.
//!
//! The two metrics have opposite polarity. `euclidean` is a distance (smaller
//! is closer) while `angular` is a cosine similarity (larger is closer) despite
//! its name. Any comparator, heap ordering or combination of scores must branch
//! on [`DistanceMetric::polarity`]; mixing the two without it silently inverts
//! the ranking.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LpqError, Result};
use crate::vector::element::Element;

/// Which direction of a score means "closer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// Distances: smaller scores are closer.
    SmallerIsCloser,
    /// Similarities: larger scores are closer.
    LargerIsCloser,
}

impl Polarity {
    /// Order two scores by relevance. `Ordering::Less` means `a` ranks ahead of `b`.
    pub fn compare(&self, a: f32, b: f32) -> Ordering {
        match self {
            Polarity::SmallerIsCloser => a.total_cmp(&b),
            Polarity::LargerIsCloser => b.total_cmp(&a),
        }
    }
}

/// Distance metrics supported by the exact search index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Sum of squared differences (not square-rooted).
    #[default]
    Euclidean,
    /// Cosine similarity (higher is more similar).
    Angular,
}

impl DistanceMetric {
    /// Calculate the score between two vectors using this metric.
    pub fn distance<T: Element>(&self, a: &[T], b: &[T]) -> Result<f32> {
        check_dimensions(a, b)?;

        let result = match self {
            DistanceMetric::Euclidean => euclidean_distance(a, b),
            DistanceMetric::Angular => angular_distance(a, b),
        };

        Ok(result)
    }

    /// The ranking direction of this metric's scores.
    pub fn polarity(&self) -> Polarity {
        match self {
            DistanceMetric::Euclidean => Polarity::SmallerIsCloser,
            DistanceMetric::Angular => Polarity::LargerIsCloser,
        }
    }

    /// Get the name of this distance metric.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Angular => "angular",
        }
    }

    /// Parse a distance metric from a string, ignoring case.
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "angular" => Ok(DistanceMetric::Angular),
            _ => Err(LpqError::invalid_argument(format!(
                "unsupported distance metric '{s}': supported metrics are 'euclidean' and 'angular'"
            ))),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = LpqError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn check_dimensions<T>(a: &[T], b: &[T]) -> Result<()> {
    if a.len() != b.len() {
        return Err(LpqError::invalid_argument(format!(
            "vector dimensions must match for distance calculation: {} != {}",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

/// Sum of squared elementwise differences. Smaller is closer.
pub fn euclidean_distance<T: Element>(a: &[T], b: &[T]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    T::squared_euclidean(a, b)
}

/// Dot product divided by the product of L2 norms. Larger is closer.
///
/// Returns 0.0 when either vector has zero norm.
pub fn angular_distance<T: Element>(a: &[T], b: &[T]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let norms = (T::squared_norm(a) * T::squared_norm(b)).sqrt();
    if norms == 0.0 {
        return 0.0;
    }
    T::dot(a, b) / norms
}

/// Compute the score between two vectors under the named metric.
///
/// Fails with `InvalidArgument` when the lengths differ or the metric name is
/// neither `euclidean` nor `angular` (case-insensitive).
pub fn compute_distance<T: Element>(a: &[T], b: &[T], metric_name: &str) -> Result<f32> {
    check_dimensions(a, b)?;
    DistanceMetric::parse_str(metric_name)?.distance(a, b)
}
