//! Statistics passes over a rectangular batch of float vectors.
//!
//! Every function here reads the batch only and returns a fresh table, so the
//! per-dimension and per-vector loops parallelize without synchronization.
//! Accumulation happens in `f64`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Observed range of one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f32,
    pub max: f32,
}

/// Sample mean and Bessel-corrected standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanStd {
    pub mean: f32,
    pub std_dev: f32,
}

impl MeanStd {
    /// Compute from a sample. Fewer than two values give a zero standard deviation.
    pub fn from_values<I>(values: I) -> Self
    where
        I: Iterator<Item = f32> + Clone,
    {
        let (count, sum) = values
            .clone()
            .fold((0usize, 0.0f64), |(n, s), v| (n + 1, s + v as f64));
        if count == 0 {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
            };
        }
        let mean = sum / count as f64;

        if count < 2 {
            return Self {
                mean: mean as f32,
                std_dev: 0.0,
            };
        }

        let squared: f64 = values
            .map(|v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum();
        let variance = squared / (count - 1) as f64;

        Self {
            mean: mean as f32,
            std_dev: variance.sqrt() as f32,
        }
    }
}

fn per_dimension<F, R>(dimension: usize, parallel: bool, f: F) -> Vec<R>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    if parallel {
        (0..dimension).into_par_iter().map(f).collect()
    } else {
        (0..dimension).map(f).collect()
    }
}

/// Minimum and maximum of each dimension across all rows.
pub fn per_dimension_min_max(batch: &[Vec<f32>], dimension: usize, parallel: bool) -> Vec<MinMax> {
    per_dimension(dimension, parallel, |dim| {
        batch.iter().map(|row| row[dim]).fold(
            MinMax {
                min: f32::INFINITY,
                max: f32::NEG_INFINITY,
            },
            |acc, v| MinMax {
                min: acc.min.min(v),
                max: acc.max.max(v),
            },
        )
    })
}

/// Mean and standard deviation of each dimension across all rows.
pub fn per_dimension_mean_std(
    batch: &[Vec<f32>],
    dimension: usize,
    parallel: bool,
) -> Vec<MeanStd> {
    per_dimension(dimension, parallel, |dim| {
        MeanStd::from_values(batch.iter().map(move |row| row[dim]))
    })
}

/// Mean and standard deviation of each row across its elements.
pub fn per_vector_mean_std(batch: &[Vec<f32>], parallel: bool) -> Vec<MeanStd> {
    let stats = |row: &Vec<f32>| MeanStd::from_values(row.iter().copied());
    if parallel {
        batch.par_iter().map(stats).collect()
    } else {
        batch.iter().map(stats).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_std_bessel() {
        let stats = MeanStd::from_values([2.0f32, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter());
        assert!((stats.mean - 5.0).abs() < 1e-6);
        // Population variance is 4; the sample variance is 32 / 7.
        assert!((stats.std_dev - (32.0f32 / 7.0).sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_mean_std_degenerate() {
        let one = MeanStd::from_values([3.5f32].into_iter());
        assert_eq!(one.mean, 3.5);
        assert_eq!(one.std_dev, 0.0);

        let none = MeanStd::from_values(std::iter::empty::<f32>());
        assert_eq!(none.std_dev, 0.0);
    }

    #[test]
    fn test_per_dimension_min_max() {
        let batch = vec![vec![1.0, -2.0], vec![-3.0, 5.0], vec![2.0, 0.5]];
        for parallel in [false, true] {
            let ranges = per_dimension_min_max(&batch, 2, parallel);
            assert_eq!(ranges[0], MinMax { min: -3.0, max: 2.0 });
            assert_eq!(ranges[1], MinMax { min: -2.0, max: 5.0 });
        }
    }

    #[test]
    fn test_granularities_differ() {
        let batch = vec![vec![0.0, 10.0], vec![2.0, 12.0]];

        let by_dim = per_dimension_mean_std(&batch, 2, false);
        assert_eq!(by_dim.len(), 2);
        assert!((by_dim[0].mean - 1.0).abs() < 1e-6);
        assert!((by_dim[1].mean - 11.0).abs() < 1e-6);

        let by_row = per_vector_mean_std(&batch, true);
        assert_eq!(by_row.len(), 2);
        assert!((by_row[0].mean - 5.0).abs() < 1e-6);
        assert!((by_row[1].mean - 7.0).abs() < 1e-6);
    }
}
