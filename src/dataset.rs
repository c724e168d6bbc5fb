//! Synthetic datasets and JSON vector files.
//!
//! Vector files hold a single JSON array of equal-length numeric rows, e.g.
//! `[[1.0, 2.0], [3.0, 4.0]]`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{LpqError, Result};
use crate::vector::batch::batch_dimension;

/// Parameters of a normally distributed synthetic dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianDataset {
    pub num_vectors: usize,
    pub dimension: usize,
    pub mean: f32,
    pub std_dev: f32,
    pub seed: u64,
}

impl Default for GaussianDataset {
    fn default() -> Self {
        Self {
            num_vectors: 10_000,
            dimension: 128,
            mean: 20.0,
            std_dev: 3.0,
            seed: 42,
        }
    }
}

impl GaussianDataset {
    pub fn new(num_vectors: usize, dimension: usize) -> Self {
        Self {
            num_vectors,
            dimension,
            ..Default::default()
        }
    }

    pub fn with_distribution(mut self, mean: f32, std_dev: f32) -> Self {
        self.mean = mean;
        self.std_dev = std_dev;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Draw the rows. The same parameters always yield the same rows.
    pub fn generate(&self) -> Result<Vec<Vec<f32>>> {
        let normal = Normal::new(self.mean, self.std_dev).map_err(|e| {
            LpqError::invalid_argument(format!(
                "invalid normal distribution (mean {}, std_dev {}): {e}",
                self.mean, self.std_dev
            ))
        })?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        Ok((0..self.num_vectors)
            .map(|_| (0..self.dimension).map(|_| normal.sample(&mut rng)).collect())
            .collect())
    }
}

/// Read a JSON array of float rows. Ragged rows fail with `InvalidArgument`.
pub fn read_vectors<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f32>>> {
    let file = File::open(path.as_ref())?;
    let vectors: Vec<Vec<f32>> = serde_json::from_reader(BufReader::new(file))?;
    batch_dimension(&vectors)?;
    Ok(vectors)
}

/// Write any serializable value as JSON.
pub fn write_json<P: AsRef<Path>, V: Serialize + ?Sized>(
    path: P,
    value: &V,
    pretty: bool,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_generate_is_deterministic() {
        let spec = GaussianDataset::new(20, 8).with_seed(7);
        let a = spec.generate().unwrap();
        let b = spec.generate().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
        assert!(a.iter().all(|row| row.len() == 8));

        let c = spec.clone().with_seed(8).generate().unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_generate_mean() {
        let rows = GaussianDataset::new(200, 50).generate().unwrap();
        let n = (200 * 50) as f64;
        let mean = rows.iter().flatten().map(|&v| v as f64).sum::<f64>() / n;
        assert!((mean - 20.0).abs() < 0.2);
    }

    #[test]
    fn test_invalid_distribution() {
        let err = GaussianDataset::new(1, 1)
            .with_distribution(0.0, -1.0)
            .generate()
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_vector_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vectors.json");
        let rows = vec![vec![1.5f32, -2.0], vec![0.0, 4.25]];

        write_json(&path, &rows, true).unwrap();
        assert_eq!(read_vectors(&path).unwrap(), rows);
    }

    #[test]
    fn test_read_rejects_ragged_and_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ragged.json");
        std::fs::write(&path, "[[1.0, 2.0], [3.0]]").unwrap();
        assert!(read_vectors(&path).unwrap_err().is_invalid_argument());

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            read_vectors(&missing).unwrap_err(),
            LpqError::Io(_)
        ));
    }
}
