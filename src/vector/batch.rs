//! Shape validation and normalization for batches of vectors.

use crate::error::{LpqError, Result};

/// Validate that every row of `batch` has the same length.
///
/// Returns `None` for an empty batch and the shared dimension otherwise.
pub fn batch_dimension<T>(batch: &[Vec<T>]) -> Result<Option<usize>> {
    let Some(first) = batch.first() else {
        return Ok(None);
    };
    let dimension = first.len();

    if let Some((row, v)) = batch
        .iter()
        .enumerate()
        .find(|(_, v)| v.len() != dimension)
    {
        return Err(LpqError::invalid_argument(format!(
            "ragged batch: row {row} has dimension {}, expected {dimension}",
            v.len()
        )));
    }

    Ok(Some(dimension))
}

/// Scale a vector to unit L2 length in place. Zero vectors are left unchanged.
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Return a copy of `batch` with every row scaled to unit L2 length.
///
/// Used before quantizing data that will be searched with the angular metric.
pub fn normalized_rows(batch: &[Vec<f32>]) -> Vec<Vec<f32>> {
    batch
        .iter()
        .map(|row| {
            let mut row = row.clone();
            normalize(&mut row);
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_dimension() {
        let empty: Vec<Vec<f32>> = Vec::new();
        assert_eq!(batch_dimension(&empty).unwrap(), None);

        let batch = vec![vec![1, 2, 3], vec![4, 5, 6]];
        assert_eq!(batch_dimension(&batch).unwrap(), Some(3));

        let ragged = vec![vec![1.0], vec![1.0, 2.0]];
        let err = batch_dimension(&ragged).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_normalized_rows() {
        let rows = normalized_rows(&[vec![3.0, 4.0], vec![0.0, 0.0]]);
        assert!((rows[0][0] - 0.6).abs() < 1e-6);
        assert!((rows[0][1] - 0.8).abs() < 1e-6);
        assert_eq!(rows[1], vec![0.0, 0.0]);
    }
}
