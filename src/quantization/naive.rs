//! Baseline quantizer that casts floats to integers without any statistics.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::quantization::quantizer::Quantizer;
use crate::vector::batch::batch_dimension;
use crate::vector::element::QuantizedElement;

/// How a float is brought onto the integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Nearest integer, halves away from zero.
    #[default]
    Round,
    /// Toward zero.
    Truncate,
}

/// Rounds (or truncates) each value to the nearest representable code with no
/// scaling. Values outside the code range saturate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveQuantizer<T> {
    rounding: RoundingMode,
    _code: PhantomData<fn() -> T>,
}

impl<T: QuantizedElement> NaiveQuantizer<T> {
    /// Create a rounding quantizer.
    pub fn new() -> Self {
        Self::with_rounding(RoundingMode::Round)
    }

    /// Create a quantizer with the given rounding mode.
    pub fn with_rounding(rounding: RoundingMode) -> Self {
        Self {
            rounding,
            _code: PhantomData,
        }
    }

    /// The configured rounding mode.
    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    fn quantize_value(&self, value: f32) -> T {
        let snapped = match self.rounding {
            RoundingMode::Round => value.round(),
            RoundingMode::Truncate => value.trunc(),
        };
        T::saturating_from_f32(snapped)
    }
}

impl<T: QuantizedElement> Quantizer for NaiveQuantizer<T> {
    type Code = T;

    fn quantize_vectors(&self, vectors: &[Vec<f32>]) -> Result<Vec<Vec<T>>> {
        batch_dimension(vectors)?;
        Ok(vectors
            .iter()
            .map(|row| row.iter().map(|&v| self.quantize_value(v)).collect())
            .collect())
    }

    fn bit_width(&self) -> u32 {
        T::BITS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_and_truncate() {
        let batch = vec![vec![1.4, 1.5, -1.5, -2.7, 300.0]];

        let rounded = NaiveQuantizer::<i8>::new().quantize_vectors(&batch).unwrap();
        assert_eq!(rounded, vec![vec![1, 2, -2, -3, 127]]);

        let truncated = NaiveQuantizer::<i8>::with_rounding(RoundingMode::Truncate)
            .quantize_vectors(&batch)
            .unwrap();
        assert_eq!(truncated, vec![vec![1, 1, -1, -2, 127]]);
    }

    #[test]
    fn test_empty_and_ragged() {
        let quantizer = NaiveQuantizer::<i16>::new();
        assert!(quantizer.quantize_vectors(&[]).unwrap().is_empty());
        assert_eq!(quantizer.bit_width(), 16);

        let ragged = vec![vec![1.0], vec![1.0, 2.0]];
        assert!(
            quantizer
                .quantize_vectors(&ragged)
                .unwrap_err()
                .is_invalid_argument()
        );
    }
}
