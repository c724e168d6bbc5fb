//! Affine (range-based) quantization.
//!
//! `code = clamp(zero_point + round(value / scale), QMIN, QMAX)` with
//! `scale = (max - min) / (QMAX - QMIN)` and the range always covering zero.

use serde::{Deserialize, Serialize};

use crate::quantization::stats::MinMax;
use crate::vector::element::QuantizedElement;

/// Per-dimension affine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineParams {
    pub scale: f64,
    pub zero_point: i32,
}

impl AffineParams {
    /// Derive parameters for code type `T` from an observed range.
    ///
    /// The range is extended to include zero so that zero is encoded exactly.
    /// A range of width zero (a dimension that is zero everywhere) uses a
    /// scale of 1.
    pub fn from_range<T: QuantizedElement>(range: MinMax) -> Self {
        let min = f64::from(range.min.min(0.0));
        let max = f64::from(range.max.max(0.0));
        let qmin = f64::from(T::qmin_f32());
        let qmax = f64::from(T::qmax_f32());

        // f64 keeps symmetric ranges on exact half steps, e.g. -10 / (20 / 255) == -127.5.
        let mut scale = (max - min) / (qmax - qmin);
        if !scale.is_finite() || scale <= 0.0 {
            scale = 1.0;
        }

        let zero_point = (qmin - (min / scale).round()).clamp(qmin, qmax);

        Self {
            scale,
            zero_point: zero_point as i32,
        }
    }

    /// Encode one value.
    #[inline]
    pub fn encode<T: QuantizedElement>(&self, value: f32) -> T {
        let code = f64::from(self.zero_point) + (f64::from(value) / self.scale).round();
        T::saturating_from_f32(code as f32)
    }

    /// Map a code back to the float it represents.
    #[inline]
    pub fn decode<T: QuantizedElement>(&self, code: T) -> f32 {
        ((f64::from(code.to_f32()) - f64::from(self.zero_point)) * self.scale) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_range_int8() {
        let params = AffineParams::from_range::<i8>(MinMax {
            min: -10.0,
            max: 10.0,
        });
        assert!((params.scale - 20.0 / 255.0).abs() < 1e-12);
        assert_eq!(params.zero_point, 0);

        assert_eq!(params.encode::<i8>(-10.0), i8::MIN);
        assert_eq!(params.encode::<i8>(10.0), i8::MAX);
        assert_eq!(params.encode::<i8>(0.0), params.zero_point as i8);
        assert_eq!(params.decode(params.encode::<i8>(0.0)), 0.0);
        let restored = params.decode(params.encode::<i8>(10.0));
        assert!(f64::from((restored - 10.0).abs()) <= params.scale);
    }

    #[test]
    fn test_range_extended_to_zero() {
        let params = AffineParams::from_range::<i8>(MinMax { min: 5.0, max: 10.0 });
        // min is pulled down to 0, so zero lands on QMIN.
        assert!((params.scale - 10.0 / 255.0).abs() < 1e-12);
        assert_eq!(params.zero_point, -128);
        assert_eq!(params.encode::<i8>(0.0), -128);
        assert_eq!(params.encode::<i8>(10.0), 127);
    }

    #[test]
    fn test_int16_uses_own_range() {
        let params = AffineParams::from_range::<i16>(MinMax {
            min: -1.0,
            max: 1.0,
        });
        assert_eq!(params.encode::<i16>(1.0), i16::MAX);
        assert_eq!(params.encode::<i16>(-1.0), i16::MIN);
        assert_eq!(params.encode::<i16>(100.0), i16::MAX);
        let decoded = params.decode(params.encode::<i16>(0.25));
        assert!(f64::from((decoded - 0.25).abs()) <= params.scale);
        assert_eq!(params.zero_point, 0);
    }

    #[test]
    fn test_degenerate_range() {
        let params = AffineParams::from_range::<i8>(MinMax { min: 0.0, max: 0.0 });
        assert_eq!(params.scale, 1.0);
        assert_eq!(params.decode(params.encode::<i8>(0.0)), 0.0);
    }
}
