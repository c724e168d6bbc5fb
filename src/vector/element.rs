//! Numeric element types that vectors may be stored as.
//!
//! Raw vectors use `f32`. Quantized vectors use a fixed-width signed integer
//! whose code range is carried as associated constants, so a single generic
//! quantizer or index serves both widths.

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::util::simd;

/// A scalar that can appear in a stored or query vector.
///
/// Distance kernels accumulate in `f32` regardless of the element type.
pub trait Element:
    Copy + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Short type name used in logs and reports.
    const NAME: &'static str;

    /// Widen to `f32`.
    fn to_f32(self) -> f32;

    /// Sum of squared elementwise differences.
    fn squared_euclidean(a: &[Self], b: &[Self]) -> f32 {
        a.iter()
            .zip(b)
            .map(|(&x, &y)| {
                let diff = x.to_f32() - y.to_f32();
                diff * diff
            })
            .sum()
    }

    /// Inner product.
    fn dot(a: &[Self], b: &[Self]) -> f32 {
        a.iter().zip(b).map(|(&x, &y)| x.to_f32() * y.to_f32()).sum()
    }

    /// Sum of squares.
    fn squared_norm(v: &[Self]) -> f32 {
        v.iter()
            .map(|&x| {
                let x = x.to_f32();
                x * x
            })
            .sum()
    }
}

impl Element for f32 {
    const NAME: &'static str = "f32";

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    fn squared_euclidean(a: &[Self], b: &[Self]) -> f32 {
        simd::squared_euclidean_simd(a, b)
    }

    fn dot(a: &[Self], b: &[Self]) -> f32 {
        simd::dot_product_simd(a, b)
    }

    fn squared_norm(v: &[Self]) -> f32 {
        simd::squared_norm_simd(v)
    }
}

/// A fixed-width signed integer code produced by quantization.
pub trait QuantizedElement: Element + Ord {
    /// Width of the code in bits.
    const BITS: u32;
    /// Most negative representable code.
    const QMIN: Self;
    /// Most positive representable code.
    const QMAX: Self;

    /// Convert an already-rounded value to a code, saturating at the type range.
    /// NaN maps to zero.
    fn saturating_from_f32(value: f32) -> Self;

    /// `QMIN` widened to `f32`.
    fn qmin_f32() -> f32 {
        Self::QMIN.to_f32()
    }

    /// `QMAX` widened to `f32`.
    fn qmax_f32() -> f32 {
        Self::QMAX.to_f32()
    }
}

macro_rules! impl_quantized_element {
    ($ty:ty, $name:literal, $bits:literal) => {
        impl Element for $ty {
            const NAME: &'static str = $name;

            #[inline]
            fn to_f32(self) -> f32 {
                self as f32
            }
        }

        impl QuantizedElement for $ty {
            const BITS: u32 = $bits;
            const QMIN: Self = <$ty>::MIN;
            const QMAX: Self = <$ty>::MAX;

            #[inline]
            fn saturating_from_f32(value: f32) -> Self {
                if value.is_nan() {
                    return 0;
                }
                value.clamp(<$ty>::MIN as f32, <$ty>::MAX as f32) as $ty
            }
        }
    };
}

impl_quantized_element!(i8, "i8", 8);
impl_quantized_element!(i16, "i16", 16);
