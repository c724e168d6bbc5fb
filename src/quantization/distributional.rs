//! Distribution-based (LPQ) quantization.
//!
//! Values more than one standard deviation below the mean saturate to `QMIN`,
//! more than one above saturate to `QMAX`, and values inside
//! `[mean - σ, mean + σ]` map linearly to `floor(2^(bits-1) * (value - mean) / σ)`.

use serde::{Deserialize, Serialize};

use crate::quantization::stats::MeanStd;
use crate::vector::element::QuantizedElement;

/// Mean and standard deviation of one vector or one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionParams {
    pub mean: f32,
    pub std_dev: f32,
}

impl From<MeanStd> for DistributionParams {
    fn from(stats: MeanStd) -> Self {
        Self {
            mean: stats.mean,
            std_dev: stats.std_dev,
        }
    }
}

/// `2^(bits-1)`: the number of codes per standard deviation.
#[inline]
fn codes_per_sigma<T: QuantizedElement>() -> f32 {
    (1u32 << (T::BITS - 1)) as f32
}

impl DistributionParams {
    /// Width of one code in value space: `2σ / 2^bits`.
    pub fn step<T: QuantizedElement>(&self) -> f32 {
        self.std_dev / codes_per_sigma::<T>()
    }

    /// Encode one value.
    ///
    /// With a zero standard deviation, a value equal to the mean encodes to 0
    /// and any other value saturates toward its side of the mean.
    pub fn encode<T: QuantizedElement>(&self, value: f32) -> T {
        let lower = self.mean - self.std_dev;
        let upper = self.mean + self.std_dev;

        if value < lower {
            return T::QMIN;
        }
        if value > upper {
            return T::QMAX;
        }
        if self.std_dev == 0.0 {
            return T::saturating_from_f32(0.0);
        }

        let code = (codes_per_sigma::<T>() * ((value - self.mean) / self.std_dev)).floor();
        // value == mean + σ lands one past QMAX.
        T::saturating_from_f32(code)
    }

    /// Map a code back to the midpoint of the interval it covers.
    ///
    /// Only codes for values inside one standard deviation decode within one
    /// step; saturated codes decode to the interval edge.
    pub fn decode<T: QuantizedElement>(&self, code: T) -> f32 {
        self.mean + (code.to_f32() + 0.5) * self.step::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> DistributionParams {
        DistributionParams {
            mean: 20.0,
            std_dev: 3.0,
        }
    }

    #[test]
    fn test_saturation() {
        let p = params();
        assert_eq!(p.encode::<i8>(16.9), i8::MIN);
        assert_eq!(p.encode::<i8>(23.1), i8::MAX);
        assert_eq!(p.encode::<i16>(-1000.0), i16::MIN);
        assert_eq!(p.encode::<i16>(1000.0), i16::MAX);
    }

    #[test]
    fn test_linear_region() {
        let p = params();
        assert_eq!(p.encode::<i8>(20.0), 0);
        // floor(128 * 1.5 / 3) = 64
        assert_eq!(p.encode::<i8>(21.5), 64);
        // floor(128 * -1.5 / 3) = -64
        assert_eq!(p.encode::<i8>(18.5), -64);
        // Boundaries are inside the linear region.
        assert_eq!(p.encode::<i8>(23.0), i8::MAX);
        assert_eq!(p.encode::<i8>(17.0), i8::MIN);
    }

    #[test]
    fn test_decode_within_one_step() {
        let p = params();
        let step = p.step::<i8>();
        assert!((step - 6.0 / 256.0).abs() < 1e-7);

        for i in 0..=60 {
            let value = 17.0 + i as f32 * 0.1;
            let decoded = p.decode(p.encode::<i8>(value));
            assert!(
                (decoded - value).abs() <= step,
                "value {value} decoded to {decoded}"
            );
        }
    }

    #[test]
    fn test_zero_std_dev() {
        let p = DistributionParams {
            mean: 1.0,
            std_dev: 0.0,
        };
        assert_eq!(p.encode::<i8>(1.0), 0);
        assert_eq!(p.encode::<i8>(0.5), i8::MIN);
        assert_eq!(p.encode::<i8>(1.5), i8::MAX);
    }
}
