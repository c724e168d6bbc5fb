//! SIMD kernels for f32 slices using the `wide` crate.
//!
//! Each kernel processes eight lanes at a time and folds the scalar tail.
//! Callers are responsible for passing slices of equal length.

use wide::f32x8;

const LANES: usize = 8;

#[inline]
fn load(chunk: &[f32]) -> f32x8 {
    f32x8::new([
        chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
    ])
}

#[inline]
fn horizontal_sum(v: f32x8) -> f32 {
    v.to_array().iter().sum::<f32>()
}

/// SIMD-optimized dot product.
pub fn dot_product_simd(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut sum = f32x8::splat(0.0);
    let a_chunks = a.chunks_exact(LANES);
    let b_chunks = b.chunks_exact(LANES);
    let a_tail = a_chunks.remainder();
    let b_tail = b_chunks.remainder();

    for (x, y) in a_chunks.zip(b_chunks) {
        sum += load(x) * load(y);
    }

    let mut result = horizontal_sum(sum);
    for (x, y) in a_tail.iter().zip(b_tail) {
        result += x * y;
    }
    result
}

/// SIMD-optimized sum of squared differences (L2 distance, not square-rooted).
pub fn squared_euclidean_simd(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut sum = f32x8::splat(0.0);
    let a_chunks = a.chunks_exact(LANES);
    let b_chunks = b.chunks_exact(LANES);
    let a_tail = a_chunks.remainder();
    let b_tail = b_chunks.remainder();

    for (x, y) in a_chunks.zip(b_chunks) {
        let diff = load(x) - load(y);
        sum += diff * diff;
    }

    let mut result = horizontal_sum(sum);
    for (x, y) in a_tail.iter().zip(b_tail) {
        let diff = x - y;
        result += diff * diff;
    }
    result
}

/// SIMD-optimized sum of squares.
pub fn squared_norm_simd(vector: &[f32]) -> f32 {
    let mut sum = f32x8::splat(0.0);
    let chunks = vector.chunks_exact(LANES);
    let tail = chunks.remainder();

    for chunk in chunks {
        let v = load(chunk);
        sum += v * v;
    }

    let mut result = horizontal_sum(sum);
    for &val in tail {
        result += val * val;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product_simd() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let b = vec![8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 2.0];

        let result = dot_product_simd(&a, &b);
        let expected: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();

        assert!((result - expected).abs() < 1e-4);
    }

    #[test]
    fn test_squared_euclidean_simd_matches_scalar() {
        let a: Vec<f32> = (0..19).map(|i| i as f32 * 0.5).collect();
        let b: Vec<f32> = (0..19).map(|i| (19 - i) as f32 * 0.25).collect();

        let expected: f32 = a.iter().zip(&b).map(|(x, y)| (x - y) * (x - y)).sum();
        assert!((squared_euclidean_simd(&a, &b) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_squared_norm_short_vector() {
        assert_eq!(squared_norm_simd(&[3.0, 4.0]), 25.0);
        assert_eq!(squared_norm_simd(&[]), 0.0);
    }
}
