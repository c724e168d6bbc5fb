//! Low-precision quantizer parameterized over its code type.

use std::marker::PhantomData;

use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{LpqError, Result};
use crate::quantization::affine::AffineParams;
use crate::quantization::config::{QuantizationStrategy, QuantizerConfig, StatisticsGranularity};
use crate::quantization::distributional::DistributionParams;
use crate::quantization::stats;
use crate::vector::batch::batch_dimension;
use crate::vector::element::{Element, QuantizedElement};

/// A transformation from float vectors to narrower codes.
pub trait Quantizer: Send + Sync {
    /// Element type of the produced vectors.
    type Code: Element;

    /// Quantize a rectangular batch. An empty batch yields an empty result.
    fn quantize_vectors(&self, vectors: &[Vec<f32>]) -> Result<Vec<Vec<Self::Code>>>;

    /// Width in bits of each produced code.
    fn bit_width(&self) -> u32;
}

/// Parameter table derived from one batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterTable {
    /// One entry per dimension.
    Affine(Vec<AffineParams>),
    /// One entry per dimension.
    PerDimension(Vec<DistributionParams>),
    /// One entry per row of the fitted batch.
    PerVector(Vec<DistributionParams>),
}

/// Quantization parameters fitted for code type `T`.
///
/// Produced by [`LowPrecisionQuantizer::fit`]. Nothing retains these unless
/// the caller keeps them.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizationParams<T> {
    table: ParameterTable,
    dimension: Option<usize>,
    rows: usize,
    parallel_threshold: usize,
    _code: PhantomData<fn() -> T>,
}

impl<T: QuantizedElement> QuantizationParams<T> {
    /// The parameter table.
    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    /// Dimension of the fitted batch, or `None` if it was empty.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Number of rows in the fitted batch.
    pub fn fitted_rows(&self) -> usize {
        self.rows
    }

    /// Width of the codes these parameters produce.
    pub fn bit_width(&self) -> u32 {
        T::BITS
    }

    fn check_shape(&self, rows: usize, dimension: Option<usize>) -> Result<()> {
        if rows == 0 {
            return Ok(());
        }
        if self.dimension.is_some() && self.dimension != dimension {
            return Err(LpqError::invalid_argument(format!(
                "batch dimension {:?} does not match fitted dimension {:?}",
                dimension, self.dimension
            )));
        }
        match &self.table {
            ParameterTable::PerVector(params) if params.len() != rows => {
                Err(LpqError::invalid_argument(format!(
                    "per-vector parameters were fitted on {} rows, got {rows}",
                    params.len()
                )))
            }
            _ if self.dimension.is_none() => Err(LpqError::invalid_argument(
                "parameters were fitted on an empty batch",
            )),
            _ => Ok(()),
        }
    }

    fn map_rows<S, D, F>(&self, batch: &[Vec<S>], f: F) -> Vec<Vec<D>>
    where
        S: Copy + Sync,
        D: Send,
        F: Fn(usize, usize, S) -> D + Sync + Send,
    {
        let map_row = |(row, values): (usize, &Vec<S>)| {
            values
                .iter()
                .enumerate()
                .map(|(dim, &v)| f(row, dim, v))
                .collect::<Vec<D>>()
        };

        if batch.len() >= self.parallel_threshold {
            batch.par_iter().enumerate().map(map_row).collect()
        } else {
            batch.iter().enumerate().map(map_row).collect()
        }
    }

    /// Encode a batch with these parameters.
    ///
    /// Affine and per-dimension parameters accept any batch of the fitted
    /// dimension. Per-vector parameters only accept a batch with the fitted
    /// row count.
    pub fn encode(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<T>>> {
        let dimension = batch_dimension(batch)?;
        self.check_shape(batch.len(), dimension)?;

        let codes = match &self.table {
            ParameterTable::Affine(params) => {
                self.map_rows(batch, |_, dim, v| params[dim].encode::<T>(v))
            }
            ParameterTable::PerDimension(params) => {
                self.map_rows(batch, |_, dim, v| params[dim].encode::<T>(v))
            }
            ParameterTable::PerVector(params) => {
                self.map_rows(batch, |row, _, v| params[row].encode::<T>(v))
            }
        };
        Ok(codes)
    }

    /// Map codes back to approximate float values.
    pub fn decode(&self, codes: &[Vec<T>]) -> Result<Vec<Vec<f32>>> {
        let dimension = batch_dimension(codes)?;
        self.check_shape(codes.len(), dimension)?;

        let values = match &self.table {
            ParameterTable::Affine(params) => {
                self.map_rows(codes, |_, dim, c| params[dim].decode(c))
            }
            ParameterTable::PerDimension(params) => {
                self.map_rows(codes, |_, dim, c| params[dim].decode(c))
            }
            ParameterTable::PerVector(params) => {
                self.map_rows(codes, |row, _, c| params[row].decode(c))
            }
        };
        Ok(values)
    }
}

/// Quantizer producing `T` codes with the affine or distributional rule.
///
/// The bit width is fixed by `T` (`i8` or `i16`).
#[derive(Debug, Clone)]
pub struct LowPrecisionQuantizer<T> {
    config: QuantizerConfig,
    _code: PhantomData<fn() -> T>,
}

impl<T: QuantizedElement> Default for LowPrecisionQuantizer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: QuantizedElement> LowPrecisionQuantizer<T> {
    /// Create a quantizer with the default (per-vector distributional) configuration.
    pub fn new() -> Self {
        Self::with_config(QuantizerConfig::default())
    }

    /// Create a quantizer with the given configuration.
    pub fn with_config(config: QuantizerConfig) -> Self {
        Self {
            config,
            _code: PhantomData,
        }
    }

    /// The quantizer configuration.
    pub fn config(&self) -> &QuantizerConfig {
        &self.config
    }

    /// Width in bits of each code.
    pub fn bit_width(&self) -> u32 {
        T::BITS
    }

    /// Derive quantization parameters from `vectors`.
    pub fn fit(&self, vectors: &[Vec<f32>]) -> Result<QuantizationParams<T>> {
        let dimension = batch_dimension(vectors)?;
        let d = dimension.unwrap_or(0);
        let parallel = self.config.is_parallel(vectors.len());

        let table = match self.config.strategy {
            QuantizationStrategy::Affine => ParameterTable::Affine(
                stats::per_dimension_min_max(vectors, d, parallel)
                    .into_iter()
                    .map(AffineParams::from_range::<T>)
                    .collect(),
            ),
            QuantizationStrategy::Distributional {
                granularity: StatisticsGranularity::PerDimension,
            } => ParameterTable::PerDimension(
                stats::per_dimension_mean_std(vectors, d, parallel)
                    .into_iter()
                    .map(DistributionParams::from)
                    .collect(),
            ),
            QuantizationStrategy::Distributional {
                granularity: StatisticsGranularity::PerVector,
            } => ParameterTable::PerVector(
                stats::per_vector_mean_std(vectors, parallel)
                    .into_iter()
                    .map(DistributionParams::from)
                    .collect(),
            ),
        };

        debug!(
            "fitted {} {} parameters on {} rows x {} dims (parallel: {})",
            T::NAME,
            self.config.strategy.name(),
            vectors.len(),
            d,
            parallel
        );

        Ok(QuantizationParams {
            table,
            dimension,
            rows: vectors.len(),
            parallel_threshold: self.config.parallel_threshold,
            _code: PhantomData,
        })
    }

    /// Quantize `vectors` and return the codes together with the parameters
    /// that produced them.
    pub fn quantize_with_params(
        &self,
        vectors: &[Vec<f32>],
    ) -> Result<(Vec<Vec<T>>, QuantizationParams<T>)> {
        // Statistics are complete before any row is encoded.
        let params = self.fit(vectors)?;
        let codes = params.encode(vectors)?;
        Ok((codes, params))
    }

    /// Quantize `vectors` using parameters derived from the same batch.
    pub fn quantize_vectors(&self, vectors: &[Vec<f32>]) -> Result<Vec<Vec<T>>> {
        if vectors.is_empty() {
            return Ok(Vec::new());
        }
        self.quantize_with_params(vectors).map(|(codes, _)| codes)
    }

    /// Encode queries so they are comparable with a dataset encoded by `params`.
    ///
    /// Affine and per-dimension parameters are reused as is. Per-vector
    /// parameters describe individual rows, so each query gets its own.
    pub fn quantize_queries(
        &self,
        params: &QuantizationParams<T>,
        queries: &[Vec<f32>],
    ) -> Result<Vec<Vec<T>>> {
        match params.table() {
            ParameterTable::PerVector(_) => self.quantize_vectors(queries),
            _ => params.encode(queries),
        }
    }
}

impl<T: QuantizedElement> Quantizer for LowPrecisionQuantizer<T> {
    type Code = T;

    fn quantize_vectors(&self, vectors: &[Vec<f32>]) -> Result<Vec<Vec<T>>> {
        LowPrecisionQuantizer::quantize_vectors(self, vectors)
    }

    fn bit_width(&self) -> u32 {
        T::BITS
    }
}

/// Quantized batch whose code width was chosen at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuantizedVectors {
    Int8(Vec<Vec<i8>>),
    Int16(Vec<Vec<i16>>),
}

impl QuantizedVectors {
    /// Number of vectors.
    pub fn len(&self) -> usize {
        match self {
            QuantizedVectors::Int8(v) => v.len(),
            QuantizedVectors::Int16(v) => v.len(),
        }
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width in bits of each code.
    pub fn bit_width(&self) -> u32 {
        match self {
            QuantizedVectors::Int8(_) => 8,
            QuantizedVectors::Int16(_) => 16,
        }
    }
}

/// A [`LowPrecisionQuantizer`] whose bit width is chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnyQuantizer {
    Int8(LowPrecisionQuantizer<i8>),
    Int16(LowPrecisionQuantizer<i16>),
}

impl AnyQuantizer {
    /// Create a quantizer for `bit_width` (8 or 16).
    pub fn new(bit_width: u32, config: QuantizerConfig) -> Result<Self> {
        match bit_width {
            8 => Ok(AnyQuantizer::Int8(LowPrecisionQuantizer::with_config(config))),
            16 => Ok(AnyQuantizer::Int16(LowPrecisionQuantizer::with_config(config))),
            _ => Err(LpqError::invalid_argument(format!(
                "unsupported bit width {bit_width}: expected 8 or 16"
            ))),
        }
    }

    /// Width in bits of each code.
    pub fn bit_width(&self) -> u32 {
        match self {
            AnyQuantizer::Int8(q) => q.bit_width(),
            AnyQuantizer::Int16(q) => q.bit_width(),
        }
    }

    /// Quantize `vectors` using parameters derived from the same batch.
    pub fn quantize_vectors(&self, vectors: &[Vec<f32>]) -> Result<QuantizedVectors> {
        match self {
            AnyQuantizer::Int8(q) => q.quantize_vectors(vectors).map(QuantizedVectors::Int8),
            AnyQuantizer::Int16(q) => q.quantize_vectors(vectors).map(QuantizedVectors::Int16),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, Normal};

    use super::*;

    fn gaussian_batch(rows: usize, dims: usize, seed: u64) -> Vec<Vec<f32>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(20.0f32, 3.0).unwrap();
        (0..rows)
            .map(|_| (0..dims).map(|_| normal.sample(&mut rng)).collect())
            .collect()
    }

    #[test]
    fn test_affine_boundary_saturation() {
        let quantizer = LowPrecisionQuantizer::<i8>::with_config(QuantizerConfig::affine());
        let (codes, params) = quantizer
            .quantize_with_params(&[vec![-10.0, 0.0, 10.0]])
            .unwrap();

        assert_eq!(codes[0][0], i8::MIN);
        assert_eq!(codes[0][2], i8::MAX);
        match params.table() {
            ParameterTable::Affine(p) => {
                assert_eq!(p.len(), 3);
                for entry in p {
                    assert!((-128..=127).contains(&entry.zero_point));
                }
            }
            other => panic!("unexpected table {other:?}"),
        }
    }

    #[test]
    fn test_affine_scale_over_column() {
        let quantizer = LowPrecisionQuantizer::<i8>::with_config(QuantizerConfig::affine());
        let params = quantizer
            .fit(&[vec![-10.0], vec![0.0], vec![10.0]])
            .unwrap();
        let ParameterTable::Affine(p) = params.table() else {
            panic!("expected affine parameters");
        };
        assert!((p[0].scale - 20.0 / 255.0).abs() < 1e-12);
        assert!((p[0].scale - 0.0784).abs() < 1e-4);
        assert_eq!(p[0].zero_point, 0);

        let codes = params.encode(&[vec![-10.0], vec![0.0], vec![10.0]]).unwrap();
        assert_eq!(codes, vec![vec![i8::MIN], vec![0], vec![i8::MAX]]);
    }

    #[test]
    fn test_affine_decode_within_one_scale() {
        let batch = gaussian_batch(50, 16, 7);
        for quantizer in [
            LowPrecisionQuantizer::<i8>::with_config(QuantizerConfig::affine()),
            LowPrecisionQuantizer::<i8>::with_config(
                QuantizerConfig::affine().with_parallel_threshold(0),
            ),
        ] {
            let (codes, params) = quantizer.quantize_with_params(&batch).unwrap();
            let decoded = params.decode(&codes).unwrap();
            let ParameterTable::Affine(p) = params.table() else {
                panic!("expected affine parameters");
            };

            for (row, original) in batch.iter().enumerate() {
                for (dim, &value) in original.iter().enumerate() {
                    assert!(f64::from((decoded[row][dim] - value).abs()) <= p[dim].scale);
                }
            }
        }
    }

    #[test]
    fn test_per_vector_matches_row_statistics() {
        let batch = gaussian_batch(10, 50, 42);
        let quantizer = LowPrecisionQuantizer::<i8>::new();
        let codes = quantizer.quantize_vectors(&batch).unwrap();

        for (row, values) in batch.iter().enumerate() {
            let stats = stats::MeanStd::from_values(values.iter().copied());
            let params = DistributionParams::from(stats);
            for (dim, &value) in values.iter().enumerate() {
                assert_eq!(codes[row][dim], params.encode::<i8>(value));
            }
        }
    }

    #[test]
    fn test_distributional_decode_within_step() {
        let batch = gaussian_batch(40, 8, 3);
        let quantizer = LowPrecisionQuantizer::<i16>::with_config(
            QuantizerConfig::distributional(StatisticsGranularity::PerDimension),
        );
        let (codes, params) = quantizer.quantize_with_params(&batch).unwrap();
        let decoded = params.decode(&codes).unwrap();
        let ParameterTable::PerDimension(p) = params.table() else {
            panic!("expected per-dimension parameters");
        };

        for (row, values) in batch.iter().enumerate() {
            for (dim, &value) in values.iter().enumerate() {
                let param = p[dim];
                if (value - param.mean).abs() <= param.std_dev {
                    let step = 2.0 * param.std_dev / 65536.0;
                    assert!((decoded[row][dim] - value).abs() <= step + 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_empty_batch() {
        let batch: Vec<Vec<f32>> = Vec::new();
        assert!(
            LowPrecisionQuantizer::<i8>::new()
                .quantize_vectors(&batch)
                .unwrap()
                .is_empty()
        );
        assert!(
            LowPrecisionQuantizer::<i16>::with_config(QuantizerConfig::affine())
                .quantize_vectors(&batch)
                .unwrap()
                .is_empty()
        );
        assert!(
            AnyQuantizer::new(8, QuantizerConfig::default())
                .unwrap()
                .quantize_vectors(&batch)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_ragged_batch_rejected() {
        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        let err = LowPrecisionQuantizer::<i8>::new()
            .quantize_vectors(&ragged)
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_bit_width_fixed() {
        assert_eq!(LowPrecisionQuantizer::<i8>::new().bit_width(), 8);
        assert_eq!(LowPrecisionQuantizer::<i16>::new().bit_width(), 16);

        let quantizer = AnyQuantizer::new(16, QuantizerConfig::affine()).unwrap();
        assert_eq!(quantizer.bit_width(), 16);
        let codes = quantizer.quantize_vectors(&[vec![1.0, 2.0]]).unwrap();
        assert_eq!(codes.bit_width(), 16);
        assert_eq!(quantizer.bit_width(), 16);

        assert!(
            AnyQuantizer::new(4, QuantizerConfig::default())
                .unwrap_err()
                .is_invalid_argument()
        );
    }

    #[test]
    fn test_reuse_dataset_params_for_queries() {
        let dataset = gaussian_batch(30, 4, 11);
        let queries = gaussian_batch(5, 4, 12);
        let quantizer = LowPrecisionQuantizer::<i8>::with_config(QuantizerConfig::affine());

        let params = quantizer.fit(&dataset).unwrap();
        let encoded = params.encode(&queries).unwrap();
        assert_eq!(encoded.len(), 5);

        assert!(params.encode(&[vec![1.0, 2.0]]).is_err());

        let per_vector = LowPrecisionQuantizer::<i8>::new().fit(&dataset).unwrap();
        assert_eq!(per_vector.fitted_rows(), 30);
        assert!(per_vector.encode(&queries).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_quantize_queries() {
        let dataset = gaussian_batch(30, 4, 11);
        let queries = gaussian_batch(5, 4, 12);

        let affine = LowPrecisionQuantizer::<i8>::with_config(QuantizerConfig::affine());
        let params = affine.fit(&dataset).unwrap();
        assert_eq!(
            affine.quantize_queries(&params, &queries).unwrap(),
            params.encode(&queries).unwrap()
        );

        let per_vector = LowPrecisionQuantizer::<i8>::new();
        let params = per_vector.fit(&dataset).unwrap();
        assert_eq!(
            per_vector.quantize_queries(&params, &queries).unwrap(),
            per_vector.quantize_vectors(&queries).unwrap()
        );
    }
}
