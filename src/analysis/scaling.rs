use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::utils::maths_utils;

/// Fitted min-max transform onto `[0, 1]` for a single column.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    pub data_min: f64,
    pub data_max: f64,
}

impl MinMaxScaler {
    /// Fails with `DegenerateScale` when the sample is empty, non-finite or constant.
    pub fn fit(data: &[f64]) -> Result<Self, PipelineError> {
        let Some((data_min, data_max)) = maths_utils::get_min_max(data) else {
            return Err(PipelineError::DegenerateScale {
                min: f64::NAN,
                max: f64::NAN,
            });
        };

        let range = data_max - data_min;
        if !range.is_finite() || range <= 0.0 || data.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::DegenerateScale {
                min: data_min,
                max: data_max,
            });
        }

        Ok(Self { data_min, data_max })
    }

    pub fn fit_transform(data: &[f64]) -> Result<(Self, Vec<f64>), PipelineError> {
        let scaler = Self::fit(data)?;
        let scaled = scaler.transform(data);
        Ok((scaler, scaled))
    }

    pub fn range(&self) -> f64 {
        self.data_max - self.data_min
    }

    /// Multiplier applied after the offset: `1 / (max - min)`.
    pub fn scale(&self) -> f64 {
        1.0 / self.range()
    }

    /// Additive term of the forward map: `-min * scale`.
    pub fn min_offset(&self) -> f64 {
        -self.data_min * self.scale()
    }

    pub fn transform_value(&self, x: f64) -> f64 {
        (x - self.data_min) / self.range()
    }

    pub fn transform(&self, data: &[f64]) -> Vec<f64> {
        data.iter().map(|&x| self.transform_value(x)).collect()
    }

    /// Exact inverse: `y * (max - min) + min`.
    pub fn inverse_transform(&self, data: &[f64]) -> Vec<f64> {
        data.iter()
            .map(|&y| y * self.range() + self.data_min)
            .collect()
    }

    /// Factor-only inverse, `y * (1 / scale)`. Drops the min offset, so every
    /// value comes back exactly `data_min` too low. Only close to the true
    /// prices when `data_min` is negligible.
    pub fn approximate_inverse(&self, data: &[f64]) -> Vec<f64> {
        let factor = 1.0 / self.scale();
        data.iter().map(|&y| y * factor).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_maps_onto_unit_interval() {
        let (scaler, scaled) = MinMaxScaler::fit_transform(&[10.0, 15.0, 20.0]).unwrap();
        assert_eq!(scaled, vec![0.0, 0.5, 1.0]);
        assert!((scaler.scale() - 0.1).abs() < 1e-12);
        assert!((scaler.min_offset() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_is_degenerate() {
        let err = MinMaxScaler::fit(&[42.0; 50]).unwrap_err();
        assert_eq!(err, PipelineError::DegenerateScale { min: 42.0, max: 42.0 });
        assert!(MinMaxScaler::fit(&[]).is_err());
    }

    #[test]
    fn exact_inverse_round_trips() {
        let data = [101.5, 99.0, 130.25, 87.0];
        let scaler = MinMaxScaler::fit(&data).unwrap();
        let restored = scaler.inverse_transform(&scaler.transform(&data));
        for (a, b) in data.iter().zip(&restored) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn approximate_inverse_is_close_when_min_is_near_zero() {
        let data = [0.0001, 0.5, 1.25, 2.0];
        let scaler = MinMaxScaler::fit(&data).unwrap();
        let restored = scaler.approximate_inverse(&scaler.transform(&data));
        for (a, b) in data.iter().zip(&restored) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn approximate_inverse_is_off_by_exactly_min() {
        let data = [150.0, 175.0, 200.0];
        let scaler = MinMaxScaler::fit(&data).unwrap();
        let restored = scaler.approximate_inverse(&scaler.transform(&data));
        for (a, b) in data.iter().zip(&restored) {
            assert!((a - b - 150.0).abs() < 1e-9);
        }
    }
}
