use itertools::{Itertools, izip};
use serde::{Deserialize, Serialize};

/// Error metrics of predicted vs actual prices.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionMetrics {
    pub mae: f64,
    pub rmse: f64,
    /// Percent, skipping zero actuals
    pub mape: f64,
    /// Share of day-over-day moves (up, flat or down) the prediction got right, 0..=1
    pub directional_accuracy: f64,
}

impl PredictionMetrics {
    /// `None` when the inputs are empty or of different lengths.
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Option<Self> {
        if actual.is_empty() || actual.len() != predicted.len() {
            return None;
        }
        let n = actual.len() as f64;

        let mae = izip!(actual, predicted)
            .map(|(a, p)| (a - p).abs())
            .sum::<f64>()
            / n;
        let rmse = (izip!(actual, predicted)
            .map(|(a, p)| (a - p).powi(2))
            .sum::<f64>()
            / n)
            .sqrt();

        let pct_errors: Vec<f64> = izip!(actual, predicted)
            .filter(|(a, _)| **a != 0.0)
            .map(|(a, p)| ((a - p) / a).abs() * 100.0)
            .collect();
        let mape = if pct_errors.is_empty() {
            0.0
        } else {
            pct_errors.iter().sum::<f64>() / pct_errors.len() as f64
        };

        let moves: Vec<bool> = izip!(
            actual.iter().tuple_windows::<(_, _)>(),
            predicted.iter().tuple_windows::<(_, _)>()
        )
        .map(|((a0, a1), (p0, p1))| (a1 - a0).partial_cmp(&0.0) == (p1 - p0).partial_cmp(&0.0))
        .collect();
        let directional_accuracy = if moves.is_empty() {
            0.0
        } else {
            moves.iter().filter(|hit| **hit).count() as f64 / moves.len() as f64
        };

        Some(Self {
            mae,
            rmse,
            mape,
            directional_accuracy,
        })
    }
}
