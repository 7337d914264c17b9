use anyhow::Result;

use crate::analysis::windowing::WindowBatch;

/// Narrow contract over a pretrained sequence model: a batch of
/// `(count, lookback, 1)` scaled windows in, one scaled price per window out.
pub trait Predictor: Send + Sync {
    fn predict(&self, batch: &WindowBatch<'_>) -> Result<Vec<f64>>;

    /// Short label for logs and the UI ("linear window model (100 weights)").
    fn describe(&self) -> String;

    /// Window length the model was built for, when the artifact records it.
    fn expected_lookback(&self) -> Option<usize> {
        None
    }
}

/// Predicts the mean of each window. Stand-in for a real model in tests and
/// `--stub-model` runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowMeanPredictor;

impl Predictor for WindowMeanPredictor {
    fn predict(&self, batch: &WindowBatch<'_>) -> Result<Vec<f64>> {
        Ok(batch
            .windows
            .iter()
            .map(|w| {
                if w.is_empty() {
                    0.0
                } else {
                    w.iter().sum::<f64>() / w.len() as f64
                }
            })
            .collect())
    }

    fn describe(&self) -> String {
        "window mean stub".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_mean_per_window() {
        let windows = vec![vec![0.0, 1.0], vec![0.5, 0.5], vec![1.0, 0.0]];
        let batch = WindowBatch {
            lookback: 2,
            windows: &windows,
        };
        assert_eq!(WindowMeanPredictor.predict(&batch).unwrap(), vec![0.5; 3]);
    }
}
