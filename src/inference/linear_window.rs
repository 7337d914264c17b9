use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::analysis::windowing::WindowBatch;
use crate::inference::predictor::Predictor;

/// Value of the `format` field every artifact must carry.
pub const LINEAR_WINDOW_FORMAT: &str = "linear-window/v1";

/// Exported dense head over a single window: `bias + Σ weights[j] * window[j]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinearWindowModel {
    pub format: String,
    #[serde(default)]
    pub description: String,
    pub lookback: usize,
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}

impl LinearWindowModel {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact: {}", path.display()))?;
        let model: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse model artifact: {}", path.display()))?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        if self.format != LINEAR_WINDOW_FORMAT {
            bail!(
                "unsupported artifact format '{}', expected '{}'",
                self.format,
                LINEAR_WINDOW_FORMAT
            );
        }
        ensure!(
            self.weights.len() == self.lookback,
            "artifact has {} weights for a lookback of {}",
            self.weights.len(),
            self.lookback
        );
        ensure!(
            self.weights.iter().all(|w| w.is_finite()) && self.bias.is_finite(),
            "artifact contains non-finite parameters"
        );
        Ok(())
    }
}

impl Predictor for LinearWindowModel {
    fn predict(&self, batch: &WindowBatch<'_>) -> Result<Vec<f64>> {
        ensure!(
            batch.lookback == self.lookback,
            "model expects windows of {} but got {}",
            self.lookback,
            batch.lookback
        );

        batch
            .windows
            .iter()
            .enumerate()
            .map(|(i, window)| {
                ensure!(
                    window.len() == self.weights.len(),
                    "window {} has length {}",
                    i,
                    window.len()
                );
                Ok(self.bias
                    + window
                        .iter()
                        .zip(&self.weights)
                        .map(|(x, w)| x * w)
                        .sum::<f64>())
            })
            .collect()
    }

    fn describe(&self) -> String {
        if self.description.is_empty() {
            format!("linear window model ({} weights)", self.weights.len())
        } else {
            self.description.clone()
        }
    }

    fn expected_lookback(&self) -> Option<usize> {
        Some(self.lookback)
    }
}
