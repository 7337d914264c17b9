//! ONNX Runtime backed predictor, for sequence models exported to `.onnx`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, ensure};
use ndarray::{Array3, CowArray};
use ort::{Environment, GraphOptimizationLevel, Session, SessionBuilder, Value};

use crate::analysis::windowing::WindowBatch;
use crate::inference::predictor::Predictor;

pub struct OnnxPredictor {
    session: Session,
    model_path: String,
}

impl OnnxPredictor {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let environment = Arc::new(
            Environment::builder()
                .with_name("stock_trend")
                .build()
                .context("Failed to initialise ONNX Runtime")?,
        );

        let session = SessionBuilder::new(&environment)
            .context("Failed to create ONNX session builder")?
            .with_optimization_level(GraphOptimizationLevel::Level1)
            .context("Failed to set optimization level")?
            .with_model_from_file(path)
            .with_context(|| format!("Failed to load ONNX model: {}", path.display()))?;

        log::info!("ONNX model loaded: {}", path.display());

        Ok(Self {
            session,
            model_path: path.display().to_string(),
        })
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, batch: &WindowBatch<'_>) -> Result<Vec<f64>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let flat: Vec<f32> = batch.flatten().into_iter().map(|v| v as f32).collect();
        let input = Array3::from_shape_vec((batch.len(), batch.lookback, 1), flat)
            .context("Window batch does not match (count, lookback, 1)")?;
        let input = CowArray::from(input.into_dyn());

        let tensor = Value::from_array(self.session.allocator(), &input)
            .context("Failed to build input tensor")?;
        let outputs = self
            .session
            .run(vec![tensor])
            .context("ONNX inference failed")?;

        let first = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let extracted = first
            .try_extract::<f32>()
            .context("model output is not an f32 tensor")?;
        let view = extracted.view();

        // (count, 1) or (count,)
        ensure!(
            view.len() == batch.len(),
            "model output has {} values for {} windows (shape {:?})",
            view.len(),
            batch.len(),
            view.shape()
        );

        Ok(view.iter().map(|v| f64::from(*v)).collect())
    }

    fn describe(&self) -> String {
        format!("ONNX model ({})", self.model_path)
    }
}
