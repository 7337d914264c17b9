use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};

use crate::error::PipelineError;
use crate::inference::linear_window::LinearWindowModel;
use crate::inference::predictor::Predictor;

/// Loads a model artifact by extension and checks it against the pipeline's
/// lookback. Any problem surfaces as `ModelLoadFailure` before inference runs.
pub fn load_predictor(path: &Path, lookback: usize) -> Result<Arc<dyn Predictor>, PipelineError> {
    let predictor = open_artifact(path).map_err(|e| PipelineError::model_load(&e))?;

    if let Some(expected) = predictor.expected_lookback() {
        if expected != lookback {
            return Err(PipelineError::ModelLoadFailure(format!(
                "{} expects a lookback of {}, pipeline uses {}",
                predictor.describe(),
                expected,
                lookback
            )));
        }
    }

    log::info!("Model ready: {}", predictor.describe());
    Ok(predictor)
}

fn open_artifact(path: &Path) -> Result<Arc<dyn Predictor>> {
    if !path.is_file() {
        bail!("model artifact not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => Ok(Arc::new(LinearWindowModel::load_from_path(path)?)),
        "onnx" => open_onnx(path),
        "h5" | "keras" => bail!(
            "Keras artifacts cannot be loaded directly, export {} to ONNX first",
            path.display()
        ),
        other => bail!("unsupported model artifact extension '{}'", other),
    }
}

#[cfg(feature = "onnx")]
fn open_onnx(path: &Path) -> Result<Arc<dyn Predictor>> {
    Ok(Arc::new(crate::inference::onnx::OnnxPredictor::load_from_path(path)?))
}

#[cfg(not(feature = "onnx"))]
fn open_onnx(path: &Path) -> Result<Arc<dyn Predictor>> {
    bail!(
        "{} needs ONNX support, rebuild with `--features onnx`",
        path.display()
    )
}
