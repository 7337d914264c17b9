use std::fmt;

/// User-visible failures of the dashboard pipeline.
///
/// Every variant is non-fatal for the session: it disables only the feature
/// that depends on the failed step.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Ticker unknown, empty result, or provider unreachable
    DataUnavailable(String),
    /// Not enough points to build a single window in the training split or evaluation frame
    InsufficientHistory { needed: usize, available: usize },
    /// Model artifact missing, corrupt, or incompatible
    ModelLoadFailure(String),
    /// Min-max fit over a constant (or empty) sample
    DegenerateScale { min: f64, max: f64 },
    /// Predictor errored or returned the wrong number of outputs
    InferenceFailed(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::DataUnavailable(msg) => write!(f, "Data unavailable: {}", msg),
            PipelineError::InsufficientHistory { needed, available } => write!(
                f,
                "Insufficient history: need at least {} points, have {}",
                needed, available
            ),
            PipelineError::ModelLoadFailure(msg) => write!(f, "Model unavailable: {}", msg),
            PipelineError::DegenerateScale { min, max } => write!(
                f,
                "Cannot scale a constant price series (min {} == max {})",
                min, max
            ),
            PipelineError::InferenceFailed(msg) => write!(f, "Inference failed: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

impl PipelineError {
    /// Keeps the whole anyhow context chain in the message.
    pub fn data_unavailable(err: &anyhow::Error) -> Self {
        PipelineError::DataUnavailable(format!("{:#}", err))
    }

    pub fn model_load(err: &anyhow::Error) -> Self {
        PipelineError::ModelLoadFailure(format!("{:#}", err))
    }

    pub fn inference(err: &anyhow::Error) -> Self {
        PipelineError::InferenceFailed(format!("{:#}", err))
    }
}
