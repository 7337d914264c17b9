use std::sync::Arc;

use chrono::NaiveDate;

use crate::analysis::{ColumnSummary, PipelineConfig, PredictionReport, PreparedData};
use crate::domain::{HistoryRequest, PriceHistory};
use crate::error::PipelineError;
use crate::inference::Predictor;

/// Work handed to the background worker.
pub enum JobKind {
    FetchHistory {
        request: HistoryRequest,
        config: PipelineConfig,
    },
    RunPrediction {
        prepared: Arc<PreparedData>,
        dates: Arc<Vec<NaiveDate>>,
        predictor: Arc<dyn Predictor>,
    },
}

impl JobKind {
    pub fn label(&self) -> String {
        match self {
            JobKind::FetchHistory { request, .. } => format!("Fetching {}", request),
            JobKind::RunPrediction { .. } => "Running prediction".to_string(),
        }
    }
}

pub struct JobRequest {
    /// Generation of the history this job belongs to
    pub id: u64,
    pub kind: JobKind,
}

/// A fetched history plus everything derived from it that does not need the model.
#[derive(Debug, Clone)]
pub struct LoadedHistory {
    pub history: Arc<PriceHistory>,
    pub source: &'static str,
    pub dates: Arc<Vec<NaiveDate>>,
    pub closes: Vec<f64>,
    pub summaries: Vec<ColumnSummary>,
    pub short_ma: Vec<Option<f64>>,
    pub long_ma: Vec<Option<f64>>,
    /// Why Predict is disabled, if it is
    pub prepared: Result<Arc<PreparedData>, PipelineError>,
}

pub enum JobOutcome {
    History(Result<Box<LoadedHistory>, PipelineError>),
    Prediction(Result<Arc<PredictionReport>, PipelineError>),
}

/// The result returned by the worker
pub struct JobResult {
    pub id: u64,
    pub duration_ms: u128,
    pub outcome: JobOutcome,
}
