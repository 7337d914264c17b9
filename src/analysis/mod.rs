// Pure analysis: statistics, moving averages and the windowed prediction pipeline
pub mod metrics;
pub mod moving_average;
pub mod pipeline;
pub mod scaling;
pub mod split;
pub mod statistics;
pub mod windowing;

// Re-export commonly used types
pub use metrics::PredictionMetrics;
pub use pipeline::{
    InverseScaling, PipelineConfig, PredictionReport, PreparedData, ScalerPolicy, predict_series,
    prepare, run_prediction,
};
pub use scaling::MinMaxScaler;
pub use statistics::{ColumnSummary, PriceColumn, describe};
pub use windowing::{WindowBatch, WindowedSamples, build_windows};
