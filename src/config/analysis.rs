//! Analysis and pipeline configuration

use crate::analysis::pipeline::{InverseScaling, ScalerPolicy};

/// Moving averages drawn on the detail charts
pub struct MovingAverageConfig {
    // Short window, drawn on Medium and Hard charts
    pub short_window: usize,
    // Long window, only drawn on the Hard chart
    pub long_window: usize,
}

/// Settings for the windowed prediction pipeline
pub struct PredictionSettings {
    // Number of preceding closes fed to the model for each prediction
    pub lookback: usize,
    // Fraction of the series (by index) that forms the training split
    pub train_fraction: f64,
    pub scaler_policy: ScalerPolicy,
    pub inverse_scaling: InverseScaling,
}

/// Defaults for the input form
pub struct InputDefaults {
    pub ticker: &'static str,
    // Start date in STANDARD_TIME_FORMAT
    pub start_date: &'static str,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub moving_average: MovingAverageConfig,
    pub prediction: PredictionSettings,
    pub input: InputDefaults,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    moving_average: MovingAverageConfig {
        short_window: 100,
        long_window: 200,
    },

    prediction: PredictionSettings {
        lookback: 100,
        train_fraction: 0.7,
        scaler_policy: ScalerPolicy::RefitOnEvaluation,
        inverse_scaling: InverseScaling::Exact,
    },

    input: InputDefaults {
        ticker: "AAPL",
        start_date: "2010-01-01",
    },
};
