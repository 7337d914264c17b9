//! Windowed prediction pipeline: split, scale, window, infer, rescale.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::analysis::metrics::PredictionMetrics;
use crate::analysis::scaling::MinMaxScaler;
use crate::analysis::split::{evaluation_frame, train_test_split};
use crate::analysis::windowing::{WindowedSamples, build_windows};
use crate::config::ANALYSIS;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::error::PipelineError;
use crate::inference::Predictor;

/// Which fit scales the evaluation frame.
///
/// `RefitOnEvaluation` fits a second scaler on the lookback carryover plus the
/// testing range, which is what the dashboards this replaces did. The model
/// therefore sees testing windows on a different scale than the training
/// windows. Kept as the default until the product owner decides otherwise.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Display, Serialize, Deserialize,
)]
pub enum ScalerPolicy {
    #[default]
    #[strum(to_string = "refit on evaluation frame")]
    RefitOnEvaluation,
    #[strum(to_string = "reuse training fit")]
    ReuseTraining,
}

/// How scaled values are brought back to prices before plotting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Display, Serialize, Deserialize,
)]
pub enum InverseScaling {
    /// `y * (max - min) + min`
    #[default]
    #[strum(to_string = "exact")]
    Exact,
    /// `y / scale`, off by the fitted minimum
    #[strum(to_string = "factor only")]
    FactorOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub lookback: usize,
    pub train_fraction: f64,
    pub scaler_policy: ScalerPolicy,
    pub inverse_scaling: InverseScaling,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback: ANALYSIS.prediction.lookback,
            train_fraction: ANALYSIS.prediction.train_fraction,
            scaler_policy: ANALYSIS.prediction.scaler_policy,
            inverse_scaling: ANALYSIS.prediction.inverse_scaling,
        }
    }
}

/// Everything computed before the model is invoked.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub config: PipelineConfig,
    /// Index of the first testing point in the original series
    pub split_index: usize,
    pub testing_len: usize,
    pub training_scaler: MinMaxScaler,
    pub evaluation_scaler: MinMaxScaler,
    pub training_samples: WindowedSamples,
    pub evaluation_samples: WindowedSamples,
}

/// Parallel actual/predicted prices over the testing range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
    /// Empty when the caller had no dates
    pub dates: Vec<NaiveDate>,
    pub training_windows: usize,
    pub evaluation_windows: usize,
    pub training_scaler: MinMaxScaler,
    pub evaluation_scaler: MinMaxScaler,
    pub config: PipelineConfig,
    pub metrics: Option<PredictionMetrics>,
}

impl PredictionReport {
    pub fn len(&self) -> usize {
        self.actual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }
}

pub fn prepare(series: &[f64], config: &PipelineConfig) -> Result<PreparedData, PipelineError> {
    let needed = config.lookback + 1;
    let split = train_test_split(series, config.train_fraction);

    if split.training.len() < needed {
        return Err(PipelineError::InsufficientHistory {
            needed,
            available: split.training.len(),
        });
    }

    let (training_scaler, training_scaled) = MinMaxScaler::fit_transform(split.training)?;
    let training_samples = build_windows(&training_scaled, config.lookback);

    let frame = evaluation_frame(&split, config.lookback);
    if frame.len() < needed {
        return Err(PipelineError::InsufficientHistory {
            needed,
            available: frame.len(),
        });
    }

    let evaluation_scaler = match config.scaler_policy {
        ScalerPolicy::RefitOnEvaluation => {
            let refit = MinMaxScaler::fit(&frame)?;
            if refit != training_scaler {
                log::warn!(
                    "Evaluation frame refit replaces training scale: [{:.4}, {:.4}] -> [{:.4}, {:.4}]",
                    training_scaler.data_min,
                    training_scaler.data_max,
                    refit.data_min,
                    refit.data_max
                );
            }
            refit
        }
        ScalerPolicy::ReuseTraining => training_scaler,
    };
    let evaluation_samples = build_windows(&evaluation_scaler.transform(&frame), config.lookback);

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_scaler_fits {
        log::info!(
            "Scaler fits: training {:?} ({} windows), evaluation {:?} ({} windows)",
            training_scaler,
            training_samples.len(),
            evaluation_scaler,
            evaluation_samples.len()
        );
    }

    Ok(PreparedData {
        config: *config,
        split_index: split.split_index(),
        testing_len: split.testing.len(),
        training_scaler,
        evaluation_scaler,
        training_samples,
        evaluation_samples,
    })
}

/// Runs the predictor over the evaluation windows and rescales both sequences
/// with the evaluation scaler.
pub fn run_prediction(
    prepared: &PreparedData,
    predictor: &dyn Predictor,
    dates: &[NaiveDate],
) -> Result<PredictionReport, PipelineError> {
    let samples = &prepared.evaluation_samples;
    let predicted_scaled = predictor
        .predict(&samples.batch())
        .map_err(|e| PipelineError::inference(&e))?;

    if predicted_scaled.len() != samples.len() {
        return Err(PipelineError::InferenceFailed(format!(
            "{} returned {} predictions for {} windows",
            predictor.describe(),
            predicted_scaled.len(),
            samples.len()
        )));
    }
    if predicted_scaled.iter().any(|v| !v.is_finite()) {
        return Err(PipelineError::InferenceFailed(format!(
            "{} returned non-finite predictions",
            predictor.describe()
        )));
    }

    let scaler = &prepared.evaluation_scaler;
    let (actual, predicted) = match prepared.config.inverse_scaling {
        InverseScaling::Exact => (
            scaler.inverse_transform(&samples.targets),
            scaler.inverse_transform(&predicted_scaled),
        ),
        InverseScaling::FactorOnly => (
            scaler.approximate_inverse(&samples.targets),
            scaler.approximate_inverse(&predicted_scaled),
        ),
    };

    let dates = dates
        .get(prepared.split_index..)
        .filter(|d| d.len() == actual.len())
        .map(<[NaiveDate]>::to_vec)
        .unwrap_or_default();

    let metrics = PredictionMetrics::compute(&actual, &predicted);

    Ok(PredictionReport {
        actual,
        predicted,
        dates,
        training_windows: prepared.training_samples.len(),
        evaluation_windows: samples.len(),
        training_scaler: prepared.training_scaler,
        evaluation_scaler: prepared.evaluation_scaler,
        config: prepared.config,
        metrics,
    })
}

/// `prepare` followed by `run_prediction`.
pub fn predict_series(
    series: &[f64],
    dates: &[NaiveDate],
    config: &PipelineConfig,
    predictor: &dyn Predictor,
) -> Result<PredictionReport, PipelineError> {
    let prepared = prepare(series, config)?;
    run_prediction(&prepared, predictor, dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::windowing::WindowBatch;
    use crate::inference::WindowMeanPredictor;

    fn linear_series() -> Vec<f64> {
        (1..=300).map(f64::from).collect()
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            lookback: 100,
            train_fraction: 0.7,
            scaler_policy: ScalerPolicy::RefitOnEvaluation,
            inverse_scaling: InverseScaling::Exact,
        }
    }

    struct FixedCount(usize);

    impl Predictor for FixedCount {
        fn predict(&self, _batch: &WindowBatch<'_>) -> anyhow::Result<Vec<f64>> {
            Ok(vec![0.5; self.0])
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    #[test]
    fn linear_series_window_counts() {
        let prepared = prepare(&linear_series(), &config()).unwrap();

        assert_eq!(prepared.split_index, 210);
        assert_eq!(prepared.testing_len, 90);
        assert_eq!(prepared.training_samples.len(), 110);
        assert_eq!(prepared.evaluation_samples.len(), 90);
        assert_eq!(prepared.evaluation_samples.shape(), (90, 100, 1));
    }

    #[test]
    fn two_named_scalers_differ_under_refit() {
        let prepared = prepare(&linear_series(), &config()).unwrap();
        assert_eq!(prepared.training_scaler.data_min, 1.0);
        assert_eq!(prepared.training_scaler.data_max, 210.0);
        assert_eq!(prepared.evaluation_scaler.data_min, 111.0);
        assert_eq!(prepared.evaluation_scaler.data_max, 300.0);

        let reuse = PipelineConfig {
            scaler_policy: ScalerPolicy::ReuseTraining,
            ..config()
        };
        let prepared = prepare(&linear_series(), &reuse).unwrap();
        assert_eq!(prepared.evaluation_scaler, prepared.training_scaler);
    }

    #[test]
    fn window_mean_stub_preserves_linear_trend() {
        let report = predict_series(&linear_series(), &[], &config(), &WindowMeanPredictor).unwrap();

        assert_eq!(report.len(), 90);
        assert_eq!(report.actual[0], 211.0);
        assert!((report.actual[89] - 300.0).abs() < 1e-9);

        // Mean of the 100 preceding values trails the target by 50.5
        for (a, p) in report.actual.iter().zip(&report.predicted) {
            assert!((a - p - 50.5).abs() < 1e-6);
        }
        for w in report.predicted.windows(2) {
            assert!((w[1] - w[0] - 1.0).abs() < 1e-6);
        }
        assert!((report.metrics.unwrap().directional_accuracy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn factor_only_inverse_is_shifted_by_evaluation_min() {
        let factor_only = PipelineConfig {
            inverse_scaling: InverseScaling::FactorOnly,
            ..config()
        };
        let report =
            predict_series(&linear_series(), &[], &factor_only, &WindowMeanPredictor).unwrap();

        // Evaluation frame minimum is 111
        assert!((report.actual[0] - 100.0).abs() < 1e-9);
        assert!((report.actual[89] - 189.0).abs() < 1e-9);
    }

    #[test]
    fn constant_prices_are_degenerate_not_nan() {
        let err = prepare(&[25.0; 400], &config()).unwrap_err();
        assert_eq!(err, PipelineError::DegenerateScale { min: 25.0, max: 25.0 });
    }

    #[test]
    fn constant_evaluation_frame_is_degenerate() {
        let mut series: Vec<f64> = (1..=110).map(f64::from).collect();
        series.extend(std::iter::repeat_n(500.0, 190));

        let err = prepare(&series, &config()).unwrap_err();
        assert_eq!(err, PipelineError::DegenerateScale { min: 500.0, max: 500.0 });
    }

    #[test]
    fn short_history_is_insufficient() {
        let half = PipelineConfig {
            train_fraction: 0.5,
            ..config()
        };
        let series: Vec<f64> = (1..=180).map(f64::from).collect();
        let err = prepare(&series, &half).unwrap_err();
        assert_eq!(
            err,
            PipelineError::InsufficientHistory {
                needed: 101,
                available: 90
            }
        );

        // Enough training, but nothing left to test
        let all_training = PipelineConfig {
            train_fraction: 1.0,
            ..config()
        };
        let frame_err = prepare(&series, &all_training).unwrap_err();
        assert_eq!(
            frame_err,
            PipelineError::InsufficientHistory {
                needed: 101,
                available: 100
            }
        );
    }

    #[test]
    fn wrong_prediction_count_is_reported() {
        let prepared = prepare(&linear_series(), &config()).unwrap();
        let err = run_prediction(&prepared, &FixedCount(3), &[]).unwrap_err();
        assert!(matches!(err, PipelineError::InferenceFailed(_)));
    }

    #[test]
    fn testing_dates_follow_the_split() {
        let series = linear_series();
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..series.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();

        let report = predict_series(&series, &dates, &config(), &WindowMeanPredictor).unwrap();
        assert_eq!(report.dates.len(), 90);
        assert_eq!(report.dates[0], dates[210]);
    }
}
