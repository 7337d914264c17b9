#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod inference;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use analysis::{PipelineConfig, PredictionReport, predict_series};
pub use domain::{DailyBar, HistoryRequest, PriceHistory};
pub use error::PipelineError;
pub use ui::{LaunchOptions, StockTrendApp};

// CLI argument parsing
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::analysis::{InverseScaling, ScalerPolicy};
use crate::config::{ANALYSIS, PERSISTENCE};
use crate::data::DataSources;
use crate::utils::time_utils;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InverseArg {
    /// y * (max - min) + min
    Exact,
    /// y / scale (off by the fitted minimum)
    FactorOnly,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalerArg {
    /// Refit on the evaluation frame
    Refit,
    /// Scale the evaluation frame with the training fit
    ReuseTraining,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Ticker symbol, e.g. AAPL
    #[arg(long)]
    pub ticker: Option<String>,

    /// First day of history (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// Day after the last day of history (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// Model artifact (.json linear window model, or .onnx with the `onnx` feature)
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// CSV export, or a directory of <TICKER>.csv files, used when Yahoo fails
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Try the CSV source before Yahoo
    #[arg(long, default_value_t = false, requires = "csv")]
    pub prefer_csv: bool,

    /// Never contact Yahoo
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    #[arg(long, value_enum, default_value_t = InverseArg::Exact)]
    pub inverse: InverseArg,

    #[arg(long, value_enum, default_value_t = ScalerArg::Refit)]
    pub scaler: ScalerArg,
}

fn parse_date_arg(text: &str) -> Result<NaiveDate, String> {
    time_utils::parse_date(text).map_err(|e| format!("{:#}", e))
}

impl Cli {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            scaler_policy: match self.scaler {
                ScalerArg::Refit => ScalerPolicy::RefitOnEvaluation,
                ScalerArg::ReuseTraining => ScalerPolicy::ReuseTraining,
            },
            inverse_scaling: match self.inverse {
                InverseArg::Exact => InverseScaling::Exact,
                InverseArg::FactorOnly => InverseScaling::FactorOnly,
            },
            ..PipelineConfig::default()
        }
    }

    pub fn data_sources(&self) -> DataSources {
        DataSources {
            csv_path: self.csv.clone(),
            prefer_csv: self.prefer_csv,
            offline: self.offline,
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.model
            .clone()
            .unwrap_or_else(|| PathBuf::from(PERSISTENCE.model.default_artifact))
    }

    /// Request built from the flags, falling back to the form defaults.
    pub fn history_request(&self) -> Result<HistoryRequest> {
        let ticker = self.ticker.as_deref().unwrap_or(ANALYSIS.input.ticker);
        let start = match self.start {
            Some(start) => start,
            None => time_utils::parse_date(ANALYSIS.input.start_date)?,
        };
        let end = self.end.unwrap_or_else(time_utils::today_local);
        Ok(HistoryRequest::new(ticker, start, end))
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            config: self.pipeline_config(),
            sources: self.data_sources(),
            ticker: self.ticker.clone(),
            start_date: self.start,
            end_date: self.end,
            model_path: self.model.clone(),
            autoload: self.ticker.is_some(),
        }
    }
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(cc: &eframe::CreationContext, options: LaunchOptions) -> Box<dyn eframe::App> {
    Box::new(StockTrendApp::new(cc, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_pipeline_config() {
        let cli = Cli::parse_from([
            "stock-trend",
            "--ticker",
            "msft",
            "--start",
            "2015-06-01",
            "--inverse",
            "factor-only",
            "--scaler",
            "reuse-training",
        ]);
        let config = cli.pipeline_config();
        assert_eq!(config.inverse_scaling, InverseScaling::FactorOnly);
        assert_eq!(config.scaler_policy, ScalerPolicy::ReuseTraining);
        assert_eq!(config.lookback, 100);

        let request = cli.history_request().unwrap();
        assert_eq!(request.ticker, "MSFT");
        assert_eq!(request.start, NaiveDate::from_ymd_opt(2015, 6, 1).unwrap());
        assert!(cli.launch_options().autoload);
    }

    #[test]
    fn defaults_follow_the_input_form() {
        let cli = Cli::parse_from(["stock-trend"]);
        let request = cli.history_request().unwrap();
        assert_eq!(request.ticker, "AAPL");
        assert_eq!(request.start, NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
        assert_eq!(cli.model_path(), PathBuf::from("model/window_model.json"));
        assert!(!cli.launch_options().autoload);
    }

    #[test]
    fn bad_dates_are_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["stock-trend", "--start", "01/02/2010"]).is_err());
        assert!(Cli::try_parse_from(["stock-trend", "--prefer-csv"]).is_err());
    }
}
