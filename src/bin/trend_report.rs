//! Headless run of the dashboard pipeline: fetch, describe, predict, print.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::runtime::Runtime;

use stock_trend::Cli;
use stock_trend::analysis::{ColumnSummary, PredictionReport, run_prediction};
use stock_trend::config::ANALYSIS;
use stock_trend::engine::worker::load_history;
use stock_trend::engine::{ChartDetail, LoadedHistory};
use stock_trend::inference::{Predictor, WindowMeanPredictor, load_predictor};
use stock_trend::utils::time_utils;

#[derive(ValueEnum, Debug, Clone, Copy)]
enum DetailArg {
    Basic,
    Medium,
    Hard,
}

impl From<DetailArg> for ChartDetail {
    fn from(arg: DetailArg) -> Self {
        match arg {
            DetailArg::Basic => ChartDetail::Basic,
            DetailArg::Medium => ChartDetail::Medium,
            DetailArg::Hard => ChartDetail::Hard,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Print statistics and predictions for one ticker")]
struct ReportArgs {
    #[command(flatten)]
    cli: Cli,

    /// Use the window-mean stub instead of a model artifact
    #[arg(long, default_value_t = false)]
    stub_model: bool,

    /// Chart tier whose series are summarised
    #[arg(long, value_enum, default_value_t = DetailArg::Hard)]
    detail: DetailArg,

    /// Write date,actual,predicted rows to this CSV file
    #[arg(long)]
    out: Option<PathBuf>,

    /// Rows of the prediction table to print
    #[arg(long, default_value_t = 10)]
    rows: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = ReportArgs::parse();
    let config = args.cli.pipeline_config();
    let request = args.cli.history_request()?;
    let providers = args.cli.data_sources().build()?;

    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let loaded = rt.block_on(load_history(&providers, &request, &config))?;

    print_summary(&loaded);
    print_chart_series(&loaded, args.detail.into());

    let prepared = match &loaded.prepared {
        Ok(prepared) => prepared.clone(),
        Err(e) => {
            println!("\nPrediction skipped: {}", e);
            return Ok(());
        }
    };

    let predictor: Arc<dyn Predictor> = if args.stub_model {
        Arc::new(WindowMeanPredictor)
    } else {
        load_predictor(&args.cli.model_path(), config.lookback)?
    };
    println!("\nModel: {}", predictor.describe());

    let report = run_prediction(&prepared, predictor.as_ref(), &loaded.dates)?;
    print_prediction(&report, args.rows);

    if let Some(path) = &args.out {
        write_prediction_csv(path, &report)?;
        println!("✅ Predictions written to {:?}", path);
    }
    Ok(())
}

fn print_summary(loaded: &LoadedHistory) {
    let history = &loaded.history;
    println!(
        "{} from {}: {} trading days ({} to {})",
        history.ticker,
        loaded.source,
        history.len(),
        history.first_date().map(time_utils::format_date).unwrap_or_default(),
        history.last_date().map(time_utils::format_date).unwrap_or_default(),
    );

    println!();
    for header in ColumnSummary::HEADERS {
        print!("{:>14}", header);
    }
    println!();
    for summary in &loaded.summaries {
        print!("{:>14}", summary.column.to_string());
        for cell in summary.cells() {
            print!("{:>14}", cell);
        }
        println!();
    }
}

fn print_chart_series(loaded: &LoadedHistory, detail: ChartDetail) {
    println!("\n{}", detail.title());
    let last = |series: &[Option<f64>]| {
        series
            .last()
            .copied()
            .flatten()
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "n/a".to_string())
    };
    if let Some(close) = loaded.closes.last() {
        println!("  last close: {:.2}", close);
    }
    if detail.shows_short_ma() {
        println!(
            "  MA{}: {}",
            ANALYSIS.moving_average.short_window,
            last(&loaded.short_ma)
        );
    }
    if detail.shows_long_ma() {
        println!(
            "  MA{}: {}",
            ANALYSIS.moving_average.long_window,
            last(&loaded.long_ma)
        );
    }
}

fn print_prediction(report: &PredictionReport, rows: usize) {
    println!(
        "{} training windows, {} test windows ({}, {} inverse)",
        report.training_windows,
        report.evaluation_windows,
        report.config.scaler_policy,
        report.config.inverse_scaling
    );
    if let Some(m) = report.metrics {
        println!(
            "MAE {:.4}  RMSE {:.4}  MAPE {:.2}%  direction {:.1}%",
            m.mae,
            m.rmse,
            m.mape,
            m.directional_accuracy * 100.0
        );
    }

    println!("\n{:>6} {:>12} {:>12} {:>12}", "day", "date", "actual", "predicted");
    let start = report.len().saturating_sub(rows);
    for i in start..report.len() {
        let date = report
            .dates
            .get(i)
            .map(|d| time_utils::format_date(*d))
            .unwrap_or_default();
        println!(
            "{:>6} {:>12} {:>12.4} {:>12.4}",
            i, date, report.actual[i], report.predicted[i]
        );
    }
}

fn write_prediction_csv(path: &PathBuf, report: &PredictionReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    writer.write_record(["day", "date", "actual", "predicted"])?;
    for i in 0..report.len() {
        let date = report
            .dates
            .get(i)
            .map(|d| time_utils::format_date(*d))
            .unwrap_or_default();
        writer.write_record([
            i.to_string(),
            date,
            report.actual[i].to_string(),
            report.predicted[i].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
