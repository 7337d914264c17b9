use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Instant;

use crate::analysis::moving_average::rolling_mean;
use crate::analysis::{PipelineConfig, describe, prepare, run_prediction};
use crate::config::ANALYSIS;
use crate::data::{DataSources, MarketDataProvider, fetch_with_fallback};
use crate::domain::{HistoryRequest, PriceHistory};
use crate::error::PipelineError;

use super::messages::{JobKind, JobOutcome, JobRequest, JobResult, LoadedHistory};

/// One thread, one current-thread tokio runtime. Jobs run strictly in order.
pub fn spawn_worker_thread(rx: Receiver<JobRequest>, tx: Sender<JobResult>, sources: DataSources) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Worker could not start its async runtime: {}", e);
                return;
            }
        };

        let providers = match sources.build() {
            Ok(providers) => providers,
            Err(e) => {
                log::error!("Failed to build market data providers: {:#}", e);
                Vec::new()
            }
        };

        while let Ok(req) = rx.recv() {
            let start = Instant::now();
            log::info!("[job {}] {}", req.id, req.kind.label());

            let outcome = match req.kind {
                JobKind::FetchHistory { request, config } => JobOutcome::History(
                    runtime
                        .block_on(load_history(&providers, &request, &config))
                        .map(Box::new),
                ),
                JobKind::RunPrediction {
                    prepared,
                    dates,
                    predictor,
                } => JobOutcome::Prediction(
                    run_prediction(&prepared, predictor.as_ref(), &dates).map(Arc::new),
                ),
            };

            let result = JobResult {
                id: req.id,
                duration_ms: start.elapsed().as_millis(),
                outcome,
            };
            if tx.send(result).is_err() {
                // Engine dropped, nothing left to report to
                break;
            }
        }
    });
}

/// Fetch through the provider chain, then derive statistics, moving averages
/// and the prediction inputs.
pub async fn load_history(
    providers: &[Box<dyn MarketDataProvider>],
    request: &HistoryRequest,
    config: &PipelineConfig,
) -> Result<LoadedHistory, PipelineError> {
    request.validate().map_err(PipelineError::DataUnavailable)?;

    let (history, source) = fetch_with_fallback(providers, request)
        .await
        .map_err(|e| PipelineError::data_unavailable(&e))?;

    Ok(derive_history(history, source, config))
}

pub fn derive_history(
    history: PriceHistory,
    source: &'static str,
    config: &PipelineConfig,
) -> LoadedHistory {
    let closes = history.closes();
    let dates = Arc::new(history.dates());
    let summaries = describe(&history);
    let short_ma = rolling_mean(&closes, ANALYSIS.moving_average.short_window);
    let long_ma = rolling_mean(&closes, ANALYSIS.moving_average.long_window);

    let prepared = prepare(&closes, config).map(Arc::new);
    if let Err(e) = &prepared {
        log::warn!("{}: prediction unavailable: {}", history.ticker, e);
    }

    LoadedHistory {
        history: Arc::new(history),
        source,
        dates,
        closes,
        summaries,
        short_ma,
        long_ma,
        prepared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyBar;
    use chrono::NaiveDate;

    fn history(n: usize) -> PriceHistory {
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let close = 1.0 + i as f64;
                DailyBar::new(start + chrono::Days::new(i as u64), close, close, close, close, 1e6)
            })
            .collect();
        PriceHistory::new("TEST", bars)
    }

    #[test]
    fn derived_views_line_up_with_history() {
        let loaded = derive_history(history(300), "fixture", &PipelineConfig::default());
        assert_eq!(loaded.closes.len(), 300);
        assert_eq!(loaded.dates.len(), 300);
        assert_eq!(loaded.short_ma.len(), 300);
        assert!(loaded.short_ma[98].is_none());
        assert_eq!(loaded.short_ma[99], Some(50.5));
        assert!(loaded.long_ma[198].is_none());
        assert_eq!(loaded.summaries.len(), 6);
        assert!(loaded.prepared.is_ok());
    }

    #[test]
    fn short_history_still_loads_but_cannot_predict() {
        let loaded = derive_history(history(120), "fixture", &PipelineConfig::default());
        assert_eq!(loaded.closes.len(), 120);
        assert!(matches!(
            loaded.prepared,
            Err(PipelineError::InsufficientHistory { needed: 101, .. })
        ));
    }

    #[tokio::test]
    async fn invalid_request_is_data_unavailable() {
        let providers: Vec<Box<dyn MarketDataProvider>> = Vec::new();
        let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let request = HistoryRequest::new("  ", day, day);
        let err = load_history(&providers, &request, &PipelineConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::DataUnavailable(_)));
    }
}
