//! Daily history from the Yahoo Finance v8 chart endpoint.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::time::sleep;

use crate::config::PROVIDER;
use crate::data::provider::MarketDataProvider;
use crate::domain::{DailyBar, HistoryRequest, PriceHistory};
use crate::utils::time_utils;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Settings for one Yahoo client. Defaults come from `PROVIDER`.
#[derive(Debug, Clone)]
pub struct YahooSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub retries: u32,
    pub backoff: Duration,
}

impl Default for YahooSettings {
    fn default() -> Self {
        Self {
            base_url: PROVIDER.yahoo.base_url.to_string(),
            timeout: Duration::from_millis(PROVIDER.client.timeout_ms),
            retries: PROVIDER.client.retries,
            backoff: Duration::from_millis(PROVIDER.client.backoff_ms),
        }
    }
}

pub struct YahooProvider {
    client: reqwest::Client,
    settings: YahooSettings,
}

impl YahooProvider {
    pub fn new(settings: YahooSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(PROVIDER.yahoo.user_agent)
            .timeout(settings.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, settings })
    }

    fn chart_url(&self, request: &HistoryRequest) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval={}&events=history&includeAdjustedClose=true",
            self.settings.base_url.trim_end_matches('/'),
            request.ticker,
            time_utils::date_to_epoch_sec(request.start),
            time_utils::date_to_epoch_sec(request.end),
            PROVIDER.yahoo.interval,
        )
    }

    /// One GET. `Ok(None)` means a transient failure worth retrying.
    async fn get_once(&self, url: &str) -> Result<Option<String>> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() || e.is_connect() => {
                log::warn!("Yahoo request failed: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e).context("Failed to send request"),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            log::warn!("Yahoo responded with {}", status);
            return Ok(None);
        }

        let body = response.text().await.context("Failed to read response body")?;
        if status == StatusCode::NOT_FOUND {
            // 404 bodies still carry chart.error with the reason
            return Ok(Some(body));
        }
        if !status.is_success() {
            bail!("HTTP {}", status);
        }
        Ok(Some(body))
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn signature(&self) -> &'static str {
        PROVIDER.source_label
    }

    async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceHistory> {
        request.validate().map_err(|e| anyhow!(e))?;
        let url = self.chart_url(request);

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_provider_requests {
            log::info!("GET {}", url);
        }

        let attempts = self.settings.retries.max(1);
        for attempt in 1..=attempts {
            if let Some(body) = self.get_once(&url).await? {
                return parse_chart_response(&body, request)
                    .with_context(|| format!("{}", request.ticker));
            }
            if attempt < attempts {
                let delay = self.settings.backoff * attempt;
                log::info!(
                    "Retrying {} in {:?} (attempt {} of {})",
                    request.ticker,
                    delay,
                    attempt + 1,
                    attempts
                );
                sleep(delay).await;
            }
        }

        bail!(
            "{}: Yahoo Finance unreachable after {} attempts",
            request.ticker,
            attempts
        )
    }
}

/// Turns a chart JSON body into a history limited to the requested range.
/// Rows with a null close are dropped.
pub fn parse_chart_response(body: &str, request: &HistoryRequest) -> Result<PriceHistory> {
    let response: ChartResponse =
        serde_json::from_str(body).context("Failed to parse chart response")?;

    if let Some(error) = response.chart.error {
        bail!("Yahoo API error: {} - {}", error.code, error.description);
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| anyhow!("No data in response"))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let value = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();

    let bars: Vec<DailyBar> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = time_utils::epoch_sec_to_date(ts, result.meta.gmtoffset)?;
            let close = value(&quote.close, i)?;
            let bar = DailyBar::new(
                date,
                value(&quote.open, i).unwrap_or(f64::NAN),
                value(&quote.high, i).unwrap_or(f64::NAN),
                value(&quote.low, i).unwrap_or(f64::NAN),
                close,
                value(&quote.volume, i).unwrap_or(f64::NAN),
            );
            Some(match value(&adjclose, i) {
                Some(adj) => bar.with_adj_close(adj),
                None => bar,
            })
        })
        .filter(|bar| request.contains(bar.date))
        .collect();

    if bars.is_empty() {
        bail!("no daily closes between {} and {}", request.start, request.end);
    }

    Ok(PriceHistory::new(request.ticker.clone(), bars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request() -> HistoryRequest {
        HistoryRequest::new(
            "AAPL",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
    }

    // 2024-01-03, 2024-01-02 (out of order), 2024-01-04 (null close) at 14:30 UTC
    const CHART_OK: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "USD", "symbol": "AAPL", "gmtoffset": -18000},
                "timestamp": [1704292200, 1704205800, 1704378600],
                "indicators": {
                    "quote": [{
                        "open": [184.22, 187.15, 182.15],
                        "high": [185.88, 188.44, 183.09],
                        "low": [183.43, 183.89, 180.88],
                        "close": [184.25, 185.64, null],
                        "volume": [58414500, 82488700, 71983600]
                    }],
                    "adjclose": [{"adjclose": [183.5, 184.9, null]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn bars_are_sorted_and_nulls_dropped() {
        let history = parse_chart_response(CHART_OK, &request()).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.dates(),
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ]
        );
        assert_eq!(history.closes(), vec![185.64, 184.25]);
        assert_eq!(history.bars()[0].adj_close, 184.9);
    }

    #[test]
    fn chart_error_is_reported() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart_response(body, &request()).unwrap_err();
        assert!(err.to_string().contains("symbol may be delisted"));
    }

    #[test]
    fn empty_result_is_an_error() {
        let body = r#"{"chart":{"result":[{"meta":{},"timestamp":[],"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(parse_chart_response(body, &request()).is_err());
    }

    #[test]
    fn url_carries_epoch_range() {
        let provider = YahooProvider::new(YahooSettings::default()).unwrap();
        let url = provider.chart_url(&request());
        assert!(url.starts_with("https://query1.finance.yahoo.com/v8/finance/chart/AAPL?"));
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("period2=1706745600"));
        assert!(url.contains("interval=1d"));
    }
}
