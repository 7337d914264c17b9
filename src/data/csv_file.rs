//! Offline history from Yahoo-style CSV exports
//! (`Date,Open,High,Low,Close,Adj Close,Volume`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;

use crate::data::provider::MarketDataProvider;
use crate::domain::{DailyBar, HistoryRequest, PriceHistory};
use crate::utils::time_utils;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open", default, deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(rename = "High", default, deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(rename = "Low", default, deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(rename = "Close", default, deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(rename = "Adj Close", default, deserialize_with = "csv::invalid_option")]
    adj_close: Option<f64>,
    #[serde(rename = "Volume", default, deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

/// `path` is either a single CSV file or a directory holding `<TICKER>.csv` files.
pub struct CsvFileProvider {
    path: PathBuf,
}

impl CsvFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn file_for(&self, ticker: &str) -> PathBuf {
        if self.path.is_dir() {
            self.path.join(format!("{}.csv", ticker))
        } else {
            self.path.clone()
        }
    }
}

#[async_trait]
impl MarketDataProvider for CsvFileProvider {
    fn signature(&self) -> &'static str {
        "CSV file"
    }

    async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceHistory> {
        request.validate().map_err(|e| anyhow!(e))?;
        let file = self.file_for(&request.ticker);
        let text = tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        parse_csv_history(&text, request).with_context(|| format!("{}", file.display()))
    }
}

/// Parses CSV text and keeps rows inside the request range. Unparseable rows are skipped.
pub fn parse_csv_history(text: &str, request: &HistoryRequest) -> Result<PriceHistory> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut bars = Vec::new();
    let mut skipped = 0;

    for (row_num, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                log::debug!("Skipping row {}: {}", row_num + 1, e);
                skipped += 1;
                continue;
            }
        };

        let (Ok(date), Some(close)) = (time_utils::parse_date(&row.date), row.close) else {
            skipped += 1;
            continue;
        };
        if !request.contains(date) {
            continue;
        }

        let bar = DailyBar::new(
            date,
            row.open.unwrap_or(f64::NAN),
            row.high.unwrap_or(f64::NAN),
            row.low.unwrap_or(f64::NAN),
            close,
            row.volume.unwrap_or(f64::NAN),
        );
        bars.push(match row.adj_close {
            Some(adj) => bar.with_adj_close(adj),
            None => bar,
        });
    }

    if skipped > 0 {
        log::info!("Skipped {} unusable CSV rows for {}", skipped, request.ticker);
    }
    if bars.is_empty() {
        bail!("no daily closes between {} and {}", request.start, request.end);
    }

    Ok(PriceHistory::new(request.ticker.clone(), bars))
}

/// True when `path` looks like something `CsvFileProvider` can read.
pub fn is_csv_source(path: &Path) -> bool {
    path.is_dir()
        || path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    const EXPORT: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2019-12-31,72.48,73.42,72.38,73.41,71.52,100805600
2020-01-03,74.29,75.14,74.13,74.36,72.44,146322800
2020-01-02,74.06,75.15,73.80,75.09,73.15,135480400
2020-01-06,null,null,null,null,null,null
2020-01-07,74.96,75.22,74.37,74.60,72.67,108872000
";

    fn request() -> HistoryRequest {
        HistoryRequest::new(
            "aapl",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 7).unwrap(),
        )
    }

    #[test]
    fn rows_are_filtered_sorted_and_null_rows_skipped() {
        let history = parse_csv_history(EXPORT, &request()).unwrap();
        assert_eq!(history.ticker, "AAPL");
        assert_eq!(history.closes(), vec![75.09, 74.36]);
        assert_eq!(history.bars()[1].adj_close, 72.44);
    }

    #[test]
    fn nothing_in_range_is_an_error() {
        let late = HistoryRequest::new(
            "AAPL",
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(),
        );
        assert!(parse_csv_history(EXPORT, &late).is_err());
    }

    #[tokio::test]
    async fn directory_source_resolves_ticker_file() {
        let dir = std::env::temp_dir().join(format!("stock_trend_csv_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("AAPL.csv"), EXPORT).unwrap();

        let provider = CsvFileProvider::new(&dir);
        let history = provider.fetch_history(&request()).await.unwrap();
        assert_eq!(history.len(), 2);

        let missing = HistoryRequest::new("MSFT", request().start, request().end);
        assert!(provider.fetch_history(&missing).await.is_err());
    }
}
