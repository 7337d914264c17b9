use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::domain::{HistoryRequest, PriceHistory};

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `request.ticker` in `[start, end)`, or an error describing why not.
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceHistory>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

/// Tries each provider in order and returns the first non-empty history.
pub async fn fetch_with_fallback(
    providers: &[Box<dyn MarketDataProvider>],
    request: &HistoryRequest,
) -> Result<(PriceHistory, &'static str)> {
    let mut failures = Vec::new();

    for provider in providers {
        match provider.fetch_history(request).await {
            Ok(history) if !history.is_empty() => {
                log::info!(
                    "{}: {} daily bars for {} from {}",
                    request,
                    history.len(),
                    history.ticker,
                    provider.signature()
                );
                return Ok((history, provider.signature()));
            }
            Ok(_) => {
                log::info!("{} returned no rows for {}", provider.signature(), request);
                failures.push(format!("{}: no rows in range", provider.signature()));
            }
            Err(e) => {
                log::info!("Error with provider {}: {:#}", provider.signature(), e);
                failures.push(format!("{}: {:#}", provider.signature(), e));
            }
        }
    }

    if failures.is_empty() {
        return Err(anyhow!("no market data providers configured"));
    }
    Err(anyhow!("{}", failures.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyBar;
    use chrono::NaiveDate;

    struct Failing;
    struct Empty;
    struct Fixed(usize);

    #[async_trait]
    impl MarketDataProvider for Failing {
        async fn fetch_history(&self, _request: &HistoryRequest) -> Result<PriceHistory> {
            Err(anyhow!("HTTP 404"))
        }
        fn signature(&self) -> &'static str {
            "failing"
        }
    }

    #[async_trait]
    impl MarketDataProvider for Empty {
        async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceHistory> {
            Ok(PriceHistory::new(request.ticker.clone(), Vec::new()))
        }
        fn signature(&self) -> &'static str {
            "empty"
        }
    }

    #[async_trait]
    impl MarketDataProvider for Fixed {
        async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceHistory> {
            let bars = (0..self.0)
                .map(|i| {
                    let date = request.start + chrono::Days::new(i as u64);
                    DailyBar::new(date, 1.0, 1.0, 1.0, 1.0 + i as f64, 10.0)
                })
                .collect();
            Ok(PriceHistory::new(request.ticker.clone(), bars))
        }
        fn signature(&self) -> &'static str {
            "fixed"
        }
    }

    fn request() -> HistoryRequest {
        HistoryRequest::new(
            "aapl",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn first_success_wins() {
        let providers: Vec<Box<dyn MarketDataProvider>> =
            vec![Box::new(Failing), Box::new(Empty), Box::new(Fixed(5))];
        let (history, signature) = fetch_with_fallback(&providers, &request()).await.unwrap();
        assert_eq!(signature, "fixed");
        assert_eq!(history.len(), 5);
    }

    #[tokio::test]
    async fn every_failure_is_reported() {
        let providers: Vec<Box<dyn MarketDataProvider>> = vec![Box::new(Failing), Box::new(Empty)];
        let err = fetch_with_fallback(&providers, &request()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("failing: HTTP 404"));
        assert!(msg.contains("empty: no rows in range"));
    }
}
