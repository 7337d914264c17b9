use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What the user asked for: a ticker and a closed-open date range.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct HistoryRequest {
    pub ticker: String,
    pub start: NaiveDate,
    /// Exclusive, like the provider's `period2`
    pub end: NaiveDate,
}

impl HistoryRequest {
    pub fn new(ticker: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: Self::normalize_ticker(ticker),
            start,
            end,
        }
    }

    /// Tickers are compared case-insensitively and stored upper case ("aapl " -> "AAPL").
    pub fn normalize_ticker(text: &str) -> String {
        text.trim().to_uppercase()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.ticker.is_empty() {
            return Err("Ticker is empty".to_string());
        }
        if self.ticker.chars().any(char::is_whitespace) {
            return Err(format!("Ticker '{}' contains whitespace", self.ticker));
        }
        if self.start >= self.end {
            return Err(format!(
                "Start date {} must be before end date {}",
                self.start, self.end
            ));
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

impl fmt::Display for HistoryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} .. {})", self.ticker, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ticker_is_trimmed_and_uppercased() {
        let req = HistoryRequest::new("  msft ", date(2010, 1, 1), date(2011, 1, 1));
        assert_eq!(req.ticker, "MSFT");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_ticker_and_inverted_range_are_rejected() {
        assert!(
            HistoryRequest::new("", date(2010, 1, 1), date(2011, 1, 1))
                .validate()
                .is_err()
        );
        assert!(
            HistoryRequest::new("AAPL", date(2012, 1, 1), date(2011, 1, 1))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn end_date_is_exclusive() {
        let req = HistoryRequest::new("AAPL", date(2010, 1, 1), date(2010, 1, 5));
        assert!(req.contains(date(2010, 1, 1)));
        assert!(req.contains(date(2010, 1, 4)));
        assert!(!req.contains(date(2010, 1, 5)));
    }
}
