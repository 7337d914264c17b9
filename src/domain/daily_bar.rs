use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day as returned by a market data provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
}

impl DailyBar {
    // A constructor for convenience. Adjusted close defaults to close.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        DailyBar {
            date,
            open,
            high,
            low,
            close,
            adj_close: close,
            volume,
        }
    }

    pub fn with_adj_close(mut self, adj_close: f64) -> Self {
        self.adj_close = adj_close;
        self
    }

    /// A bar is only usable when its close is a real number.
    pub fn has_valid_close(&self) -> bool {
        self.close.is_finite()
    }
}
