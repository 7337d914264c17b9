use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::daily_bar::DailyBar;

/// Daily bars for one ticker, chronologically sorted with no duplicate dates.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PriceHistory {
    pub ticker: String,
    bars: Vec<DailyBar>,
}

impl PriceHistory {
    /// Sorts by date, keeps the first bar seen for each date and drops bars without a usable close.
    pub fn new(ticker: impl Into<String>, mut bars: Vec<DailyBar>) -> Self {
        let ticker = ticker.into();
        let original_len = bars.len();

        bars.retain(DailyBar::has_valid_close);
        // Stable sort so the first bar per date survives dedup
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);

        if bars.len() < original_len {
            log::warn!(
                "{}: dropped {} invalid or duplicate bars",
                ticker,
                original_len - bars.len()
            );
        }

        Self { ticker, bars }
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}
