use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::domain::{DailyBar, PriceHistory};
use crate::utils::maths_utils;

/// Columns of the daily price table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize, Deserialize)]
pub enum PriceColumn {
    Open,
    High,
    Low,
    Close,
    #[strum(to_string = "Adj Close")]
    AdjClose,
    Volume,
}

impl PriceColumn {
    pub fn value(&self, bar: &DailyBar) -> f64 {
        match self {
            PriceColumn::Open => bar.open,
            PriceColumn::High => bar.high,
            PriceColumn::Low => bar.low,
            PriceColumn::Close => bar.close,
            PriceColumn::AdjClose => bar.adj_close,
            PriceColumn::Volume => bar.volume,
        }
    }
}

/// One row of the transposed `describe()` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: PriceColumn,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub const HEADERS: [&'static str; 9] =
        ["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Non-finite values are skipped, like missing cells.
    pub fn from_values(column: PriceColumn, values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let (min, max) = maths_utils::get_min_max(&sorted).unwrap_or((f64::NAN, f64::NAN));

        Self {
            column,
            count: sorted.len(),
            mean: maths_utils::mean(&sorted),
            std: maths_utils::std_dev(&sorted),
            min,
            q25: maths_utils::quantile_sorted(&sorted, 0.25),
            median: maths_utils::quantile_sorted(&sorted, 0.5),
            q75: maths_utils::quantile_sorted(&sorted, 0.75),
            max,
        }
    }

    /// Cells after the column label, formatted for a table.
    pub fn cells(&self) -> [String; 8] {
        [
            format!("{}", self.count),
            format_stat(self.mean),
            format_stat(self.std),
            format_stat(self.min),
            format_stat(self.q25),
            format_stat(self.median),
            format_stat(self.q75),
            format_stat(self.max),
        ]
    }
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.4}", value)
    }
}

/// Transposed descriptive statistics: one summary per price column.
pub fn describe(history: &PriceHistory) -> Vec<ColumnSummary> {
    use strum::IntoEnumIterator;

    PriceColumn::iter()
        .map(|column| {
            let values: Vec<f64> = history.bars().iter().map(|b| column.value(b)).collect();
            ColumnSummary::from_values(column, &values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn history(closes: &[f64]) -> PriceHistory {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let date = NaiveDate::from_ymd_opt(2021, 3, 1 + i as u32).unwrap();
                DailyBar::new(date, c - 1.0, c + 1.0, c - 2.0, c, 1_000.0 * (i + 1) as f64)
            })
            .collect();
        PriceHistory::new("TEST", bars)
    }

    #[test]
    fn close_column_matches_describe() {
        let stats = describe(&history(&[1.0, 2.0, 3.0, 4.0]));
        let close = stats.iter().find(|s| s.column == PriceColumn::Close).unwrap();

        assert_eq!(close.count, 4);
        assert!((close.mean - 2.5).abs() < 1e-12);
        assert!((close.std - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert_eq!(close.min, 1.0);
        assert!((close.q25 - 1.75).abs() < 1e-12);
        assert!((close.median - 2.5).abs() < 1e-12);
        assert!((close.q75 - 3.25).abs() < 1e-12);
        assert_eq!(close.max, 4.0);
    }

    #[test]
    fn every_column_is_summarised_in_order() {
        let stats = describe(&history(&[5.0, 6.0]));
        let names: Vec<String> = stats.iter().map(|s| s.column.to_string()).collect();
        assert_eq!(names, ["Open", "High", "Low", "Close", "Adj Close", "Volume"]);

        let volume = &stats[5];
        assert_eq!(volume.max, 2_000.0);
    }

    #[test]
    fn single_row_has_undefined_std() {
        let stats = describe(&history(&[7.0]));
        assert!(stats[3].std.is_nan());
        assert_eq!(stats[3].cells()[2], "NaN");
    }
}
