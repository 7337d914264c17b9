use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};

pub struct TimeUtils;

impl TimeUtils {
    pub const SECS_IN_D: i64 = 60 * 60 * 24;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
}

/// Parses a `YYYY-MM-DD` date as typed into the input form or passed on the command line.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), TimeUtils::STANDARD_TIME_FORMAT)
        .with_context(|| format!("'{}' is not a date in YYYY-MM-DD format", text.trim()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(TimeUtils::STANDARD_TIME_FORMAT).to_string()
}

/// The implicit end of every request.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Midnight UTC of `date`, as epoch seconds.
pub fn date_to_epoch_sec(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Calendar date of an epoch timestamp shifted by the exchange's UTC offset.
pub fn epoch_sec_to_date(epoch_sec: i64, gmt_offset_sec: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(epoch_sec + gmt_offset_sec, 0).map(|dt| dt.date_naive())
}
