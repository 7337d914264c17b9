// Domain types and value objects
pub mod daily_bar;
pub mod history_request;
pub mod price_history;

// Re-export commonly used types
pub use daily_bar::DailyBar;
pub use history_request::HistoryRequest;
pub use price_history::PriceHistory;
