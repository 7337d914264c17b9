// Market data providers
pub mod csv_file;
pub mod provider;
pub mod sources;
pub mod yahoo;

// Re-export commonly used types
pub use csv_file::CsvFileProvider;
pub use provider::{MarketDataProvider, fetch_with_fallback};
pub use sources::DataSources;
pub use yahoo::{YahooProvider, YahooSettings};
