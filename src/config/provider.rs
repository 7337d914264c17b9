//! Market data provider configuration constants.

/// Configuration for the Yahoo Finance chart endpoint
pub struct YahooConfig {
    pub base_url: &'static str,
    /// Only daily candles are requested
    pub interval: &'static str,
    /// Yahoo rejects requests without a browser-like agent
    pub user_agent: &'static str,
}

/// Default values for the Rest Client
pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

/// The Master Provider Configuration
pub struct ProviderConfig {
    pub yahoo: YahooConfig,
    pub client: ClientDefaults,
    /// Label shown under the input form
    pub source_label: &'static str,
}

pub const PROVIDER: ProviderConfig = ProviderConfig {
    yahoo: YahooConfig {
        base_url: "https://query1.finance.yahoo.com",
        interval: "1d",
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) stock-trend/0.1",
    },
    client: ClientDefaults {
        timeout_ms: 10_000,
        retries: 3,
        backoff_ms: 1_500,
    },
    source_label: "Yahoo Finance",
};
