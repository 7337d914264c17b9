use std::path::PathBuf;

use anyhow::Result;

use crate::data::csv_file::CsvFileProvider;
use crate::data::provider::MarketDataProvider;
use crate::data::yahoo::{YahooProvider, YahooSettings};

/// Which providers to try, and in what order.
#[derive(Debug, Clone, Default)]
pub struct DataSources {
    /// CSV file, or directory of `<TICKER>.csv` files
    pub csv_path: Option<PathBuf>,
    /// Try the CSV source before Yahoo
    pub prefer_csv: bool,
    /// Skip Yahoo entirely
    pub offline: bool,
}

impl DataSources {
    pub fn build(&self) -> Result<Vec<Box<dyn MarketDataProvider>>> {
        let mut providers: Vec<Box<dyn MarketDataProvider>> = Vec::new();

        if !self.offline {
            providers.push(Box::new(YahooProvider::new(YahooSettings::default())?));
        }
        if let Some(path) = &self.csv_path {
            let csv = Box::new(CsvFileProvider::new(path.clone()));
            if self.prefer_csv {
                providers.insert(0, csv);
            } else {
                providers.push(csv);
            }
        }

        Ok(providers)
    }

    /// Human readable provider order, for the side panel
    pub fn describe(&self) -> String {
        let names: Vec<&str> = self
            .build()
            .map(|providers| providers.iter().map(|p| p.signature()).collect())
            .unwrap_or_default();
        if names.is_empty() {
            "no data source".to_string()
        } else {
            names.join(" → ")
        }
    }
}
