//! Configuration module for the stock trend dashboard.

pub mod analysis;
pub mod provider;

mod debug; // Private: use crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod persistence;
pub mod plot;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig};
pub use persistence::PERSISTENCE;
pub use provider::PROVIDER;
