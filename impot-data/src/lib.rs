//! Loading year-indexed tax tables from JSON and CSV files.

pub mod config;
pub mod csv_loader;
mod error;

pub use config::{AppConfig, ConfigLoader, TaxYearRecord, TrancheRecord};
pub use csv_loader::{TrancheCsvLoader, TrancheCsvRecord};
pub use error::ConfigLoadError;
