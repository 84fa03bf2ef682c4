use std::path::PathBuf;

use impot_core::ConfigurationError;
use thiserror::Error;

/// Errors that can occur when loading tax tables.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid tax configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl From<csv::Error> for ConfigLoadError {
    fn from(err: csv::Error) -> Self {
        ConfigLoadError::CsvParse(err.to_string())
    }
}
