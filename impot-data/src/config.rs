//! JSON configuration files.
//!
//! ## Format
//!
//! ```json
//! {
//!   "name": "Impot",
//!   "version": "1.0.0",
//!   "default_year": 2022,
//!   "tax": [
//!     {
//!       "year": 2022,
//!       "tranches": [
//!         { "min": 0, "max": 10225, "rate": "0%" },
//!         { "min": 10226, "rate": "11%" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! `name`, `version` and `default_year` are optional; without `default_year`
//! the first listed year is the fallback. The top tranche leaves `max` out (or
//! sets it to `null`). Files written for older versions use `i64::MAX` as the
//! top tranche's `max`; that value is read as unbounded too.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use impot_core::{BracketTable, ConfigurationError, TaxTableSet, Tranche};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ConfigLoadError;

const DEFAULT_CONFIG: &str = include_str!("../resources/default_config.json");

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub default_year: Option<i32>,
    pub tax: Vec<TaxYearRecord>,
}

/// Tranches of one fiscal year, as written in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxYearRecord {
    pub year: i32,
    pub tranches: Vec<TrancheRecord>,
}

/// A single tranche, as written in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrancheRecord {
    pub min: Decimal,
    #[serde(default)]
    pub max: Option<Decimal>,
    pub rate: String,
}

impl TrancheRecord {
    pub fn to_tranche(&self) -> Result<Tranche, ConfigurationError> {
        Ok(Tranche {
            min: self.min,
            max: unbounded_sentinel_to_none(self.max),
            rate: self.rate.parse()?,
        })
    }
}

impl TaxYearRecord {
    pub fn to_table(&self) -> Result<BracketTable, ConfigurationError> {
        let tranches = self
            .tranches
            .iter()
            .map(TrancheRecord::to_tranche)
            .collect::<Result<Vec<_>, _>>()?;
        BracketTable::new(self.year, tranches)
    }
}

impl AppConfig {
    /// Validates every year and builds the table set.
    pub fn table_set(&self) -> Result<TaxTableSet, ConfigurationError> {
        let tables = self
            .tax
            .iter()
            .map(TaxYearRecord::to_table)
            .collect::<Result<Vec<_>, _>>()?;
        TaxTableSet::new(tables, self.default_year)
    }
}

/// Maps the legacy "max int" top tranche bound to an open-ended tranche.
pub(crate) fn unbounded_sentinel_to_none(max: Option<Decimal>) -> Option<Decimal> {
    max.filter(|m| *m < Decimal::from(i64::MAX))
}

/// Loader for JSON configuration files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parse a configuration from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<AppConfig, ConfigLoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse the configuration file at `path`.
    pub fn from_file(path: &Path) -> Result<AppConfig, ConfigLoadError> {
        let file = File::open(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(file)?;
        info!(
            path = %path.display(),
            years = config.tax.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// The configuration shipped with the crate.
    pub fn builtin() -> Result<AppConfig, ConfigLoadError> {
        Self::parse(DEFAULT_CONFIG.as_bytes())
    }

    /// Load and validate the tables in the configuration file at `path`.
    pub fn load_table_set(path: &Path) -> Result<TaxTableSet, ConfigLoadError> {
        Ok(Self::from_file(path)?.table_set()?)
    }

    /// Validated tables of the shipped configuration.
    pub fn builtin_table_set() -> Result<TaxTableSet, ConfigLoadError> {
        Ok(Self::builtin()?.table_set()?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_JSON: &str = r#"{
        "tax": [
            {
                "year": 2022,
                "tranches": [
                    { "min": 0, "max": 10225, "rate": "0%" },
                    { "min": 10226, "rate": "11%" }
                ]
            }
        ]
    }"#;

    // =========================================================================
    // parse tests
    // =========================================================================

    #[test]
    fn test_parse_minimal_config() {
        let config = ConfigLoader::parse(MINIMAL_JSON.as_bytes()).expect("Failed to parse JSON");

        assert_eq!(config.name, None);
        assert_eq!(config.default_year, None);
        assert_eq!(config.tax.len(), 1);
        assert_eq!(
            config.tax[0].tranches[1],
            TrancheRecord {
                min: dec!(10226),
                max: None,
                rate: "11%".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = ConfigLoader::parse("{ not json".as_bytes());

        let err = result.expect_err("Should fail for malformed JSON");
        assert!(matches!(err, ConfigLoadError::JsonParse(_)), "got {err:?}");
    }

    #[test]
    fn test_parse_missing_tax_list() {
        let result = ConfigLoader::parse(r#"{ "name": "x" }"#.as_bytes());

        let err = result.expect_err("Should fail without tax list");
        assert!(err.to_string().contains("missing field"), "got {err}");
    }

    // =========================================================================
    // conversion tests
    // =========================================================================

    #[test]
    fn test_table_set_from_minimal_config() {
        let config = ConfigLoader::parse(MINIMAL_JSON.as_bytes()).unwrap();

        let set = config.table_set().expect("Config should be valid");

        assert_eq!(set.default_year(), 2022);
        let table = set.select(2022);
        assert_eq!(table.tranches()[1].rate.fraction(), dec!(0.11));
        assert_eq!(table.tranches()[1].max, None);
    }

    #[test]
    fn test_sentinel_max_becomes_unbounded() {
        assert_eq!(
            unbounded_sentinel_to_none(Some(Decimal::from(i64::MAX))),
            None
        );
        assert_eq!(
            unbounded_sentinel_to_none(Some(dec!(160336))),
            Some(dec!(160336))
        );
        assert_eq!(unbounded_sentinel_to_none(None), None);
    }

    #[test]
    fn test_invalid_rate_is_configuration_error() {
        let record = TrancheRecord {
            min: dec!(0),
            max: None,
            rate: "eleven%".to_string(),
        };

        assert_eq!(
            record.to_tranche(),
            Err(ConfigurationError::InvalidRate("eleven%".to_string()))
        );
    }

    #[test]
    fn test_empty_year_is_rejected() {
        let record = TaxYearRecord {
            year: 2023,
            tranches: vec![],
        };

        assert_eq!(
            record.to_table(),
            Err(ConfigurationError::EmptyTable { year: 2023 })
        );
    }

    #[test]
    fn test_empty_tax_list_is_rejected() {
        let config = ConfigLoader::parse(r#"{ "tax": [] }"#.as_bytes()).unwrap();

        assert_eq!(config.table_set(), Err(ConfigurationError::NoTables));
    }

    // =========================================================================
    // builtin tests
    // =========================================================================

    #[test]
    fn test_builtin_config_is_valid() {
        let set = ConfigLoader::builtin_table_set().expect("Shipped config should be valid");

        assert_eq!(set.years().collect::<Vec<_>>(), vec![2019, 2020, 2021, 2022]);
        assert_eq!(set.default_year(), 2022);
    }

    #[test]
    fn test_builtin_2019_has_fourteen_percent_tranche() {
        let set = ConfigLoader::builtin_table_set().unwrap();

        let table = set.get(2019).expect("2019 should be configured");
        assert_eq!(table.tranches()[1].rate.to_string(), "14%");
        assert_eq!(table.tranches()[1].max, Some(dec!(27794)));
    }
}
