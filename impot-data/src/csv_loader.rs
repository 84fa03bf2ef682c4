//! CSV loader for tranche tables.
//!
//! ## CSV Format
//!
//! | Column | Required | Type    | Notes |
//! |--------|----------|---------|-------|
//! | `year` | yes      | integer | e.g. `2022` |
//! | `min`  | yes      | decimal | lower bound of the tranche |
//! | `max`  | no       | decimal | leave empty for the top tranche |
//! | `rate` | yes      | string  | percentage, e.g. `11%` |
//!
//! ```csv
//! year,min,max,rate
//! 2022,0,10225,0%
//! 2022,10226,26070,11%
//! 2022,160337,,45%
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use impot_core::{BracketTable, TaxTableSet, Tranche};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::ConfigLoadError;
use crate::config::unbounded_sentinel_to_none;

/// A single record from the tranches CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TrancheCsvRecord {
    pub year: i32,
    pub min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max: Option<Decimal>,
    pub rate: String,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for tranche tables stored as CSV.
///
/// Rows may appear in any order; they are grouped by `year` and each group
/// becomes one validated [`BracketTable`].
pub struct TrancheCsvLoader;

impl TrancheCsvLoader {
    /// Parse tranche records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TrancheCsvRecord>, ConfigLoadError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TrancheCsvRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records by year into validated tables, oldest year first.
    pub fn into_tables(records: &[TrancheCsvRecord]) -> Result<Vec<BracketTable>, ConfigLoadError> {
        let mut groups: BTreeMap<i32, Vec<Tranche>> = BTreeMap::new();

        for record in records {
            let tranche = Tranche {
                min: record.min,
                max: unbounded_sentinel_to_none(record.max),
                rate: record.rate.parse()?,
            };
            groups.entry(record.year).or_default().push(tranche);
        }

        let mut tables = Vec::with_capacity(groups.len());
        for (year, tranches) in groups {
            tables.push(BracketTable::new(year, tranches)?);
        }

        Ok(tables)
    }

    /// Load the CSV file at `path` into a table set.
    ///
    /// The most recent year in the file is the default.
    pub fn load_table_set(path: &Path) -> Result<TaxTableSet, ConfigLoadError> {
        let file = File::open(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records = Self::parse(file)?;
        let tables = Self::into_tables(&records)?;
        let latest = tables.last().map(BracketTable::year);

        info!(
            path = %path.display(),
            records = records.len(),
            years = tables.len(),
            "loaded tranches"
        );

        Ok(TaxTableSet::new(tables, latest)?)
    }
}
