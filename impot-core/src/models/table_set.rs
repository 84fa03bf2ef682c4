use std::collections::BTreeMap;

use chrono::{Datelike, Local};
use tracing::{debug, warn};

use super::BracketTable;
use crate::error::ConfigurationError;

/// Bracket tables keyed by fiscal year, with a designated fallback year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTableSet {
    tables: BTreeMap<i32, BracketTable>,
    default_year: i32,
}

impl TaxTableSet {
    /// Builds the set. Without an explicit `default_year` the first table in
    /// `tables` is the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if `tables` is empty, a year appears
    /// twice, or `default_year` has no table.
    pub fn new(
        tables: Vec<BracketTable>,
        default_year: Option<i32>,
    ) -> Result<Self, ConfigurationError> {
        let first_year = tables
            .first()
            .map(BracketTable::year)
            .ok_or(ConfigurationError::NoTables)?;
        let default_year = default_year.unwrap_or(first_year);

        let mut by_year = BTreeMap::new();
        for table in tables {
            let year = table.year();
            if by_year.insert(year, table).is_some() {
                return Err(ConfigurationError::DuplicateYear(year));
            }
        }

        if !by_year.contains_key(&default_year) {
            return Err(ConfigurationError::UnknownDefaultYear(default_year));
        }

        Ok(Self {
            tables: by_year,
            default_year,
        })
    }

    pub fn get(
        &self,
        year: i32,
    ) -> Option<&BracketTable> {
        self.tables.get(&year)
    }

    /// Table for `year`, or the default table when that year is not configured.
    pub fn select(
        &self,
        year: i32,
    ) -> &BracketTable {
        match self.tables.get(&year) {
            Some(table) => {
                debug!(year, "selected tax table");
                table
            }
            None => {
                warn!(
                    year,
                    default_year = self.default_year,
                    "no tax table for requested year, using default"
                );
                self.default_table()
            }
        }
    }

    /// Table for the current calendar year, falling back to the default.
    ///
    /// Unlike [`TaxTableSet::select`], the fallback is only logged at debug
    /// level since no year was asked for.
    pub fn for_current_year(&self) -> &BracketTable {
        let year = Local::now().year();
        match self.tables.get(&year) {
            Some(table) => {
                debug!(year, "selected tax table for current year");
                table
            }
            None => {
                debug!(
                    year,
                    default_year = self.default_year,
                    "no tax table for current year, using default"
                );
                self.default_table()
            }
        }
    }

    pub fn default_year(&self) -> i32 {
        self.default_year
    }

    pub fn default_table(&self) -> &BracketTable {
        // Presence of the default year is checked in `new`.
        &self.tables[&self.default_year]
    }

    /// Configured years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.tables.keys().copied()
    }

    pub fn tables(&self) -> impl Iterator<Item = &BracketTable> {
        self.tables.values()
    }
}
