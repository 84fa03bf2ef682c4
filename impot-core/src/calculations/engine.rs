//! Forward tax calculation.
//!
//! # Method
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Shares from household composition |
//! | 2    | Per-share income: income ÷ shares |
//! | 3    | Per-share tax: sum over tranches of (portion in tranche × rate) |
//! | 4    | Household tax: per-share tax × shares, rounded to a whole unit |
//! | 5    | Remainder: income − household tax |
//!
//! Rounding only happens on the household totals so that per-tranche
//! rounding does not accumulate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use impot_core::{BracketTable, Household, TaxEngine, Tranche};
//!
//! let table = BracketTable::new(
//!     2022,
//!     vec![
//!         Tranche::new(dec!(0), dec!(10225), "0%".parse().unwrap()),
//!         Tranche::new(dec!(10226), dec!(26070), "11%".parse().unwrap()),
//!         Tranche::new(dec!(26071), dec!(74545), "30%".parse().unwrap()),
//!         Tranche::new(dec!(74546), dec!(160336), "41%".parse().unwrap()),
//!         Tranche::unbounded(dec!(160337), "45%".parse().unwrap()),
//!     ],
//! )
//! .unwrap();
//!
//! let household = Household::with_income(dec!(60000)).in_couple(true).children(2);
//! let result = TaxEngine::new(&table).calculate(&household).unwrap();
//!
//! assert_eq!(result.shares, dec!(3));
//! assert_eq!(result.tax, dec!(3225));
//! assert_eq!(result.remainder, dec!(56775));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use super::common::round_to_unit;
use super::reverse::ReverseSearch;
use super::shares::get_shares;
use crate::error::{InputError, TaxError};
use crate::models::{BracketTable, Household, TaxResult, TrancheTax};

/// Calculator applying one year's bracket table to households.
#[derive(Debug, Clone)]
pub struct TaxEngine<'a> {
    pub(super) table: &'a BracketTable,
    pub(super) search: ReverseSearch,
}

impl<'a> TaxEngine<'a> {
    /// Creates an engine for `table` with the default reverse search settings.
    pub fn new(table: &'a BracketTable) -> Self {
        Self {
            table,
            search: ReverseSearch::default(),
        }
    }

    /// Replaces the reverse search settings.
    pub fn with_search(
        mut self,
        search: ReverseSearch,
    ) -> Self {
        self.search = search;
        self
    }

    pub fn table(&self) -> &BracketTable {
        self.table
    }

    /// Calculates the tax owed on `household.income`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::Input`] if the income is missing or negative, or the
    /// children count is negative.
    pub fn calculate(
        &self,
        household: &Household,
    ) -> Result<TaxResult, TaxError> {
        let income = household.income.ok_or(InputError::MissingIncome)?;
        if income < Decimal::ZERO {
            return Err(InputError::NegativeIncome(income).into());
        }
        let children = household.children_count()?;

        let shares = get_shares(household.is_in_couple, children);
        let result = self.evaluate(income, shares);

        debug!(
            year = self.table.year(),
            %income,
            %shares,
            tax = %result.tax,
            remainder = %result.remainder,
            "calculated tax"
        );

        Ok(result)
    }

    /// Applies the table to `income` split over `shares`.
    ///
    /// `shares` is always at least one, so the division is defined.
    pub(super) fn evaluate(
        &self,
        income: Decimal,
        shares: Decimal,
    ) -> TaxResult {
        let per_share_income = income / shares;

        let mut per_share_tax = Decimal::ZERO;
        let mut tax_tranches = Vec::with_capacity(self.table.tranches().len());
        for tranche in self.table.tranches() {
            let tranche_tax = tranche.tax_on(per_share_income);
            per_share_tax += tranche_tax;
            tax_tranches.push(TrancheTax {
                min: tranche.min,
                max: tranche.max,
                rate: tranche.rate,
                tax: round_to_unit(tranche_tax * shares),
            });
        }

        let tax = round_to_unit(per_share_tax * shares);

        TaxResult {
            income,
            tax,
            remainder: income - tax,
            shares,
            tax_tranches,
        }
    }
}

/// Calculates the tax owed by `household` under `table`.
///
/// Shorthand for `TaxEngine::new(table).calculate(household)`.
pub fn calculate_tax(
    household: &Household,
    table: &BracketTable,
) -> Result<TaxResult, TaxError> {
    TaxEngine::new(table).calculate(household)
}
