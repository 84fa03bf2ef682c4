use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Rate;

/// Outcome of a forward or reverse calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Taxable household income.
    pub income: Decimal,

    /// Household tax, rounded to a whole currency unit.
    pub tax: Decimal,

    /// Income left after tax.
    pub remainder: Decimal,

    /// Quotient familial shares the income was divided by.
    pub shares: Decimal,

    /// Household tax owed in each tranche, in table order.
    pub tax_tranches: Vec<TrancheTax>,
}

/// Household tax attributable to a single tranche.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrancheTax {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub rate: Rate,
    pub tax: Decimal,
}
