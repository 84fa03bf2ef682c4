use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Rate;

/// One income band of a bracket table. `max` is `None` for the open-ended top band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tranche {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub rate: Rate,
}

impl Tranche {
    pub fn new(
        min: Decimal,
        max: Decimal,
        rate: Rate,
    ) -> Self {
        Self {
            min,
            max: Some(max),
            rate,
        }
    }

    pub fn unbounded(
        min: Decimal,
        rate: Rate,
    ) -> Self {
        Self {
            min,
            max: None,
            rate,
        }
    }

    /// Part of `income` that falls inside this tranche.
    pub fn taxable_portion(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income <= self.min {
            return Decimal::ZERO;
        }
        let upper = match self.max {
            Some(max) => income.min(max),
            None => income,
        };
        upper - self.min
    }

    /// Tax owed on the part of `income` that falls inside this tranche.
    pub fn tax_on(
        &self,
        income: Decimal,
    ) -> Decimal {
        self.taxable_portion(income) * self.rate.fraction()
    }

    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income >= self.min && self.max.is_none_or(|max| income <= max)
    }
}
