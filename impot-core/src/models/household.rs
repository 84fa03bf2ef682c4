use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// The taxpayer household and the figure driving the calculation.
///
/// Forward calculations read `income`; reverse calculations read
/// `target_remainder`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    pub income: Option<Decimal>,
    pub target_remainder: Option<Decimal>,
    pub is_in_couple: bool,
    pub children: i32,
}

impl Household {
    /// A single household with no children, taxed on `income`.
    pub fn with_income(income: Decimal) -> Self {
        Self {
            income: Some(income),
            ..Default::default()
        }
    }

    /// A single household with no children, solving for `remainder`.
    pub fn with_target_remainder(remainder: Decimal) -> Self {
        Self {
            target_remainder: Some(remainder),
            ..Default::default()
        }
    }

    pub fn in_couple(
        mut self,
        is_in_couple: bool,
    ) -> Self {
        self.is_in_couple = is_in_couple;
        self
    }

    pub fn children(
        mut self,
        children: i32,
    ) -> Self {
        self.children = children;
        self
    }

    /// Children count, rejected when negative.
    pub fn children_count(&self) -> Result<u32, InputError> {
        u32::try_from(self.children).map_err(|_| InputError::NegativeChildren(self.children))
    }

    /// Same household, asking for the income that leaves `remainder`.
    pub fn seeking_remainder(
        &self,
        remainder: Decimal,
    ) -> Self {
        Self {
            income: None,
            target_remainder: Some(remainder),
            ..self.clone()
        }
    }
}
