use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// A marginal tax rate stored as a fraction in `[0, 1]`.
///
/// Configuration files express rates as percentage strings (`"30%"`); they are
/// parsed once when the table is loaded.
///
/// ```
/// use impot_core::Rate;
/// use rust_decimal::Decimal;
///
/// let rate: Rate = "11%".parse().unwrap();
/// assert_eq!(rate.fraction(), Decimal::new(11, 2));
/// assert_eq!(rate.to_string(), "11%");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// Builds a rate from a percentage such as `30` for 30%.
    pub fn from_percent(percent: Decimal) -> Result<Self, ConfigurationError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(ConfigurationError::RateOutOfRange(percent));
        }
        Ok(Self(percent / Decimal::ONE_HUNDRED))
    }

    pub fn fraction(&self) -> Decimal {
        self.0
    }

    pub fn percent(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).normalize()
    }
}

impl FromStr for Rate {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
        let percent = Decimal::from_str(number)
            .map_err(|_| ConfigurationError::InvalidRate(s.to_string()))?;
        Self::from_percent(percent)
    }
}

impl TryFrom<String> for Rate {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rate> for String {
    fn from(rate: Rate) -> Self {
        rate.to_string()
    }
}

impl fmt::Display for Rate {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}
