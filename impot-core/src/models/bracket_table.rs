use rust_decimal::Decimal;
use serde::Serialize;

use super::{Rate, Tranche};
use crate::error::ConfigurationError;

/// The ordered tranches of one fiscal year.
///
/// A table can only be built through [`BracketTable::new`], which sorts the
/// tranches and rejects anything the engine could not tax correctly.
///
/// ```
/// use impot_core::{BracketTable, Tranche};
/// use rust_decimal::Decimal;
///
/// let table = BracketTable::new(
///     2022,
///     vec![
///         Tranche::new(Decimal::ZERO, Decimal::from(10225), "0%".parse().unwrap()),
///         Tranche::unbounded(Decimal::from(10226), "11%".parse().unwrap()),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(table.tranches().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    year: i32,
    tranches: Vec<Tranche>,
}

impl BracketTable {
    /// Sorts `tranches` by their lower bound and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the table is empty, does not start at
    /// zero, has overlapping or non-contiguous tranches, or its top tranche is
    /// not the only unbounded one.
    pub fn new(
        year: i32,
        mut tranches: Vec<Tranche>,
    ) -> Result<Self, ConfigurationError> {
        tranches.sort_by(|a, b| a.min.cmp(&b.min));
        validate(year, &tranches)?;
        Ok(Self { year, tranches })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn tranches(&self) -> &[Tranche] {
        &self.tranches
    }

    /// Tranche whose bounds contain `income`, if any.
    ///
    /// Incomes falling between an integer boundary and the next tranche's
    /// minimum (e.g. 10225.5 with tranches ending at 10225 and starting at
    /// 10226) belong to no tranche.
    pub fn tranche_for(
        &self,
        income: Decimal,
    ) -> Option<&Tranche> {
        self.tranches.iter().find(|t| t.contains(income))
    }

    /// Highest rate of any tranche.
    pub fn top_rate(&self) -> Rate {
        self.tranches
            .iter()
            .map(|t| t.rate)
            .max()
            .unwrap_or(Rate::ZERO)
    }
}

fn validate(
    year: i32,
    tranches: &[Tranche],
) -> Result<(), ConfigurationError> {
    let (first, last) = match (tranches.first(), tranches.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ConfigurationError::EmptyTable { year }),
    };

    if first.min != Decimal::ZERO {
        return Err(ConfigurationError::FirstTrancheNotAtZero {
            year,
            min: first.min,
        });
    }

    for tranche in tranches {
        if let Some(max) = tranche.max {
            if max < tranche.min {
                return Err(ConfigurationError::InvertedTranche {
                    year,
                    min: tranche.min,
                    max,
                });
            }
        }
    }

    for pair in tranches.windows(2) {
        let (previous, next) = (&pair[0], &pair[1]);
        let Some(previous_max) = previous.max else {
            return Err(ConfigurationError::UnboundedBeforeLast {
                year,
                min: previous.min,
            });
        };
        if next.min < previous_max || next.min == previous.min {
            return Err(ConfigurationError::OverlappingTranches {
                year,
                min: next.min,
                previous_max,
            });
        }
        // Either a shared boundary or the next whole unit.
        if next.min - previous_max > Decimal::ONE {
            return Err(ConfigurationError::GapBetweenTranches {
                year,
                previous_max,
                min: next.min,
            });
        }
    }

    if let Some(max) = last.max {
        return Err(ConfigurationError::BoundedTopTranche { year, max });
    }

    Ok(())
}
