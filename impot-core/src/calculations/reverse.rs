//! Reverse tax calculation: the income that leaves a target remainder.
//!
//! The remainder `income - tax(income)` never decreases as income grows
//! (no rate exceeds 100%), so a bisection over whole-unit incomes finds the
//! smallest income whose remainder reaches the target. The search is an
//! explicit loop bounded by [`ReverseSearch::max_iterations`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::engine::{TaxEngine, calculate_tax};
use super::shares::get_shares;
use crate::error::{ConvergenceError, InputError, TaxError};
use crate::models::{BracketTable, Household, TaxResult};

/// Settings bounding the reverse search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseSearch {
    /// Largest accepted distance between the found and the target remainder.
    pub tolerance: Decimal,

    /// Maximum number of bisection probes.
    pub max_iterations: u32,

    /// Highest income the search will consider.
    pub income_ceiling: Decimal,
}

impl Default for ReverseSearch {
    fn default() -> Self {
        Self {
            tolerance: Decimal::ONE,
            max_iterations: 64,
            income_ceiling: Decimal::from(1_000_000_000_000_i64),
        }
    }
}

impl TaxEngine<'_> {
    /// Finds the income that leaves `household.target_remainder` after tax.
    ///
    /// Returns the forward result at the smallest whole-unit income whose
    /// remainder reaches the target.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::Input`] if the target is missing or negative or the
    /// children count is negative, and [`TaxError::Convergence`] if no income
    /// below the ceiling reaches the target within the tolerance and
    /// iteration budget.
    pub fn calculate_reverse(
        &self,
        household: &Household,
    ) -> Result<TaxResult, TaxError> {
        let target = household
            .target_remainder
            .ok_or(InputError::MissingTargetRemainder)?;
        if target < Decimal::ZERO {
            return Err(InputError::NegativeRemainder(target).into());
        }
        let children = household.children_count()?;
        let shares = get_shares(household.is_in_couple, children);

        let mut high = self.upper_bound(target)?;
        let out_of_range = ConvergenceError::OutOfRange {
            target,
            ceiling: high,
        };
        let lowest_accepted = target
            .checked_sub(self.search.tolerance)
            .ok_or_else(|| out_of_range.clone())?;
        if self.evaluate(high, shares).remainder < lowest_accepted {
            return Err(out_of_range.into());
        }

        let mut low = Decimal::ZERO;
        let mut iterations = 0;
        while low < high {
            if iterations == self.search.max_iterations {
                return Err(ConvergenceError::IterationBudgetExhausted {
                    target,
                    iterations,
                }
                .into());
            }
            iterations += 1;

            let mid = ((low + high) / Decimal::TWO).floor();
            let remainder = self.evaluate(mid, shares).remainder;
            trace!(%low, %high, %mid, %remainder, "reverse search probe");
            if remainder >= target {
                high = mid;
            } else {
                low = mid + Decimal::ONE;
            }
        }

        let result = self.evaluate(low, shares);
        if (result.remainder - target).abs() > self.search.tolerance {
            return Err(ConvergenceError::NotWithinTolerance {
                target,
                closest: result.remainder,
                tolerance: self.search.tolerance,
            }
            .into());
        }

        debug!(
            year = self.table.year(),
            %target,
            income = %result.income,
            tax = %result.tax,
            iterations,
            "solved income for remainder"
        );

        Ok(result)
    }

    /// Whole-unit income whose remainder is guaranteed to reach `target`.
    ///
    /// Household tax never exceeds `income × top rate`, so beyond
    /// `(target + tolerance + 1) / (1 - top rate)` the remainder is past the
    /// target.
    fn upper_bound(
        &self,
        target: Decimal,
    ) -> Result<Decimal, ConvergenceError> {
        let ceiling = self.search.income_ceiling;
        let keep = Decimal::ONE - self.table.top_rate().fraction();
        if keep <= Decimal::ZERO {
            return Ok(ceiling);
        }

        let bound = target
            .checked_add(self.search.tolerance)
            .and_then(|t| t.checked_add(Decimal::ONE))
            .and_then(|t| t.checked_div(keep))
            .map(|b| b.ceil());
        match bound {
            Some(bound) if bound <= ceiling => Ok(bound),
            _ => Err(ConvergenceError::OutOfRange { target, ceiling }),
        }
    }
}

/// Finds the income leaving `household.target_remainder` under `table`.
///
/// Shorthand for `TaxEngine::new(table).calculate_reverse(household)`.
pub fn calculate_reverse_tax(
    household: &Household,
    table: &BracketTable,
) -> Result<TaxResult, TaxError> {
    TaxEngine::new(table).calculate_reverse(household)
}

/// Forward calculation followed by the reverse search on its remainder.
///
/// Useful to check how far the reverse search lands from a known income.
pub fn round_trip(
    household: &Household,
    table: &BracketTable,
) -> Result<(TaxResult, TaxResult), TaxError> {
    let forward = calculate_tax(household, table)?;
    let reverse = calculate_reverse_tax(&household.seeking_remainder(forward.remainder), table)?;
    Ok((forward, reverse))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::Tranche;

    fn table_2022() -> BracketTable {
        BracketTable::new(
            2022,
            vec![
                Tranche::new(dec!(0), dec!(10225), "0%".parse().unwrap()),
                Tranche::new(dec!(10226), dec!(26070), "11%".parse().unwrap()),
                Tranche::new(dec!(26071), dec!(74545), "30%".parse().unwrap()),
                Tranche::new(dec!(74546), dec!(160336), "41%".parse().unwrap()),
                Tranche::unbounded(dec!(160337), "45%".parse().unwrap()),
            ],
        )
        .unwrap()
    }

    // =========================================================================
    // known remainder tests
    // =========================================================================

    #[test]
    fn finds_income_for_single_person() {
        let table = table_2022();

        let result =
            calculate_reverse_tax(&Household::with_target_remainder(dec!(27078)), &table).unwrap();

        // 29999 already leaves 27078 once its 2921.24 tax is rounded
        assert_eq!(result.income, dec!(29999));
        assert_eq!(result.tax, dec!(2921));
        assert_eq!(result.remainder, dec!(27078));
    }

    #[test]
    fn finds_income_for_couple_with_two_children() {
        let table = table_2022();
        let household = Household::with_target_remainder(dec!(56775))
            .in_couple(true)
            .children(2);

        let result = calculate_reverse_tax(&household, &table).unwrap();

        assert_eq!(result.remainder, dec!(56775));
        assert_eq!(result.shares, dec!(3));
        assert!((result.income - dec!(60000)).abs() <= dec!(1));
    }

    #[test]
    fn remainder_inside_zero_rate_tranche_is_the_income() {
        let table = table_2022();

        let result =
            calculate_reverse_tax(&Household::with_target_remainder(dec!(8000)), &table).unwrap();

        assert_eq!(result.income, dec!(8000));
        assert_eq!(result.tax, dec!(0));
    }

    #[test]
    fn zero_remainder_needs_zero_income() {
        let table = table_2022();

        let result =
            calculate_reverse_tax(&Household::with_target_remainder(dec!(0)), &table).unwrap();

        assert_eq!(result.income, dec!(0));
        assert_eq!(result.remainder, dec!(0));
    }

    // =========================================================================
    // round trip tests
    // =========================================================================

    #[test]
    fn round_trip_recovers_income_within_tolerance() {
        let table = table_2022();

        for income in (0..500_000).step_by(4_999) {
            for (is_in_couple, children) in [(false, 0), (false, 2), (true, 0), (true, 3)] {
                let household = Household::with_income(Decimal::from(income))
                    .in_couple(is_in_couple)
                    .children(children);

                let (forward, reverse) = round_trip(&household, &table).unwrap();

                assert_eq!(reverse.remainder, forward.remainder);
                assert!(
                    (reverse.income - forward.income).abs() <= dec!(1),
                    "income {income} came back as {}",
                    reverse.income
                );
            }
        }
    }

    // =========================================================================
    // error tests
    // =========================================================================

    #[test]
    fn rejects_missing_target() {
        let table = table_2022();

        let result = calculate_reverse_tax(&Household::with_income(dec!(1000)), &table);

        assert_eq!(
            result,
            Err(TaxError::Input(InputError::MissingTargetRemainder))
        );
    }

    #[test]
    fn rejects_negative_target() {
        let table = table_2022();

        let result = calculate_reverse_tax(&Household::with_target_remainder(dec!(-10)), &table);

        assert_eq!(
            result,
            Err(TaxError::Input(InputError::NegativeRemainder(dec!(-10))))
        );
    }

    #[test]
    fn reports_target_beyond_ceiling() {
        let table = table_2022();
        let engine = TaxEngine::new(&table).with_search(ReverseSearch {
            income_ceiling: dec!(100000),
            ..ReverseSearch::default()
        });

        let result = engine.calculate_reverse(&Household::with_target_remainder(dec!(90000)));

        assert_eq!(
            result,
            Err(TaxError::Convergence(ConvergenceError::OutOfRange {
                target: dec!(90000),
                ceiling: dec!(100000)
            }))
        );
    }

    #[test]
    fn reports_largest_representable_target_as_out_of_range() {
        let table = table_2022();

        let result = calculate_reverse_tax(&Household::with_target_remainder(Decimal::MAX), &table);

        assert_eq!(
            result,
            Err(TaxError::Convergence(ConvergenceError::OutOfRange {
                target: Decimal::MAX,
                ceiling: ReverseSearch::default().income_ceiling,
            }))
        );
    }

    #[test]
    fn reports_unreachable_target_under_full_rate() {
        let table = BracketTable::new(
            2022,
            vec![
                Tranche::new(dec!(0), dec!(1000), "0%".parse().unwrap()),
                Tranche::unbounded(dec!(1000), "100%".parse().unwrap()),
            ],
        )
        .unwrap();
        let engine = TaxEngine::new(&table).with_search(ReverseSearch {
            income_ceiling: dec!(50000),
            ..ReverseSearch::default()
        });

        let result = engine.calculate_reverse(&Household::with_target_remainder(dec!(5000)));

        assert_eq!(
            result,
            Err(TaxError::Convergence(ConvergenceError::OutOfRange {
                target: dec!(5000),
                ceiling: dec!(50000)
            }))
        );
    }

    #[test]
    fn reports_exhausted_iteration_budget() {
        let table = table_2022();
        let engine = TaxEngine::new(&table).with_search(ReverseSearch {
            max_iterations: 3,
            ..ReverseSearch::default()
        });

        let result = engine.calculate_reverse(&Household::with_target_remainder(dec!(27078)));

        assert_eq!(
            result,
            Err(TaxError::Convergence(
                ConvergenceError::IterationBudgetExhausted {
                    target: dec!(27078),
                    iterations: 3
                }
            ))
        );
    }

    #[test]
    fn reports_remainder_outside_tolerance() {
        // Remainder stays at 1000 from income 1000 upwards.
        let table = BracketTable::new(
            2022,
            vec![
                Tranche::new(dec!(0), dec!(1000), "0%".parse().unwrap()),
                Tranche::unbounded(dec!(1000), "100%".parse().unwrap()),
            ],
        )
        .unwrap();
        let engine = TaxEngine::new(&table).with_search(ReverseSearch {
            income_ceiling: dec!(5000),
            tolerance: dec!(0),
            ..ReverseSearch::default()
        });

        let result = engine.calculate_reverse(&Household::with_target_remainder(dec!(999.5)));

        assert_eq!(
            result,
            Err(TaxError::Convergence(ConvergenceError::NotWithinTolerance {
                target: dec!(999.5),
                closest: dec!(1000),
                tolerance: dec!(0)
            }))
        );
    }
}
