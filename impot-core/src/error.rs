//! Error types for table validation, household input and the reverse search.

use rust_decimal::Decimal;
use thiserror::Error;

/// A bracket table or table set that cannot be used for a calculation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A year was configured without any tranche.
    #[error("tax table for {year} has no tranches")]
    EmptyTable { year: i32 },

    /// The lowest tranche must start at zero.
    #[error("tax table for {year} starts at {min}, expected 0")]
    FirstTrancheNotAtZero { year: i32, min: Decimal },

    #[error("tranche [{min}, {max}] in {year} table ends before it starts")]
    InvertedTranche { year: i32, min: Decimal, max: Decimal },

    #[error("tranche starting at {min} in {year} table overlaps the previous tranche ending at {previous_max}")]
    OverlappingTranches {
        year: i32,
        min: Decimal,
        previous_max: Decimal,
    },

    #[error("gap between {previous_max} and {min} in {year} table")]
    GapBetweenTranches {
        year: i32,
        previous_max: Decimal,
        min: Decimal,
    },

    /// Only the top tranche may be open-ended.
    #[error("tranche starting at {min} in {year} table is unbounded but is not the last one")]
    UnboundedBeforeLast { year: i32, min: Decimal },

    /// The top tranche must be open-ended so every income is covered.
    #[error("top tranche of {year} table is capped at {max}, expected unbounded")]
    BoundedTopTranche { year: i32, max: Decimal },

    /// A rate string that is not a number, optionally suffixed with `%`.
    #[error("invalid rate '{0}'")]
    InvalidRate(String),

    /// A rate outside 0% to 100%.
    #[error("rate {0}% is outside 0% to 100%")]
    RateOutOfRange(Decimal),

    #[error("no tax table configured")]
    NoTables,

    #[error("tax table for {0} is configured twice")]
    DuplicateYear(i32),

    #[error("default year {0} has no tax table")]
    UnknownDefaultYear(i32),
}

/// Household values rejected before any calculation runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("household has no income to tax")]
    MissingIncome,

    #[error("household has no target remainder to solve for")]
    MissingTargetRemainder,

    #[error("income must not be negative, got {0}")]
    NegativeIncome(Decimal),

    #[error("target remainder must not be negative, got {0}")]
    NegativeRemainder(Decimal),

    #[error("children count must not be negative, got {0}")]
    NegativeChildren(i32),
}

/// The reverse search could not find an income for the requested remainder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConvergenceError {
    /// The remainder cannot be reached below the income ceiling.
    #[error("no income up to {ceiling} leaves a remainder of {target}")]
    OutOfRange { target: Decimal, ceiling: Decimal },

    #[error("search for remainder {target} did not converge within {iterations} iterations")]
    IterationBudgetExhausted { target: Decimal, iterations: u32 },

    #[error("closest remainder {closest} is further than {tolerance} from {target}")]
    NotWithinTolerance {
        target: Decimal,
        closest: Decimal,
        tolerance: Decimal,
    },
}

/// Any failure returned by the tax engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Convergence(#[from] ConvergenceError),
}
