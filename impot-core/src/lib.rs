//! Progressive household income tax with the quotient familial.
//!
//! A household's income is divided by its number of shares, taxed tranche by
//! tranche, and scaled back up. The same engine also solves the inverse
//! problem: which income leaves a given remainder after tax.

pub mod calculations;
pub mod error;
pub mod models;

pub use calculations::{ReverseSearch, TaxEngine, calculate_reverse_tax, calculate_tax, get_shares};
pub use error::{ConfigurationError, ConvergenceError, InputError, TaxError};
pub use models::*;
