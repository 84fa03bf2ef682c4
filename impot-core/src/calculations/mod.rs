//! Tax calculations: household shares, forward tax and the reverse search.

pub mod common;
mod engine;
mod reverse;
mod shares;

pub use engine::{TaxEngine, calculate_tax};
pub use reverse::{ReverseSearch, calculate_reverse_tax, round_trip};
pub use shares::get_shares;
