mod bracket_table;
mod household;
mod rate;
mod table_set;
mod tax_result;
mod tranche;

pub use bracket_table::BracketTable;
pub use household::Household;
pub use rate::Rate;
pub use table_set::TaxTableSet;
pub use tax_result::{TaxResult, TrancheTax};
pub use tranche::Tranche;
