use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use impot_core::Household;
use rust_decimal::Decimal;

/// Progressive income tax calculator with the quotient familial.
///
/// Tax tables come from `--config` (JSON), `--tranches` (CSV) or, without
/// either, the tables shipped with the program.
#[derive(Debug, Parser)]
#[command(name = "impot", version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file with the tax tables
    #[arg(long, global = true, conflicts_with = "tranches")]
    pub config: Option<PathBuf>,

    /// CSV file with `year,min,max,rate` tranche rows
    #[arg(long, global = true)]
    pub tranches: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `warn,impot_core=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log records to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Tax owed on an income
    Calculate(CalculateArgs),

    /// Income needed to keep a given amount after tax
    Reverse(ReverseArgs),

    /// Quotient familial shares of a household
    Shares(SharesArgs),

    /// List the configured tax tables
    Years(YearsArgs),
}

/// Household composition shared by the commands.
#[derive(Debug, Clone, Args)]
pub struct HouseholdArgs {
    /// Taxed as a couple
    #[arg(long)]
    pub couple: bool,

    /// Number of dependent children
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub children: i32,
}

#[derive(Debug, Args)]
pub struct CalculateArgs {
    /// Net taxable income
    #[arg(long, allow_negative_numbers = true)]
    pub income: Decimal,

    #[command(flatten)]
    pub household: HouseholdArgs,

    /// Tax year (defaults to the current year, or the configured default)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ReverseArgs {
    /// Amount to keep after tax
    #[arg(long, allow_negative_numbers = true)]
    pub remainder: Decimal,

    #[command(flatten)]
    pub household: HouseholdArgs,

    /// Tax year (defaults to the current year, or the configured default)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Accepted distance from the requested remainder
    #[arg(long)]
    pub tolerance: Option<Decimal>,

    /// Maximum number of search steps
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SharesArgs {
    #[command(flatten)]
    pub household: HouseholdArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct YearsArgs {
    /// Output as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

impl HouseholdArgs {
    /// The household with neither an income nor a target set.
    pub fn household(&self) -> Household {
        Household::default()
            .in_couple(self.couple)
            .children(self.children)
    }

    pub fn with_income(
        &self,
        income: Decimal,
    ) -> Household {
        Household::with_income(income)
            .in_couple(self.couple)
            .children(self.children)
    }

    pub fn with_target_remainder(
        &self,
        remainder: Decimal,
    ) -> Household {
        Household::with_target_remainder(remainder)
            .in_couple(self.couple)
            .children(self.children)
    }
}
