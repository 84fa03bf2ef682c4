use anyhow::{Context, Result};
use impot_core::{
    BracketTable, Rate, ReverseSearch, TaxEngine, TaxResult, TaxTableSet, get_shares,
};
use impot_data::{ConfigLoader, TrancheCsvLoader};
use tracing::debug;

use crate::cli::{Cli, Command, HouseholdArgs};
use crate::display::{self, HouseholdSummary, SharesReport, TaxReport, YearsReport};

/// Loads the tax tables selected on the command line.
///
/// `--config` reads a JSON file, `--tranches` a CSV file, and without either
/// the shipped tables are used.
pub fn load_tables(cli: &Cli) -> Result<TaxTableSet> {
    if let Some(path) = &cli.config {
        return ConfigLoader::load_table_set(path).with_context(|| {
            format!("failed to load configuration from {}", path.display())
        });
    }
    if let Some(path) = &cli.tranches {
        return TrancheCsvLoader::load_table_set(path)
            .with_context(|| format!("failed to load tranches from {}", path.display()));
    }
    ConfigLoader::builtin_table_set().context("failed to load the built-in configuration")
}

/// Runs the parsed command line and returns the text to print.
pub fn run(cli: &Cli) -> Result<String> {
    let tables = load_tables(cli)?;
    execute(&cli.command, &tables)
}

/// Executes `command` against already loaded tables.
pub fn execute(
    command: &Command,
    tables: &TaxTableSet,
) -> Result<String> {
    match command {
        Command::Calculate(args) => {
            let engine = TaxEngine::new(select_table(tables, args.year));
            let household = args.household.with_income(args.income);
            let result = engine
                .calculate(&household)
                .context("tax calculation failed")?;

            let report = TaxReport {
                year: engine.table().year(),
                household: summary(&args.household),
                target_remainder: None,
                marginal_rate: marginal_rate(engine.table(), &result),
                result,
            };
            output(&report, args.json, display::render_tax)
        }
        Command::Reverse(args) => {
            let mut search = ReverseSearch::default();
            if let Some(tolerance) = args.tolerance {
                search.tolerance = tolerance;
            }
            if let Some(max_iterations) = args.max_iterations {
                search.max_iterations = max_iterations;
            }
            debug!(?search, "reverse search settings");

            let household = args.household.with_target_remainder(args.remainder);
            let engine = TaxEngine::new(select_table(tables, args.year)).with_search(search);
            let result = engine
                .calculate_reverse(&household)
                .context("reverse tax calculation failed")?;

            let report = TaxReport {
                year: engine.table().year(),
                household: summary(&args.household),
                target_remainder: Some(args.remainder),
                marginal_rate: marginal_rate(engine.table(), &result),
                result,
            };
            output(&report, args.json, display::render_tax)
        }
        Command::Shares(args) => {
            let children = args
                .household
                .household()
                .children_count()
                .context("invalid household")?;

            let report = SharesReport {
                household: summary(&args.household),
                shares: get_shares(args.household.couple, children),
            };
            output(&report, args.json, display::render_shares)
        }
        Command::Years(args) => {
            let report = YearsReport::new(tables);
            output(&report, args.json, display::render_years)
        }
    }
}

fn select_table(
    tables: &TaxTableSet,
    year: Option<i32>,
) -> &BracketTable {
    match year {
        Some(year) => tables.select(year),
        None => tables.for_current_year(),
    }
}

/// Rate of the tranche the per-share income falls in, if any.
fn marginal_rate(
    table: &BracketTable,
    result: &TaxResult,
) -> Option<Rate> {
    table
        .tranche_for(result.income / result.shares)
        .map(|tranche| tranche.rate)
}

fn summary(household: &HouseholdArgs) -> HouseholdSummary {
    HouseholdSummary {
        couple: household.couple,
        children: household.children,
    }
}

fn output<T: serde::Serialize>(
    report: &T,
    json: bool,
    render: fn(&T) -> String,
) -> Result<String> {
    if json {
        display::to_json(report).context("failed to serialize report")
    } else {
        Ok(render(report))
    }
}
