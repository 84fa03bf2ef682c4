//! Human and JSON rendering of command results.
//!
//! Every command builds a serializable report; `--json` prints it with
//! `serde_json`, otherwise it is rendered as summary lines followed by a
//! `tabled` table.

use impot_core::{BracketTable, Rate, TaxResult, TaxTableSet, Tranche, TrancheTax};
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

const CURRENCY: &str = "€";
const UNBOUNDED: &str = "∞";

// ─── reports ─────────────────────────────────────────────────────────────────

/// Household composition as echoed back in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HouseholdSummary {
    pub couple: bool,
    pub children: i32,
}

/// Result of `calculate` and `reverse`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxReport {
    pub year: i32,
    pub household: HouseholdSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_remainder: Option<Decimal>,
    /// Rate of the tranche holding the per-share income.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marginal_rate: Option<Rate>,
    pub result: TaxResult,
}

/// Result of `shares`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharesReport {
    pub household: HouseholdSummary,
    pub shares: Decimal,
}

/// Result of `years`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearsReport {
    pub default_year: i32,
    pub tables: Vec<BracketTable>,
}

impl YearsReport {
    pub fn new(set: &TaxTableSet) -> Self {
        Self {
            default_year: set.default_year(),
            tables: set.tables().cloned().collect(),
        }
    }
}

// ─── table rows ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Tabled)]
struct TrancheTaxRow {
    #[tabled(rename = "From")]
    from: String,

    #[tabled(rename = "To")]
    to: String,

    #[tabled(rename = "Rate")]
    rate: String,

    #[tabled(rename = "Tax")]
    tax: String,
}

impl From<&TrancheTax> for TrancheTaxRow {
    fn from(tranche: &TrancheTax) -> Self {
        Self {
            from: money(tranche.min),
            to: upper_bound(tranche.max),
            rate: tranche.rate.to_string(),
            tax: money(tranche.tax),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct TrancheRow {
    #[tabled(rename = "From")]
    from: String,

    #[tabled(rename = "To")]
    to: String,

    #[tabled(rename = "Rate")]
    rate: String,
}

impl From<&Tranche> for TrancheRow {
    fn from(tranche: &Tranche) -> Self {
        Self {
            from: money(tranche.min),
            to: upper_bound(tranche.max),
            rate: tranche.rate.to_string(),
        }
    }
}

fn money(amount: Decimal) -> String {
    format!("{amount} {CURRENCY}")
}

fn upper_bound(max: Option<Decimal>) -> String {
    max.map(money).unwrap_or_else(|| UNBOUNDED.to_string())
}

fn render_table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}

fn describe(
    household: &HouseholdSummary,
    shares: Decimal,
) -> String {
    let status = if household.couple { "couple" } else { "single" };
    let children = match household.children {
        1 => "1 child".to_string(),
        n => format!("{n} children"),
    };
    let unit = if shares == Decimal::ONE { "share" } else { "shares" };
    format!("{status}, {children} ({shares} {unit})")
}

// ─── human output ────────────────────────────────────────────────────────────

pub fn render_tax(report: &TaxReport) -> String {
    let result = &report.result;

    let mut out = format!(
        "Year:       {}\nHousehold:  {}\n",
        report.year,
        describe(&report.household, result.shares)
    );
    if let Some(target) = report.target_remainder {
        out.push_str(&format!("Target:     {}\n", money(target)));
    }
    out.push_str(&format!(
        "Income:     {}\nTax:        {}\nRemainder:  {}\n",
        money(result.income),
        money(result.tax),
        money(result.remainder)
    ));
    if let Some(rate) = report.marginal_rate {
        out.push_str(&format!("Marginal:   {rate}\n"));
    }
    out.push('\n');

    let rows: Vec<TrancheTaxRow> = result.tax_tranches.iter().map(Into::into).collect();
    out.push_str(&render_table(&rows));
    out
}

pub fn render_shares(report: &SharesReport) -> String {
    format!(
        "Household:  {}",
        describe(&report.household, report.shares)
    )
}

pub fn render_years(report: &YearsReport) -> String {
    let mut sections = Vec::with_capacity(report.tables.len());

    for table in report.tables.iter().rev() {
        let marker = if table.year() == report.default_year {
            " (default)"
        } else {
            ""
        };
        let rows: Vec<TrancheRow> = table.tranches().iter().map(Into::into).collect();
        sections.push(format!("{}{marker}\n{}", table.year(), render_table(&rows)));
    }

    sections.join("\n\n")
}

// ─── JSON output ─────────────────────────────────────────────────────────────

pub fn to_json<T: Serialize>(report: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn rate(s: &str) -> Rate {
        s.parse().unwrap()
    }

    fn sample_report() -> TaxReport {
        TaxReport {
            year: 2022,
            household: HouseholdSummary {
                couple: false,
                children: 0,
            },
            target_remainder: None,
            marginal_rate: Some(rate("30%")),
            result: TaxResult {
                income: dec!(30000),
                tax: dec!(2922),
                remainder: dec!(27078),
                shares: dec!(1),
                tax_tranches: vec![
                    TrancheTax {
                        min: dec!(0),
                        max: Some(dec!(10225)),
                        rate: rate("0%"),
                        tax: dec!(0),
                    },
                    TrancheTax {
                        min: dec!(160337),
                        max: None,
                        rate: rate("45%"),
                        tax: dec!(0),
                    },
                ],
            },
        }
    }

    // =========================================================================
    // helpers
    // =========================================================================

    #[test]
    fn unbounded_max_renders_as_infinity() {
        assert_eq!(upper_bound(None), "∞");
        assert_eq!(upper_bound(Some(dec!(10225))), "10225 €");
    }

    #[test]
    fn describe_pluralizes() {
        let single = HouseholdSummary {
            couple: false,
            children: 0,
        };
        let parent = HouseholdSummary {
            couple: true,
            children: 1,
        };

        assert_eq!(describe(&single, dec!(1)), "single, 0 children (1 share)");
        assert_eq!(describe(&parent, dec!(2.5)), "couple, 1 child (2.5 shares)");
    }

    // =========================================================================
    // render tests
    // =========================================================================

    #[test]
    fn render_tax_contains_summary_and_table() {
        let out = render_tax(&sample_report());

        assert!(out.contains("Tax:        2922 €"), "got:\n{out}");
        assert!(out.contains("Remainder:  27078 €"), "got:\n{out}");
        assert!(out.contains("45%"), "got:\n{out}");
        assert!(out.contains('∞'), "got:\n{out}");
        assert!(out.contains("Marginal:   30%"), "got:\n{out}");
        assert!(!out.contains("Target:"), "got:\n{out}");
    }

    #[test]
    fn render_tax_omits_unknown_marginal_rate() {
        let mut report = sample_report();
        report.marginal_rate = None;

        let out = render_tax(&report);

        assert!(!out.contains("Marginal:"), "got:\n{out}");
    }

    #[test]
    fn render_tax_shows_target_for_reverse() {
        let mut report = sample_report();
        report.target_remainder = Some(dec!(27078));

        let out = render_tax(&report);

        assert!(out.contains("Target:     27078 €"), "got:\n{out}");
    }

    #[test]
    fn to_json_omits_absent_target() {
        let json = to_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["year"], 2022);
        assert!(value.get("target_remainder").is_none());
        assert_eq!(value["result"]["tax_tranches"][1]["max"], serde_json::Value::Null);
    }
}
