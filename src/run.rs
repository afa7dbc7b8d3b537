mod cli;
mod menu;

pub(crate) use cli::as_cli;
pub(crate) use menu::as_menu;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::db::Database;
use crate::models::TransactionFilter;
use crate::report::{self, SortBy};

/// Query the store and render the income/expense report.
pub(crate) fn build_report(
    db: &Database,
    filter: &TransactionFilter,
    sort_by: SortBy,
) -> Result<String> {
    let txns = db.get_transactions(filter)?;
    log::debug!("Report over {} transactions", txns.len());
    let result = report::aggregate(&txns)?;
    Ok(report::render(&result, sort_by))
}

/// Query the store and write the category totals to `path`. Returns the
/// number of transactions exported; when nothing matched, no file is written
/// and the result is 0.
pub(crate) fn export_csv(db: &Database, filter: &TransactionFilter, path: &Path) -> Result<usize> {
    let txns = db.get_transactions(filter)?;
    if txns.is_empty() {
        return Ok(0);
    }
    let result = report::aggregate(&txns)?;
    report::write_csv(path, &report::export_records(&result))?;
    Ok(txns.len())
}

/// Parse a signed amount such as `-12.50`, `+3`, `$1,200` or `1e3`.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned = s.trim().replace(['$', ','], "");
    if cleaned.is_empty() {
        anyhow::bail!("Amount is empty");
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .with_context(|| format!("Failed to parse '{s}' as an amount"))
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{s}', expected YYYY-MM-DD"))
}
