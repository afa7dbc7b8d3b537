//! Report engine: one aggregation pass over a transaction set, consumed by
//! the text renderer and the CSV exporter.

mod aggregate;
mod export;
mod render;

pub(crate) use aggregate::{aggregate, Aggregation, CategoryTotals};
pub(crate) use export::{export_records, write_csv};
pub(crate) use render::{render, render_table, SortBy};

use rust_decimal::{Decimal, RoundingStrategy};

/// Two fraction digits, no currency symbol. e.g. `1234.5` → `"1234.50"`
pub(crate) fn format_plain(val: Decimal) -> String {
    let rounded = val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Two fraction digits behind a dollar sign. The sign follows the symbol:
/// `-50` → `"$-50.00"`.
pub(crate) fn format_currency(val: Decimal) -> String {
    format!("${}", format_plain(val))
}
