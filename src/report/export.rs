use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use super::{format_plain, Aggregation};

pub(crate) type Record = [String; 3];

/// Flatten an aggregation into `Type,Category,Amount` records: the header,
/// income categories and their total, expense categories and their total,
/// then the net balance. Categories keep their first-seen order.
pub(crate) fn export_records(result: &Aggregation) -> Vec<Record> {
    let mut records: Vec<Record> = Vec::with_capacity(
        result.income_by_category.iter().count() + result.expense_by_category.iter().count() + 4,
    );
    records.push(["Type".into(), "Category".into(), "Amount".into()]);

    for (category, total) in result.income_by_category.iter() {
        records.push(["Income".into(), category.into(), format_plain(total)]);
    }
    records.push([
        "Total Income".into(),
        String::new(),
        format_plain(result.total_income),
    ]);

    for (category, total) in result.expense_by_category.iter() {
        records.push(["Expense".into(), category.into(), format_plain(total)]);
    }
    records.push([
        "Total Expenses".into(),
        String::new(),
        format_plain(result.total_expense),
    ]);

    records.push([
        "Net Balance".into(),
        String::new(),
        format_plain(result.net_balance()),
    ]);
    records
}

/// Write records to `path`, replacing any file already there.
pub(crate) fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    write_csv_to(file, records)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    log::info!("Wrote {} CSV records to {}", records.len(), path.display());
    Ok(())
}

pub(crate) fn write_csv_to<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    for record in records {
        wtr.write_record(record).context("Failed to write CSV record")?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
