use rust_decimal::Decimal;

use super::{format_currency, Aggregation, CategoryTotals};

const HEADERS: [&str; 2] = ["Category", "Amount"];

/// Order of the category rows in a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SortBy {
    /// Alphabetical, ignoring case.
    #[default]
    Name,
    /// Smallest total first.
    Amount,
}

impl SortBy {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "n" | "name" => Some(Self::Name),
            "2" | "a" | "amount" => Some(Self::Amount),
            _ => None,
        }
    }
}

/// Render the income section, the expense section and the net balance line.
pub(crate) fn render(result: &Aggregation, sort_by: SortBy) -> String {
    let mut out = String::new();

    out.push_str("\n=== Income ===\n");
    out.push_str(&render_bucket(
        &result.income_by_category,
        sort_by,
        "Total Income",
        result.total_income,
        "No income transactions found.",
    ));

    out.push_str("\n=== Expenses ===\n");
    out.push_str(&render_bucket(
        &result.expense_by_category,
        sort_by,
        "Total Expenses",
        result.total_expense,
        "No expense transactions found.",
    ));

    out.push_str(&format!(
        "\nNet Balance: {}\n",
        format_currency(result.net_balance())
    ));
    out
}

fn render_bucket(
    totals: &CategoryTotals,
    sort_by: SortBy,
    total_label: &str,
    total: Decimal,
    empty_message: &str,
) -> String {
    if totals.is_empty() {
        return format!("{empty_message}\n");
    }

    let mut entries: Vec<(&str, Decimal)> = totals.iter().collect();
    match sort_by {
        SortBy::Name => entries.sort_by_key(|(name, _)| name.to_lowercase()),
        SortBy::Amount => entries.sort_by_key(|(_, amount)| *amount),
    }

    let mut rows: Vec<Vec<String>> = entries
        .into_iter()
        .map(|(name, amount)| vec![name.to_string(), format_currency(amount)])
        .collect();
    // The total row goes last regardless of the sort.
    rows.push(vec![total_label.to_string(), format_currency(total)]);

    render_table(&HEADERS, &rows)
}

/// Lay out rows under a header line and a dashed separator. Each column is as
/// wide as its widest cell; cells are left-aligned and joined by ` | `.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&pad_row(headers.iter().copied(), &widths));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&pad_row(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
