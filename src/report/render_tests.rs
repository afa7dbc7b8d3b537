#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::{Category, Transaction};
use crate::report::aggregate;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn txn(amount: Decimal, category: &str) -> Transaction {
    Transaction::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        amount,
        Category::parse(category),
    )
}

fn sample() -> Aggregation {
    aggregate(&[
        txn(dec!(1000.00), "Salary"),
        txn(dec!(-200.00), "Rent"),
        txn(dec!(-50.00), "Food"),
        txn(dec!(500.00), "Bonus"),
    ])
    .unwrap()
}

/// Data rows of the first table found after `title`, excluding header and
/// separator.
fn table_rows<'a>(rendered: &'a str, title: &str) -> Vec<&'a str> {
    rendered
        .split(title)
        .nth(1)
        .unwrap()
        .lines()
        .skip(3)
        .take_while(|l| !l.is_empty())
        .collect()
}

fn first_cell(row: &str) -> &str {
    row.split(" | ").next().unwrap().trim_end()
}

// ── render_table ──────────────────────────────────────────────

#[test]
fn test_render_table_layout() {
    let rows = vec![
        vec!["a".to_string(), "1".to_string()],
        vec!["longer".to_string(), "22".to_string()],
    ];
    let table = render_table(&["Key", "Value"], &rows);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[0], "Key    | Value");
    assert_eq!(lines[1], "-------+------");
    assert_eq!(lines[2], "a      | 1    ");
    assert_eq!(lines[3], "longer | 22   ");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_render_table_header_wider_than_cells() {
    let table = render_table(&["Category"], &[vec!["x".to_string()]]);
    assert_eq!(table, "Category\n--------\nx       \n");
}

#[test]
fn test_render_table_counts_characters_not_bytes() {
    let rows = vec![vec!["Café".to_string(), "$1.00".to_string()]];
    let table = render_table(&["Cat", "Amount"], &rows);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[1], "-----+-------");
    assert_eq!(lines[2], "Café | $1.00 ");
}

// ── render ────────────────────────────────────────────────────

#[test]
fn test_render_sample_by_name() {
    let expected = concat!(
        "\n=== Income ===\n",
        "Category     | Amount  \n",
        "-------------+---------\n",
        "Bonus        | $500.00 \n",
        "Salary       | $1000.00\n",
        "Total Income | $1500.00\n",
        "\n=== Expenses ===\n",
        "Category       | Amount \n",
        "---------------+--------\n",
        "Food           | $50.00 \n",
        "Rent           | $200.00\n",
        "Total Expenses | $250.00\n",
        "\nNet Balance: $1250.00\n",
    );
    assert_eq!(render(&sample(), SortBy::Name), expected);
}

#[test]
fn test_render_empty() {
    let rendered = render(&aggregate(&[]).unwrap(), SortBy::Name);
    assert_eq!(
        rendered,
        "\n=== Income ===\nNo income transactions found.\n\
         \n=== Expenses ===\nNo expense transactions found.\n\
         \nNet Balance: $0.00\n"
    );
}

#[test]
fn test_render_only_expenses() {
    let result = aggregate(&[txn(dec!(-20), "Food")]).unwrap();
    let rendered = render(&result, SortBy::Amount);
    assert!(rendered.contains("No income transactions found."));
    assert!(!rendered.contains("No expense transactions found."));
    assert!(rendered.ends_with("Net Balance: $-20.00\n"));
}

#[test]
fn test_sort_by_name_ignores_case() {
    let result = aggregate(&[
        txn(dec!(1), "beta"),
        txn(dec!(2), "Alpha"),
        txn(dec!(3), "gamma"),
        txn(dec!(4), "Delta"),
    ])
    .unwrap();
    let rendered = render(&result, SortBy::Name);
    let names: Vec<&str> = table_rows(&rendered, "=== Income ===")
        .into_iter()
        .map(first_cell)
        .collect();
    assert_eq!(names, vec!["Alpha", "beta", "Delta", "gamma", "Total Income"]);
}

#[test]
fn test_sort_by_amount_ascending() {
    let result = aggregate(&[
        txn(dec!(-30), "Rent"),
        txn(dec!(-5), "Food"),
        txn(dec!(-12.5), "Utilities"),
    ])
    .unwrap();
    let rendered = render(&result, SortBy::Amount);
    let names: Vec<&str> = table_rows(&rendered, "=== Expenses ===")
        .into_iter()
        .map(first_cell)
        .collect();
    assert_eq!(names, vec!["Food", "Utilities", "Rent", "Total Expenses"]);
}

#[test]
fn test_total_row_is_last_even_when_sorting_would_move_it() {
    // "Total Income" sorts before "Zoo" by name and its amount is the
    // largest, so either sort would misplace it if it took part.
    let result = aggregate(&[txn(dec!(1), "Zoo"), txn(dec!(2), "Aardvark")]).unwrap();
    for sort_by in [SortBy::Name, SortBy::Amount] {
        let rendered = render(&result, sort_by);
        let rows = table_rows(&rendered, "=== Income ===");
        let last = rows.last().unwrap();
        assert_eq!(first_cell(last), "Total Income");
        assert!(last.trim_end().ends_with("$3.00"));
    }
}

#[test]
fn test_uncategorized_row_rendered() {
    let rendered = render(&aggregate(&[txn(dec!(-4), "")]).unwrap(), SortBy::Name);
    let names: Vec<&str> = table_rows(&rendered, "=== Expenses ===")
        .into_iter()
        .map(first_cell)
        .collect();
    assert_eq!(names, vec!["Uncategorized", "Total Expenses"]);
}

// ── SortBy ────────────────────────────────────────────────────

#[test]
fn test_sort_by_parse() {
    assert_eq!(SortBy::parse("1"), Some(SortBy::Name));
    assert_eq!(SortBy::parse("Name"), Some(SortBy::Name));
    assert_eq!(SortBy::parse(" amount "), Some(SortBy::Amount));
    assert_eq!(SortBy::parse("2"), Some(SortBy::Amount));
    assert_eq!(SortBy::parse("size"), None);
}
