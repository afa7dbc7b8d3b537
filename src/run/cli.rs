use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;

use super::{build_report, export_csv, parse_amount, parse_date};
use crate::config::{shellexpand, Config};
use crate::db::Database;
use crate::models::{Category, Transaction, TransactionFilter};
use crate::report::{format_currency, render_table, SortBy};

/// Flags that take a value; their values are not positional arguments.
const VALUE_FLAGS: &[&str] = &["--from", "--to", "--category", "--sort", "--date"];

pub(crate) fn as_cli(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    match args[1].as_str() {
        "add" | "a" => cli_add(&args[2..], db),
        "report" | "r" => cli_report(&args[2..], db),
        "export" | "e" => cli_export(&args[2..], db, config),
        "list" | "ls" => cli_list(db),
        "delete" | "rm" => cli_delete(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budget-tracker {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Budget Tracker: local income and expense tracker");
    println!();
    println!("Usage: budget-tracker [--db <path>] [--export-path <path>] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch the interactive menu");
    println!("  add <amount> [category]       Record a transaction (negative = expense)");
    println!("    --date <YYYY-MM-DD>         Transaction date (default: today)");
    println!("  report                        Print income/expense totals by category");
    println!("    --from <YYYY-MM-DD>         First date to include");
    println!("    --to <YYYY-MM-DD>           Last date to include");
    println!("    --category <name>           Only this category (case-insensitive)");
    println!("    --sort <name|amount>        Row order (default: name)");
    println!("  export [path]                 Write category totals to CSV");
    println!("    --from, --to, --category    Same filters as report");
    println!("  list                          List all transactions");
    println!("  delete <id>                   Delete a transaction by ID");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Environment:");
    println!("  BUDGET_TRACKER_DB             Database path (overridden by --db)");
    println!("  BUDGET_TRACKER_EXPORT         Export path (overridden by --export-path)");
}

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    let positional = positionals(args);
    let Some(raw_amount) = positional.first() else {
        anyhow::bail!("Usage: budget-tracker add <amount> [category] [--date YYYY-MM-DD]");
    };
    let amount = parse_amount(raw_amount)?;

    let category = match positional.get(1) {
        Some(label) if !label.trim().is_empty() => Category::parse(label.trim()),
        // Fall back to the catch-all preset for the amount's sign.
        _ => Category::presets_for(amount)
            .last()
            .cloned()
            .unwrap_or(Category::Custom(String::new())),
    };

    let date = match flag_value(args, "--date") {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };

    let txn = Transaction::new(date, amount, category);
    let id = db.insert_transaction(&txn)?;
    println!(
        "Added {} {} ({}) on {} [ID: {id}]",
        if txn.is_income() { "income" } else { "expense" },
        format_currency(txn.abs_amount()),
        txn.category,
        txn.date,
    );
    Ok(())
}

fn cli_report(args: &[String], db: &Database) -> Result<()> {
    let filter = parse_filter(args)?;
    let sort_by = match flag_value(args, "--sort") {
        Some(s) => SortBy::parse(s)
            .ok_or_else(|| anyhow::anyhow!("Unknown sort order '{s}' (use name or amount)"))?,
        None => SortBy::default(),
    };
    print!("{}", build_report(db, &filter, sort_by)?);
    Ok(())
}

fn cli_export(args: &[String], db: &Database, config: &Config) -> Result<()> {
    let filter = parse_filter(args)?;
    let output_path = positionals(args)
        .first()
        .map(|p| PathBuf::from(shellexpand(p)))
        .unwrap_or_else(|| config.export_path.clone());

    let count = export_csv(db, &filter, &output_path)?;
    if count == 0 {
        println!("No transactions to export.");
    } else {
        println!(
            "Exported totals for {count} transactions to '{}'.",
            output_path.display()
        );
    }
    Ok(())
}

fn cli_list(db: &Database) -> Result<()> {
    let txns = db.get_transactions(&TransactionFilter::default())?;
    if txns.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = txns
        .iter()
        .map(|t| {
            vec![
                t.id.unwrap_or(0).to_string(),
                t.date.to_string(),
                format_currency(t.amount),
                t.category.to_string(),
            ]
        })
        .collect();
    print!("{}", render_table(&["ID", "Date", "Amount", "Category"], &rows));
    println!("{} transactions", db.get_transaction_count()?);
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let Some(raw_id) = args.first() else {
        anyhow::bail!("Usage: budget-tracker delete <id>");
    };
    let id: i64 = raw_id
        .parse()
        .with_context(|| format!("Invalid transaction ID '{raw_id}'"))?;
    db.delete_transaction(id)?;
    println!("Deleted transaction {id}");
    Ok(())
}

// ── Argument helpers ─────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither flags nor flag values. A leading `-` followed
/// by a digit is a negative amount, not a flag.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else if !is_flag(arg) {
            out.push(arg.as_str());
        }
    }
    out
}

fn is_flag(arg: &str) -> bool {
    arg.starts_with('-') && !arg[1..].starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

fn parse_filter(args: &[String]) -> Result<TransactionFilter> {
    let start = flag_value(args, "--from").map(parse_date).transpose()?;
    let end = flag_value(args, "--to").map(parse_date).transpose()?;
    let category = flag_value(args, "--category")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from);
    Ok(TransactionFilter {
        start,
        end,
        category,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positionals_skip_flag_values() {
        let a = args(&["-42.50", "Food", "--date", "2024-01-01"]);
        assert_eq!(positionals(&a), vec!["-42.50", "Food"]);
    }

    #[test]
    fn test_positionals_negative_amount_is_not_a_flag() {
        let a = args(&["-5", "-.5", "--bogus"]);
        assert_eq!(positionals(&a), vec!["-5", "-.5"]);
    }

    #[test]
    fn test_flag_value() {
        let a = args(&["--sort", "amount", "--from", "2024-01-01"]);
        assert_eq!(flag_value(&a, "--sort"), Some("amount"));
        assert_eq!(flag_value(&a, "--from"), Some("2024-01-01"));
        assert_eq!(flag_value(&a, "--to"), None);
    }

    #[test]
    fn test_parse_filter() {
        let a = args(&["--from", "2024-01-01", "--category", " Food "]);
        let filter = parse_filter(&a).unwrap();
        assert_eq!(filter.start, Some(parse_date("2024-01-01").unwrap()));
        assert_eq!(filter.end, None);
        assert_eq!(filter.category.as_deref(), Some("Food"));
    }

    #[test]
    fn test_parse_filter_rejects_bad_date() {
        let a = args(&["--to", "31/01/2024"]);
        assert!(parse_filter(&a).is_err());
    }

    #[test]
    fn test_add_defaults_category_by_sign() {
        let mut db = Database::open_in_memory().unwrap();
        cli_add(&args(&["-12"]), &mut db).unwrap();
        cli_add(&args(&["40", "--date", "2024-06-01"]), &mut db).unwrap();

        let txns = db.get_transactions(&TransactionFilter::default()).unwrap();
        assert_eq!(txns.len(), 2);
        let expense = txns.iter().find(|t| !t.is_income()).unwrap();
        let income = txns.iter().find(|t| t.is_income()).unwrap();
        assert_eq!(expense.category, Category::OtherExpense);
        assert_eq!(income.category, Category::OtherIncome);
        assert_eq!(income.date, parse_date("2024-06-01").unwrap());
    }

    #[test]
    fn test_add_requires_amount() {
        let mut db = Database::open_in_memory().unwrap();
        assert!(cli_add(&args(&[]), &mut db).is_err());
        assert!(cli_add(&args(&["ten"]), &mut db).is_err());
        assert_eq!(db.get_transaction_count().unwrap(), 0);
    }

    #[test]
    fn test_delete_rejects_bad_id() {
        let mut db = Database::open_in_memory().unwrap();
        assert!(cli_delete(&args(&["abc"]), &mut db).is_err());
        assert!(cli_delete(&args(&["12"]), &mut db).is_err());
    }

    #[test]
    fn test_unknown_command() {
        let mut db = Database::open_in_memory().unwrap();
        let config = Config {
            db_path: PathBuf::from(":memory:"),
            export_path: PathBuf::from("unused.csv"),
        };
        assert!(as_cli(&args(&["budget-tracker", "frobnicate"]), &mut db, &config).is_err());
    }
}
