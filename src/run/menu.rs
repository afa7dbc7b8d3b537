use anyhow::Result;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::path::Path;

use super::{build_report, export_csv, parse_amount, parse_date};
use crate::config::Config;
use crate::db::Database;
use crate::models::{Category, Transaction, TransactionFilter};
use crate::report::{format_currency, SortBy};

pub(crate) fn as_menu(db: &mut Database, config: &Config) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Session::new(db, &config.export_path, stdin.lock(), stdout.lock()).run()
}

/// Input ran out mid-session (stdin closed or piped input exhausted).
#[derive(Debug)]
struct EndOfInput;

impl std::fmt::Display for EndOfInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "end of input")
    }
}

impl std::error::Error for EndOfInput {}

/// One interactive menu session over a store handle.
pub(crate) struct Session<'a, R, W> {
    db: &'a mut Database,
    export_path: &'a Path,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub(crate) fn new(db: &'a mut Database, export_path: &'a Path, input: R, out: W) -> Self {
        Self {
            db,
            export_path,
            input,
            out,
        }
    }

    pub(crate) fn run(&mut self) -> Result<()> {
        writeln!(self.out, "\n=== Budget Tracker ===")?;
        loop {
            match self.menu_step() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) if e.is::<EndOfInput>() => break,
                Err(e) => {
                    log::error!("Menu action failed: {e:#}");
                    writeln!(self.out, "Error: {e:#}")?;
                }
            }
        }
        writeln!(self.out, "Goodbye!")?;
        self.out.flush()?;
        Ok(())
    }

    /// Show the menu and run one action. Returns false when the user exits.
    fn menu_step(&mut self) -> Result<bool> {
        writeln!(self.out, "\nMenu:")?;
        writeln!(self.out, "1. Add Transaction")?;
        writeln!(self.out, "2. Generate Report")?;
        writeln!(self.out, "3. Manage Transactions")?;
        writeln!(self.out, "4. Export Transactions to CSV")?;
        writeln!(self.out, "5. Exit")?;

        match self.prompt("Enter your choice (1-5): ")?.as_str() {
            "1" => self.add_transaction()?,
            "2" => self.generate_report()?,
            "3" => self.manage_transactions()?,
            "4" => self.export_to_csv()?,
            "5" => return Ok(false),
            _ => writeln!(self.out, "Invalid choice. Please try again.")?,
        }
        Ok(true)
    }

    // ── Actions ───────────────────────────────────────────────

    fn add_transaction(&mut self) -> Result<()> {
        writeln!(self.out, "\n=== Add Transaction ===")?;
        let amount =
            self.prompt_amount("Enter amount (positive for income, negative for expense): ")?;
        let category = self.prompt_category(amount, None)?;
        let date =
            self.prompt_date_or_today("Enter date (YYYY-MM-DD) or press Enter for today: ")?;

        self.db
            .insert_transaction(&Transaction::new(date, amount, category))?;
        writeln!(self.out, "Transaction added successfully!")?;
        Ok(())
    }

    fn generate_report(&mut self) -> Result<()> {
        writeln!(self.out, "\n=== Generate Report ===")?;
        let filter =
            self.prompt_filter("Enter a category to filter or press Enter to show all: ")?;
        let sort_by = match self
            .prompt("Sort categories by (1) Name or (2) Amount? [1/2]: ")?
            .as_str()
        {
            "1" => SortBy::Name,
            _ => SortBy::Amount,
        };

        let text = build_report(self.db, &filter, sort_by)?;
        write!(self.out, "{text}")?;
        self.prompt("\nPress Enter to continue...")?;
        Ok(())
    }

    fn manage_transactions(&mut self) -> Result<()> {
        writeln!(self.out, "\n=== Manage Transactions ===")?;
        let txns = self.db.get_transactions(&TransactionFilter::default())?;
        if txns.is_empty() {
            writeln!(self.out, "No transactions found.")?;
            return Ok(());
        }

        for (idx, txn) in txns.iter().enumerate() {
            writeln!(
                self.out,
                "{}. {} - {} ({}) [ID: {}]",
                idx + 1,
                txn.date,
                format_currency(txn.amount),
                txn.category,
                txn.id.unwrap_or(0),
            )?;
        }

        let choice =
            self.prompt("\nEnter transaction number to edit/delete or press Enter to cancel: ")?;
        let Ok(number) = choice.parse::<usize>() else {
            writeln!(self.out, "Cancelled.")?;
            return Ok(());
        };
        let Some(id) = number
            .checked_sub(1)
            .and_then(|i| txns.get(i))
            .and_then(|t| t.id)
        else {
            writeln!(self.out, "Invalid selection.")?;
            return Ok(());
        };

        match self
            .prompt("Enter 'e' to edit or 'd' to delete: ")?
            .to_lowercase()
            .as_str()
        {
            "e" => self.edit_transaction(id),
            "d" => self.delete_transaction(id),
            _ => {
                writeln!(self.out, "Invalid action. Returning to menu.")?;
                Ok(())
            }
        }
    }

    fn edit_transaction(&mut self, id: i64) -> Result<()> {
        let mut txn = self
            .db
            .get_transaction(id)?
            .ok_or_else(|| anyhow::anyhow!("Transaction {id} not found"))?;

        txn.date = loop {
            let input = self.prompt(&format!(
                "Enter new date (YYYY-MM-DD) or press Enter to keep [{}]: ",
                txn.date
            ))?;
            if input.is_empty() {
                break txn.date;
            }
            match parse_date(&input) {
                Ok(date) => break date,
                Err(_) => writeln!(self.out, "Invalid date format. Please use YYYY-MM-DD.")?,
            }
        };

        txn.amount = loop {
            let input = self.prompt(&format!(
                "Enter new amount or press Enter to keep [{}]: ",
                txn.amount
            ))?;
            if input.is_empty() {
                break txn.amount;
            }
            match parse_amount(&input) {
                Ok(amount) => break amount,
                Err(_) => writeln!(self.out, "Invalid amount. Please enter a number.")?,
            }
        };

        // The current label stays selectable even when the sign changed.
        txn.category = self.prompt_category(txn.amount, Some(&txn.category))?;

        self.db.update_transaction(&txn)?;
        writeln!(self.out, "Transaction updated successfully!")?;
        Ok(())
    }

    fn delete_transaction(&mut self, id: i64) -> Result<()> {
        self.db.delete_transaction(id)?;
        writeln!(self.out, "Transaction deleted successfully!")?;
        Ok(())
    }

    fn export_to_csv(&mut self) -> Result<()> {
        writeln!(self.out, "\n=== Export Transactions to CSV ===")?;
        let filter =
            self.prompt_filter("Enter category to filter or press Enter to export all: ")?;

        let count = export_csv(self.db, &filter, self.export_path)?;
        if count == 0 {
            writeln!(self.out, "No transactions to export.")?;
            return Ok(());
        }
        writeln!(
            self.out,
            "Transactions exported successfully to '{}'.",
            self.export_path.display()
        )?;
        self.prompt("Press Enter to continue...")?;
        Ok(())
    }

    // ── Prompts ───────────────────────────────────────────────

    /// Print `message` and read one trimmed line.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.out, "{message}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(EndOfInput.into());
        }
        Ok(line.trim().to_string())
    }

    fn prompt_amount(&mut self, message: &str) -> Result<Decimal> {
        loop {
            let input = self.prompt(message)?;
            match parse_amount(&input) {
                Ok(amount) => return Ok(amount),
                Err(_) => writeln!(self.out, "Invalid amount. Please enter a number.")?,
            }
        }
    }

    fn prompt_date_or_today(&mut self, message: &str) -> Result<NaiveDate> {
        loop {
            let input = self.prompt(message)?;
            if input.is_empty() {
                return Ok(Local::now().date_naive());
            }
            match parse_date(&input) {
                Ok(date) => return Ok(date),
                Err(_) => writeln!(self.out, "Invalid date format. Please use YYYY-MM-DD.")?,
            }
        }
    }

    fn prompt_optional_date(&mut self, message: &str) -> Result<Option<NaiveDate>> {
        loop {
            let input = self.prompt(message)?;
            if input.is_empty() {
                return Ok(None);
            }
            match parse_date(&input) {
                Ok(date) => return Ok(Some(date)),
                Err(_) => writeln!(self.out, "Invalid date format. Please use YYYY-MM-DD.")?,
            }
        }
    }

    fn prompt_filter(&mut self, category_message: &str) -> Result<TransactionFilter> {
        let start =
            self.prompt_optional_date("Enter start date (YYYY-MM-DD) or press Enter to skip: ")?;
        let end =
            self.prompt_optional_date("Enter end date (YYYY-MM-DD) or press Enter to skip: ")?;
        let category = Some(self.prompt(category_message)?).filter(|c| !c.is_empty());
        Ok(TransactionFilter {
            start,
            end,
            category,
        })
    }

    /// Offer the presets for the amount's sign, optionally the current
    /// category, and a custom entry.
    fn prompt_category(
        &mut self,
        amount: Decimal,
        current: Option<&Category>,
    ) -> Result<Category> {
        let presets = Category::presets_for(amount);
        let keep_choice = current.map(|_| presets.len() + 1);
        let custom_choice = presets.len() + 1 + usize::from(current.is_some());

        writeln!(self.out, "\nSelect a category:")?;
        for (i, cat) in presets.iter().enumerate() {
            writeln!(self.out, "{}. {cat}", i + 1)?;
        }
        if let (Some(n), Some(cat)) = (keep_choice, current) {
            writeln!(self.out, "{n}. Keep current [{cat}]")?;
        }
        writeln!(self.out, "{custom_choice}. Custom Category")?;

        loop {
            let input = self.prompt(&format!("Enter choice (1-{custom_choice}): "))?;
            if let Ok(choice) = input.parse::<usize>() {
                if (1..=presets.len()).contains(&choice) {
                    return Ok(presets[choice - 1].clone());
                }
                if let (Some(n), Some(cat)) = (keep_choice, current) {
                    if choice == n {
                        return Ok(cat.clone());
                    }
                }
                if choice == custom_choice {
                    let custom = self.prompt("Enter custom category: ")?;
                    if !custom.is_empty() {
                        return Ok(Category::parse(&custom));
                    }
                }
            }
            writeln!(self.out, "Invalid choice. Please try again.")?;
        }
    }
}

#[cfg(test)]
#[path = "menu_tests.rs"]
mod tests;
