use anyhow::Result;
use rust_decimal::Decimal;

use crate::models::Transaction;

/// Per-category sums, iterated in the order categories were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CategoryTotals {
    entries: Vec<(String, Decimal)>,
}

impl CategoryTotals {
    fn add(&mut self, category: &str, amount: Decimal) -> Result<()> {
        match self.entries.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => *total = checked_sum(*total, amount, category)?,
            None => self.entries.push((category.to_string(), amount)),
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn get(&self, category: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, total)| *total)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.entries
            .iter()
            .map(|(name, total)| (name.as_str(), *total))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn sum(&self) -> Decimal {
        self.entries.iter().map(|(_, total)| *total).sum()
    }
}

/// Income and expense totals for a set of transactions. Expense sums are
/// magnitudes, so every value here is non-negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Aggregation {
    pub(crate) income_by_category: CategoryTotals,
    pub(crate) expense_by_category: CategoryTotals,
    pub(crate) total_income: Decimal,
    pub(crate) total_expense: Decimal,
}

impl Aggregation {
    pub(crate) fn net_balance(&self) -> Decimal {
        self.total_income - self.total_expense
    }
}

/// Bucket transactions into income (amount >= 0) and expense (amount < 0),
/// grouped by category label. Blank labels are grouped as "Uncategorized".
/// Fails if a sum leaves the range `Decimal` can represent.
pub(crate) fn aggregate(transactions: &[Transaction]) -> Result<Aggregation> {
    let mut result = Aggregation::default();

    for txn in transactions {
        let category = txn.category.report_label();
        if txn.is_income() {
            result.income_by_category.add(category, txn.amount)?;
            result.total_income = checked_sum(result.total_income, txn.amount, "Income")?;
        } else {
            let magnitude = txn.abs_amount();
            result.expense_by_category.add(category, magnitude)?;
            result.total_expense = checked_sum(result.total_expense, magnitude, "Expense")?;
        }
    }

    Ok(result)
}

fn checked_sum(total: Decimal, amount: Decimal, label: &str) -> Result<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| anyhow::anyhow!("{label} total overflowed while adding {amount}"))
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
