use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Category;

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: Category,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: Decimal, category: Category) -> Self {
        Self {
            id: None,
            date,
            amount,
            category,
        }
    }

    /// Zero counts as income.
    pub fn is_income(&self) -> bool {
        self.amount >= Decimal::ZERO
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }
}
