use rust_decimal::Decimal;

/// Label a blank category is reported under.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A transaction category: one of the built-in presets or a free-text label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Salary,
    Bonus,
    Gift,
    OtherIncome,
    Food,
    Rent,
    Utilities,
    Entertainment,
    OtherExpense,
    Custom(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Salary => "Salary",
            Self::Bonus => "Bonus",
            Self::Gift => "Gift",
            Self::OtherIncome => "Other Income",
            Self::Food => "Food",
            Self::Rent => "Rent",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::OtherExpense => "Other Expense",
            Self::Custom(label) => label,
        }
    }

    /// Map a stored label back to a category. Preset names match exactly so
    /// that labels like "food" keep their original casing as custom labels.
    pub fn parse(s: &str) -> Self {
        match s {
            "Salary" => Self::Salary,
            "Bonus" => Self::Bonus,
            "Gift" => Self::Gift,
            "Other Income" => Self::OtherIncome,
            "Food" => Self::Food,
            "Rent" => Self::Rent,
            "Utilities" => Self::Utilities,
            "Entertainment" => Self::Entertainment,
            "Other Expense" => Self::OtherExpense,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn income_presets() -> &'static [Category] {
        &[Self::Salary, Self::Bonus, Self::Gift, Self::OtherIncome]
    }

    pub fn expense_presets() -> &'static [Category] {
        &[
            Self::Food,
            Self::Rent,
            Self::Utilities,
            Self::Entertainment,
            Self::OtherExpense,
        ]
    }

    /// Presets offered for an amount: income presets for zero and above.
    pub fn presets_for(amount: Decimal) -> &'static [Category] {
        if amount >= Decimal::ZERO {
            Self::income_presets()
        } else {
            Self::expense_presets()
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }

    /// The label used when grouping for reports.
    pub fn report_label(&self) -> &str {
        if self.is_blank() {
            UNCATEGORIZED
        } else {
            self.as_str()
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
