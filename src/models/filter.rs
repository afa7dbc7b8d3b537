use chrono::NaiveDate;

/// Criteria for a store scan. Every field is optional; the default matches
/// every transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Inclusive lower bound.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub end: Option<NaiveDate>,
    /// Exact match, ignoring case.
    pub category: Option<String>,
}
