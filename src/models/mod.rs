mod category;
mod filter;
mod transaction;

pub use category::Category;
pub use filter::TransactionFilter;
pub use transaction::Transaction;
