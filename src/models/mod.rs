mod budget;
mod category;
mod recurring_rule;
mod transaction;

pub use budget::Budget;
pub use category::Category;
pub use recurring_rule::{DueDate, Frequency, RecurringRule};
pub use transaction::{Transaction, TxnKind};
