//! Types that represent the core data model: `Expense` rows and `Expenses` record sets.
mod amount;
mod expense;
mod expenses;

pub use amount::{Amount, AmountError};
pub use expense::{Expense, ExpenseColumn, MatchKey, NewExpense, HEADERS};
pub use expenses::{ExpenseId, Expenses, Row, SortOrder};
