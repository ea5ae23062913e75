//! Insert command handler.

use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::Expense;
use crate::{Config, Result};
use tracing::debug;

/// Validates the new expense and appends it to the end of the ledger.
///
/// # Returns
///
/// On success, returns an `Out` containing a message and the `Expense` exactly as it was stored.
///
/// # Errors
///
/// - `ErrorType::Validation` if a field is empty or the amount is not a number. The ledger is
///   not touched.
/// - `ErrorType::Io` if the ledger cannot be written.
pub fn add(config: &Config, args: &AddArgs) -> Result<Out<Expense>> {
    let new_expense = args.new_expense();
    let expense = new_expense.validate()?;
    config.store().append(&new_expense)?;
    let expenses = config.store().load_all()?;
    debug!(
        "The ledger now holds {} expenses totaling {}",
        expenses.len(),
        config.currency().format(expenses.total())
    );
    let message = format!(
        "Added {} expense '{}' of {}",
        expense.category(),
        expense.description(),
        config.currency().format_text(expense.amount_text())
    );
    Ok(Out::new(message, expense))
}
