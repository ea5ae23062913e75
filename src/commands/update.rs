//! Update command handler.

use crate::args::{Target, UpdateArgs};
use crate::commands::{no_target, require_id, Out};
use crate::model::Expenses;
use crate::{Config, Result};
use tracing::debug;

/// Replaces an expense with the new field values and rewrites the ledger. A copy of the ledger is
/// saved to the backups directory first.
///
/// With `--id` the expense keeps its position in the ledger. With the `--match-*` flags every
/// expense equal to the key (amounts compared as numbers) is removed and the new expense is added
/// at the end; if nothing matches, the new expense is simply added.
///
/// # Returns
///
/// On success, returns an `Out` containing a message and the ledger as it now is.
///
/// # Errors
///
/// - `ErrorType::Validation` if the new values or the `--match-amount` are invalid, or no expense
///   was picked.
/// - `ErrorType::NotFound` if `--id` names a row that does not exist.
/// - `ErrorType::Io` or `ErrorType::Format` if the ledger cannot be read or rewritten.
///
/// No backup is taken when validation fails or the id is unknown.
pub fn update(config: &Config, args: &UpdateArgs) -> Result<Out<Expenses>> {
    let target = args.target().ok_or_else(no_target)?;
    let new_expense = args.new_expense();
    new_expense.validate()?;
    match &target {
        Target::Id(id) => require_id(&config.store().load_all()?, *id)?,
        Target::Match(key) => {
            key.parsed_amount()?;
        }
    }

    let backup = config.backup().copy_ledger()?;
    debug!("Saved a copy of the ledger to {}", backup.display());

    let (message, expenses) = match target {
        Target::Id(id) => {
            let expenses = config.store().update(id, &new_expense)?;
            (format!("Updated expense {id}"), expenses)
        }
        Target::Match(key) => {
            let expenses = config.store().update_by_match(&key, &new_expense)?;
            (
                format!(
                    "Updated the {} expense '{}' from {}",
                    key.category, key.description, key.date
                ),
                expenses,
            )
        }
    };
    Ok(Out::new(message, expenses))
}
