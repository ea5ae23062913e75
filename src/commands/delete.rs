//! Delete command handler.

use crate::args::{DeleteArgs, Target};
use crate::commands::{no_target, plural, require_id, Out};
use crate::model::Expenses;
use crate::{Config, Result};
use tracing::debug;

/// Deletes expenses and rewrites the ledger. A copy of the ledger is saved to the backups
/// directory first.
///
/// With `--id` exactly that row is removed. With the `--match-*` flags every expense whose fields
/// equal the key, amount compared as written, is removed. Deleting by a key that matches nothing
/// is not an error.
///
/// # Errors
///
/// - `ErrorType::Validation` if no expense was picked.
/// - `ErrorType::NotFound` if `--id` names a row that does not exist. No backup is taken.
/// - `ErrorType::Io` or `ErrorType::Format` if the ledger cannot be read or rewritten.
pub fn delete(config: &Config, args: &DeleteArgs) -> Result<Out<Expenses>> {
    let target = args.target().ok_or_else(no_target)?;
    let current = config.store().load_all()?;
    if let Target::Id(id) = &target {
        require_id(&current, *id)?;
    }
    let before = current.len();

    let backup = config.backup().copy_ledger()?;
    debug!("Saved a copy of the ledger to {}", backup.display());

    let expenses = match target {
        Target::Id(id) => config.store().delete(id)?,
        Target::Match(key) => config.store().delete_by_match(&key)?,
    };
    let count = before.saturating_sub(expenses.len());
    let message = format!("Deleted {count} expense{}", plural(count));
    Ok(Out::new(message, expenses))
}
