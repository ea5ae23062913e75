use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the data directory, its subdirectories and:
/// - Creates an initial `config.json` file with default settings, unless one exists
/// - Creates the ledger with its header row, unless a non-empty one exists
///
/// # Arguments
/// - `expenses_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/expenses`
///
/// # Errors
/// - Returns an error if any file operations fail.
pub fn init(expenses_home: &Path) -> Result<Out<()>> {
    let config = Config::create(expenses_home)?;
    Ok(format!(
        "The expenses directory is ready at {}, with the ledger at {}",
        config.root().display(),
        config.ledger_path().display()
    )
    .into())
}
