//! The `list` command: filter, sort and render the ledger.

use crate::args::ListArgs;
use crate::commands::{plural, Out};
use crate::display::expenses_table;
use crate::error::{ErrorType, IntoResult};
use crate::model::Expenses;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// The result of `list`: the selected expenses, their total and the rendered table.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    expenses: Expenses,
    total: String,
    #[serde(skip)]
    table: String,
}

impl Listing {
    pub fn expenses(&self) -> &Expenses {
        &self.expenses
    }

    /// The total of the listed expenses, formatted with the configured currency.
    pub fn total(&self) -> &str {
        &self.total
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl Display for Listing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.table)
    }
}

/// Loads the ledger, keeps the rows whose `--column` contains `--search` (ignoring case), sorts
/// them by date if `--sort` was given and renders them as a table with their total.
///
/// The language comes from `--lang`, falling back to the one in `config.json`.
///
/// # Errors
/// - `ErrorType::Io` or `ErrorType::Format` if the ledger cannot be read.
pub fn list(config: &Config, args: &ListArgs) -> Result<Out<Listing>> {
    let mut expenses = config
        .store()
        .load_all()?
        .filter(args.column(), args.search());
    if let Some(order) = args.sort() {
        expenses = expenses.sort_by_date(order);
    }

    let language = args.lang().unwrap_or_else(|| config.language());
    let currency = config.currency();
    let table = expenses_table(&expenses, language, &currency).pub_result(ErrorType::Io)?;
    let total = currency.format(expenses.total());

    let count = expenses.len();
    let message = format!("Listed {count} expense{}", plural(count));
    Ok(Out::new(
        message,
        Listing {
            expenses,
            total,
            table,
        },
    ))
}
