//! A small personal expense tracker. Expenses live in a CSV ledger inside `$EXPENSES_HOME`, and
//! the `expenses` binary adds, edits, deletes, filters, sorts and totals them.

mod backup;
pub mod args;
pub mod commands;
mod config;
pub mod display;
mod error;
pub mod model;
pub mod store;
#[cfg(test)]
mod test;
mod utils;

pub use backup::Backup;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use store::Store;
