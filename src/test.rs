//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Expenses, NewExpense};
use crate::{Config, Store};
use tempfile::TempDir;

/// Test environment that sets up an expenses home directory with a Config and an empty ledger.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with Config and an initialized ledger.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("expenses");
        let config = Config::create(&root).unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    pub fn store(&self) -> &Store {
        self.config.store()
    }

    /// Appends an expense whose transaction date is the same as its date.
    pub fn add(&self, date: &str, category: &str, amount: &str, description: &str) {
        self.store()
            .append(&NewExpense::new(date, category, amount, description, date))
            .unwrap();
    }

    /// Reads the ledger back.
    pub fn expenses(&self) -> Expenses {
        self.store().load_all().unwrap()
    }

    /// The raw text of the ledger file.
    pub fn ledger_text(&self) -> String {
        std::fs::read_to_string(self.config.ledger_path()).unwrap()
    }

    /// Number of files in the backups directory.
    pub fn backup_count(&self) -> usize {
        std::fs::read_dir(self.config.backups()).unwrap().count()
    }
}
