//! Backup management for the ledger, taken before it is rewritten.

use crate::error::{ErrorType, IntoResult};
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::Local;
use std::path::PathBuf;
use tracing::debug;

/// Manages backup file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
    ledger_path: PathBuf,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
            ledger_path: config.ledger_path().to_path_buf(),
        }
    }

    /// Copies the ledger to the backups directory.
    ///
    /// The filename format is `{ledger file name}.YYYY-MM-DD-NNN`, e.g. `expenses.csv.2025-12-14-001`.
    /// Automatically rotates old backups, keeping only `backup_copies` files.
    ///
    /// Returns the path to the created backup file.
    pub fn copy_ledger(&self) -> Result<PathBuf> {
        self.copy_ledger_inner().pub_result(ErrorType::Io)
    }

    fn copy_ledger_inner(&self) -> anyhow::Result<PathBuf> {
        let prefix = self
            .ledger_path
            .file_name()
            .with_context(|| format!("No file name in {}", self.ledger_path.display()))?
            .to_string_lossy()
            .to_string();
        let date = today();
        let seq = self.next_sequence_number(&prefix, &date)?;
        let path = self.backups_dir.join(format!("{prefix}.{date}-{seq:03}"));

        utils::copy(&self.ledger_path, &path)?;
        debug!("Backed up the ledger to {}", path.display());

        self.rotate(&prefix)?;
        Ok(path)
    }

    /// Scans the backups directory for existing files with the given prefix and date,
    /// and returns the next sequence number.
    fn next_sequence_number(&self, prefix: &str, date: &str) -> anyhow::Result<u32> {
        let mut max_seq: u32 = 0;
        for name in self.file_names()? {
            if let Some(seq) = parse_sequence_number(&name, prefix, date) {
                max_seq = max_seq.max(seq);
            }
        }
        Ok(max_seq + 1)
    }

    /// Rotates old backup files, keeping only `backup_copies` files with the given prefix.
    fn rotate(&self, prefix: &str) -> anyhow::Result<()> {
        let mut files: Vec<String> = self
            .file_names()?
            .into_iter()
            .filter(|name| is_backup_file(name, prefix))
            .collect();

        // Sort by filename (which sorts by date and sequence number due to format)
        files.sort();

        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for name in files.into_iter().take(to_delete) {
            debug!("Removing old backup {name}");
            utils::remove(self.backups_dir.join(name))?;
        }
        Ok(())
    }

    fn file_names(&self) -> anyhow::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in utils::read_dir(&self.backups_dir)? {
            let entry = entry.context("Failed to read directory entry")?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses the sequence number from a backup filename.
/// Returns None if the filename doesn't match the expected pattern.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str) -> Option<u32> {
    let expected_start = format!("{prefix}.{date}-");
    filename.strip_prefix(&expected_start)?.parse().ok()
}

/// Checks if a filename is a backup file with the given prefix: `{prefix}.YYYY-MM-DD-NNN`.
fn is_backup_file(filename: &str, prefix: &str) -> bool {
    let stamp = match filename.strip_prefix(&format!("{prefix}.")) {
        Some(s) => s,
        None => return false,
    };
    // YYYY-MM-DD-NNN
    stamp.len() >= 14
        && stamp
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-')
}
