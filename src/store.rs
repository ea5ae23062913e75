//! This module is responsible for reading, writing and managing the expense ledger.
//!
//! The ledger is a comma-separated table with the header
//! `Date,Category,Amount,Description,Transaction Date`. Every mutation other than `append` reads
//! the whole table, changes it in memory and writes the whole table back. Writes go through a
//! temporary file that is renamed over the ledger, so a failed write leaves the old ledger intact.

use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Expense, ExpenseId, Expenses, MatchKey, NewExpense, HEADERS};
use crate::{utils, Result};
use anyhow::Context;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A handle to the ledger file at `path`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Creates the ledger with just the header row if it does not exist or is empty. An existing,
    /// non-empty ledger is left as it is.
    ///
    /// # Errors
    /// - `ErrorType::Io` if the file cannot be inspected or written.
    pub fn initialize(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        let needs_header = match std::fs::metadata(&store.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Unable to inspect {}", store.path.display()))
                    .pub_result(ErrorType::Io)
            }
        };
        if needs_header {
            debug!("Creating an empty ledger at {}", store.path.display());
            let data = to_csv(&[]).pub_result(ErrorType::Io)?;
            utils::write_atomic(&store.path, data).pub_result(ErrorType::Io)?;
        }
        Ok(store)
    }

    /// Creates a handle without touching the file system.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every row of the ledger. Amounts are not checked here, so a ledger with a few bad
    /// amounts can still be shown.
    ///
    /// # Errors
    /// - `ErrorType::Io` if the ledger cannot be read.
    /// - `ErrorType::Format` if the header is missing or wrong, or a row has the wrong number of
    ///   fields.
    pub fn load_all(&self) -> Result<Expenses> {
        let records = self.read_records()?;
        debug!(
            "Loaded {} expenses from {}",
            records.len(),
            self.path.display()
        );
        Ok(Expenses::new(records))
    }

    /// Validates `new_expense` and writes it as a new last row. The rest of the file is not
    /// rewritten. Nothing is written if validation fails.
    ///
    /// # Errors
    /// - `ErrorType::Validation` if a field is empty or the amount is not a number.
    /// - `ErrorType::Io` if the ledger cannot be opened or written.
    pub fn append(&self, new_expense: &NewExpense) -> Result<()> {
        let expense = new_expense.validate()?;
        self.append_row(&expense).pub_result(ErrorType::Io)?;
        debug!("Appended an expense to {}", self.path.display());
        Ok(())
    }

    /// Removes every expense matching `key`, comparing the amount numerically, then adds
    /// `new_expense` at the end.
    ///
    /// When nothing matches `key` the result is a plain insert of `new_expense`; this is not an
    /// error.
    ///
    /// # Errors
    /// - `ErrorType::Validation` if `new_expense` is invalid or the key's amount is not a number.
    /// - `ErrorType::Io` / `ErrorType::Format` as for `load_all`, or if the rewrite fails.
    pub fn update_by_match(&self, key: &MatchKey, new_expense: &NewExpense) -> Result<Expenses> {
        let expense = new_expense.validate()?;
        let amount = key.parsed_amount()?;
        let mut records = self.read_records()?;
        let before = records.len();
        records.retain(|e| !key.matches_value(e, &amount));
        let removed = before - records.len();
        if removed == 0 {
            warn!("No expense matched {key:?}, the new expense will be added without replacing one");
        }
        records.push(expense);
        debug!("Replacing {removed} expense(s) in {}", self.path.display());
        self.rewrite(records)
    }

    /// Removes every expense matching `key`, comparing the amount as written in the ledger.
    /// Duplicates are all removed. Deleting with a key that matches nothing rewrites the ledger
    /// unchanged.
    ///
    /// # Errors
    /// - `ErrorType::Io` / `ErrorType::Format` as for `load_all`, or if the rewrite fails.
    pub fn delete_by_match(&self, key: &MatchKey) -> Result<Expenses> {
        let mut records = self.read_records()?;
        let before = records.len();
        records.retain(|e| !key.matches_text(e));
        debug!(
            "Deleting {} expense(s) from {}",
            before - records.len(),
            self.path.display()
        );
        self.rewrite(records)
    }

    /// Replaces the expense with `id` by `new_expense`, keeping its position.
    ///
    /// # Errors
    /// - `ErrorType::Validation` if `new_expense` is invalid.
    /// - `ErrorType::NotFound` if there is no row `id`.
    /// - `ErrorType::Io` / `ErrorType::Format` as for `load_all`, or if the rewrite fails.
    pub fn update(&self, id: ExpenseId, new_expense: &NewExpense) -> Result<Expenses> {
        let expense = new_expense.validate()?;
        let mut records = self.read_records()?;
        let slot = id
            .index()
            .and_then(|ix| records.get_mut(ix))
            .ok_or_else(|| not_found(id))?;
        *slot = expense;
        debug!("Updating expense {id} in {}", self.path.display());
        self.rewrite(records)
    }

    /// Removes exactly the expense with `id`.
    ///
    /// # Errors
    /// - `ErrorType::NotFound` if there is no row `id`.
    /// - `ErrorType::Io` / `ErrorType::Format` as for `load_all`, or if the rewrite fails.
    pub fn delete(&self, id: ExpenseId) -> Result<Expenses> {
        let mut records = self.read_records()?;
        let ix = id
            .index()
            .filter(|ix| *ix < records.len())
            .ok_or_else(|| not_found(id))?;
        records.remove(ix);
        debug!("Deleting expense {id} from {}", self.path.display());
        self.rewrite(records)
    }

    fn read_records(&self) -> Result<Vec<Expense>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Unable to open the ledger {}", self.path.display()))
            .pub_result(ErrorType::Io)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let headers = reader
            .headers()
            .map_err(|e| self.csv_error(e, "Unable to read the ledger header"))?;
        if headers.len() != HEADERS.len() || headers.iter().zip(HEADERS).any(|(a, b)| a != b) {
            return Err(Error::msg(
                ErrorType::Format,
                format!(
                    "The ledger {} has the header '{}', expected '{}'",
                    self.path.display(),
                    headers.iter().collect::<Vec<_>>().join(","),
                    HEADERS.join(",")
                ),
            ));
        }

        let mut records = Vec::new();
        for (ix, result) in reader.deserialize::<Expense>().enumerate() {
            // Row numbers in messages count the header as row 1.
            let record = result.map_err(|e| {
                self.csv_error(e, format!("Unable to read row {} of the ledger", ix + 2))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn rewrite(&self, records: Vec<Expense>) -> Result<Expenses> {
        let data = to_csv(&records).pub_result(ErrorType::Io)?;
        utils::write_atomic(&self.path, data).pub_result(ErrorType::Io)?;
        Ok(Expenses::new(records))
    }

    fn append_row(&self, expense: &Expense) -> anyhow::Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open the ledger {}", self.path.display()))?;

        let len = file
            .metadata()
            .with_context(|| format!("Unable to inspect {}", self.path.display()))?
            .len();
        let mut data = Vec::new();
        if len == 0 {
            data = to_csv(&[])?;
        } else if !ends_with_newline(&mut file)? {
            data.push(b'\n');
        }

        let mut writer = csv_writer(Vec::new());
        writer.serialize(expense)?;
        data.extend(writer.into_inner().map_err(|e| e.into_error())?);

        file.write_all(&data)
            .and_then(|_| file.flush())
            .with_context(|| format!("Unable to write to {}", self.path.display()))
    }

    fn csv_error(&self, e: csv::Error, message: impl Into<String>) -> Error {
        let error_type = if e.is_io_error() {
            ErrorType::Io
        } else {
            ErrorType::Format
        };
        let message = format!("{}: {}", message.into(), self.path.display());
        Error::new(error_type, anyhow::Error::new(e).context(message))
    }
}

fn not_found(id: ExpenseId) -> Error {
    Error::msg(ErrorType::NotFound, format!("Expense {id} not found"))
}

fn csv_writer(w: Vec<u8>) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(w)
}

/// Renders the header and `records` as a complete ledger.
fn to_csv(records: &[Expense]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv_writer(Vec::new());
    writer.write_record(HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Unable to serialize the ledger")
}

fn ends_with_newline(file: &mut File) -> anyhow::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))
        .and_then(|_| file.read_exact(&mut last))
        .context("Unable to read the end of the ledger")?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SortOrder;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tempfile::TempDir;

    const HEADER_LINE: &str = "Date,Category,Amount,Description,Transaction Date\n";

    fn setup() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::initialize(dir.path().join("expenses.csv")).unwrap();
        (dir, store)
    }

    fn input(date: &str, category: &str, amount: &str, description: &str) -> NewExpense {
        NewExpense::new(date, category, amount, description, date)
    }

    fn contents(store: &Store) -> String {
        std::fs::read_to_string(store.path()).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_initialize_creates_header_only_file() {
        let (_dir, store) = setup();
        assert_eq!(contents(&store), HEADER_LINE);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_initialize_fills_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.csv");
        std::fs::write(&path, "").unwrap();
        let store = Store::initialize(&path).unwrap();
        assert_eq!(contents(&store), HEADER_LINE);
    }

    #[test]
    fn test_initialize_leaves_existing_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.csv");
        let existing = format!("{HEADER_LINE}2024-01-01,Food,3,Tea,2024-01-01\n");
        std::fs::write(&path, &existing).unwrap();
        let store = Store::initialize(&path).unwrap();
        assert_eq!(contents(&store), existing);
    }

    #[test]
    fn test_initialize_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Store::initialize(dir.path().join("nope").join("expenses.csv")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("missing.csv"));
        let err = store.load_all().unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);
    }

    #[test]
    fn test_load_wrong_header_is_format_error() {
        let (_dir, store) = setup();
        std::fs::write(store.path(), "Date,Category,Amount\n2024-01-01,Food,3\n").unwrap();
        let err = store.load_all().unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Format);
        assert!(err.to_string().contains("expected"), "{err}");
    }

    #[test]
    fn test_load_empty_file_is_format_error() {
        let (_dir, store) = setup();
        std::fs::write(store.path(), "").unwrap();
        let err = store.load_all().unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Format);
    }

    #[test]
    fn test_load_short_row_is_format_error() {
        let (_dir, store) = setup();
        std::fs::write(store.path(), format!("{HEADER_LINE}2024-01-01,Food\n")).unwrap();
        let err = store.load_all().unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Format);
        assert!(err.to_string().contains("row 2"), "{err}");
    }

    #[test]
    fn test_load_tolerates_bad_amounts() {
        let (_dir, store) = setup();
        let data = format!(
            "{HEADER_LINE}2024-01-01,Food,10.00,A,2024-01-01\n\
             2024-01-02,Food,bad,B,2024-01-02\n\
             2024-01-03,Food,5.50,C,2024-01-03\n"
        );
        std::fs::write(store.path(), data).unwrap();
        let set = store.load_all().unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.rows()[1].item().amount_text(), "bad");
        assert_eq!(set.total(), dec("15.50"));
    }

    #[test]
    fn test_load_accepts_crlf_and_quoted_fields() {
        let (_dir, store) = setup();
        let data = "Date,Category,Amount,Description,Transaction Date\r\n\
                    2024-01-01,Food,3,\"Tea, with \"\"milk\"\"\",2024-01-01\r\n";
        std::fs::write(store.path(), data).unwrap();
        let set = store.load_all().unwrap();
        assert_eq!(set.rows()[0].item().description(), "Tea, with \"milk\"");
    }

    #[test]
    fn test_append_round_trip_in_order() {
        let (_dir, store) = setup();
        store
            .append(&input("2024-01-01", "Food", "12.5", "Lunch"))
            .unwrap();
        let before = store.load_all().unwrap();
        store
            .append(&input("2023-12-31", "Rent", "800", "December"))
            .unwrap();
        let after = store.load_all().unwrap();

        assert_eq!(after.len(), before.len() + 1);
        let previous: Vec<&Expense> = before.iter().collect();
        let kept: Vec<&Expense> = after.iter().take(before.len()).collect();
        assert_eq!(previous, kept);
        let last = after.rows().last().unwrap().item();
        assert_eq!(last.category(), "Rent");
        assert_eq!(last.amount_text(), "800");
    }

    #[test]
    fn test_append_quotes_delimiters() {
        let (_dir, store) = setup();
        store
            .append(&input("2024-01-01", "Food", "4", "Bread, butter"))
            .unwrap();
        assert!(contents(&store).contains("\"Bread, butter\""));
        let set = store.load_all().unwrap();
        assert_eq!(set.rows()[0].item().description(), "Bread, butter");
    }

    #[test]
    fn test_append_after_missing_trailing_newline() {
        let (_dir, store) = setup();
        std::fs::write(
            store.path(),
            "Date,Category,Amount,Description,Transaction Date\n2024-01-01,Food,3,Tea,2024-01-01",
        )
        .unwrap();
        store
            .append(&input("2024-01-02", "Food", "4", "Cake"))
            .unwrap();
        let set = store.load_all().unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.rows()[1].item().description(), "Cake");
    }

    #[test]
    fn test_append_writes_header_into_empty_file() {
        let (_dir, store) = setup();
        std::fs::write(store.path(), "").unwrap();
        store
            .append(&input("2024-01-02", "Food", "4", "Cake"))
            .unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_append_validation_leaves_file_untouched() {
        let (_dir, store) = setup();
        store.append(&input("2024-01-01", "Food", "1", "A")).unwrap();
        let before = contents(&store);

        let err = store.append(&input("2024-01-01", "Food", "abc", "A")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        let err = store.append(&input("2024-01-01", "", "1", "A")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);

        assert_eq!(contents(&store), before);
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_append_to_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("missing.csv"));
        let err = store.append(&input("2024-01-01", "Food", "1", "A")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_update_by_match_compares_amount_numerically() {
        let (_dir, store) = setup();
        store.append(&input("2024-01-01", "Food", "12.5", "Lunch")).unwrap();
        store.append(&input("2024-01-02", "Rent", "800", "Jan")).unwrap();

        let key = MatchKey::new("2024-01-01", "Food", "12.50", "Lunch");
        let set = store
            .update_by_match(&key, &input("2024-01-01", "Food", "20.0", "Lunch"))
            .unwrap();

        assert_eq!(set.len(), 2);
        // The replacement goes to the end.
        assert_eq!(set.rows()[0].item().category(), "Rent");
        assert_eq!(set.rows()[1].item().amount_text(), "20.0");
        assert_eq!(store.load_all().unwrap(), set);
    }

    #[test]
    fn test_update_by_match_replaces_all_duplicates() {
        let (_dir, store) = setup();
        store.append(&input("2024-01-01", "Food", "3", "Tea")).unwrap();
        store.append(&input("2024-01-01", "Food", "3", "Tea")).unwrap();
        let key = MatchKey::new("2024-01-01", "Food", "3", "Tea");
        let set = store
            .update_by_match(&key, &input("2024-01-01", "Food", "4", "Tea"))
            .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.total(), dec("4"));
    }

    #[test]
    fn test_update_by_match_without_match_inserts() {
        let (_dir, store) = setup();
        store.append(&input("2024-01-01", "Food", "3", "Tea")).unwrap();
        let key = MatchKey::new("1999-01-01", "Nothing", "1", "Nope");
        let set = store
            .update_by_match(&key, &input("2024-01-02", "Food", "4", "Cake"))
            .unwrap();
        // Zero removals plus one addition: the update became an insert.
        assert_eq!(set.len(), 2);
        assert_eq!(set.total(), dec("7"));
    }

    #[test]
    fn test_update_by_match_validation_leaves_file_untouched() {
        let (_dir, store) = setup();
        store.append(&input("2024-01-01", "Food", "3", "Tea")).unwrap();
        let before = contents(&store);
        let key = MatchKey::new("2024-01-01", "Food", "3", "Tea");

        let err = store
            .update_by_match(&key, &input("2024-01-01", "Food", "abc", "Tea"))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        let err = store
            .update_by_match(&key, &input("2024-01-01", "Food", "3", ""))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        let bad_key = MatchKey::new("2024-01-01", "Food", "three", "Tea");
        let err = store
            .update_by_match(&bad_key, &input("2024-01-01", "Food", "3", "Tea"))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);

        assert_eq!(contents(&store), before);
    }

    #[test]
    fn test_delete_by_match_compares_amount_as_text() {
        let (_dir, store) = setup();
        store.append(&input("2024-01-01", "Food", "12.5", "Lunch")).unwrap();

        let set = store
            .delete_by_match(&MatchKey::new("2024-01-01", "Food", "12.50", "Lunch"))
            .unwrap();
        assert_eq!(set.len(), 1);

        let set = store
            .delete_by_match(&MatchKey::new("2024-01-01", "Food", "12.5", "Lunch"))
            .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_delete_by_match_removes_duplicates_and_is_idempotent() {
        let (_dir, store) = setup();
        store.append(&input("2024-01-01", "Food", "3", "Tea")).unwrap();
        store.append(&input("2024-01-02", "Rent", "800", "Jan")).unwrap();
        store.append(&input("2024-01-01", "Food", "3", "Tea")).unwrap();
        let key = MatchKey::new("2024-01-01", "Food", "3", "Tea");

        let once = store.delete_by_match(&key).unwrap();
        assert_eq!(once.len(), 1);
        let twice = store.delete_by_match(&key).unwrap();
        assert_eq!(once, twice);
        assert_eq!(store.load_all().unwrap(), once);
    }

    #[test]
    fn test_update_by_id_keeps_position() {
        let (_dir, store) = setup();
        store.append(&input("2024-01-01", "Food", "3", "Tea")).unwrap();
        store.append(&input("2024-01-01", "Food", "3", "Tea")).unwrap();
        store.append(&input("2024-01-02", "Rent", "800", "Jan")).unwrap();

        let set = store
            .update(ExpenseId::new(2), &input("2024-01-01", "Food", "4", "Coffee"))
            .unwrap();
        let descriptions: Vec<&str> = set.iter().map(Expense::description).collect();
        assert_eq!(descriptions, vec!["Tea", "Coffee", "Jan"]);
        assert_eq!(store.load_all().unwrap(), set);
    }

    #[test]
    fn test_update_by_id_not_found() {
        let (_dir, store) = setup();
        store.append(&input("2024-01-01", "Food", "3", "Tea")).unwrap();
        let before = contents(&store);
        for id in [0, 2] {
            let err = store
                .update(ExpenseId::new(id), &input("2024-01-01", "Food", "4", "Tea"))
                .unwrap_err();
            assert_eq!(err.error_type(), ErrorType::NotFound);
        }
        assert_eq!(contents(&store), before);
    }

    #[test]
    fn test_delete_by_id_removes_only_one_duplicate() {
        let (_dir, store) = setup();
        store.append(&input("2024-01-01", "Food", "3", "Tea")).unwrap();
        store.append(&input("2024-01-01", "Food", "3", "Tea")).unwrap();
        let set = store.delete(ExpenseId::new(1)).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.rows()[0].id(), ExpenseId::new(1));
        let err = store.delete(ExpenseId::new(2)).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
    }

    #[test]
    fn test_id_from_sorted_view_addresses_ledger_row() {
        let (_dir, store) = setup();
        store.append(&input("2024-03-01", "Food", "3", "Tea")).unwrap();
        store.append(&input("2024-01-15", "Rent", "800", "Jan")).unwrap();
        let view = store.load_all().unwrap().sort_by_date(SortOrder::Ascending);
        let first = &view.rows()[0];
        assert_eq!(first.item().category(), "Rent");
        let set = store.delete(first.id()).unwrap();
        assert_eq!(set.rows()[0].item().category(), "Food");
    }

    #[test]
    fn test_rewrite_failure_on_bad_ledger_leaves_file() {
        let (_dir, store) = setup();
        let broken = "Wrong,Header\n1,2\n";
        std::fs::write(store.path(), broken).unwrap();
        let err = store
            .delete_by_match(&MatchKey::new("1", "2", "3", "4"))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Format);
        assert_eq!(contents(&store), broken);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_rewrite_leaves_ledger_unchanged() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, store) = setup();
        store.append(&input("2024-01-01", "Food", "3", "Tea")).unwrap();
        store.append(&input("2024-01-02", "Rent", "800", "Jan")).unwrap();
        let before = contents(&store);

        // The temporary file cannot be created in a read-only directory.
        let set_mode = |mode: u32| {
            std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(mode)).unwrap()
        };
        set_mode(0o555);
        let writable = dir.path().join("writable");
        if std::fs::write(&writable, "").is_ok() {
            // Permissions are not enforced for this user, e.g. root.
            std::fs::remove_file(&writable).unwrap();
            set_mode(0o755);
            return;
        }

        let delete = store.delete_by_match(&MatchKey::new("2024-01-01", "Food", "3", "Tea"));
        let update = store.update(ExpenseId::new(2), &input("2024-01-02", "Rent", "900", "Jan"));
        set_mode(0o755);

        assert_eq!(delete.unwrap_err().error_type(), ErrorType::Io);
        assert_eq!(update.unwrap_err().error_type(), ErrorType::Io);
        assert_eq!(contents(&store), before);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_end_to_end() {
        let dir = TempDir::new().unwrap();
        let store = Store::initialize(dir.path().join("expenses.csv")).unwrap();
        assert_eq!(contents(&store), HEADER_LINE);

        store
            .append(&NewExpense::new(
                "2024-01-01",
                "Food",
                "12.5",
                "Lunch",
                "2024-01-01",
            ))
            .unwrap();
        let set = store.load_all().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.total(), dec("12.5"));

        let key = set.rows()[0].item().match_key();
        store
            .update_by_match(
                &key,
                &NewExpense::new("2024-01-01", "Food", "20.0", "Lunch", "2024-01-01"),
            )
            .unwrap();
        let set = store.load_all().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.rows()[0].item().amount().unwrap().value(), dec("20.0"));
        assert_eq!(set.total(), dec("20.0"));

        let key = MatchKey::new("2024-01-01", "Food", "20.0", "Lunch");
        store.delete_by_match(&key).unwrap();
        let set = store.load_all().unwrap();
        assert!(set.is_empty());
        assert_eq!(set.total(), Decimal::ZERO);
        assert_eq!(contents(&store), HEADER_LINE);
    }
}
