//! Configuration file handling.
//!
//! The configuration file is stored at `$EXPENSES_HOME/config.json` and contains the location of
//! the ledger, how money is displayed, the default language and backup settings.

use crate::backup::Backup;
use crate::display::{CurrencyFormat, Language};
use crate::error::{ErrorType, IntoResult};
use crate::store::Store;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "expenses";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const EXPENSES_CSV: &str = "expenses.csv";
const CURRENCY_SYMBOL: &str = "€";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSES_HOME` and from there it loads `$EXPENSES_HOME/config.json`. It provides
/// the ledger `Store` and paths to the other items expected in the data directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    store: Store,
}

impl Config {
    /// Creates the data directory, its subdirectories, a default `config.json` (unless one is
    /// already there) and an empty ledger (unless one is already there).
    ///
    /// # Errors
    /// - `ErrorType::Config` if the directory or config file cannot be created or read.
    /// - `ErrorType::Io` if the ledger cannot be created.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .context("Unable to create the expenses home directory")
            .pub_result(ErrorType::Config)?;
        let root = utils::canonicalize(&maybe_relative).pub_result(ErrorType::Config)?;

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).pub_result(ErrorType::Config)?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            debug!("Keeping the existing {}", config_path.display());
            ConfigFile::load(&config_path).pub_result(ErrorType::Config)?
        } else {
            let config_file = ConfigFile::default();
            config_file
                .save(&config_path)
                .pub_result(ErrorType::Config)?;
            config_file
        };

        let store = Store::initialize(resolve(&root, &config_file.ledger_path))?;
        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
            store,
        })
    }

    /// This will
    /// - validate that `expenses_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - create the ledger with its header row if it is missing or empty
    /// - return the loaded configuration object
    pub fn load(expenses_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = expenses_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .context("The expenses home directory is missing, run `expenses init` first")
            .pub_result(ErrorType::Config)?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = load_config_file(&config_path).pub_result(ErrorType::Config)?;

        let backups = root.join(BACKUPS);
        if !backups.is_dir() {
            return Err(anyhow::anyhow!(
                "The backups directory is missing '{}'",
                backups.display()
            ))
            .pub_result(ErrorType::Config);
        }

        let store = Store::initialize(resolve(&root, &config_file.ledger_path))?;
        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
            store,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn ledger_path(&self) -> &Path {
        self.store.path()
    }

    pub fn currency(&self) -> CurrencyFormat {
        CurrencyFormat {
            symbol: self.config_file.currency_symbol.clone(),
            thousands_separator: self.config_file.thousands_separator,
        }
    }

    pub fn language(&self) -> Language {
        self.config_file.language
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }
}

fn load_config_file(config_path: &Path) -> anyhow::Result<ConfigFile> {
    if !config_path.is_file() {
        bail!(
            "The config file is missing '{}', run `expenses init` first",
            config_path.display()
        )
    }
    ConfigFile::load(config_path)
}

/// Returns `p` unchanged if it is absolute, otherwise resolves it against `root`.
fn resolve(root: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        return p.to_path_buf();
    }
    root.join(p)
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expenses",
///   "config_version": 1,
///   "ledger_path": "expenses.csv",
///   "currency_symbol": "€",
///   "thousands_separator": false,
///   "language": "en",
///   "backup_copies": 5
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expenses"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the ledger, relative to the expenses home directory or absolute
    #[serde(default = "default_ledger_path")]
    ledger_path: PathBuf,

    /// Symbol written in front of amounts
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,

    /// Whether amounts are written with thousands separators
    #[serde(default)]
    thousands_separator: bool,

    /// The language used when none is given on the command line
    #[serde(default)]
    language: Language,

    /// Number of backup copies to keep
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from(EXPENSES_CSV)
}

fn default_currency_symbol() -> String {
    CURRENCY_SYMBOL.to_string()
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            ledger_path: default_ledger_path(),
            currency_symbol: default_currency_symbol(),
            thousands_separator: false,
            language: Language::default(),
            backup_copies: BACKUP_COPIES,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data).context("Unable to write config file")
    }
}
