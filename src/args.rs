//! These structs provide the CLI interface for the expenses CLI.

use crate::display::Language;
use crate::model::{ExpenseColumn, ExpenseId, MatchKey, NewExpense, SortOrder};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expenses: A command-line tool for keeping track of personal expenses.
///
/// Expenses are kept in a CSV file with the columns Date, Category, Amount, Description and
/// Transaction Date. You can add, edit, delete, search, sort and total them, with labels in
/// English or French.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and an empty ledger.
    ///
    /// Running it again is harmless: an existing configuration and ledger are kept.
    Init,
    /// Show expenses as a table with their total.
    List(ListArgs),
    /// Add an expense to the end of the ledger.
    Add(AddArgs),
    /// Replace an expense, picked by its row number or by its field values.
    Update(UpdateArgs),
    /// Delete an expense, picked by its row number or by its field values.
    Delete(DeleteArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the ledger and configuration are held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_expenses_home())]
    expenses_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, expenses_home: PathBuf) -> Self {
        Self {
            log_level,
            expenses_home: expenses_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expenses_home(&self) -> &DisplayPath {
        &self.expenses_home
    }
}

/// (Not shown): Args for the `expenses list` command.
#[derive(Debug, Default, ClapArgs, Clone)]
pub struct ListArgs {
    /// The column to search in. Without it, --search is ignored.
    #[arg(long, value_enum)]
    column: Option<ExpenseColumn>,

    /// Only show expenses whose --column contains this text, ignoring case.
    #[arg(long, default_value = "")]
    search: String,

    /// Sort by date. Without it, expenses are shown in ledger order.
    #[arg(long, value_enum)]
    sort: Option<SortOrder>,

    /// The language of the labels. Defaults to the language in config.json.
    #[arg(long, value_enum)]
    lang: Option<Language>,
}

impl ListArgs {
    pub fn new(
        column: Option<ExpenseColumn>,
        search: impl Into<String>,
        sort: Option<SortOrder>,
        lang: Option<Language>,
    ) -> Self {
        Self {
            column,
            search: search.into(),
            sort,
            lang,
        }
    }

    pub fn column(&self) -> Option<ExpenseColumn> {
        self.column
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    pub fn lang(&self) -> Option<Language> {
        self.lang
    }
}

/// The five fields of an expense as entered on the command line.
#[derive(Debug, Default, ClapArgs, Clone)]
pub struct ExpenseFields {
    /// The date of the expense, YYYY-MM-DD.
    #[arg(long)]
    date: String,

    /// A short category such as Food or Transport.
    #[arg(long)]
    category: String,

    /// The amount, a number such as 12.50.
    #[arg(long, allow_hyphen_values = true)]
    amount: String,

    /// What the expense was for.
    #[arg(long)]
    description: String,

    /// The date the money actually moved, YYYY-MM-DD.
    #[arg(long)]
    transaction_date: String,
}

impl ExpenseFields {
    pub fn new_expense(&self) -> NewExpense {
        NewExpense::new(
            &self.date,
            &self.category,
            &self.amount,
            &self.description,
            &self.transaction_date,
        )
    }
}

impl From<NewExpense> for ExpenseFields {
    fn from(value: NewExpense) -> Self {
        Self {
            date: value.date,
            category: value.category,
            amount: value.amount,
            description: value.description,
            transaction_date: value.transaction_date,
        }
    }
}

/// (Not shown): Args for the `expenses add` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct AddArgs {
    #[clap(flatten)]
    fields: ExpenseFields,
}

impl AddArgs {
    pub fn new(new_expense: NewExpense) -> Self {
        Self {
            fields: new_expense.into(),
        }
    }

    pub fn new_expense(&self) -> NewExpense {
        self.fields.new_expense()
    }
}

/// Picks the expense to change: either its row number, as shown by `expenses list`, or all four of
/// its date, category, amount and description.
#[derive(Debug, Default, ClapArgs, Clone)]
pub struct Selector {
    /// The row number shown in the first column of `expenses list`.
    #[arg(long, conflicts_with_all = ["match_date", "match_category", "match_amount", "match_description"])]
    id: Option<ExpenseId>,

    // Each match flag requires the next one, so it takes all four or none.
    /// The date of the expense to change.
    #[arg(long, requires = "match_category")]
    match_date: Option<String>,

    /// The category of the expense to change.
    #[arg(long, requires = "match_amount")]
    match_category: Option<String>,

    /// The amount of the expense to change.
    #[arg(long, requires = "match_description", allow_hyphen_values = true)]
    match_amount: Option<String>,

    /// The description of the expense to change.
    #[arg(long, requires = "match_date")]
    match_description: Option<String>,
}

/// How an expense is identified.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Target {
    Id(ExpenseId),
    Match(MatchKey),
}

impl Selector {
    pub fn from_id(id: ExpenseId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn from_key(key: MatchKey) -> Self {
        Self {
            id: None,
            match_date: Some(key.date),
            match_category: Some(key.category),
            match_amount: Some(key.amount),
            match_description: Some(key.description),
        }
    }

    /// Returns `None` when neither an id nor a complete match key was given.
    pub fn target(&self) -> Option<Target> {
        if let Some(id) = self.id {
            return Some(Target::Id(id));
        }
        match (
            &self.match_date,
            &self.match_category,
            &self.match_amount,
            &self.match_description,
        ) {
            (Some(date), Some(category), Some(amount), Some(description)) => Some(Target::Match(
                MatchKey::new(date, category, amount, description),
            )),
            _ => None,
        }
    }
}

/// (Not shown): Args for the `expenses update` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct UpdateArgs {
    #[clap(flatten)]
    selector: Selector,

    #[clap(flatten)]
    fields: ExpenseFields,
}

impl UpdateArgs {
    pub fn new(selector: Selector, new_expense: NewExpense) -> Self {
        Self {
            selector,
            fields: new_expense.into(),
        }
    }

    pub fn target(&self) -> Option<Target> {
        self.selector.target()
    }

    pub fn new_expense(&self) -> NewExpense {
        self.fields.new_expense()
    }
}

/// (Not shown): Args for the `expenses delete` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct DeleteArgs {
    #[clap(flatten)]
    selector: Selector,
}

impl DeleteArgs {
    pub fn new(selector: Selector) -> Self {
        Self { selector }
    }

    pub fn target(&self) -> Option<Target> {
        self.selector.target()
    }
}

fn default_expenses_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expenses-home or EXPENSES_HOME instead of relying on the \
                default directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
