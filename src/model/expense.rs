use crate::error::{Error, ErrorType, IntoResult};
use crate::model::Amount;
use crate::Result;
use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::trace;

pub(crate) const DATE_STR: &str = "Date";
pub(crate) const CATEGORY_STR: &str = "Category";
pub(crate) const AMOUNT_STR: &str = "Amount";
pub(crate) const DESCRIPTION_STR: &str = "Description";
pub(crate) const TRANSACTION_DATE_STR: &str = "Transaction Date";

/// The header row of the ledger, in column order.
pub const HEADERS: [&str; 5] = [
    DATE_STR,
    CATEGORY_STR,
    AMOUNT_STR,
    DESCRIPTION_STR,
    TRANSACTION_DATE_STR,
];

/// Represents a single row of the ledger.
///
/// Rows are read as they are found on disk: nothing but the column count is checked at load time,
/// so `amount` is kept as its raw text and may not be a number. Use `NewExpense::validate` to
/// build an `Expense` from user input.
// "Date","Category","Amount","Description","Transaction Date"
#[derive(Default, Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Expense {
    pub(crate) date: String,
    pub(crate) category: String,
    pub(crate) amount: String,
    pub(crate) description: String,
    #[serde(rename = "Transaction Date")]
    pub(crate) transaction_date: String,
}

impl Expense {
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// The amount exactly as written in the ledger.
    pub fn amount_text(&self) -> &str {
        &self.amount
    }

    /// The parsed amount, or `None` if the ledger holds something that is not a number.
    pub fn amount(&self) -> Option<Amount> {
        Amount::from_str(&self.amount).ok()
    }

    /// The amount, counting anything unparsable as zero.
    pub fn amount_or_zero(&self) -> Decimal {
        match self.amount() {
            Some(amount) => amount.value(),
            None => {
                trace!("Counting unparsable amount '{}' as zero", self.amount);
                Decimal::ZERO
            }
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn transaction_date(&self) -> &str {
        &self.transaction_date
    }

    /// The textual value of `column`.
    pub fn field(&self, column: ExpenseColumn) -> &str {
        match column {
            ExpenseColumn::Date => &self.date,
            ExpenseColumn::Category => &self.category,
            ExpenseColumn::Amount => &self.amount,
            ExpenseColumn::Description => &self.description,
            ExpenseColumn::TransactionDate => &self.transaction_date,
        }
    }

    /// The four fields that identify this expense for value-matched updates and deletes.
    pub fn match_key(&self) -> MatchKey {
        MatchKey::new(&self.date, &self.category, &self.amount, &self.description)
    }
}

/// Unvalidated field values for an expense, as typed by a user.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub description: String,
    pub transaction_date: String,
}

impl NewExpense {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<String>,
        description: impl Into<String>,
        transaction_date: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            amount: amount.into(),
            description: description.into(),
            transaction_date: transaction_date.into(),
        }
    }

    /// Checks that every field is present and that the amount is a number.
    ///
    /// # Errors
    /// - Returns an `ErrorType::Validation` error naming the first offending field.
    pub fn validate(&self) -> Result<Expense> {
        let date = required(ExpenseColumn::Date, &self.date)?;
        let category = required(ExpenseColumn::Category, &self.category)?;
        let amount_text = required(ExpenseColumn::Amount, &self.amount)?;
        let description = required(ExpenseColumn::Description, &self.description)?;
        let transaction_date = required(ExpenseColumn::TransactionDate, &self.transaction_date)?;
        let amount = parse_amount(amount_text)?;
        Ok(Expense {
            date: date.to_string(),
            category: category.to_string(),
            amount: amount.to_string(),
            description: description.to_string(),
            transaction_date: transaction_date.to_string(),
        })
    }
}

fn required(column: ExpenseColumn, value: &str) -> Result<&str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::msg(
            ErrorType::Validation,
            format!("The '{}' field is required", column.header()),
        ));
    }
    Ok(value)
}

fn parse_amount(value: &str) -> Result<Amount> {
    Amount::from_str(value)
        .with_context(|| format!("Invalid value in the '{AMOUNT_STR}' field"))
        .pub_result(ErrorType::Validation)
}

/// The four-field tuple (date, category, amount, description) that identifies an expense when
/// there is no id to go by. Two expenses with the same key cannot be told apart.
#[derive(Default, Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MatchKey {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

impl MatchKey {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            amount: amount.into(),
            description: description.into(),
        }
    }

    /// Parses the key's amount for numeric matching.
    pub(crate) fn parsed_amount(&self) -> Result<Amount> {
        parse_amount(&self.amount)
    }

    /// Exact numeric comparison of the amount, no tolerance. Rows whose amount does not parse
    /// never match.
    pub(crate) fn matches_value(&self, expense: &Expense, amount: &Amount) -> bool {
        self.matches_text_fields(expense)
            && expense
                .amount()
                .map(|a| a.value() == amount.value())
                .unwrap_or(false)
    }

    /// Compares the amount as text, the way it is written in the ledger.
    pub(crate) fn matches_text(&self, expense: &Expense) -> bool {
        self.matches_text_fields(expense) && expense.amount == self.amount.trim()
    }

    fn matches_text_fields(&self, expense: &Expense) -> bool {
        expense.date == self.date
            && expense.category == self.category
            && expense.description == self.description
    }
}

/// The columns of the ledger.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseColumn {
    Date,
    Category,
    Amount,
    Description,
    TransactionDate,
}

serde_plain::derive_display_from_serialize!(ExpenseColumn);
serde_plain::derive_fromstr_from_deserialize!(ExpenseColumn);

impl ExpenseColumn {
    pub const ALL: [ExpenseColumn; 5] = [
        ExpenseColumn::Date,
        ExpenseColumn::Category,
        ExpenseColumn::Amount,
        ExpenseColumn::Description,
        ExpenseColumn::TransactionDate,
    ];

    /// The ledger header text of this column.
    pub fn header(&self) -> &'static str {
        match self {
            ExpenseColumn::Date => DATE_STR,
            ExpenseColumn::Category => CATEGORY_STR,
            ExpenseColumn::Amount => AMOUNT_STR,
            ExpenseColumn::Description => DESCRIPTION_STR,
            ExpenseColumn::TransactionDate => TRANSACTION_DATE_STR,
        }
    }
}
