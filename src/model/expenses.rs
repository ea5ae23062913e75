use crate::model::{Expense, ExpenseColumn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;
use tracing::warn;

/// Identifies an expense within a loaded `Expenses` set: its 1-based row number in the ledger at
/// the time the set was loaded. Filtering and sorting keep ids, so an id picked from any view of
/// the set addresses the same ledger row.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(usize);

impl ExpenseId {
    pub fn new(row_number: usize) -> Self {
        Self(row_number)
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// The 0-based position in the ledger, `None` for the invalid id `0`.
    pub(crate) fn index(&self) -> Option<usize> {
        self.0.checked_sub(1)
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for ExpenseId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// An item with the id it was loaded under.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Row<T> {
    id: ExpenseId,
    #[serde(flatten)]
    item: T,
}

impl<T> Row<T> {
    pub fn new(id: ExpenseId, item: T) -> Self {
        Self { id, item }
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn into_item(self) -> T {
        self.item
    }
}

/// The direction of a date sort.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc")]
    #[value(name = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    #[value(name = "desc")]
    Descending,
}

serde_plain::derive_display_from_serialize!(SortOrder);
serde_plain::derive_fromstr_from_deserialize!(SortOrder);

impl SortOrder {
    /// The other direction, as when a date header is clicked again.
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// An ordered record set of expenses.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Expenses {
    rows: Vec<Row<Expense>>,
}

impl Expenses {
    /// Builds a set from ledger rows in file order, numbering them from 1.
    pub fn new(expenses: impl IntoIterator<Item = Expense>) -> Self {
        let rows = expenses
            .into_iter()
            .enumerate()
            .map(|(ix, expense)| Row::new(ExpenseId::new(ix + 1), expense))
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Row<Expense>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expense> {
        self.rows.iter().map(Row::item)
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.rows.iter().find(|r| r.id == id).map(Row::item)
    }

    /// Keeps the expenses whose `column` contains `term`, ignoring case. With no column selected,
    /// nothing is filtered out.
    pub fn filter(self, column: Option<ExpenseColumn>, term: &str) -> Self {
        let column = match column {
            Some(c) => c,
            None => return self,
        };
        let term = term.to_lowercase();
        let rows = self
            .rows
            .into_iter()
            .filter(|r| r.item.field(column).to_lowercase().contains(&term))
            .collect();
        Self { rows }
    }

    /// Stable sort on the text of the date field. This is a string comparison, not a calendar
    /// comparison: `2024-10-1` sorts before `2024-2-1`.
    pub fn sort_by_date(mut self, order: SortOrder) -> Self {
        match order {
            SortOrder::Ascending => self.rows.sort_by(|a, b| a.item.date.cmp(&b.item.date)),
            SortOrder::Descending => self.rows.sort_by(|a, b| b.item.date.cmp(&a.item.date)),
        }
        self
    }

    /// The sum of all amounts, counting unparsable amounts as zero. A sum beyond what `Decimal`
    /// can hold is clamped to `Decimal::MAX` or `Decimal::MIN`.
    pub fn total(&self) -> Decimal {
        self.iter()
            .map(Expense::amount_or_zero)
            .fold(Decimal::ZERO, |total, amount| match total.checked_add(amount) {
                Some(sum) => sum,
                None => {
                    warn!("The total of the expenses is too large, it has been clamped");
                    total.saturating_add(amount)
                }
            })
    }
}

impl IntoIterator for Expenses {
    type Item = Row<Expense>;
    type IntoIter = std::vec::IntoIter<Row<Expense>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
