//! Rendering of expense tables for people: translated labels, currency formatting and a
//! tab-aligned table.

use crate::model::{Amount, ExpenseColumn, Expenses};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tabwriter::TabWriter;

/// The language that labels are shown in.
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
pub enum Language {
    #[default]
    En,
    Fr,
}

serde_plain::derive_display_from_serialize!(Language);
serde_plain::derive_fromstr_from_deserialize!(Language);

impl Language {
    pub fn labels(self) -> &'static Labels {
        match self {
            Language::En => &EN,
            Language::Fr => &FR,
        }
    }
}

/// The user-facing strings for one language.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Labels {
    pub title: &'static str,
    pub date: &'static str,
    pub category: &'static str,
    pub amount: &'static str,
    pub description: &'static str,
    pub transaction_date: &'static str,
    pub total_amount: &'static str,
    pub no_expenses: &'static str,
}

impl Labels {
    /// The column heading for `column`.
    pub fn column(&self, column: ExpenseColumn) -> &'static str {
        match column {
            ExpenseColumn::Date => self.date,
            ExpenseColumn::Category => self.category,
            ExpenseColumn::Amount => self.amount,
            ExpenseColumn::Description => self.description,
            ExpenseColumn::TransactionDate => self.transaction_date,
        }
    }
}

static EN: Labels = Labels {
    title: "Expenses Tracker",
    date: "Date (YYYY-MM-DD)",
    category: "Category",
    amount: "Amount",
    description: "Description",
    transaction_date: "Transaction Date (YYYY-MM-DD)",
    total_amount: "Total Amount:",
    no_expenses: "No expenses",
};

static FR: Labels = Labels {
    title: "Suivi des Dépenses",
    date: "Date (AAAA-MM-JJ)",
    category: "Catégorie",
    amount: "Montant",
    description: "Description",
    transaction_date: "Date de la transaction (AAAA-MM-JJ)",
    total_amount: "Montant Total:",
    no_expenses: "Aucune dépense",
};

/// How money is written: `€12.50`, or `€1,250.00` with a thousands separator.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: bool,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "€".to_string(),
            thousands_separator: false,
        }
    }
}

impl CurrencyFormat {
    pub fn format(&self, value: Decimal) -> String {
        Amount::new(value).format_with(&self.symbol, self.thousands_separator)
    }

    /// Formats the text of a ledger amount. Text that is not a number is shown as zero, the same
    /// way it is counted in totals.
    pub fn format_text(&self, text: &str) -> String {
        let value = text.parse::<Amount>().map(|a| a.value()).unwrap_or_default();
        self.format(value)
    }
}

/// Writes `expenses` as an aligned table followed by the total line.
pub fn print_expenses<W: Write>(
    wr: W,
    expenses: &Expenses,
    language: Language,
    currency: &CurrencyFormat,
) -> Result<()> {
    let labels = language.labels();
    let mut tw = TabWriter::new(wr);

    writeln!(tw, "{}", labels.title)?;
    if expenses.is_empty() {
        writeln!(tw, "{}", labels.no_expenses)?;
    } else {
        let headings: Vec<&str> = ExpenseColumn::ALL.iter().map(|c| labels.column(*c)).collect();
        writeln!(tw, "#\t{}", headings.join("\t"))?;
        for row in expenses.rows() {
            let e = row.item();
            writeln!(
                tw,
                "{}\t{}\t{}\t{}\t{}\t{}",
                row.id(),
                e.date(),
                e.category(),
                currency.format_text(e.amount_text()),
                e.description(),
                e.transaction_date(),
            )?;
        }
    }
    writeln!(
        tw,
        "{} {}",
        labels.total_amount,
        currency.format(expenses.total())
    )?;
    tw.flush().context("Unable to write the expense table")
}

/// Renders `expenses` to a `String` with `print_expenses`.
pub fn expenses_table(
    expenses: &Expenses,
    language: Language,
    currency: &CurrencyFormat,
) -> Result<String> {
    let mut buf = Vec::new();
    print_expenses(&mut buf, expenses, language, currency)?;
    Ok(String::from_utf8(buf)?)
}
