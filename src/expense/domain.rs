//! Expense domain types and the parsing rules for submitted expense forms.

use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::Error;

/// The database ID of an expense.
pub type ExpenseId = i64;

/// The category given to expenses that were submitted without one.
pub const DEFAULT_CATEGORY: &str = "Other";

/// The longest description the expense forms will accept.
pub const DESCRIPTION_MAX_LENGTH: usize = 200;

/// The longest category or payment method the expense forms will accept.
pub const SHORT_TEXT_MAX_LENGTH: usize = 50;

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A single recorded expense.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID assigned by the database when the expense was created.
    pub id: ExpenseId,
    /// How much was spent. The sign is not checked.
    pub amount: f64,
    /// A free-text label used to group expenses. Never empty.
    pub category: String,
    /// What the expense was for.
    pub description: Option<String>,
    /// The day the money was spent.
    pub date: Date,
    /// How the expense was paid, e.g. "Card" or "Cash".
    pub payment_method: Option<String>,
    /// When the expense was recorded, in UTC.
    pub created_at: OffsetDateTime,
}

/// The fields needed to create an [Expense].
///
/// The ID and creation time are assigned by [crate::create_expense].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// How much was spent.
    pub amount: f64,
    /// The expense category, see [category_or_default].
    pub category: String,
    /// What the expense was for.
    pub description: Option<String>,
    /// The day the money was spent.
    pub date: Date,
    /// How the expense was paid.
    pub payment_method: Option<String>,
}

/// The form submitted when adding or editing an expense.
///
/// Every field is kept as raw text so that the handlers decide how to treat
/// missing and malformed values.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub amount: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub payment_method: Option<String>,
}

/// The outcome of parsing a submitted date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    /// A valid `YYYY-MM-DD` date.
    Valid(Date),
    /// The field was absent or blank.
    Missing,
    /// The field could not be parsed as a date.
    Invalid,
}

impl DateInput {
    /// The parsed date, or `default` if the input was missing or invalid.
    pub fn or(self, default: Date) -> Date {
        match self {
            DateInput::Valid(date) => date,
            DateInput::Missing | DateInput::Invalid => default,
        }
    }

    /// The parsed date, or `None` if the input was missing or invalid.
    pub fn ok(self) -> Option<Date> {
        match self {
            DateInput::Valid(date) => Some(date),
            DateInput::Missing | DateInput::Invalid => None,
        }
    }
}

/// Parse a submitted amount.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [Error::InvalidAmount] if the text is missing, is not a number, or
/// is not finite (e.g., "NaN" or "inf").
pub fn parse_amount(raw: Option<&str>) -> Result<f64, Error> {
    let text = raw.unwrap_or_default().trim();

    match text.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(Error::InvalidAmount(text.to_owned())),
    }
}

/// Parse a submitted `YYYY-MM-DD` date.
///
/// Years must be written as four digits without a sign, and year zero is
/// rejected, so that stored dates always format back to `YYYY-MM-DD`.
pub fn parse_date(raw: Option<&str>) -> DateInput {
    let text = raw.unwrap_or_default().trim();

    if text.is_empty() {
        return DateInput::Missing;
    }

    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return DateInput::Invalid;
    }

    match Date::parse(text, DATE_FORMAT) {
        Ok(date) if date.year() >= 1 => DateInput::Valid(date),
        _ => DateInput::Invalid,
    }
}

/// The trimmed category, or [DEFAULT_CATEGORY] if it is missing or blank.
pub fn category_or_default(raw: Option<&str>) -> String {
    optional_text(raw).unwrap_or_else(|| DEFAULT_CATEGORY.to_owned())
}

/// The trimmed text, or `None` if it is missing or blank.
pub fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// Today's date in UTC.
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}
