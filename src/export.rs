//! Downloading every expense as a CSV file.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;

use crate::{
    AppState, Error,
    expense::{Expense, get_all_expenses},
};

const CSV_HEADER: [&str; 7] = [
    "id",
    "amount",
    "category",
    "description",
    "date",
    "payment_method",
    "created_at",
];

/// The state needed for exporting expenses.
#[derive(Debug, Clone)]
pub struct ExportState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Serialize)]
struct ExpenseRecord<'a> {
    id: i64,
    amount: f64,
    category: &'a str,
    description: Option<&'a str>,
    date: String,
    payment_method: Option<&'a str>,
    created_at: String,
}

impl<'a> ExpenseRecord<'a> {
    fn from_expense(expense: &'a Expense) -> Result<Self, Error> {
        let created_at = expense
            .created_at
            .format(&Rfc3339)
            .map_err(|error| Error::CsvError(error.to_string()))?;

        Ok(Self {
            id: expense.id,
            amount: expense.amount,
            category: &expense.category,
            description: expense.description.as_deref(),
            date: expense.date.to_string(),
            payment_method: expense.payment_method.as_deref(),
            created_at,
        })
    }
}

/// Respond with all expenses, newest first, as a CSV attachment.
pub async fn get_expenses_csv(State(state): State<ExportState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_all_expenses(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?;
    let csv = write_expenses_csv(&expenses)?;
    tracing::info!("exported {} expenses", expenses.len());

    Ok((
        [
            (CONTENT_TYPE, "text/csv"),
            (CONTENT_DISPOSITION, "attachment; filename=\"expenses.csv\""),
        ],
        csv,
    )
        .into_response())
}

/// Write `expenses` as CRLF terminated CSV with a header row.
///
/// Missing optional fields are written as empty cells.
fn write_expenses_csv(expenses: &[Expense]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for expense in expenses {
        writer.serialize(ExpenseRecord::from_expense(expense)?)?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}
