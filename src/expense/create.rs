//! The endpoint for adding an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    expense::{
        ExpenseForm, NewExpense, category_or_default, create_expense, optional_text,
        parse_amount, parse_date, today_utc,
    },
    notification::{Notification, RedirectWithNotification},
};

/// The state needed for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle the add expense form, then redirect to the expenses page.
///
/// An invalid amount aborts the request without creating anything. A blank
/// category becomes "Other" and a missing or malformed date becomes today (UTC).
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    jar: PrivateCookieJar,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match add_expense(&form, today_utc(), &connection) {
        Ok(redirect) => redirect.into_response_with(jar),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an expense: {error}");
            error.into_response()
        }
    }
}

fn add_expense(
    form: &ExpenseForm,
    today: Date,
    connection: &Connection,
) -> Result<RedirectWithNotification, Error> {
    let amount = match parse_amount(form.amount.as_deref()) {
        Ok(amount) => amount,
        Err(error) => {
            tracing::debug!("rejected new expense: {error}");
            return Ok(RedirectWithNotification::new(
                endpoints::ROOT,
                Notification::error("Please enter a valid amount."),
            ));
        }
    };

    let expense = NewExpense {
        amount,
        category: category_or_default(form.category.as_deref()),
        description: optional_text(form.description.as_deref()),
        date: parse_date(form.date.as_deref()).or(today),
        payment_method: optional_text(form.payment_method.as_deref()),
    };

    let expense = create_expense(expense, connection)?;
    tracing::info!("created expense {}", expense.id);

    Ok(RedirectWithNotification::new(
        endpoints::ROOT,
        Notification::success("Expense added."),
    ))
}
