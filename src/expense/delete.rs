//! Expense deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State, rejection::PathRejection},
    response::Response,
};
use axum_extra::extract::PrivateCookieJar;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    expense::{ExpenseId, delete_expense, expense_id_from_path},
    notification::{Notification, RedirectWithNotification},
};

/// The state needed for deleting an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Permanently delete an expense and redirect to the expenses page.
///
/// Responds with a 404 page if the expense does not exist.
pub async fn delete_expense_endpoint(
    path: Result<Path<ExpenseId>, PathRejection>,
    State(state): State<DeleteExpenseState>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let expense_id = expense_id_from_path(path)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_expense(expense_id, &connection)?;
    tracing::info!("deleted expense {expense_id}");

    let redirect =
        RedirectWithNotification::new(endpoints::ROOT, Notification::info("Expense deleted."));

    Ok(redirect.into_response_with(jar))
}
