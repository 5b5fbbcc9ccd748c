//! JSON endpoints for the expense totals plotted on the stats page.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    summary::{CategoryTotal, MonthlyTotal, get_category_totals, get_monthly_totals},
};

/// The state needed for the summary endpoints.
#[derive(Debug, Clone)]
pub struct SummaryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with the total spent in each month as a JSON array.
pub async fn get_monthly_summary(
    State(state): State<SummaryState>,
) -> Result<Json<Vec<MonthlyTotal>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_monthly_totals(&connection)
        .inspect_err(|error| tracing::error!("Failed to calculate monthly totals: {error}"))
        .map(Json)
}

/// Respond with the total spent in each category as a JSON array.
pub async fn get_category_summary(
    State(state): State<SummaryState>,
) -> Result<Json<Vec<CategoryTotal>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_category_totals(&connection)
        .inspect_err(|error| tracing::error!("Failed to calculate category totals: {error}"))
        .map(Json)
}
