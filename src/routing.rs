//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        get_edit_expense_page, get_expenses_page,
    },
    export::get_expenses_csv,
    not_found::get_404_not_found,
    summary::{get_category_summary, get_monthly_summary, get_stats_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_expenses_page))
        .route(endpoints::ADD_EXPENSE, post(create_expense_endpoint))
        .route(
            endpoints::EDIT_EXPENSE,
            get(get_edit_expense_page).post(edit_expense_endpoint),
        )
        .route(endpoints::DELETE_EXPENSE, post(delete_expense_endpoint))
        .route(endpoints::EXPORT, get(get_expenses_csv))
        .route(endpoints::STATS_VIEW, get(get_stats_page))
        .route(endpoints::MONTHLY_SUMMARY_API, get(get_monthly_summary))
        .route(endpoints::CATEGORY_SUMMARY_API, get(get_category_summary))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
