//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/edit/{expense_id}', use [format_endpoint].

/// The page listing expenses, with the form for adding a new one.
pub const ROOT: &str = "/";
/// The route for creating an expense.
pub const ADD_EXPENSE: &str = "/add";
/// The page for editing an existing expense, and the route for submitting the edit.
pub const EDIT_EXPENSE: &str = "/edit/{expense_id}";
/// The route for deleting an expense.
pub const DELETE_EXPENSE: &str = "/delete/{expense_id}";
/// The route for downloading all expenses as a CSV file.
pub const EXPORT: &str = "/export";
/// The page with charts summarising expenses.
pub const STATS_VIEW: &str = "/stats";
/// The route for monthly expense totals as JSON.
pub const MONTHLY_SUMMARY_API: &str = "/api/summary";
/// The route for per-category expense totals as JSON.
pub const CATEGORY_SUMMARY_API: &str = "/api/category-summary";
/// The route for static files.
pub const STATIC: &str = "/static";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/edit/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
