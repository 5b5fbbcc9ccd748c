//! Expense management: the expense model, its database queries, and the
//! pages and endpoints for listing, adding, editing and deleting expenses.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

use axum::extract::{Path, rejection::PathRejection};

use crate::Error;

pub use create::create_expense_endpoint;
pub use db::{
    ExpenseFilter, create_expense, create_expense_table, delete_expense, get_all_expenses,
    get_categories, get_expense, get_expenses, update_expense,
};
pub use delete::delete_expense_endpoint;
pub use domain::{
    DESCRIPTION_MAX_LENGTH, Expense, ExpenseForm, ExpenseId, NewExpense, SHORT_TEXT_MAX_LENGTH,
    category_or_default, optional_text, parse_amount, parse_date, today_utc,
};
pub use edit::{edit_expense_endpoint, get_edit_expense_page};
pub use list::get_expenses_page;

#[cfg(test)]
pub use db::count_expenses;

/// Extract the expense ID from the request path.
///
/// IDs that are not integers cannot refer to an expense, so they are reported
/// as [Error::NotFound].
pub(crate) fn expense_id_from_path(
    path: Result<Path<ExpenseId>, PathRejection>,
) -> Result<ExpenseId, Error> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!("invalid expense ID in path: {rejection}");
        Error::NotFound
    })
}
