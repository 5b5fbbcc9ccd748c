//! The expenses page: the add expense form, filters, and the filtered expense table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    expense::{
        Expense, ExpenseFilter, get_categories, get_expenses, optional_text, parse_date,
        form::{ExpenseFormDefaults, expense_form_fields},
    },
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CATEGORY_BADGE_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    notification::{Notification, take_notification},
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the expenses page.
///
/// Values are kept as text so they can be echoed back into the filter form.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseListQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub category: Option<String>,
}

impl ExpenseListQuery {
    /// Malformed dates and an empty category are treated as no filter.
    fn to_filter(&self) -> ExpenseFilter {
        ExpenseFilter {
            start: parse_date(self.start.as_deref()).ok(),
            end: parse_date(self.end.as_deref()).ok(),
            category: optional_text(self.category.as_deref()),
        }
    }
}

/// Render the expenses page with the expenses matching `query`.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    jar: PrivateCookieJar,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let filter = query.to_filter();
    let expenses = get_expenses(&filter, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?;
    let categories = get_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();

    let (jar, notification) = take_notification(jar);

    let page = ExpensesPage {
        expenses: &expenses,
        total,
        categories: &categories,
        query: &query,
        notification,
    };

    Ok((jar, expenses_view(page)).into_response())
}

struct ExpensesPage<'a> {
    expenses: &'a [Expense],
    total: f64,
    categories: &'a [String],
    query: &'a ExpenseListQuery,
    notification: Option<Notification>,
}

fn expenses_view(page: ExpensesPage<'_>) -> Markup {
    let nav_bar = NavBar::new(endpoints::ROOT).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-8"
            {
                @if let Some(notification) = page.notification {
                    (notification.into_html())
                }

                section
                {
                    h2 class="text-xl font-bold mb-4" { "Add Expense" }

                    form
                        id="add-expense-form"
                        method="post"
                        action=(endpoints::ADD_EXPENSE)
                        class="grid grid-cols-1 md:grid-cols-5 gap-4 items-end"
                    {
                        (expense_form_fields(&ExpenseFormDefaults::default(), page.categories))

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add" }
                    }
                }

                section
                {
                    (filter_form(page.query, page.categories))
                }

                section
                {
                    (expense_table(page.expenses))

                    p
                        id="expense-total"
                        class="mt-4 text-lg font-semibold text-right"
                    {
                        "Total: " (format_currency(page.total))
                    }
                }
            }
        }
    };

    base("Expenses", &[], &content)
}

fn filter_form(query: &ExpenseListQuery, categories: &[String]) -> Markup {
    let selected_category = query.category.as_deref().unwrap_or_default();

    html! {
        form
            id="filter-form"
            method="get"
            action=(endpoints::ROOT)
            class="grid grid-cols-1 md:grid-cols-4 gap-4 items-end"
        {
            div
            {
                label for="start" class=(FORM_LABEL_STYLE) { "From" }
                input
                    name="start"
                    id="start"
                    type="date"
                    value=[query.start.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "To" }
                input
                    name="end"
                    id="end"
                    type="date"
                    value=[query.end.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }
                select
                    name="category"
                    id="filter-category"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[selected_category.is_empty()] { "All categories" }

                    @for category in categories {
                        option
                            value=(category)
                            selected[category == selected_category]
                        {
                            (category)
                        }
                    }
                }
            }

            div class="flex gap-2"
            {
                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Filter" }
                a href=(endpoints::ROOT) class=(LINK_STYLE) { "Clear" }
            }
        }
    }
}

fn expense_table(expenses: &[Expense]) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md sm:rounded-lg"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Payment method" }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        (expense_row(expense))
                    }

                    @if expenses.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="6" class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No expenses found."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn expense_row(expense: &Expense) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_EXPENSE, expense.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_EXPENSE, expense.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
        {
            td class=(TABLE_CELL_STYLE) { (expense.date) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (expense.category) }
            }
            td class=(TABLE_CELL_STYLE) { (expense.description.as_deref().unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (expense.payment_method.as_deref().unwrap_or_default()) }
            td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(expense.amount)) }
            td class={(TABLE_CELL_STYLE) " flex gap-4"}
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                form
                    method="post"
                    action=(delete_url)
                    onsubmit="return confirm('Are you sure you want to delete this expense?');"
                {
                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                }
            }
        }
    }
}
