//! Expense editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    expense::{
        Expense, ExpenseForm, ExpenseId, NewExpense, category_or_default, expense_id_from_path,
        form::{ExpenseFormDefaults, expense_form_fields},
        get_categories, get_expense, optional_text, parse_amount, parse_date, update_expense,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base},
    navigation::NavBar,
    notification::{Notification, RedirectWithNotification, take_notification},
};

/// The state needed for the edit expense page and endpoint.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the expense editing page, or a 404 page if the expense does not exist.
pub async fn get_edit_expense_page(
    path: Result<Path<ExpenseId>, PathRejection>,
    State(state): State<EditExpenseState>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let expense_id = expense_id_from_path(path)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, &connection)?;
    let categories = get_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let (jar, notification) = take_notification(jar);

    Ok((jar, edit_expense_view(&expense, &categories, notification)).into_response())
}

fn edit_expense_view(
    expense: &Expense,
    categories: &[String],
    notification: Option<Notification>,
) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_EXPENSE, expense.id);
    let defaults = ExpenseFormDefaults {
        amount: Some(expense.amount),
        category: Some(&expense.category),
        description: expense.description.as_deref(),
        date: Some(expense.date),
        payment_method: expense.payment_method.as_deref(),
    };

    let content = html! {
        (NavBar::new(endpoints::EDIT_EXPENSE).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Expense" }

                @if let Some(notification) = notification {
                    (notification.into_html())
                }

                form
                    method="post"
                    action=(edit_url)
                    class="space-y-4 md:space-y-6"
                {
                    (expense_form_fields(&defaults, categories))

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
                }

                a href=(endpoints::ROOT) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Edit Expense", &[], &content)
}

/// Handle the edit expense form, then redirect.
///
/// Responds with a 404 page if the expense does not exist. An invalid amount
/// leaves the expense unchanged and sends the client back to the edit page.
/// A missing or malformed date keeps the expense's current date.
pub async fn edit_expense_endpoint(
    path: Result<Path<ExpenseId>, PathRejection>,
    State(state): State<EditExpenseState>,
    jar: PrivateCookieJar,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let expense_id = match expense_id_from_path(path) {
        Ok(expense_id) => expense_id,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match apply_expense_edit(expense_id, &form, &connection) {
        Ok(redirect) => redirect.into_response_with(jar),
        Err(error) => error.into_response(),
    }
}

fn apply_expense_edit(
    expense_id: ExpenseId,
    form: &ExpenseForm,
    connection: &Connection,
) -> Result<RedirectWithNotification, Error> {
    let existing = get_expense(expense_id, connection)?;

    let amount = match parse_amount(form.amount.as_deref()) {
        Ok(amount) => amount,
        Err(error) => {
            tracing::debug!("rejected edit of expense {expense_id}: {error}");
            return Ok(RedirectWithNotification::new(
                &endpoints::format_endpoint(endpoints::EDIT_EXPENSE, expense_id),
                Notification::error("Invalid amount."),
            ));
        }
    };

    let expense = NewExpense {
        amount,
        category: category_or_default(form.category.as_deref()),
        description: optional_text(form.description.as_deref()),
        date: parse_date(form.date.as_deref()).or(existing.date),
        payment_method: optional_text(form.payment_method.as_deref()),
    };

    update_expense(expense_id, &expense, connection)?;
    tracing::info!("updated expense {expense_id}");

    Ok(RedirectWithNotification::new(
        endpoints::ROOT,
        Notification::success("Expense updated."),
    ))
}

#[cfg(test)]
mod edit_expense_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::PrivateCookieJar;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        app_state::create_cookie_key,
        db::initialize,
        endpoints,
        expense::{Expense, ExpenseForm, NewExpense, create_expense, get_expense},
        notification::Notification,
        test_utils::{
            assert_form_input_with_value, assert_form_submit_button, assert_status_ok,
            assert_valid_html, get_header, must_get_form, parse_html_document,
        },
    };

    use super::{EditExpenseState, apply_expense_edit, edit_expense_endpoint, get_edit_expense_page};

    fn get_test_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn new_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(create_cookie_key("foobar"))
    }

    fn insert_lunch(connection: &Connection) -> Expense {
        create_expense(
            NewExpense {
                amount: 12.5,
                category: "Food".to_owned(),
                description: Some("Lunch".to_owned()),
                date: date!(2024 - 01 - 15),
                payment_method: Some("Card".to_owned()),
            },
            connection,
        )
        .expect("Could not create expense")
    }

    fn form(amount: &str, date: &str) -> ExpenseForm {
        ExpenseForm {
            amount: Some(amount.to_owned()),
            category: Some("Transport".to_owned()),
            description: Some("Bus".to_owned()),
            date: Some(date.to_owned()),
            payment_method: Some("Cash".to_owned()),
        }
    }

    #[tokio::test]
    async fn edit_page_is_prefilled() {
        let connection = get_test_connection();
        let expense = insert_lunch(&connection);
        let state = EditExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_edit_expense_page(Ok(Path(expense.id)), State(state), new_jar())
            .await
            .expect("Could not render edit page");

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_eq!(
            form.value().attr("action"),
            Some(endpoints::format_endpoint(endpoints::EDIT_EXPENSE, expense.id).as_str())
        );
        assert_form_input_with_value(&form, "amount", "number", "12.5");
        assert_form_submit_button(&form);

        let value_of = |name: &str| {
            form.select(&Selector::parse(&format!("input[name={name}]")).unwrap())
                .next()
                .and_then(|input| input.value().attr("value"))
                .map(str::to_owned)
        };
        assert_eq!(value_of("category").as_deref(), Some("Food"));
        assert_eq!(value_of("description").as_deref(), Some("Lunch"));
        assert_eq!(value_of("date").as_deref(), Some("2024-01-15"));
        assert_eq!(value_of("payment_method").as_deref(), Some("Card"));
    }

    #[tokio::test]
    async fn edit_page_for_missing_expense_is_not_found() {
        let state = EditExpenseState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let result = get_edit_expense_page(Ok(Path(99999)), State(state), new_jar()).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }

    #[tokio::test]
    async fn endpoint_updates_expense_and_redirects() {
        let connection = get_test_connection();
        let expense = insert_lunch(&connection);
        let state = EditExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = edit_expense_endpoint(
            Ok(Path(expense.id)),
            State(state.clone()),
            new_jar(),
            Form(form("20", "2024-02-01")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::ROOT);
        let connection = state.db_connection.lock().unwrap();
        let got = get_expense(expense.id, &connection).expect("Could not get expense");
        assert_eq!(
            got,
            Expense {
                amount: 20.0,
                category: "Transport".to_owned(),
                description: Some("Bus".to_owned()),
                date: date!(2024 - 02 - 01),
                payment_method: Some("Cash".to_owned()),
                ..expense
            }
        );
    }

    #[tokio::test]
    async fn endpoint_for_missing_expense_is_not_found() {
        let state = EditExpenseState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = edit_expense_endpoint(
            Ok(Path(99999)),
            State(state),
            new_jar(),
            Form(form("20", "2024-02-01")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn success_notification_on_update() {
        let connection = get_test_connection();
        let expense = insert_lunch(&connection);

        let redirect = apply_expense_edit(expense.id, &form("20", "2024-02-01"), &connection)
            .expect("Could not edit expense");

        assert_eq!(redirect.location, endpoints::ROOT);
        assert_eq!(redirect.notification, Notification::success("Expense updated."));
    }

    #[test]
    fn invalid_amount_changes_nothing() {
        let connection = get_test_connection();
        let expense = insert_lunch(&connection);

        let redirect = apply_expense_edit(expense.id, &form("xyz", "2024-02-01"), &connection)
            .expect("Invalid amount should not be an error");

        assert_eq!(
            redirect.location,
            endpoints::format_endpoint(endpoints::EDIT_EXPENSE, expense.id)
        );
        assert_eq!(redirect.notification, Notification::error("Invalid amount."));
        assert_eq!(get_expense(expense.id, &connection), Ok(expense));
    }

    #[test]
    fn invalid_date_keeps_existing_date() {
        let connection = get_test_connection();
        let expense = insert_lunch(&connection);

        apply_expense_edit(expense.id, &form("20", "31/12/2024"), &connection)
            .expect("Could not edit expense");

        let got = get_expense(expense.id, &connection).expect("Could not get expense");
        assert_eq!(got.date, expense.date);
        assert_eq!(got.amount, 20.0);
    }

    #[test]
    fn missing_date_keeps_existing_date() {
        let connection = get_test_connection();
        let expense = insert_lunch(&connection);

        apply_expense_edit(expense.id, &form("20", ""), &connection)
            .expect("Could not edit expense");

        let got = get_expense(expense.id, &connection).expect("Could not get expense");
        assert_eq!(got.date, expense.date);
    }

    #[test]
    fn blank_fields_are_cleared() {
        let connection = get_test_connection();
        let expense = insert_lunch(&connection);
        let form = ExpenseForm {
            amount: Some("1".to_owned()),
            ..Default::default()
        };

        apply_expense_edit(expense.id, &form, &connection).expect("Could not edit expense");

        let got = get_expense(expense.id, &connection).expect("Could not get expense");
        assert_eq!(got.category, "Other");
        assert_eq!(got.description, None);
        assert_eq!(got.payment_method, None);
    }
}
