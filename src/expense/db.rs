//! Database operations for expenses.

use rusqlite::{Connection, Row, named_params, params};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    expense::{Expense, ExpenseId, NewExpense},
};

const SELECT_COLUMNS: &str =
    "SELECT id, amount, category, description, date, payment_method, created_at FROM expense";

/// Optional conditions for narrowing down a list of expenses.
///
/// A `None` field does not filter anything.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExpenseFilter {
    /// Only include expenses on or after this date.
    pub start: Option<Date>,
    /// Only include expenses on or before this date.
    pub end: Option<Date>,
    /// Only include expenses with exactly this category.
    pub category: Option<String>,
}

/// Create the expense table and its indexes if they do not already exist.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            description TEXT,
            date TEXT NOT NULL,
            payment_method TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
    )
}

/// Create a new expense in the database, stamping it with the current UTC time.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_expense(expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "INSERT INTO expense (amount, category, description, date, payment_method, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, amount, category, description, date, payment_method, created_at",
        )?
        .query_row(
            params![
                expense.amount,
                expense.category,
                expense.description,
                expense.date,
                expense.payment_method,
                OffsetDateTime::now_utc(),
            ],
            map_expense_row,
        )
        .map_err(Error::from)
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_expense_row)
        .map_err(Error::from)
}

/// Retrieve the expenses that match `filter`, newest first.
///
/// Expenses on the same date are ordered by descending ID.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_expenses(
    filter: &ExpenseFilter,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS}
            WHERE (:start IS NULL OR date >= :start)
                AND (:end IS NULL OR date <= :end)
                AND (:category IS NULL OR category = :category)
            ORDER BY date DESC, id DESC"
        ))?
        .query_map(
            named_params! {
                ":start": filter.start,
                ":end": filter.end,
                ":category": filter.category,
            },
            map_expense_row,
        )?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Retrieve every expense, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    get_expenses(&ExpenseFilter::default(), connection)
}

/// Retrieve the distinct categories of all stored expenses in alphabetical order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_categories(connection: &Connection) -> Result<Vec<String>, Error> {
    connection
        .prepare("SELECT DISTINCT category FROM expense ORDER BY category ASC")?
        .query_map([], |row| row.get::<_, String>(0))?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Overwrite every editable field of the expense `id` with `expense`.
///
/// The ID and creation time are left unchanged.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    expense: &NewExpense,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense
        SET amount = ?1,
            category = ?2,
            description = ?3,
            date = ?4,
            payment_method = ?5
        WHERE id = ?6",
        params![
            expense.amount,
            expense.category,
            expense.description,
            expense.date,
            expense.payment_method,
            id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(())
}

/// Delete an expense by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingExpense] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Get the total number of expenses in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense", [], |row| row.get(0))
        .map_err(Error::from)
}

/// Map a database row to an [Expense].
///
/// The row must contain the columns in the order of [SELECT_COLUMNS].
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        payment_method: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod expense_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        expense::{NewExpense, create_expense},
    };

    use super::{
        ExpenseFilter, count_expenses, delete_expense, get_all_expenses, get_categories,
        get_expense, get_expenses, update_expense,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn new_expense(amount: f64, category: &str, date: time::Date) -> NewExpense {
        NewExpense {
            amount,
            category: category.to_owned(),
            description: None,
            date,
            payment_method: None,
        }
    }

    #[test]
    fn create_succeeds() {
        let connection = get_test_connection();
        let want = NewExpense {
            amount: 12.3,
            category: "Food".to_owned(),
            description: Some("Lunch".to_owned()),
            date: date!(2024 - 01 - 15),
            payment_method: Some("Card".to_owned()),
        };

        let expense = create_expense(want.clone(), &connection).expect("Could not create expense");

        assert!(expense.id > 0);
        assert_eq!(expense.amount, want.amount);
        assert_eq!(expense.category, want.category);
        assert_eq!(expense.description, want.description);
        assert_eq!(expense.date, want.date);
        assert_eq!(expense.payment_method, want.payment_method);
    }

    #[test]
    fn create_assigns_distinct_ids() {
        let connection = get_test_connection();

        let first = create_expense(new_expense(1.0, "Food", date!(2024 - 01 - 01)), &connection)
            .expect("Could not create expense");
        let second = create_expense(new_expense(2.0, "Food", date!(2024 - 01 - 01)), &connection)
            .expect("Could not create expense");

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn get_expense_succeeds() {
        let connection = get_test_connection();
        let inserted = create_expense(new_expense(5.0, "Food", date!(2024 - 01 - 01)), &connection)
            .expect("Could not create expense");

        let selected = get_expense(inserted.id, &connection);

        assert_eq!(selected, Ok(inserted));
    }

    #[test]
    fn get_expense_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        let selected = get_expense(99999, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_all_orders_by_date_descending() {
        let connection = get_test_connection();
        for date in [
            date!(2024 - 02 - 01),
            date!(2024 - 03 - 01),
            date!(2024 - 01 - 01),
        ] {
            create_expense(new_expense(1.0, "Food", date), &connection)
                .expect("Could not create expense");
        }

        let dates = get_all_expenses(&connection)
            .expect("Could not get expenses")
            .into_iter()
            .map(|expense| expense.date)
            .collect::<Vec<_>>();

        assert_eq!(
            dates,
            vec![
                date!(2024 - 03 - 01),
                date!(2024 - 02 - 01),
                date!(2024 - 01 - 01)
            ]
        );
    }

    #[test]
    fn get_expenses_filters_inclusive_date_range() {
        let connection = get_test_connection();
        for date in [
            date!(2023 - 12 - 31),
            date!(2024 - 01 - 01),
            date!(2024 - 01 - 15),
            date!(2024 - 01 - 31),
            date!(2024 - 02 - 01),
        ] {
            create_expense(new_expense(1.0, "Food", date), &connection)
                .expect("Could not create expense");
        }
        let filter = ExpenseFilter {
            start: Some(date!(2024 - 01 - 01)),
            end: Some(date!(2024 - 01 - 31)),
            category: None,
        };

        let dates = get_expenses(&filter, &connection)
            .expect("Could not get expenses")
            .into_iter()
            .map(|expense| expense.date)
            .collect::<Vec<_>>();

        assert_eq!(
            dates,
            vec![
                date!(2024 - 01 - 31),
                date!(2024 - 01 - 15),
                date!(2024 - 01 - 01)
            ]
        );
    }

    #[test]
    fn get_expenses_filters_by_category() {
        let connection = get_test_connection();
        create_expense(new_expense(1.0, "Food", date!(2024 - 01 - 01)), &connection)
            .expect("Could not create expense");
        create_expense(new_expense(2.0, "Transport", date!(2024 - 01 - 02)), &connection)
            .expect("Could not create expense");
        let filter = ExpenseFilter {
            category: Some("Transport".to_owned()),
            ..Default::default()
        };

        let expenses = get_expenses(&filter, &connection).expect("Could not get expenses");

        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, "Transport");
    }

    #[test]
    fn get_categories_returns_distinct_sorted_categories() {
        let connection = get_test_connection();
        for category in ["Transport", "Food", "Food", "Bills"] {
            create_expense(new_expense(1.0, category, date!(2024 - 01 - 01)), &connection)
                .expect("Could not create expense");
        }

        let categories = get_categories(&connection).expect("Could not get categories");

        assert_eq!(categories, vec!["Bills", "Food", "Transport"]);
    }

    #[test]
    fn update_expense_succeeds() {
        let connection = get_test_connection();
        let original = create_expense(new_expense(1.0, "Food", date!(2024 - 01 - 01)), &connection)
            .expect("Could not create expense");
        let changes = NewExpense {
            amount: 9.5,
            category: "Transport".to_owned(),
            description: Some("Bus".to_owned()),
            date: date!(2024 - 02 - 02),
            payment_method: Some("Cash".to_owned()),
        };

        update_expense(original.id, &changes, &connection).expect("Could not update expense");

        let updated = get_expense(original.id, &connection).expect("Could not get expense");
        assert_eq!(updated.amount, changes.amount);
        assert_eq!(updated.category, changes.category);
        assert_eq!(updated.description, changes.description);
        assert_eq!(updated.date, changes.date);
        assert_eq!(updated.payment_method, changes.payment_method);
        assert_eq!(updated.created_at, original.created_at);
    }

    #[test]
    fn update_expense_with_invalid_id_returns_error() {
        let connection = get_test_connection();

        let result = update_expense(
            99999,
            &new_expense(1.0, "Food", date!(2024 - 01 - 01)),
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingExpense));
    }

    #[test]
    fn delete_expense_succeeds() {
        let connection = get_test_connection();
        let expense = create_expense(new_expense(1.0, "Food", date!(2024 - 01 - 01)), &connection)
            .expect("Could not create expense");

        delete_expense(expense.id, &connection).expect("Could not delete expense");

        assert_eq!(get_expense(expense.id, &connection), Err(Error::NotFound));
        assert_eq!(count_expenses(&connection), Ok(0));
    }

    #[test]
    fn delete_expense_with_invalid_id_returns_error() {
        let connection = get_test_connection();

        let result = delete_expense(99999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingExpense));
    }
}
