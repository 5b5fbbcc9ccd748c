//! Aggregate queries over the expense table.

use rusqlite::Connection;
use serde::Serialize;

use crate::Error;

/// The sum of all expenses in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// The month formatted as `YYYY-MM`.
    pub month: String,
    pub total: f64,
}

/// The sum of all expenses in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Sum expenses by month, oldest month first.
///
/// Months without any expenses are left out.
pub fn get_monthly_totals(connection: &Connection) -> Result<Vec<MonthlyTotal>, Error> {
    connection
        .prepare(
            "SELECT strftime('%Y-%m', date) AS month, SUM(amount)
            FROM expense
            GROUP BY month
            ORDER BY month ASC",
        )?
        .query_map([], |row| {
            Ok(MonthlyTotal {
                month: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .map(|maybe_total| maybe_total.map_err(Error::from))
        .collect()
}

/// Sum expenses by category, ordered by category name.
pub fn get_category_totals(connection: &Connection) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT category, SUM(amount)
            FROM expense
            GROUP BY category
            ORDER BY category ASC",
        )?
        .query_map([], |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .map(|maybe_total| maybe_total.map_err(Error::from))
        .collect()
}
