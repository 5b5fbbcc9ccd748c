//! Spending totals by month and by category, served as JSON and plotted on
//! the stats page.

mod api;
mod charts;
mod db;
mod stats_page;

pub use api::{get_category_summary, get_monthly_summary};
pub use db::{CategoryTotal, MonthlyTotal, get_category_totals, get_monthly_totals};
pub use stats_page::get_stats_page;
