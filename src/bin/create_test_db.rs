use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use expense_tracker::{NewExpense, create_expense, initialize_db};

/// A utility for creating a test database for the expense tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// (days ago, amount, category, description, payment method)
const SAMPLE_EXPENSES: [(i64, f64, &str, Option<&str>, Option<&str>); 10] = [
    (0, 12.50, "Food", Some("Lunch"), Some("Card")),
    (1, 3.20, "Transport", Some("Bus fare"), Some("Card")),
    (3, 54.99, "Groceries", Some("Weekly shop"), Some("Card")),
    (7, 9.99, "Subscriptions", Some("Music streaming"), None),
    (12, 45.00, "Utilities", Some("Phone bill"), Some("Direct debit")),
    (20, 18.40, "Food", Some("Dinner, drinks and dessert"), Some("Cash")),
    (35, 120.00, "Utilities", Some("Power"), Some("Direct debit")),
    (41, 2.50, "Other", None, None),
    (63, 60.00, "Transport", Some("Fuel"), Some("Card")),
    (70, 23.75, "Groceries", None, Some("Cash")),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample expenses...");

    let today = OffsetDateTime::now_utc().date();

    for (days_ago, amount, category, description, payment_method) in SAMPLE_EXPENSES {
        create_expense(
            NewExpense {
                amount,
                category: category.to_owned(),
                description: description.map(str::to_owned),
                date: days_before(today, days_ago),
                payment_method: payment_method.map(str::to_owned),
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}

fn days_before(date: Date, days: i64) -> Date {
    date.saturating_sub(Duration::days(days))
}
