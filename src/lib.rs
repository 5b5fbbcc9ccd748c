//! Expense Tracker is a web app for recording and reviewing personal expenses.
//!
//! This library provides a REST API that directly serves HTML pages, a CSV
//! export and a couple of JSON endpoints for the charts on the stats page.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod error;
mod expense;
mod export;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod notification;
mod routing;
mod summary;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, create_cookie_key};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use expense::{Expense, ExpenseId, NewExpense, create_expense};
pub use logging::logging_middleware;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
