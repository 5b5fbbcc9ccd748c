//! One-time notifications shown on the page a client lands on after a redirect.
//!
//! Handlers that change data return a [RedirectWithNotification] describing
//! where the client should go next and what it should be told. The HTTP layer
//! carries the notification to the next page in an encrypted private cookie,
//! which that page reads and clears.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

pub(crate) const NOTIFICATION_COOKIE: &str = "notification";

/// Controls how a notification is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// A message for the user about the outcome of their last action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: &str) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.to_owned(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.to_owned(),
        }
    }

    pub fn info(message: &str) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.to_owned(),
        }
    }

    pub fn into_html(self) -> Markup {
        let style = match self.level {
            NotificationLevel::Success => {
                "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400"
            }
            NotificationLevel::Error => {
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400"
            }
            NotificationLevel::Info => {
                "p-4 mb-4 text-sm text-blue-800 rounded-lg bg-blue-50 \
                dark:bg-gray-800 dark:text-blue-400"
            }
        };

        html!(
            div
                role="alert"
                data-level=(level_name(self.level))
                class=(style)
            {
                p { (self.message) }
            }
        )
    }
}

fn level_name(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Success => "success",
        NotificationLevel::Error => "error",
        NotificationLevel::Info => "info",
    }
}

/// Where to send the client after a form submission, and what to tell them.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectWithNotification {
    pub location: String,
    pub notification: Notification,
}

impl RedirectWithNotification {
    pub fn new(location: &str, notification: Notification) -> Self {
        Self {
            location: location.to_owned(),
            notification,
        }
    }

    /// Build a "303 See Other" response that stores the notification in `jar`.
    pub fn into_response_with(self, jar: PrivateCookieJar) -> Response {
        let jar = set_notification(jar, &self.notification);

        (jar, Redirect::to(&self.location)).into_response()
    }
}

/// Add `notification` to `jar` so that it is shown on the next rendered page.
///
/// If the notification cannot be serialized, the jar is returned unchanged and
/// the error is logged.
pub fn set_notification(jar: PrivateCookieJar, notification: &Notification) -> PrivateCookieJar {
    let value = match serde_json::to_string(notification) {
        Ok(value) => value,
        Err(error) => {
            tracing::error!("could not serialize notification {notification:?}: {error}");
            return jar;
        }
    };

    jar.add(
        Cookie::build((NOTIFICATION_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Remove the pending notification from `jar`, returning it if there was one.
///
/// Cookies that cannot be decrypted or parsed are discarded.
pub fn take_notification(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Notification>) {
    let Some(cookie) = jar.get(NOTIFICATION_COOKIE) else {
        return (jar, None);
    };

    let notification = serde_json::from_str(cookie.value())
        .inspect_err(|error| tracing::warn!("discarding malformed notification cookie: {error}"))
        .ok();
    let jar = jar.remove(Cookie::build(NOTIFICATION_COOKIE).path("/"));

    (jar, notification)
}
