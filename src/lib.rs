//! Fintrack is a web app for keeping track of your incomes and expenses.
//!
//! Users record incomes and expenses against their own categories, see the
//! balance of their account, a ten day overview on the dashboard, and can
//! download their records as CSV reports.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod balance;
mod dashboard;
mod db;
mod endpoints;
mod error_page;
mod form;
mod html;
mod ledger;
mod logging;
mod navigation;
mod not_found;
mod profile;
mod records;
mod report;
mod routing;
mod settings;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, ValidatedPassword, get_user_by_email, parse_email,
    update_password,
};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;

use crate::{error_page::ErrorPage, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
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

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar")]
    CookieMissing,

    /// The auth token could not be written to or read from a cookie.
    #[error("could not serialize the auth token: {0}")]
    CookieError(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// A required text field was empty or only contained whitespace.
    #[error("{0} cannot be empty")]
    EmptyName(&'static str),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A submitted form was missing a field or a field could not be parsed.
    #[error("the form could not be read: {0}")]
    InvalidForm(String),

    /// The amount of an income or expense must be a positive, finite number.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// Another user has already signed up with the email address.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// The user already has a category of the same kind with this name.
    #[error("a category with this name already exists")]
    DuplicateCategoryName,

    /// The category still has incomes or expenses referring to it.
    #[error("the category is used by one or more records")]
    CategoryInUse,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A report could not be written as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("_category.name") =>
            {
                Error::DuplicateCategoryName
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidCredentials => Redirect::to(endpoints::LOG_IN_FAILED).into_response(),
            Error::TooWeak(_)
            | Error::InvalidEmail(_)
            | Error::EmptyName(_)
            | Error::EmptyCategoryName
            | Error::InvalidForm(_)
            | Error::InvalidAmount(_) => ErrorPage {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                description: "Invalid Input",
                fix: &capitalise_first_char(&self.to_string()),
            }
            .into_response(),
            Error::DuplicateEmail => ErrorPage {
                status: StatusCode::CONFLICT,
                description: "Email Already In Use",
                fix: "Another account already uses this email address. Choose a different one.",
            }
            .into_response(),
            Error::DuplicateCategoryName => ErrorPage {
                status: StatusCode::CONFLICT,
                description: "Duplicate Category",
                fix: "You already have a category with this name. Choose a different name.",
            }
            .into_response(),
            Error::CategoryInUse => ErrorPage {
                status: StatusCode::CONFLICT,
                description: "Category In Use",
                fix: "This category still has records. Move or delete them before removing the category.",
            }
            .into_response(),
            Error::InvalidTimezoneError(timezone) => ErrorPage {
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
                ..ErrorPage::internal_server_error()
            }
            .into_response(),
            Error::DatabaseLockError => ErrorPage::internal_server_error().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                ErrorPage::internal_server_error().into_response()
            }
        }
    }
}

pub(crate) fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{Error, capitalise_first_char, endpoints};

    #[test]
    fn unique_email_violation_maps_to_duplicate_email() {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute("CREATE TABLE user (id INTEGER PRIMARY KEY, email TEXT UNIQUE)", ())
            .unwrap();
        connection
            .execute("INSERT INTO user (email) VALUES ('a@b.c')", ())
            .unwrap();

        let error: Error = connection
            .execute("INSERT INTO user (email) VALUES ('a@b.c')", ())
            .unwrap_err()
            .into();

        assert_eq!(error, Error::DuplicateEmail);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn validation_errors_are_unprocessable() {
        let response = Error::InvalidAmount(-1.0).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn conflicts_use_conflict_status() {
        for error in [
            Error::DuplicateEmail,
            Error::DuplicateCategoryName,
            Error::CategoryInUse,
        ] {
            assert_eq!(error.into_response().status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn invalid_credentials_redirects_to_landing_page() {
        let response = Error::InvalidCredentials.into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::LOG_IN_FAILED
        );
    }

    #[test]
    fn capitalises_first_char() {
        assert_eq!(capitalise_first_char("hello world"), "Hello world");
        assert_eq!(capitalise_first_char(""), "");
    }
}
