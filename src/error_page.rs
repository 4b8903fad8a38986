//! Defines the page to display when a request could not be completed.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// An error page with a status code, a short description of what went wrong
/// and a suggestion for how to fix it.
pub struct ErrorPage<'a> {
    pub status: StatusCode,
    pub description: &'a str,
    pub fix: &'a str,
}

impl ErrorPage<'_> {
    /// The generic page for unexpected errors.
    pub fn internal_server_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }

    pub fn into_html(self) -> Html<String> {
        let title = self.status.canonical_reason().unwrap_or("Error");

        Html(error_view(title, self.status.as_str(), self.description, self.fix).into_string())
    }
}

impl IntoResponse for ErrorPage<'_> {
    fn into_response(self) -> Response {
        (self.status, self.into_html()).into_response()
    }
}
