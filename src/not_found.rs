use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error_page::ErrorPage;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    ErrorPage {
        status: StatusCode::NOT_FOUND,
        description: "Something's missing.",
        fix: "Sorry, we can't find that page. You'll find lots to explore on the home page.",
    }
    .into_response()
}
