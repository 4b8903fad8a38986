//! Form extraction shared by every page that accepts a POSTed form.
//!
//! Handlers take `Result<Form<T>, FormRejection>` and pass it to [accept_form]
//! so missing or unreadable fields get the same 422 page everywhere.

// axum_extra's Form reads an empty field as None where axum::Form rejects the
// whole form.
use axum_extra::extract::{Form, FormRejection};

use crate::Error;

/// A form extracted along with its rejection, if any.
pub type FormResult<T> = Result<Form<T>, FormRejection>;

/// Unwrap a form extracted with its rejection, logging and converting the
/// rejection so the client gets a 422 page.
pub fn accept_form<T>(form: FormResult<T>) -> Result<T, Error> {
    match form {
        Ok(Form(form)) => Ok(form),
        Err(rejection) => {
            tracing::warn!("rejected form: {rejection}");
            Err(Error::InvalidForm(rejection.body_text()))
        }
    }
}

#[cfg(test)]
mod accept_form_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde::Deserialize;

    use crate::Error;

    use super::{FormResult, accept_form};

    #[derive(Deserialize)]
    struct Greeting {
        name: String,
        times: u8,
    }

    fn get_test_server() -> TestServer {
        let app = Router::new().route(
            "/greet",
            post(|form: FormResult<Greeting>| async move {
                accept_form(form).map(|greeting| greeting.name.repeat(greeting.times.into()))
            }),
        );

        TestServer::new(app)
    }

    #[tokio::test]
    async fn passes_complete_form_through() {
        let server = get_test_server();

        let response = server
            .post("/greet")
            .form(&[("name", "hi"), ("times", "2")])
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "hihi");
    }

    #[tokio::test]
    async fn missing_field_is_unprocessable() {
        let server = get_test_server();

        let response = server.post("/greet").form(&[("name", "hi")]).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unparsable_field_is_unprocessable() {
        let server = get_test_server();

        let response = server
            .post("/greet")
            .form(&[("name", "hi"), ("times", "many")])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn invalid_form_error_keeps_the_reason() {
        let error = Error::InvalidForm("missing field `times`".to_owned());

        assert_eq!(
            error.to_string(),
            "the form could not be read: missing field `times`"
        );
    }
}
